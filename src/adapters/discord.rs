//! Discord channel reader
//!
//! Pulls recent messages from the picks channel over the REST API with
//! bot-token auth. Transport and parse failures degrade to an empty list;
//! nothing here is allowed to abort a run.

use crate::config::DiscordConfig;
use crate::error::{PickcastError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Wire shape of a channel message, reduced to the fields we read
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelMessage {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub timestamp: String,
    #[serde(default)]
    pub author: MessageAuthor,
    #[serde(default)]
    pub attachments: Vec<MessageAttachment>,
    #[serde(default)]
    pub embeds: Vec<MessageEmbed>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageAuthor {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageAttachment {
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

impl MessageAttachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or_else(|| {
                let lower = self.filename.to_lowercase();
                [".png", ".jpg", ".jpeg", ".gif", ".webp"]
                    .iter()
                    .any(|ext| lower.ends_with(ext))
            })
    }
}

/// Link-preview embeds; their thumbnails are auto-generated, not user
/// uploads, so ingestion only falls back to them.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEmbed {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<EmbedImage>,
    #[serde(default)]
    pub image: Option<EmbedImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedImage {
    pub url: String,
}

impl MessageEmbed {
    pub fn image_url(&self) -> Option<&str> {
        self.image
            .as_ref()
            .or(self.thumbnail.as_ref())
            .map(|img| img.url.as_str())
    }
}

/// Channel reader client
#[derive(Clone)]
pub struct DiscordClient {
    config: DiscordConfig,
    http: Client,
}

impl DiscordClient {
    pub fn new(config: DiscordConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Fetch recent messages, newest first. The provider caps `limit` at
    /// 100. Any failure degrades to an empty list.
    pub async fn recent_messages(&self, limit: usize) -> Vec<ChannelMessage> {
        match self.try_recent_messages(limit).await {
            Ok(messages) => messages,
            Err(e) => {
                warn!("Error fetching channel messages: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_recent_messages(&self, limit: usize) -> Result<Vec<ChannelMessage>> {
        let url = format!(
            "{}/channels/{}/messages",
            self.config.base_url, self.config.channel_id
        );

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bot {}", self.config.bot_token))
            .query(&[("limit", limit.min(100))])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PickcastError::Internal(format!(
                "Channel fetch failed: {} - {}",
                status, body
            )));
        }

        let messages: Vec<ChannelMessage> = response.json().await?;
        debug!("Fetched {} channel messages", messages.len());
        Ok(messages)
    }
}
