//! Gemini API client for post generation
//!
//! Thin wrapper over the generateContent endpoint, text and vision. Callers
//! are expected to catch errors and fall back to templates; nothing here
//! retries.

use crate::error::{PickcastError, Result};
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini API client configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for Gemini
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout
    pub timeout_secs: u64,
    /// Model to use
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 15,
            model: "gemini-1.5-flash".to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            base_url: std::env::var("GEMINI_API_URL").unwrap_or_else(|_| {
                "https://generativelanguage.googleapis.com/v1beta".to_string()
            }),
            timeout_secs: 15,
            model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini API client
#[derive(Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Text completion for a prompt
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.call(vec![Part::Text(prompt.to_string())]).await
    }

    /// Vision call: a prompt plus one inline image
    pub async fn generate_with_image(
        &self,
        prompt: &str,
        image: &[u8],
        mime_type: &str,
    ) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(image);
        self.call(vec![
            Part::Text(prompt.to_string()),
            Part::InlineData(InlineData {
                mime_type: mime_type.to_string(),
                data: encoded,
            }),
        ])
        .await
    }

    async fn call(&self, parts: Vec<Part>) -> Result<String> {
        if !self.is_configured() {
            return Err(PickcastError::Internal(
                "Gemini API key not configured".to_string(),
            ));
        }

        debug!("Sending request to Gemini API");

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );
        let request = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API error: {} - {}", status, body);
            return Err(PickcastError::Internal(format!(
                "Gemini API error: {} - {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PickcastError::Internal(format!("Failed to parse Gemini response: {}", e)))?;

        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
            .trim()
            .to_string();

        debug!("Gemini response received: {} chars", text.len());
        Ok(text)
    }
}
