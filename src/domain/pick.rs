//! Pick and slip types sourced from the chat channel

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single betting recommendation lifted from the channel.
///
/// Immutable once ingested; the dedup ledger, not the pick itself, records
/// whether it has been published.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pick {
    /// Source message id, stable, the dedup key
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    /// Genuine user attachments first; embed thumbnails only appear here
    /// when the message had no real attachment
    #[serde(default)]
    pub attached_images: Vec<PickImage>,
    /// Raw URLs found in the text (betting-slip deep links and the like)
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickImage {
    pub url: String,
    /// Set once downloaded to scratch storage
    #[serde(default)]
    pub local_path: Option<String>,
}

impl Pick {
    pub fn has_slip_image(&self) -> bool {
        !self.attached_images.is_empty()
    }

    /// First link that looks like a betting-slip deep link, if any
    pub fn slip_link(&self) -> Option<&str> {
        self.links.first().map(|s| s.as_str())
    }
}

/// Structured extraction from a betting-slip screenshot.
///
/// `raw` always keeps the full model output so a failed parse still leaves
/// something usable downstream. Never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlipAnalysis {
    pub sport: String,
    pub player: Option<String>,
    pub team: Option<String>,
    pub bet_type: Option<String>,
    pub line: Option<String>,
    pub odds: Option<String>,
    pub raw: String,
}

impl SlipAnalysis {
    pub fn unparsed(raw: impl Into<String>) -> Self {
        Self {
            sport: "default".to_string(),
            raw: raw.into(),
            ..Default::default()
        }
    }

    /// Field summary in fixed order, used to seed the slip tweet prompt
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(player) = &self.player {
            parts.push(format!("Player: {}", player));
        }
        if let Some(team) = &self.team {
            parts.push(format!("Team: {}", team));
        }
        if let Some(bet_type) = &self.bet_type {
            parts.push(format!("Bet: {}", bet_type));
        }
        if let Some(line) = &self.line {
            parts.push(format!("Line: {}", line));
        }
        if let Some(odds) = &self.odds {
            parts.push(format!("Odds: {}", odds));
        }
        if self.sport != "default" {
            parts.push(format!("Sport: {}", self.sport));
        }
        parts.join(", ")
    }

    pub fn has_fields(&self) -> bool {
        self.player.is_some()
            || self.team.is_some()
            || self.bet_type.is_some()
            || self.line.is_some()
            || self.odds.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_keeps_fixed_field_order() {
        let analysis = SlipAnalysis {
            sport: "NBA".to_string(),
            player: Some("Tyrese Maxey".to_string()),
            team: None,
            bet_type: Some("Under".to_string()),
            line: Some("10.5 Rebs + Ast".to_string()),
            odds: Some("-109".to_string()),
            raw: String::new(),
        };
        assert_eq!(
            analysis.summary(),
            "Player: Tyrese Maxey, Bet: Under, Line: 10.5 Rebs + Ast, Odds: -109, Sport: NBA"
        );
    }

    #[test]
    fn unparsed_carries_error_text() {
        let analysis = SlipAnalysis::unparsed("timeout talking to the model");
        assert_eq!(analysis.sport, "default");
        assert!(!analysis.has_fields());
        assert!(analysis.raw.contains("timeout"));
    }
}
