//! Betting-slip screenshot extraction
//!
//! Sends the slip image through the vision model with a strict line
//! format, then parses tolerantly: junk lines are skipped, unknown keys
//! ignored, and any failure still produces a usable [`SlipAnalysis`] with
//! the raw model output attached.

use crate::agent::gemini::GeminiClient;
use crate::agent::writer::{scrub_generated, Selector};
use crate::config::{PostingConfig, SportsConfig};
use crate::domain::SlipAnalysis;
use std::path::Path;
use tracing::{debug, warn};

const EXTRACT_PROMPT: &str = "You are reading a screenshot of a sports betting slip. \
Extract the bet and reply with EXACTLY these lines and nothing else:\n\
SPORT: <NBA, NFL, MLB, NHL, NCAAB, NCAAF or UNKNOWN>\n\
PLAYER: <player name or N/A>\n\
TEAM: <team name or N/A>\n\
BET_TYPE: <bet type or N/A>\n\
LINE: <line or N/A>\n\
ODDS: <odds or N/A>";

const TWEET_PROMPT: &str = "Write one short tweet about this bet: {summary}\n\n\
Sound like a person sharing a play with friends. No hashtags, no links, \
no all-caps hype, at most one emoji. Under 200 characters.";

/// Slip image analyzer
pub struct SlipAnalyzer {
    gemini: GeminiClient,
    sports: SportsConfig,
    posting: PostingConfig,
    selector: Selector,
}

impl SlipAnalyzer {
    pub fn new(
        gemini: GeminiClient,
        sports: SportsConfig,
        posting: PostingConfig,
        selector: Selector,
    ) -> Self {
        Self {
            gemini,
            sports,
            posting,
            selector,
        }
    }

    /// Extract structured fields from a slip screenshot. Never fails: a
    /// transport or read error yields a default analysis carrying the
    /// error text.
    pub async fn analyze(&self, image_path: &str) -> SlipAnalysis {
        let bytes = match std::fs::read(image_path) {
            Ok(b) => b,
            Err(e) => {
                warn!("Could not read slip image {}: {}", image_path, e);
                return SlipAnalysis::unparsed(format!("image read failed: {}", e));
            }
        };
        let mime = mime_for_path(image_path);

        match self
            .gemini
            .generate_with_image(EXTRACT_PROMPT, &bytes, mime)
            .await
        {
            Ok(reply) => {
                debug!("Slip extraction reply: {} chars", reply.len());
                parse_slip_text(&reply, &self.sports)
            }
            Err(e) => {
                warn!("Slip extraction failed: {}", e);
                SlipAnalysis::unparsed(e.to_string())
            }
        }
    }

    /// Short human-toned tweet built from whatever fields were extracted.
    /// Hashtags and links that leak through the model are scrubbed; a
    /// too-short result falls back to a template.
    pub async fn tweet_from_slip(&mut self, analysis: &SlipAnalysis) -> String {
        let summary = if analysis.has_fields() {
            analysis.summary()
        } else {
            clean_raw_excerpt(&analysis.raw)
        };

        if !summary.is_empty() {
            let prompt = TWEET_PROMPT.replace("{summary}", &summary);
            match self.gemini.generate(&prompt).await {
                Ok(reply) => {
                    let scrubbed = scrub_generated(&reply);
                    if scrubbed.chars().count() >= 20 {
                        return scrubbed;
                    }
                    warn!("Slip tweet too short, using fallback");
                }
                Err(e) => {
                    warn!("Error generating slip tweet: {}", e);
                }
            }
        }

        self.fallback_tweet(analysis)
    }

    fn fallback_tweet(&mut self, analysis: &SlipAnalysis) -> String {
        let description = if analysis.has_fields() {
            let mut parts = Vec::new();
            if let Some(player) = &analysis.player {
                parts.push(player.clone());
            } else if let Some(team) = &analysis.team {
                parts.push(team.clone());
            }
            if let Some(bet_type) = &analysis.bet_type {
                parts.push(bet_type.clone());
            }
            if let Some(line) = &analysis.line {
                parts.push(line.clone());
            }
            if let Some(odds) = &analysis.odds {
                parts.push(format!("at {}", odds));
            }
            parts.join(" ")
        } else {
            "this slip".to_string()
        };

        let closer = self
            .selector
            .choose(&self.posting.closers)
            .cloned()
            .unwrap_or_default();

        let mut line = format!("Really like {}.", description.trim());
        if !closer.is_empty() {
            line.push(' ');
            line.push_str(&closer);
        }
        line
    }
}

fn mime_for_path(path: &str) -> &'static str {
    match Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

fn clean_raw_excerpt(raw: &str) -> String {
    let cleaned = scrub_generated(raw);
    cleaned.chars().take(120).collect::<String>().trim().to_string()
}

/// Parse the `KEY: value` reply line-by-line on the first colon. Unknown
/// keys are ignored; "N/A" values map to absent; the sport must be one of
/// the configured tags or it falls back to "default".
pub fn parse_slip_text(raw: &str, sports: &SportsConfig) -> SlipAnalysis {
    let mut analysis = SlipAnalysis::unparsed(raw.to_string());

    for line in raw.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_uppercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        let field = if value.eq_ignore_ascii_case("n/a") {
            None
        } else {
            Some(value.to_string())
        };

        match key.as_str() {
            "SPORT" => {
                let upper = value.to_uppercase();
                analysis.sport = if sports.is_known(&upper) {
                    upper
                } else {
                    "default".to_string()
                };
            }
            "PLAYER" => analysis.player = field,
            "TEAM" => analysis.team = field,
            "BET_TYPE" => analysis.bet_type = field,
            "LINE" => analysis.line = field,
            "ODDS" => analysis.odds = field,
            _ => {}
        }
    }

    analysis
}
