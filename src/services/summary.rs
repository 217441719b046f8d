//! End-of-day summary post
//!
//! A casual wrap-up of the day's picks plus a peek at tomorrow's prop
//! board, written by the model under a strict no-hype prompt with a
//! templated fallback.

use crate::adapters::PropListing;
use crate::agent::gemini::GeminiClient;
use crate::agent::writer::scrub_generated;
use crate::config::{PostingConfig, SportsConfig};
use crate::domain::Pick;
use tracing::warn;

const POST_CHAR_LIMIT: usize = 280;
/// Props mentioned in the model's context
const CONTEXT_PROP_CAP: usize = 3;

/// What the day looked like, condensed for the prompt
#[derive(Debug, Default)]
pub struct DayDigest {
    pub total_picks: usize,
    pub sports: Vec<String>,
}

pub struct SummaryService {
    gemini: GeminiClient,
    posting: PostingConfig,
    sports: SportsConfig,
}

impl SummaryService {
    pub fn new(gemini: GeminiClient, posting: PostingConfig, sports: SportsConfig) -> Self {
        Self {
            gemini,
            posting,
            sports,
        }
    }

    pub fn digest(&self, picks: &[Pick]) -> DayDigest {
        let mut sports: Vec<String> = Vec::new();
        for pick in picks {
            let tag = self.sports.detect(&pick.text);
            if tag != "default" && !sports.iter().any(|s| s == tag) {
                sports.push(tag.to_string());
            }
        }
        if sports.is_empty() {
            sports.push("Mixed".to_string());
        }
        DayDigest {
            total_picks: picks.len(),
            sports,
        }
    }

    pub fn build_context(&self, digest: &DayDigest, props: &[PropListing]) -> String {
        let mut parts = Vec::new();
        if digest.total_picks > 0 {
            parts.push(format!("Posted {} picks today", digest.total_picks));
            parts.push(format!("Sports covered: {}", digest.sports.join(", ")));
        } else {
            parts.push("Quiet day, no picks posted".to_string());
        }

        if !props.is_empty() {
            parts.push(format!("\nTomorrow's board has {}+ props", props.len()));
            for prop in props.iter().take(CONTEXT_PROP_CAP) {
                let line = prop.line.map(|l| format!(" {}", l)).unwrap_or_default();
                parts.push(format!("  - {} {}{}", prop.player_name, prop.stat_type, line));
            }
        }
        parts.join("\n")
    }

    /// The summary line itself; the model's reply is scrubbed and falls
    /// back to a template when missing or too short
    pub async fn generate_summary(&self, digest: &DayDigest, props: &[PropListing]) -> String {
        let context = self.build_context(digest, props);
        let prompt = self.posting.summary_prompt.replace("{context}", &context);

        match self.gemini.generate(&prompt).await {
            Ok(reply) => {
                let cleaned = scrub_generated(&reply.replace('"', ""));
                if cleaned.chars().count() < 20 {
                    self.fallback_summary(digest)
                } else {
                    cleaned
                }
            }
            Err(e) => {
                warn!("Error generating summary: {}", e);
                self.fallback_summary(digest)
            }
        }
    }

    pub fn fallback_summary(&self, digest: &DayDigest) -> String {
        if digest.total_picks > 0 {
            let sports = digest
                .sports
                .iter()
                .take(2)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "Wrapped up the day with some {} action. More plays coming tomorrow.",
                sports
            )
        } else {
            "Quiet day today. Scanning the board for tomorrow's plays.".to_string()
        }
    }

    /// Summary wrapped with the promo and tags, clipped to the limit
    pub fn full_tweet(&self, summary: &str) -> String {
        let promo = format!("All picks: {}", self.posting.invite_link);
        let tags = &self.posting.short_hashtags;

        let tweet = format!("{}\n\n{}\n\n{}", summary, promo, tags);
        if tweet.chars().count() <= POST_CHAR_LIMIT {
            return tweet;
        }

        let reserved = promo.chars().count() + tags.chars().count() + 4 + 3;
        let max_summary = POST_CHAR_LIMIT.saturating_sub(reserved);
        let cut: String = summary.chars().take(max_summary).collect();
        let tweet = format!("{}...\n\n{}\n\n{}", cut.trim_end(), promo, tags);
        tweet.chars().take(POST_CHAR_LIMIT).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::gemini::GeminiConfig;
    use chrono::Utc;

    fn service() -> SummaryService {
        SummaryService::new(
            GeminiClient::new(GeminiConfig::default()).unwrap(),
            PostingConfig::default(),
            SportsConfig::default(),
        )
    }

    fn pick(text: &str) -> Pick {
        Pick {
            id: "1".into(),
            text: text.into(),
            timestamp: Utc::now(),
            author: "capper".into(),
            attached_images: Vec::new(),
            links: Vec::new(),
        }
    }

    #[test]
    fn digest_collects_unique_sports() {
        let service = service();
        let digest = service.digest(&[
            pick("Lakers ML -150"),
            pick("Maxey points over 24.5"),
            pick("Chiefs -3"),
        ]);
        assert_eq!(digest.total_picks, 3);
        assert_eq!(digest.sports, vec!["NBA", "NFL"]);

        let empty = service.digest(&[]);
        assert_eq!(empty.sports, vec!["Mixed"]);
    }

    #[test]
    fn context_mentions_board_when_props_exist() {
        let service = service();
        let digest = service.digest(&[pick("Lakers ML -150")]);
        let context = service.build_context(&digest, &[]);
        assert!(context.contains("Posted 1 picks today"));
        assert!(!context.contains("board"));
    }

    #[test]
    fn fallback_reads_naturally() {
        let service = service();
        let digest = DayDigest {
            total_picks: 2,
            sports: vec!["NBA".into(), "NFL".into(), "MLB".into()],
        };
        let text = service.fallback_summary(&digest);
        assert!(text.contains("NBA, NFL"));
        assert!(!text.contains("MLB"));

        let quiet = service.fallback_summary(&DayDigest::default());
        assert!(quiet.contains("Quiet day"));
    }

    #[test]
    fn full_tweet_clips_to_limit() {
        let service = service();
        let short = service.full_tweet("Decent day on the props.");
        assert!(short.chars().count() <= 280);
        assert!(short.contains("All picks:"));

        let long = service.full_tweet(&"a day that went on and on ".repeat(30));
        assert!(long.chars().count() <= 280);
        assert!(long.contains("..."));
    }
}
