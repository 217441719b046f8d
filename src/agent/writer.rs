//! Pick commentary writer
//!
//! Turns a raw pick into post text: AI analysis with a templated fallback,
//! sport hashtags under the configured policy, a promo line, and the
//! 280-character trim. All randomness flows through [`Selector`] so a
//! seeded writer produces byte-identical output.

use crate::agent::gemini::GeminiClient;
use crate::config::{PostingConfig, SportsConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Platform post limit in characters
pub const POST_CHAR_LIMIT: usize = 280;

/// Prefix kept by the last-resort trim
const AGGRESSIVE_PREFIX: usize = 100;

/// Seedable source for every template/hashtag choice
pub struct Selector {
    rng: StdRng,
}

impl Selector {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.rng.gen_range(0..items.len())])
        }
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

fn hashtag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"#\w+").unwrap())
}

/// Strip URLs and collapse whitespace
pub fn clean_pick_text(text: &str) -> String {
    let without_urls = url_re().replace_all(text, "");
    without_urls.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove hashtags and links that leak through generated text
pub fn scrub_generated(text: &str) -> String {
    let without_urls = url_re().replace_all(text, "");
    let without_tags = hashtag_re().replace_all(&without_urls, "");
    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut at a word boundary and add an ellipsis unless the text already ends
/// in terminal punctuation
fn soft_truncate(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    let mut cut = truncate_chars(text, max).to_string();
    if let Some(idx) = cut.rfind(' ') {
        cut.truncate(idx);
    }
    if !cut.ends_with(['!', '.', '?']) {
        cut.push_str("...");
    }
    cut
}

/// Pick commentary writer
pub struct PickWriter {
    posting: PostingConfig,
    sports: SportsConfig,
    gemini: GeminiClient,
    selector: Selector,
}

impl PickWriter {
    pub fn new(
        posting: PostingConfig,
        sports: SportsConfig,
        gemini: GeminiClient,
        selector: Selector,
    ) -> Self {
        Self {
            posting,
            sports,
            gemini,
            selector,
        }
    }

    pub fn detect_sport(&self, text: &str) -> &str {
        self.sports.detect(text)
    }

    /// AI analysis with a templated fallback. Too-short input skips the
    /// call entirely; a failed call or a too-short reply falls back.
    pub async fn generate_analysis(&mut self, pick_text: &str) -> String {
        let cleaned = clean_pick_text(pick_text);
        if char_len(&cleaned) < 10 {
            debug!("Pick text too short for analysis, using fallback");
            return self.fallback_analysis(&cleaned);
        }

        let prompt = self.posting.analysis_prompt.replace("{pick}", &cleaned);
        match self.gemini.generate(&prompt).await {
            Ok(reply) => {
                let reply = reply.trim().to_string();
                if char_len(&reply) < 20 {
                    warn!("Generated analysis too short, using fallback");
                    self.fallback_analysis(&cleaned)
                } else {
                    reply
                }
            }
            Err(e) => {
                warn!("Error generating analysis: {}", e);
                self.fallback_analysis(&cleaned)
            }
        }
    }

    /// Opener + pick + closer, reads like a bettor and not a bot
    pub fn fallback_analysis(&mut self, cleaned_pick: &str) -> String {
        let opener = self
            .selector
            .choose(&self.posting.openers)
            .cloned()
            .unwrap_or_default();
        let closer = self
            .selector
            .choose(&self.posting.closers)
            .cloned()
            .unwrap_or_default();

        let mut line = format!("{} {}", opener, cleaned_pick).trim().to_string();
        if !line.ends_with(['!', '.', '?']) {
            line.push('.');
        }
        if !closer.is_empty() {
            line.push(' ');
            line.push_str(&closer);
        }
        line
    }

    /// Sport tags under the configured policy: `base_tags` from the sport
    /// entry, maybe one viral tag, capped at `max_tags`.
    pub fn hashtags(&mut self, sport: &str) -> String {
        let mut tags: Vec<String> = self
            .posting
            .sport_hashtags(sport)
            .split_whitespace()
            .take(self.posting.base_tags)
            .map(str::to_string)
            .collect();

        if self.selector.chance(self.posting.viral_chance) {
            if let Some(viral) = self.selector.choose(&self.posting.viral_pool).cloned() {
                let present = tags.iter().any(|t| t.eq_ignore_ascii_case(&viral));
                if !present {
                    tags.push(viral);
                }
            }
        }

        tags.truncate(self.posting.max_tags);
        tags.join(" ")
    }

    pub fn promo(&mut self) -> String {
        let template = self
            .selector
            .choose(&self.posting.promos)
            .cloned()
            .unwrap_or_default();
        self.posting.substitute(&template)
    }

    /// Assemble the final post. Content precedence: explicit analysis, then
    /// slip info, then the raw pick text, then a generic filler.
    pub fn format_tweet(
        &mut self,
        pick_text: &str,
        analysis: Option<&str>,
        slip_info: Option<&str>,
        slip_link: Option<&str>,
    ) -> String {
        let body = analysis
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
            .or_else(|| {
                slip_info
                    .filter(|s| !s.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                let cleaned = clean_pick_text(pick_text);
                if cleaned.is_empty() {
                    "Today's board has some spots we like.".to_string()
                } else {
                    cleaned
                }
            });

        let sport = self.detect_sport(pick_text).to_string();
        let hashtags = self.hashtags(&sport);
        let promo = self.promo();

        let mut parts = vec![body.clone()];
        if let Some(link) = slip_link {
            parts.push(format!("Slip: {}", link));
        }
        parts.push(promo);
        parts.push(hashtags);
        let tweet = parts.join("\n\n");

        if char_len(&tweet) <= POST_CHAR_LIMIT {
            tweet
        } else {
            self.trim_tweet(&body, slip_link)
        }
    }

    /// Deterministic trim: reserve room for the short promo and short
    /// hashtags (and slip link when present), word-boundary-truncate the
    /// analysis to fit, and if a pathological link still blows the budget,
    /// cut the analysis to a fixed prefix and hard-clip the result.
    fn trim_tweet(&self, analysis: &str, slip_link: Option<&str>) -> String {
        let short_promo = self.posting.short_promo_line();
        let short_hashtags = self.posting.short_hashtags.clone();
        let slip_line = slip_link.map(|link| format!("Slip: {}", link));

        let mut reserved = char_len(&short_promo) + char_len(&short_hashtags) + 6;
        if let Some(line) = &slip_line {
            reserved += char_len(line) + 2;
        }

        let max_analysis = POST_CHAR_LIMIT.saturating_sub(reserved);
        let trimmed = soft_truncate(analysis, max_analysis);

        let mut parts = vec![trimmed];
        if let Some(line) = slip_line {
            parts.push(line);
        }
        parts.push(short_promo);
        parts.push(short_hashtags.clone());
        let tweet = parts.join("\n\n");

        if char_len(&tweet) <= POST_CHAR_LIMIT {
            return tweet;
        }

        // Unshortenable content (usually a very long slip link): fixed
        // prefix, then clip the final string to exactly the limit.
        let prefix = soft_truncate(analysis, AGGRESSIVE_PREFIX);
        let tweet = format!("{}\n\n{}", prefix, short_hashtags);
        truncate_chars(&tweet, POST_CHAR_LIMIT).to_string()
    }

    /// Daily recap text with the same shorter-variant fallback
    pub fn format_recap_tweet(
        &mut self,
        record: &str,
        win_rate: &str,
        performance: &str,
    ) -> String {
        let hashtags = self
            .posting
            .sport_hashtags("default")
            .split_whitespace()
            .take(self.posting.max_tags.max(3))
            .collect::<Vec<_>>()
            .join(" ");

        let tweet = format!(
            "Daily recap\n\nRecord: {}\nWin rate: {}\n\n{}\n\nFree picks daily:\n{}\n{}\n\n{}",
            record,
            win_rate,
            performance,
            self.posting.invite_link,
            self.posting.website_url,
            hashtags
        );
        if char_len(&tweet) <= POST_CHAR_LIMIT {
            return tweet;
        }

        let short = format!(
            "Recap: {} ({})\n{}\n\n{}\n\n{}",
            record,
            win_rate,
            performance,
            self.posting.short_promo_line(),
            self.posting.short_hashtags
        );
        truncate_chars(&short, POST_CHAR_LIMIT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::gemini::{GeminiClient, GeminiConfig};

    fn writer_with_seed(seed: u64) -> PickWriter {
        PickWriter::new(
            PostingConfig::default(),
            SportsConfig::default(),
            GeminiClient::new(GeminiConfig::default()).unwrap(),
            Selector::from_seed(seed),
        )
    }

    #[test]
    fn clean_strips_urls_and_whitespace() {
        let cleaned = clean_pick_text("Lakers  -3.5   https://book.example/slip/123 vs Celtics");
        assert_eq!(cleaned, "Lakers -3.5 vs Celtics");
    }

    #[test]
    fn scrub_removes_leaked_tags_and_links() {
        let scrubbed = scrub_generated("Love this play #NBA https://x.test more text");
        assert_eq!(scrubbed, "Love this play more text");
    }

    #[test]
    fn fallback_is_deterministic_for_a_seed() {
        let mut a = writer_with_seed(7);
        let mut b = writer_with_seed(7);
        assert_eq!(
            a.fallback_analysis("Lakers -3.5 vs Celtics"),
            b.fallback_analysis("Lakers -3.5 vs Celtics")
        );
    }

    #[test]
    fn hashtags_respect_cap() {
        let mut writer = writer_with_seed(1);
        for sport in ["NBA", "NFL", "default", "UNKNOWN"] {
            for _ in 0..20 {
                let tags = writer.hashtags(sport);
                let count = tags.split_whitespace().count();
                assert!(count >= 1 && count <= 3, "bad tag count in {:?}", tags);
                assert!(tags.split_whitespace().all(|t| t.starts_with('#')));
            }
        }
    }

    #[test]
    fn format_tweet_always_fits() {
        let mut writer = writer_with_seed(42);
        let long_analysis = "a very strong lean ".repeat(40);
        for seed in 0..10u64 {
            let mut writer2 = writer_with_seed(seed);
            let tweet = writer2.format_tweet(
                "Lakers -3.5 vs Celtics",
                Some(&long_analysis),
                None,
                Some("https://book.example/slip/abcdef"),
            );
            assert!(char_len(&tweet) <= POST_CHAR_LIMIT, "{} chars", char_len(&tweet));
        }
        let tweet = writer.format_tweet("Lakers -3.5 vs Celtics", None, None, None);
        assert!(char_len(&tweet) <= POST_CHAR_LIMIT);
        assert!(tweet.contains("Lakers -3.5 vs Celtics"));
    }

    #[test]
    fn format_tweet_precedence() {
        let mut writer = writer_with_seed(3);
        let with_analysis =
            writer.format_tweet("Lakers ML", Some("Analysis wins."), Some("Slip info"), None);
        assert!(with_analysis.starts_with("Analysis wins."));

        let mut writer = writer_with_seed(3);
        let with_slip = writer.format_tweet("Lakers ML", None, Some("Slip info"), None);
        assert!(with_slip.starts_with("Slip info"));

        let mut writer = writer_with_seed(3);
        let raw = writer.format_tweet("Lakers ML", None, None, None);
        assert!(raw.starts_with("Lakers ML"));

        let mut writer = writer_with_seed(3);
        let filler = writer.format_tweet("", None, None, None);
        assert!(filler.starts_with("Today's board"));
    }

    #[test]
    fn trim_never_splits_mid_word() {
        let mut writer = writer_with_seed(9);
        let analysis = "wordone wordtwo wordthree ".repeat(30);
        let tweet = writer.format_tweet("Lakers ML", Some(&analysis), None, None);
        let body = tweet.split("\n\n").next().unwrap();
        let stem = body.trim_end_matches("...");
        assert!(
            stem.split_whitespace()
                .all(|w| ["wordone", "wordtwo", "wordthree"].contains(&w)),
            "split mid-word: {:?}",
            body
        );
    }

    #[test]
    fn pathological_link_still_clips_to_limit() {
        let mut writer = writer_with_seed(11);
        let giant_link = format!("https://book.example/{}", "x".repeat(400));
        let tweet = writer.format_tweet(
            "Lakers ML",
            Some("short analysis here"),
            None,
            Some(&giant_link),
        );
        assert!(char_len(&tweet) <= POST_CHAR_LIMIT);
    }

    #[test]
    fn recap_tweet_fits_both_variants() {
        let mut writer = writer_with_seed(5);
        let normal = writer.format_recap_tweet("5W-2L-1P", "71%", "Another winning day.");
        assert!(char_len(&normal) <= POST_CHAR_LIMIT);
        assert!(normal.contains("5W-2L-1P"));

        let long_perf = "a grinding day on the board ".repeat(20);
        let trimmed = writer.format_recap_tweet("5W-2L-1P", "71%", &long_perf);
        assert!(char_len(&trimmed) <= POST_CHAR_LIMIT);
    }
}
