use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub posting: PostingConfig,
    #[serde(default)]
    pub sports: SportsConfig,
    #[serde(default)]
    pub state: StateConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file layered with
    /// PICKCAST__* environment variables.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path));
        }
        builder
            .add_source(Environment::with_prefix("PICKCAST").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token for the channel read scope
    #[serde(default)]
    pub bot_token: String,
    /// Picks channel id
    #[serde(default)]
    pub channel_id: u64,
    #[serde(default = "default_discord_api")]
    pub base_url: String,
    #[serde(default = "default_short_timeout")]
    pub timeout_secs: u64,
}

fn default_discord_api() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_short_timeout() -> u64 {
    10
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            bot_token: std::env::var("DISCORD_BOT_TOKEN").unwrap_or_default(),
            channel_id: std::env::var("DISCORD_CHANNEL_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(0),
            base_url: default_discord_api(),
            timeout_secs: default_short_timeout(),
        }
    }
}

impl DiscordConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && self.channel_id != 0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwitterConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
    #[serde(default = "default_short_timeout")]
    pub timeout_secs: u64,
}

impl Default for TwitterConfig {
    fn default() -> Self {
        Self {
            api_key: std::env::var("TWITTER_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("TWITTER_API_SECRET").unwrap_or_default(),
            access_token: std::env::var("TWITTER_ACCESS_TOKEN").unwrap_or_default(),
            access_token_secret: std::env::var("TWITTER_ACCESS_TOKEN_SECRET").unwrap_or_default(),
            timeout_secs: default_short_timeout(),
        }
    }
}

impl TwitterConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
            && !self.api_secret.is_empty()
            && !self.access_token.is_empty()
            && !self.access_token_secret.is_empty()
    }
}

/// Everything that shapes the text of a post. The hashtag counts and the
/// template pools changed repeatedly during engagement tuning, so all of it
/// is data, not code.
#[derive(Debug, Clone, Deserialize)]
pub struct PostingConfig {
    #[serde(default = "default_invite_link")]
    pub invite_link: String,
    #[serde(default = "default_website_url")]
    pub website_url: String,
    #[serde(default = "default_handle")]
    pub handle: String,

    /// Sport tag -> space-separated hashtag string. Must contain "default".
    #[serde(default = "default_hashtags")]
    pub hashtags: Vec<(String, String)>,
    /// Rotating pool of extra discoverability tags
    #[serde(default = "default_viral_pool")]
    pub viral_pool: Vec<String>,
    /// Tags taken from the sport entry before any viral addition
    #[serde(default = "default_base_tags")]
    pub base_tags: usize,
    /// Probability of appending one viral tag
    #[serde(default = "default_viral_chance")]
    pub viral_chance: f64,
    /// Hard cap on total tags in a post
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    /// Compact tag string used when trimming to fit
    #[serde(default = "default_short_hashtags")]
    pub short_hashtags: String,

    /// Promo line pool; `{invite}` and `{site}` are substituted
    #[serde(default = "default_promos")]
    pub promos: Vec<String>,
    /// Compact promo used when trimming to fit
    #[serde(default = "default_short_promo")]
    pub short_promo: String,

    /// Fallback opener pool for when the generator is unavailable
    #[serde(default = "default_openers")]
    pub openers: Vec<String>,
    /// Fallback closer pool; the empty entry is a valid choice
    #[serde(default = "default_closers")]
    pub closers: Vec<String>,

    /// Analysis prompt; `{pick}` is substituted
    #[serde(default = "default_analysis_prompt")]
    pub analysis_prompt: String,
    /// End-of-day summary prompt; `{context}` is substituted
    #[serde(default = "default_summary_prompt")]
    pub summary_prompt: String,
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            invite_link: default_invite_link(),
            website_url: default_website_url(),
            handle: default_handle(),
            hashtags: default_hashtags(),
            viral_pool: default_viral_pool(),
            base_tags: default_base_tags(),
            viral_chance: default_viral_chance(),
            max_tags: default_max_tags(),
            short_hashtags: default_short_hashtags(),
            promos: default_promos(),
            short_promo: default_short_promo(),
            openers: default_openers(),
            closers: default_closers(),
            analysis_prompt: default_analysis_prompt(),
            summary_prompt: default_summary_prompt(),
        }
    }
}

impl PostingConfig {
    pub fn sport_hashtags(&self, sport: &str) -> &str {
        self.hashtags
            .iter()
            .find(|(tag, _)| tag == sport)
            .or_else(|| self.hashtags.iter().find(|(tag, _)| tag == "default"))
            .map(|(_, tags)| tags.as_str())
            .unwrap_or("")
    }

    pub fn short_promo_line(&self) -> String {
        self.substitute(&self.short_promo)
    }

    pub fn substitute(&self, template: &str) -> String {
        template
            .replace("{invite}", &self.invite_link)
            .replace("{site}", &self.website_url)
            .replace("{handle}", &self.handle)
    }
}

fn default_invite_link() -> String {
    "discord.gg/pickcast".to_string()
}

fn default_website_url() -> String {
    "pickcast.bet".to_string()
}

fn default_handle() -> String {
    "@pickcast".to_string()
}

fn default_hashtags() -> Vec<(String, String)> {
    vec![
        ("NBA".into(), "#NBA #NBABets #NBATwitter".into()),
        ("NFL".into(), "#NFL #NFLBets #NFLTwitter".into()),
        ("MLB".into(), "#MLB #MLBBets #MLBTwitter".into()),
        ("NHL".into(), "#NHL #NHLBets #NHLTwitter".into()),
        (
            "default".into(),
            "#SportsBetting #FreePicks #GamblingTwitter".into(),
        ),
    ]
}

fn default_viral_pool() -> Vec<String> {
    vec![
        "#PlayerProps".into(),
        "#BettingTips".into(),
        "#SportsPicks".into(),
        "#DailyPicks".into(),
    ]
}

fn default_base_tags() -> usize {
    2
}

fn default_viral_chance() -> f64 {
    0.5
}

fn default_max_tags() -> usize {
    3
}

fn default_short_hashtags() -> String {
    "#SportsBetting #FreePicks".to_string()
}

fn default_promos() -> Vec<String> {
    vec![
        "More picks: {site}\nJoin free: {invite}".into(),
        "Free picks daily: {invite}\n{site}".into(),
        "All our plays are free in the Discord: {invite}".into(),
        "Never miss a play: {invite}\n{site}".into(),
    ]
}

fn default_short_promo() -> String {
    "{invite}".to_string()
}

fn default_openers() -> Vec<String> {
    vec![
        "Really like this one.".into(),
        "Today's play:".into(),
        "One I keep coming back to:".into(),
        "Best number on the board right now:".into(),
    ]
}

fn default_closers() -> Vec<String> {
    vec![
        "Tailing.".into(),
        "Locked in.".into(),
        "Let's see how it lands.".into(),
        String::new(),
    ]
}

fn default_analysis_prompt() -> String {
    "Write a short analysis tweet for this sports pick: {pick}\n\n\
     Requirements:\n\
     - Sound like a sharp, confident bettor, not a bot\n\
     - 2-3 concrete angles (trend, matchup, pace, injury) in plain language\n\
     - No hashtags and no links, those are added separately\n\
     - No all-caps hype words and at most one emoji\n\
     - Keep it under 200 characters"
        .to_string()
}

fn default_summary_prompt() -> String {
    "Write a casual end-of-day tweet for a sports betting account.\n\n\
     Context:\n{context}\n\n\
     Requirements:\n\
     - Sound like a real person wrapping up their day, not a bot\n\
     - 2-3 sentences max, conversational\n\
     - If picks went out today, mention how the day felt\n\
     - If tomorrow's board looks interesting, say so casually\n\
     - No hashtags, no links, no all-caps, at most one emoji"
        .to_string()
}

/// Sport keyword table. Iteration order is the configured order and the
/// first matching sport wins, so the table must stay a list, not a map.
#[derive(Debug, Clone, Deserialize)]
pub struct SportsConfig {
    #[serde(default = "default_sport_keywords")]
    pub keywords: Vec<SportKeywords>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SportKeywords {
    pub tag: String,
    pub keywords: Vec<String>,
}

impl Default for SportsConfig {
    fn default() -> Self {
        Self {
            keywords: default_sport_keywords(),
        }
    }
}

impl SportsConfig {
    /// First sport whose keyword list has a case-insensitive substring hit.
    /// Total: returns "default" when nothing matches.
    pub fn detect(&self, text: &str) -> &str {
        let lower = text.to_lowercase();
        for entry in &self.keywords {
            if entry.keywords.iter().any(|kw| lower.contains(kw.as_str())) {
                return &entry.tag;
            }
        }
        "default"
    }

    pub fn is_known(&self, tag: &str) -> bool {
        self.keywords.iter().any(|entry| entry.tag == tag)
    }
}

fn default_sport_keywords() -> Vec<SportKeywords> {
    fn entry(tag: &str, words: &[&str]) -> SportKeywords {
        SportKeywords {
            tag: tag.to_string(),
            keywords: words.iter().map(|w| w.to_string()).collect(),
        }
    }

    vec![
        entry(
            "NBA",
            &[
                "lakers",
                "celtics",
                "warriors",
                "nets",
                "knicks",
                "heat",
                "bulls",
                "cavs",
                "cavaliers",
                "sixers",
                "76ers",
                "bucks",
                "suns",
                "mavs",
                "mavericks",
                "clippers",
                "nuggets",
                "grizzlies",
                "kings",
                "hawks",
                "rebounds",
                "assists",
                "points",
                "pts",
                "reb",
                "ast",
                "3pm",
            ],
        ),
        entry(
            "NFL",
            &[
                "chiefs",
                "eagles",
                "cowboys",
                "49ers",
                "bills",
                "ravens",
                "bengals",
                "lions",
                "packers",
                "dolphins",
                "jets",
                "patriots",
                "broncos",
                "raiders",
                "chargers",
                "steelers",
                "browns",
                "titans",
                "colts",
                "jaguars",
                "passing",
                "rushing",
                "yards",
                "touchdowns",
                "td",
            ],
        ),
        entry(
            "MLB",
            &[
                "yankees",
                "dodgers",
                "astros",
                "braves",
                "mets",
                "phillies",
                "padres",
                "mariners",
                "rangers",
                "orioles",
                "twins",
                "guardians",
                "rays",
                "cubs",
                "runs",
                "hits",
                "strikeouts",
                "era",
                "home runs",
                "hr",
            ],
        ),
        entry(
            "NHL",
            &[
                "bruins",
                "panthers",
                "oilers",
                "avalanche",
                "stars",
                "hurricanes",
                "devils",
                "knights",
                "maple leafs",
                "canucks",
                "goals",
                "saves",
                "shots",
            ],
        ),
    ]
}

/// Durable-state and scratch locations
#[derive(Debug, Clone, Deserialize)]
pub struct StateConfig {
    #[serde(default = "default_ledger_path")]
    pub ledger_path: String,
    #[serde(default = "default_results_path")]
    pub results_path: String,
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: String,
    /// Most recent ids retained in the dedup ledger
    #[serde(default = "default_ledger_cap")]
    pub ledger_cap: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            results_path: default_results_path(),
            scratch_dir: default_scratch_dir(),
            ledger_cap: default_ledger_cap(),
        }
    }
}

fn default_ledger_path() -> String {
    "posted_picks.json".to_string()
}

fn default_results_path() -> String {
    "daily_results.json".to_string()
}

fn default_scratch_dir() -> String {
    "temp_images".to_string()
}

fn default_ledger_cap() -> usize {
    100
}
