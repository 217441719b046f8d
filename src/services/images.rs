//! Illustrative images for posts
//!
//! Tiered choice: player headshot, then team logo, then a generic stock
//! photo for the detected sport. Every tier degrades to the next on
//! download failure and the whole thing degrades to None — a missing
//! image never blocks a post.

use crate::config::SportsConfig;
use crate::error::{PickcastError, Result};
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

const NBA_HEADSHOT_CDN: &str = "https://cdn.nba.com/headshots/nba/latest/1040x760";
const TEAM_LOGO_CDN: &str = "https://a.espncdn.com/i/teamlogos";

/// Player-name substring -> NBA player id, for headshot lookups
const NBA_PLAYERS: &[(&str, &str)] = &[
    ("lebron", "2544"),
    ("curry", "201939"),
    ("durant", "201142"),
    ("giannis", "203507"),
    ("luka", "1629029"),
    ("doncic", "1629029"),
    ("embiid", "203954"),
    ("jokic", "203999"),
    ("tatum", "1628369"),
    ("maxey", "1630178"),
    ("booker", "1626164"),
    ("morant", "1629630"),
    ("edwards", "1630162"),
    ("brunson", "1628973"),
    ("haliburton", "1630169"),
    ("mitchell", "1628378"),
    ("fox", "1628368"),
    ("lillard", "203081"),
    ("davis", "203076"),
    ("butler", "202710"),
    ("kawhi", "202695"),
    ("leonard", "202695"),
    ("harden", "201935"),
    ("irving", "202681"),
    ("kyrie", "202681"),
    ("sga", "1628983"),
    ("gilgeous-alexander", "1628983"),
    ("trae", "1629027"),
    ("lamelo", "1630163"),
    ("adebayo", "1628389"),
    ("bam", "1628389"),
];

const NBA_TEAMS: &[(&str, &str)] = &[
    ("lakers", "lal"),
    ("celtics", "bos"),
    ("warriors", "gs"),
    ("nets", "bkn"),
    ("knicks", "ny"),
    ("heat", "mia"),
    ("bulls", "chi"),
    ("cavs", "cle"),
    ("cavaliers", "cle"),
    ("sixers", "phi"),
    ("76ers", "phi"),
    ("bucks", "mil"),
    ("suns", "phx"),
    ("mavs", "dal"),
    ("mavericks", "dal"),
    ("clippers", "lac"),
    ("nuggets", "den"),
    ("grizzlies", "mem"),
    ("kings", "sac"),
    ("hawks", "atl"),
    ("raptors", "tor"),
    ("magic", "orl"),
    ("pacers", "ind"),
    ("pistons", "det"),
    ("thunder", "okc"),
    ("blazers", "por"),
    ("jazz", "utah"),
    ("pelicans", "no"),
    ("timberwolves", "min"),
    ("spurs", "sa"),
    ("rockets", "hou"),
];

const NFL_TEAMS: &[(&str, &str)] = &[
    ("chiefs", "kc"),
    ("eagles", "phi"),
    ("cowboys", "dal"),
    ("49ers", "sf"),
    ("bills", "buf"),
    ("ravens", "bal"),
    ("bengals", "cin"),
    ("lions", "det"),
    ("packers", "gb"),
    ("dolphins", "mia"),
    ("jets", "nyj"),
    ("patriots", "ne"),
    ("broncos", "den"),
    ("raiders", "lv"),
    ("chargers", "lac"),
    ("steelers", "pit"),
    ("browns", "cle"),
    ("titans", "ten"),
    ("colts", "ind"),
    ("jaguars", "jax"),
    ("texans", "hou"),
    ("commanders", "wsh"),
    ("giants", "nyg"),
    ("saints", "no"),
    ("buccaneers", "tb"),
    ("bucs", "tb"),
    ("falcons", "atl"),
    ("panthers", "car"),
    ("seahawks", "sea"),
    ("cardinals", "ari"),
    ("rams", "lar"),
    ("bears", "chi"),
    ("vikings", "min"),
];

/// Generic stock photos keyed by sport tag
const STOCK_PHOTOS: &[(&str, &str)] = &[
    ("NBA", "https://images.unsplash.com/photo-1546519638-68e109498ffc?w=800"),
    ("NFL", "https://images.unsplash.com/photo-1560272564-c83b66b1ad12?w=800"),
    ("MLB", "https://images.unsplash.com/photo-1566479179817-e773c82b4c51?w=800"),
    ("NHL", "https://images.unsplash.com/photo-1515703407324-5f753afd8be8?w=800"),
    (
        "default",
        "https://images.unsplash.com/photo-1518091043644-c1d4457512c6?w=800",
    ),
];

/// Image picker with scratch-directory download
pub struct ImageSelector {
    http: Client,
    scratch_dir: PathBuf,
    sports: SportsConfig,
}

impl ImageSelector {
    pub fn new(scratch_dir: impl Into<PathBuf>, sports: SportsConfig) -> Result<Self> {
        let scratch_dir = scratch_dir.into();
        std::fs::create_dir_all(&scratch_dir)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            http,
            scratch_dir,
            sports,
        })
    }

    /// Best image for a pick, downloaded to scratch storage. Tiers fall
    /// through on failure; None means post without an image.
    pub async fn image_for_pick(&self, pick_text: &str) -> Option<String> {
        if let Some(player_id) = detect_player(pick_text) {
            let url = format!("{}/{}.png", NBA_HEADSHOT_CDN, player_id);
            if let Some(path) = self
                .download(&url, &format!("player_{}.png", player_id))
                .await
            {
                return Some(path);
            }
        }

        if let Some((abbrev, league)) = detect_team(pick_text) {
            let url = format!("{}/{}/500/{}.png", TEAM_LOGO_CDN, league, abbrev);
            if let Some(path) = self.download(&url, &format!("team_{}.png", abbrev)).await {
                return Some(path);
            }
        }

        let sport = self.sports.detect(pick_text);
        let url = STOCK_PHOTOS
            .iter()
            .find(|(tag, _)| *tag == sport)
            .or_else(|| STOCK_PHOTOS.iter().find(|(tag, _)| *tag == "default"))
            .map(|(_, url)| *url)?;
        self.download(url, "generic_sports.png").await
    }

    /// Fetch an arbitrary image (e.g. a slip attachment) into scratch
    /// storage; None on any failure
    pub async fn download_to_scratch(&self, url: &str, filename: &str) -> Option<String> {
        self.download(url, filename).await
    }

    async fn download(&self, url: &str, filename: &str) -> Option<String> {
        let response = match self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                debug!("Image download failed for {}: {}", url, e);
                return None;
            }
        };
        let bytes = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Image body read failed for {}: {}", url, e);
                return None;
            }
        };

        let path = self.scratch_dir.join(filename);
        if let Err(e) = std::fs::write(&path, &bytes) {
            warn!("Could not write image {}: {}", path.display(), e);
            return None;
        }
        Some(path.to_string_lossy().into_owned())
    }

    /// Delete and recreate the scratch directory. Runs after every cycle
    /// regardless of how the cycle ended.
    pub fn cleanup(&self) {
        if Path::new(&self.scratch_dir).exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.scratch_dir) {
                warn!("Scratch cleanup failed: {}", e);
            }
        }
        if let Err(e) = std::fs::create_dir_all(&self.scratch_dir) {
            warn!("Scratch recreate failed: {}", e);
        }
    }
}

/// First player-name hit in the text
pub fn detect_player(pick_text: &str) -> Option<&'static str> {
    let lower = pick_text.to_lowercase();
    NBA_PLAYERS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, id)| *id)
}

/// First team hit, NBA scanned before NFL; returns (abbrev, league path)
pub fn detect_team(pick_text: &str) -> Option<(&'static str, &'static str)> {
    let lower = pick_text.to_lowercase();
    NBA_TEAMS
        .iter()
        .find(|(name, _)| lower.contains(name))
        .map(|(_, abbrev)| (*abbrev, "nba"))
        .or_else(|| {
            NFL_TEAMS
                .iter()
                .find(|(name, _)| lower.contains(name))
                .map(|(_, abbrev)| (*abbrev, "nfl"))
        })
}
