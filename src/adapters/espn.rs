//! Live scores from ESPN's public scoreboard API
//!
//! Per-sport scoreboard fetch used to grade picks. No API key required.
//! Failures degrade to an empty game list so grading falls through to
//! PENDING instead of aborting a recap.

use crate::domain::{GameRecord, GameStatus, TeamScore};
use crate::error::{PickcastError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const ESPN_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";

/// ESPN sport-path/league mapping
const SPORT_LEAGUES: &[(&str, &str, &str)] = &[
    ("NBA", "basketball", "nba"),
    ("NFL", "football", "nfl"),
    ("MLB", "baseball", "mlb"),
    ("NHL", "hockey", "nhl"),
    ("NCAAB", "basketball", "mens-college-basketball"),
    ("NCAAF", "football", "college-football"),
];

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    competitions: Vec<Competition>,
}

#[derive(Debug, Default, Deserialize)]
struct Competition {
    #[serde(default)]
    competitors: Vec<Competitor>,
    #[serde(default)]
    status: Status,
}

#[derive(Debug, Deserialize)]
struct Competitor {
    #[serde(rename = "homeAway", default)]
    home_away: String,
    /// Scores arrive as strings
    #[serde(default)]
    score: Option<String>,
    #[serde(default)]
    winner: bool,
    #[serde(default)]
    team: CompetitorTeam,
}

#[derive(Debug, Default, Deserialize)]
struct CompetitorTeam {
    #[serde(rename = "displayName", default)]
    display_name: String,
    #[serde(default)]
    abbreviation: String,
}

#[derive(Debug, Default, Deserialize)]
struct Status {
    #[serde(rename = "type", default)]
    status_type: StatusType,
}

#[derive(Debug, Default, Deserialize)]
struct StatusType {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completed: bool,
}

/// Scoreboard client
#[derive(Clone)]
pub struct EspnScoreboard {
    http: Client,
}

impl EspnScoreboard {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Fetch the scoreboard for a sport on a `%Y%m%d` date. Unknown sports
    /// and transport failures return an empty list.
    pub async fn scoreboard(&self, sport: &str, date: &str) -> Vec<GameRecord> {
        let Some((_, path, league)) = SPORT_LEAGUES.iter().find(|(tag, _, _)| *tag == sport)
        else {
            return Vec::new();
        };

        let url = format!("{}/{}/{}/scoreboard", ESPN_BASE, path, league);
        let response = match self
            .http
            .get(&url)
            .query(&[("dates", date)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Error fetching {} scoreboard: {}", sport, e);
                return Vec::new();
            }
        };

        let board: ScoreboardResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!("Error parsing {} scoreboard: {}", sport, e);
                return Vec::new();
            }
        };

        let games: Vec<GameRecord> = board.events.iter().filter_map(parse_event).collect();
        debug!("{}: {} games on {}", sport, games.len(), date);
        games
    }
}

fn parse_event(event: &Event) -> Option<GameRecord> {
    let competition = event.competitions.first()?;
    if competition.competitors.len() < 2 {
        return None;
    }

    let mut home = None;
    let mut away = None;
    for competitor in &competition.competitors {
        let side = TeamScore {
            name: competitor.team.display_name.clone(),
            abbreviation: competitor.team.abbreviation.clone(),
            score: competitor
                .score
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0),
            winner: competitor.winner,
        };
        if competitor.home_away == "home" {
            home = Some(side);
        } else {
            away = Some(side);
        }
    }

    let status = &competition.status.status_type;
    Some(GameRecord {
        id: event.id.clone(),
        name: event.name.clone(),
        date: event.date.clone(),
        status: GameStatus::from_provider(&status.name, status.completed),
        status_detail: status.description.clone(),
        completed: status.completed,
        home: home?,
        away: away?,
    })
}
