//! The Odds API client (secondary props source)
//!
//! Key-gated: when `ODDS_API_KEY` is unset the client reports unconfigured
//! and contributes nothing. Event fan-out is capped to conserve the free
//! tier's request budget.

use crate::adapters::prizepicks::PropListing;
use crate::error::{PickcastError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const THE_ODDS_API_BASE: &str = "https://api.the-odds-api.com/v4";
const EVENT_LIMIT: usize = 3;
const PROP_MARKETS: &str = "player_points,player_rebounds,player_assists";

/// Our sport tags -> The Odds API sport keys
const SPORT_KEYS: &[(&str, &str)] = &[
    ("NBA", "basketball_nba"),
    ("NFL", "americanfootball_nfl"),
    ("MLB", "baseball_mlb"),
    ("NHL", "icehockey_nhl"),
    ("NCAAB", "basketball_ncaab"),
];

#[derive(Debug, Deserialize)]
struct OddsEvent {
    id: String,
    #[serde(default)]
    commence_time: String,
}

#[derive(Debug, Deserialize)]
struct EventOdds {
    #[serde(default)]
    bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Deserialize)]
struct Bookmaker {
    #[serde(default)]
    markets: Vec<Market>,
}

#[derive(Debug, Deserialize)]
struct Market {
    key: String,
    #[serde(default)]
    outcomes: Vec<MarketOutcome>,
}

#[derive(Debug, Deserialize)]
struct MarketOutcome {
    /// Player name for prop markets
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    point: Option<f64>,
}

/// The Odds API client
#[derive(Clone)]
pub struct OddsApiClient {
    api_key: String,
    http: Client,
}

impl OddsApiClient {
    pub fn from_env() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            api_key: std::env::var("ODDS_API_KEY").unwrap_or_default(),
            http,
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Player-prop listings for a sport tag. Unconfigured or unknown
    /// sports return empty; so does any transport failure.
    pub async fn player_props(&self, sport: &str) -> Vec<PropListing> {
        if !self.is_configured() {
            return Vec::new();
        }
        let Some((_, sport_key)) = SPORT_KEYS.iter().find(|(tag, _)| *tag == sport) else {
            return Vec::new();
        };

        let events = match self.events(sport_key).await {
            Ok(events) => events,
            Err(e) => {
                warn!("Error fetching {} events: {}", sport, e);
                return Vec::new();
            }
        };

        let mut listings = Vec::new();
        for event in events.iter().take(EVENT_LIMIT) {
            match self.event_odds(sport_key, &event.id).await {
                Ok(odds) => {
                    listings.extend(flatten_event(sport, event, &odds));
                }
                Err(e) => {
                    debug!("Skipping event {}: {}", event.id, e);
                }
            }
        }
        listings
    }

    async fn events(&self, sport_key: &str) -> Result<Vec<OddsEvent>> {
        let url = format!("{}/sports/{}/events", THE_ODDS_API_BASE, sport_key);
        let events = self
            .http
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(events)
    }

    async fn event_odds(&self, sport_key: &str, event_id: &str) -> Result<EventOdds> {
        let url = format!(
            "{}/sports/{}/events/{}/odds",
            THE_ODDS_API_BASE, sport_key, event_id
        );
        let odds = self
            .http
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", PROP_MARKETS),
                ("oddsFormat", "american"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(odds)
    }
}

fn flatten_event(sport: &str, event: &OddsEvent, odds: &EventOdds) -> Vec<PropListing> {
    let mut listings = Vec::new();
    // First book is enough for a preview; cross-book dedup is not worth it
    let Some(book) = odds.bookmakers.first() else {
        return listings;
    };
    for market in &book.markets {
        let stat = match market.key.as_str() {
            "player_points" => "Points",
            "player_rebounds" => "Rebounds",
            "player_assists" => "Assists",
            other => other,
        };
        for outcome in &market.outcomes {
            // Over/Under pairs repeat the player; keep the Over side only
            if outcome.name != "Over" {
                continue;
            }
            let Some(player) = outcome.description.clone() else {
                continue;
            };
            listings.push(PropListing {
                id: format!("{}:{}:{}", event.id, market.key, player),
                player_name: player,
                team: String::new(),
                position: String::new(),
                stat_type: stat.to_string(),
                line: outcome.point,
                sport: sport.to_string(),
                start_time: Some(event.commence_time.clone()),
                description: String::new(),
                is_promo: false,
                odds_type: "standard".to_string(),
            });
        }
    }
    listings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_keeps_over_sides_only() {
        let event = OddsEvent {
            id: "ev1".into(),
            commence_time: "2025-01-15T23:00:00Z".into(),
        };
        let odds: EventOdds = serde_json::from_str(
            r#"{
                "bookmakers": [{
                    "markets": [{
                        "key": "player_points",
                        "outcomes": [
                            {"name": "Over", "description": "Luka Doncic", "point": 32.5},
                            {"name": "Under", "description": "Luka Doncic", "point": 32.5}
                        ]
                    }]
                }]
            }"#,
        )
        .unwrap();

        let listings = flatten_event("NBA", &event, &odds);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].player_name, "Luka Doncic");
        assert_eq!(listings[0].stat_type, "Points");
        assert_eq!(listings[0].line, Some(32.5));
    }
}
