//! Player-prop listings from the PrizePicks partner API
//!
//! The provider speaks JSON:API: projections in `data`, player records in
//! `included`, joined through `relationships.new_player`. Per-league fetch
//! failures degrade to an empty list.

use crate::error::{PickcastError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

const PRIZEPICKS_BASE: &str = "https://partner-api.prizepicks.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// One prop listing, flattened from the JSON:API document
#[derive(Debug, Clone)]
pub struct PropListing {
    pub id: String,
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub stat_type: String,
    pub line: Option<f64>,
    pub sport: String,
    pub start_time: Option<String>,
    pub description: String,
    pub is_promo: bool,
    pub odds_type: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    data: Vec<Projection>,
    #[serde(default)]
    included: Vec<Included>,
}

#[derive(Debug, Deserialize)]
struct Projection {
    id: String,
    #[serde(default)]
    attributes: ProjectionAttributes,
    #[serde(default)]
    relationships: Relationships,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectionAttributes {
    #[serde(default)]
    stat_type: String,
    #[serde(default)]
    line_score: Option<f64>,
    #[serde(default)]
    league: String,
    #[serde(default)]
    start_time: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_promo: bool,
    #[serde(default = "default_odds_type")]
    odds_type: String,
}

fn default_odds_type() -> String {
    "standard".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct Relationships {
    #[serde(default)]
    new_player: Option<Relationship>,
}

#[derive(Debug, Deserialize)]
struct Relationship {
    #[serde(default)]
    data: Option<RelationshipData>,
}

#[derive(Debug, Deserialize)]
struct RelationshipData {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Included {
    id: String,
    #[serde(default)]
    attributes: IncludedAttributes,
}

#[derive(Debug, Default, Deserialize)]
struct IncludedAttributes {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    position: Option<String>,
}

/// Props client
#[derive(Clone)]
pub struct PrizePicksClient {
    http: Client,
}

impl PrizePicksClient {
    pub fn new() -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| PickcastError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { http })
    }

    /// Fetch current projections for a league. Failures degrade to empty.
    pub async fn projections(&self, league: &str) -> Vec<PropListing> {
        let url = format!("{}/projections", PRIZEPICKS_BASE);
        let response = match self
            .http
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .query(&[("per_page", "250"), ("league", league)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Error fetching {} projections: {}", league, e);
                return Vec::new();
            }
        };

        let document: Document = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                warn!("Error parsing {} projections: {}", league, e);
                return Vec::new();
            }
        };

        let listings = flatten_document(document);
        info!("Fetched {} projections for {}", listings.len(), league);
        listings
    }
}

fn flatten_document(document: Document) -> Vec<PropListing> {
    let included: HashMap<String, IncludedAttributes> = document
        .included
        .into_iter()
        .map(|item| (item.id, item.attributes))
        .collect();

    document
        .data
        .into_iter()
        .map(|projection| {
            let player = projection
                .relationships
                .new_player
                .and_then(|rel| rel.data)
                .and_then(|data| included.get(&data.id));

            PropListing {
                id: projection.id,
                player_name: player
                    .and_then(|p| p.display_name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                team: player.and_then(|p| p.team.clone()).unwrap_or_default(),
                position: player.and_then(|p| p.position.clone()).unwrap_or_default(),
                stat_type: projection.attributes.stat_type,
                line: projection.attributes.line_score,
                sport: projection.attributes.league,
                start_time: projection.attributes.start_time,
                description: projection.attributes.description,
                is_promo: projection.attributes.is_promo,
                odds_type: projection.attributes.odds_type,
            }
        })
        .collect()
}
