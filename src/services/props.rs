//! Daily prop-board preview
//!
//! Pulls listings per sport, keeps today's slate, floats promoted
//! listings to the top, and caps the board for the evening summary.
//! Sports default by calendar month to track season overlap.

use crate::adapters::{OddsApiClient, PrizePicksClient, PropListing};
use chrono::{DateTime, Local, NaiveDate};
use std::collections::BTreeMap;
use tracing::info;

/// Board size for the evening preview
const BOARD_CAP: usize = 20;
/// Listings shown per sport in the text summary
const SUMMARY_PER_SPORT: usize = 5;

/// Active sports by month, tracking season overlap
fn default_sports_for_month(month: u32) -> Vec<&'static str> {
    match month {
        9..=12 | 1 => vec!["NBA", "NFL"],
        2..=4 => vec!["NBA", "NCAAB"],
        5 | 6 => vec!["NBA", "MLB"],
        _ => vec!["MLB"],
    }
}

/// Props reader
pub struct PropsService {
    prizepicks: PrizePicksClient,
    odds_api: OddsApiClient,
}

impl PropsService {
    pub fn new(prizepicks: PrizePicksClient, odds_api: OddsApiClient) -> Self {
        Self {
            prizepicks,
            odds_api,
        }
    }

    /// Today's most visible props. A failing sport simply contributes
    /// nothing.
    pub async fn todays_popular_props(&self, sports: Option<Vec<String>>) -> Vec<PropListing> {
        let now = Local::now();
        let sports = sports.unwrap_or_else(|| {
            default_sports_for_month(chrono::Datelike::month(&now))
                .into_iter()
                .map(str::to_string)
                .collect()
        });

        let mut all_props = Vec::new();
        for sport in &sports {
            all_props.extend(self.prizepicks.projections(sport).await);
            if self.odds_api.is_configured() {
                all_props.extend(self.odds_api.player_props(sport).await);
            }
        }

        let board = select_todays(all_props, now.date_naive());
        info!("{} props on today's board", board.len());
        board
    }
}

/// Keep listings starting today, sort promoted-first then chronological,
/// cap the board
pub fn select_todays(props: Vec<PropListing>, today: NaiveDate) -> Vec<PropListing> {
    let mut todays: Vec<PropListing> = props
        .into_iter()
        .filter(|prop| {
            prop.start_time
                .as_deref()
                .and_then(parse_start_date)
                .map(|date| date == today)
                .unwrap_or(false)
        })
        .collect();

    todays.sort_by(|a, b| {
        (!a.is_promo, a.start_time.as_deref().unwrap_or(""))
            .cmp(&(!b.is_promo, b.start_time.as_deref().unwrap_or("")))
    });
    todays.truncate(BOARD_CAP);
    todays
}

/// Provider timestamps are ISO-8601 with `Z` meaning UTC; the listing's
/// calendar date is taken in UTC while "today" comes from the local clock.
fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&chrono::Utc).date_naive())
}

/// Readable summary grouped by sport, top listings per sport
pub fn props_summary(props: &[PropListing]) -> String {
    if props.is_empty() {
        return "No props available for today.".to_string();
    }

    let mut by_sport: BTreeMap<&str, Vec<&PropListing>> = BTreeMap::new();
    for prop in props {
        let sport = if prop.sport.is_empty() {
            "Other"
        } else {
            &prop.sport
        };
        by_sport.entry(sport).or_default().push(prop);
    }

    let mut lines = Vec::new();
    for (sport, sport_props) in by_sport {
        lines.push(format!("{}:", sport));
        for prop in sport_props.iter().take(SUMMARY_PER_SPORT) {
            let line = prop
                .line
                .map(|l| format!(" {}", l))
                .unwrap_or_default();
            lines.push(format!("  - {}: {}{}", prop.player_name, prop.stat_type, line));
        }
    }
    lines.join("\n")
}
