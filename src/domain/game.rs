//! Scoreboard event types

use serde::{Deserialize, Serialize};

/// One side of a scoreboard event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamScore {
    pub name: String,
    pub abbreviation: String,
    pub score: i64,
    #[serde(default)]
    pub winner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl GameStatus {
    /// Map the provider's status type name onto our three states
    pub fn from_provider(name: &str, completed: bool) -> Self {
        if completed {
            return GameStatus::Completed;
        }
        match name {
            "STATUS_SCHEDULED" => GameStatus::Scheduled,
            _ => GameStatus::InProgress,
        }
    }
}

/// A single sporting event's live or final state.
///
/// Fetched fresh per grading request and never cached beyond that call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: String,
    pub name: String,
    pub date: String,
    pub status: GameStatus,
    /// Provider's human-readable status line ("Final", "End of 3rd", ...)
    pub status_detail: String,
    pub completed: bool,
    pub home: TeamScore,
    pub away: TeamScore,
}

impl GameRecord {
    pub fn total_score(&self) -> i64 {
        self.home.score + self.away.score
    }

    pub fn final_line(&self) -> String {
        format!(
            "Final: {} {} - {} {}",
            self.home.name, self.home.score, self.away.name, self.away.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            GameStatus::from_provider("STATUS_FINAL", true),
            GameStatus::Completed
        );
        assert_eq!(
            GameStatus::from_provider("STATUS_SCHEDULED", false),
            GameStatus::Scheduled
        );
        assert_eq!(
            GameStatus::from_provider("STATUS_IN_PROGRESS", false),
            GameStatus::InProgress
        );
    }

    #[test]
    fn total_score_sums_both_sides() {
        let game = GameRecord {
            id: "1".into(),
            name: "Lakers at Celtics".into(),
            date: "2025-01-15".into(),
            status: GameStatus::Completed,
            status_detail: "Final".into(),
            completed: true,
            home: TeamScore {
                name: "Boston Celtics".into(),
                abbreviation: "BOS".into(),
                score: 110,
                winner: true,
            },
            away: TeamScore {
                name: "Los Angeles Lakers".into(),
                abbreviation: "LAL".into(),
                score: 102,
                winner: false,
            },
        };
        assert_eq!(game.total_score(), 212);
        assert!(game.final_line().contains("Boston Celtics 110"));
    }
}
