//! Daily aggregate of graded picks

use super::grade::{Confidence, GradeResult, Outcome};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One pick with its grade, as stored in the daily snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedPick {
    pub id: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    pub graded: bool,
    pub confidence: Confidence,
    pub reason: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

/// Aggregate for one calendar day. Recomputed on each recap run and
/// persisted by overwrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyResults {
    pub date: NaiveDate,
    pub picks: Vec<GradedPick>,
    pub wins: u32,
    pub losses: u32,
    pub pushes: u32,
    pub pending: u32,
    pub total_picks: u32,
}

impl DailyResults {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            picks: Vec::new(),
            wins: 0,
            losses: 0,
            pushes: 0,
            pending: 0,
            total_picks: 0,
        }
    }

    pub fn push_graded(&mut self, pick: GradedPick) {
        match pick.outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Push => self.pushes += 1,
            Outcome::Pending => self.pending += 1,
        }
        self.total_picks += 1;
        self.picks.push(pick);
    }

    /// "5W-2L-1P" style record; "0-0" when nothing graded yet
    pub fn record_string(&self) -> String {
        let mut parts = Vec::new();
        if self.wins > 0 {
            parts.push(format!("{}W", self.wins));
        }
        if self.losses > 0 {
            parts.push(format!("{}L", self.losses));
        }
        if self.pushes > 0 {
            parts.push(format!("{}P", self.pushes));
        }
        if parts.is_empty() {
            "0-0".to_string()
        } else {
            parts.join("-")
        }
    }

    /// Win rate over decided picks only; "N/A" when nothing decided
    pub fn win_rate_string(&self) -> String {
        let decided = self.wins + self.losses;
        if decided == 0 {
            "N/A".to_string()
        } else {
            format!("{:.0}%", self.wins as f64 / decided as f64 * 100.0)
        }
    }

    pub fn from_grades<I>(date: NaiveDate, grades: I) -> Self
    where
        I: IntoIterator<Item = GradedPick>,
    {
        let mut results = Self::new(date);
        for pick in grades {
            results.push_graded(pick);
        }
        results
    }
}

impl GradedPick {
    pub fn from_grade(
        id: impl Into<String>,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        grade: &GradeResult,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            timestamp,
            outcome: grade.outcome,
            graded: grade.graded,
            confidence: grade.confidence,
            reason: grade.reason.clone(),
            image: None,
            links: Vec::new(),
        }
    }
}
