//! Daily-results snapshot
//!
//! One file, overwritten wholesale on every recap run. No versioning.

use crate::domain::DailyResults;
use crate::error::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct ResultsSnapshot {
    path: PathBuf,
}

impl ResultsSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn save(&self, results: &DailyResults) -> Result<()> {
        std::fs::write(&self.path, serde_json::to_string_pretty(results)?)?;
        debug!(
            "Saved daily results for {} ({} picks)",
            results.date, results.total_picks
        );
        Ok(())
    }

    /// Last saved snapshot, if readable. Corruption degrades to None.
    pub fn load(&self) -> Option<DailyResults> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(results) => Some(results),
            Err(e) => {
                warn!("Unreadable results snapshot {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
