//! Dedup ledger for already-published pick ids
//!
//! The ledger is an injected abstraction so tests run against an
//! in-memory fake while production binds to a JSON file. It keeps an
//! ordered list capped to the newest N entries; duplicate adds are
//! tolerated, only the cap is enforced.

use crate::error::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Dedup store interface
pub trait PostedLedger {
    fn contains(&self, id: &str) -> bool;
    /// Record an id, evicting the oldest entries past the cap
    fn add(&mut self, id: &str) -> Result<()>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// On-disk ledger format
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    posted_ids: Vec<String>,
    #[serde(default)]
    last_updated: Option<String>,
}

/// File-backed ledger used in production
pub struct FileLedger {
    path: PathBuf,
    cap: usize,
    ids: Vec<String>,
}

impl FileLedger {
    /// Open the ledger, treating a missing or corrupt file as empty
    pub fn open(path: impl Into<PathBuf>, cap: usize) -> Self {
        let path = path.into();
        let ids = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<LedgerFile>(&raw) {
                Ok(file) => file.posted_ids,
                Err(e) => {
                    warn!("Corrupt ledger {} treated as empty: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        debug!("Ledger {} holds {} ids", path.display(), ids.len());
        Self { path, cap, ids }
    }

    fn persist(&self) -> Result<()> {
        let file = LedgerFile {
            posted_ids: self.ids.clone(),
            last_updated: Some(Utc::now().to_rfc3339()),
        };
        std::fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }
}

impl PostedLedger for FileLedger {
    fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    fn add(&mut self, id: &str) -> Result<()> {
        self.ids.push(id.to_string());
        if self.ids.len() > self.cap {
            let excess = self.ids.len() - self.cap;
            self.ids.drain(..excess);
        }
        self.persist()
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

/// In-memory ledger for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryLedger {
    cap: usize,
    ids: Vec<String>,
}

impl MemoryLedger {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            ids: Vec::new(),
        }
    }
}

impl PostedLedger for MemoryLedger {
    fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    fn add(&mut self, id: &str) -> Result<()> {
        self.ids.push(id.to_string());
        if self.ids.len() > self.cap {
            let excess = self.ids.len() - self.cap;
            self.ids.drain(..excess);
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
