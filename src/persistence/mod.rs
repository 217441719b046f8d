//! Durable state: the dedup ledger and the daily-results snapshot
//!
//! Both are whole-file JSON overwrites. Invocations are externally
//! serialized by the scheduler, so there is no locking.

pub mod ledger;
pub mod snapshot;

pub use ledger::{FileLedger, MemoryLedger, PostedLedger};
pub use snapshot::ResultsSnapshot;
