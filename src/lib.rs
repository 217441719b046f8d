pub mod adapters;
pub mod agent;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod services;

pub use agent::{GeminiClient, GeminiConfig, PickWriter, Selector, SlipAnalyzer};
pub use config::AppConfig;
pub use domain::{
    BetKind, Confidence, DailyResults, GameRecord, GradeResult, GradedPick, Outcome, Pick,
    SlipAnalysis,
};
pub use error::{PickcastError, Result};
pub use persistence::{FileLedger, MemoryLedger, PostedLedger, ResultsSnapshot};
pub use services::{ImageSelector, PickBot, PickGrader, PickSource, PropsService, RecapService};
