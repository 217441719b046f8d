pub mod game;
pub mod grade;
pub mod pick;
pub mod results;

pub use game::{GameRecord, GameStatus, TeamScore};
pub use grade::{BetKind, Confidence, GradeResult, Outcome};
pub use pick::{Pick, PickImage, SlipAnalysis};
pub use results::{DailyResults, GradedPick};
