pub mod bot;
pub mod grader;
pub mod images;
pub mod ingest;
pub mod props;
pub mod recap;
pub mod summary;

pub use bot::PickBot;
pub use grader::PickGrader;
pub use images::ImageSelector;
pub use ingest::{is_betting_like, PickSource};
pub use props::PropsService;
pub use recap::RecapService;
pub use summary::SummaryService;
