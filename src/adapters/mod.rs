pub mod discord;
pub mod espn;
pub mod odds_api;
pub mod prizepicks;
pub mod twitter;

pub use discord::{ChannelMessage, DiscordClient};
pub use espn::EspnScoreboard;
pub use odds_api::OddsApiClient;
pub use prizepicks::{PrizePicksClient, PropListing};
pub use twitter::TwitterClient;
