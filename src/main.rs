use clap::{Parser, Subcommand};
use pickcast::config::AppConfig;
use pickcast::error::Result;
use pickcast::services::PickBot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Discord-to-X sports picks posting bot
#[derive(Parser, Debug)]
#[command(name = "pickcast")]
#[command(author, version, about = "Posts picks from Discord to X with AI commentary")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pickcast.toml")]
    config: String,

    /// Print posts to the console instead of publishing
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Post unposted picks from the channel (default)
    Run {
        /// Maximum number of posts this cycle
        #[arg(long, default_value = "2")]
        max_posts: usize,
    },

    /// Grade today's picks and post the daily recap
    Recap {
        /// Post a thread with individual pick results
        #[arg(long)]
        thread: bool,
    },

    /// Post the end-of-day summary with tomorrow's board preview
    Summary,

    /// Check credentials and provider reachability, post nothing
    Verify,
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    let config = match AppConfig::load_from(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {} - using defaults", e);
            AppConfig::default()
        }
    };

    let mut bot = match PickBot::from_config(&config) {
        Ok(bot) => bot,
        Err(e) => {
            error!("Failed to initialize: {}", e);
            return 1;
        }
    };

    let outcome: Result<usize> = match cli.command.unwrap_or(Commands::Run { max_posts: 2 }) {
        Commands::Run { max_posts } => bot.run(max_posts, cli.dry_run).await,
        Commands::Recap { thread } => bot.run_recap(cli.dry_run, thread).await,
        Commands::Summary => bot.run_summary(cli.dry_run).await,
        Commands::Verify => {
            return if bot.verify().await { 0 } else { 1 };
        }
    };

    match outcome {
        Ok(successful) => {
            info!("Done: {} successful post(s)", successful);
            if successful > 0 || cli.dry_run {
                0
            } else {
                1
            }
        }
        Err(e) => {
            error!("Run failed: {}", e);
            1
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
