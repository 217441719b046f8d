//! Orchestrator: one invocation runs one cycle and exits
//!
//! Sequences ingest -> write -> illustrate -> publish for regular posts,
//! and the grading/summary variants for the recap and end-of-day modes.
//! One bad pick is logged and skipped; only an authentication failure
//! aborts a cycle.

use crate::adapters::{DiscordClient, EspnScoreboard, OddsApiClient, PrizePicksClient, TwitterClient};
use crate::agent::gemini::GeminiClient;
use crate::agent::slip::SlipAnalyzer;
use crate::agent::writer::{PickWriter, Selector};
use crate::config::AppConfig;
use crate::domain::Pick;
use crate::error::{PickcastError, Result};
use crate::persistence::{FileLedger, ResultsSnapshot};
use crate::services::grader::PickGrader;
use crate::services::images::ImageSelector;
use crate::services::ingest::PickSource;
use crate::services::props::{props_summary, PropsService};
use crate::services::recap::{best_image, detailed_thread, recap_tweet, RecapService};
use crate::services::summary::SummaryService;
use chrono::{Local, Timelike};
use tracing::{error, info, warn};

pub struct PickBot {
    source: PickSource<FileLedger>,
    writer: PickWriter,
    slip: SlipAnalyzer,
    images: ImageSelector,
    twitter: TwitterClient,
    gemini: GeminiClient,
    recap: RecapService,
    summary: SummaryService,
    props: PropsService,
}

/// Coarse run slot, only used for logging which cron window fired
pub fn time_slot(hour: u32) -> &'static str {
    match hour {
        8..=10 => "morning",
        11..=13 => "midday",
        16..=18 => "evening",
        _ => "off-hours",
    }
}

impl PickBot {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let discord = DiscordClient::new(config.discord.clone())?;
        let ledger = FileLedger::open(&config.state.ledger_path, config.state.ledger_cap);
        let gemini = GeminiClient::from_env()?;
        let twitter = TwitterClient::new(config.twitter.clone())?;
        let scoreboard = EspnScoreboard::new()?;

        Ok(Self {
            source: PickSource::new(discord, ledger),
            writer: PickWriter::new(
                config.posting.clone(),
                config.sports.clone(),
                gemini.clone(),
                Selector::from_entropy(),
            ),
            slip: SlipAnalyzer::new(
                gemini.clone(),
                config.sports.clone(),
                config.posting.clone(),
                Selector::from_entropy(),
            ),
            images: ImageSelector::new(&config.state.scratch_dir, config.sports.clone())?,
            twitter,
            gemini: gemini.clone(),
            recap: RecapService::new(
                PickGrader::new(scoreboard, config.sports.clone()),
                ResultsSnapshot::new(&config.state.results_path),
            ),
            summary: SummaryService::new(
                gemini,
                config.posting.clone(),
                config.sports.clone(),
            ),
            props: PropsService::new(PrizePicksClient::new()?, OddsApiClient::from_env()?),
        })
    }

    /// Regular posting cycle. Returns the number of successful posts;
    /// image scratch is cleaned up whatever happens.
    pub async fn run(&mut self, max_posts: usize, dry_run: bool) -> Result<usize> {
        info!(
            "Starting posting cycle ({} slot, max {} posts, dry_run={})",
            time_slot(Local::now().hour()),
            max_posts,
            dry_run
        );

        let result = self.post_cycle(max_posts, dry_run).await;
        self.images.cleanup();
        result
    }

    async fn post_cycle(&mut self, max_posts: usize, dry_run: bool) -> Result<usize> {
        self.check_credentials(dry_run).await?;

        let picks = self.source.unposted(max_posts).await;
        if picks.is_empty() {
            info!("No new picks found in channel");
            return Ok(0);
        }

        let mut successful = 0;
        for (i, pick) in picks.iter().enumerate() {
            info!(
                "Processing pick {}/{}: {:.60}",
                i + 1,
                picks.len(),
                pick.text
            );
            match self.process_pick(pick, dry_run).await {
                Ok(true) => successful += 1,
                Ok(false) => warn!("Failed to post pick {}", pick.id),
                Err(e) => error!("Error processing pick {}: {}", pick.id, e),
            }
        }

        info!("Cycle complete: posted {}/{}", successful, picks.len());
        Ok(successful)
    }

    async fn process_pick(&mut self, pick: &Pick, dry_run: bool) -> Result<bool> {
        // A slip screenshot beats text analysis: extract the bet from the
        // image and let the slip tweet carry the post.
        let mut slip_image_path = None;
        let mut slip_info = None;
        if let Some(image) = pick.attached_images.first() {
            let filename = format!("slip_{}.png", pick.id);
            if let Some(path) = self.images.download_to_scratch(&image.url, &filename).await {
                let analysis = self.slip.analyze(&path).await;
                slip_info = Some(self.slip.tweet_from_slip(&analysis).await);
                slip_image_path = Some(path);
            }
        }

        let analysis = if slip_info.is_none() {
            Some(self.writer.generate_analysis(&pick.text).await)
        } else {
            None
        };

        let tweet = self.writer.format_tweet(
            &pick.text,
            analysis.as_deref(),
            slip_info.as_deref(),
            pick.slip_link(),
        );

        let image_path = match slip_image_path {
            Some(path) => Some(path),
            None => self.images.image_for_pick(&pick.text).await,
        };

        if dry_run {
            println!("[DRY RUN] Would post ({} chars):\n{}", tweet.chars().count(), tweet);
            if let Some(path) = &image_path {
                println!("[DRY RUN] With image: {}", path);
            }
            return Ok(true);
        }

        let media_id = match &image_path {
            Some(path) => self.twitter.upload_media(path).await,
            None => None,
        };

        match self.twitter.post_tweet(&tweet, media_id.as_deref(), None).await {
            Some(id) => {
                info!("Posted pick {} as tweet {}", pick.id, id);
                self.source.mark_posted(&pick.id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Daily recap cycle: grade today's picks and post the result
    pub async fn run_recap(&mut self, dry_run: bool, thread: bool) -> Result<usize> {
        let result = self.recap_cycle(dry_run, thread).await;
        self.images.cleanup();
        result
    }

    async fn recap_cycle(&mut self, dry_run: bool, thread: bool) -> Result<usize> {
        self.check_credentials(dry_run).await?;

        let mut picks = self.source.todays_picks().await;
        info!("Grading {} picks from today", picks.len());

        // Pull slip screenshots down so the recap can reuse one
        for pick in &mut picks {
            let filename = format!("recap_{}.png", pick.id);
            if let Some(image) = pick.attached_images.first_mut() {
                image.local_path = self.images.download_to_scratch(&image.url, &filename).await;
            }
        }
        let results = self.recap.compute(&picks).await;

        if thread {
            let tweets = detailed_thread(&results, &mut self.writer);
            let mut images = vec![best_image(&results)];
            images.resize(tweets.len(), None);

            if dry_run {
                for (i, tweet) in tweets.iter().enumerate() {
                    println!("[DRY RUN] Thread tweet {}:\n{}\n", i + 1, tweet);
                }
                return Ok(tweets.len());
            }
            let posted = self.twitter.post_thread(&tweets, &images).await;
            return Ok(posted.len());
        }

        let tweet = recap_tweet(&results, &mut self.writer);
        if dry_run {
            println!("[DRY RUN] Would post recap:\n{}", tweet);
            return Ok(1);
        }

        let media_id = match best_image(&results) {
            Some(path) => self.twitter.upload_media(&path).await,
            None => None,
        };
        match self.twitter.post_tweet(&tweet, media_id.as_deref(), None).await {
            Some(id) => {
                info!("Posted recap as tweet {}", id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    /// End-of-day summary cycle
    pub async fn run_summary(&mut self, dry_run: bool) -> Result<usize> {
        let result = self.summary_cycle(dry_run).await;
        self.images.cleanup();
        result
    }

    async fn summary_cycle(&mut self, dry_run: bool) -> Result<usize> {
        self.check_credentials(dry_run).await?;

        let picks = self.source.todays_picks().await;
        let digest = self.summary.digest(&picks);
        let props = self.props.todays_popular_props(None).await;
        info!("Today's board:\n{}", props_summary(&props));

        let summary = self.summary.generate_summary(&digest, &props).await;
        let tweet = self.summary.full_tweet(&summary);

        if dry_run {
            println!("[DRY RUN] Would post summary:\n{}", tweet);
            return Ok(1);
        }

        match self.twitter.post_tweet(&tweet, None, None).await {
            Some(id) => {
                info!("Posted summary as tweet {}", id);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    /// Check every external dependency and report. Returns false when the
    /// publisher credentials are bad; the rest is informational.
    pub async fn verify(&mut self) -> bool {
        println!("--- Verification ---");

        let twitter_ok = self.twitter.verify_credentials().await;
        println!("Twitter: {}", if twitter_ok { "OK" } else { "FAILED" });

        let messages = self.source.unposted(5).await;
        println!(
            "Discord: reachable, {} unposted pick(s) visible",
            messages.len()
        );

        match self.gemini.generate("Reply with the single word OK.").await {
            Ok(reply) if !reply.is_empty() => println!("Gemini: OK"),
            Ok(_) => println!("Gemini: FAILED (empty reply)"),
            Err(e) => println!("Gemini: FAILED ({})", e),
        }

        twitter_ok
    }

    async fn check_credentials(&self, dry_run: bool) -> Result<()> {
        if dry_run {
            return Ok(());
        }
        if !self.twitter.verify_credentials().await {
            return Err(PickcastError::Auth(
                "Twitter authentication failed".to_string(),
            ));
        }
        Ok(())
    }
}
