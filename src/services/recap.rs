//! Daily recap: grade today's picks and build the recap post
//!
//! Grades are computed fresh on every run and the snapshot file is
//! overwritten; the recap text comes out of the shared writer so the
//! 280-character discipline lives in one place.

use crate::agent::writer::PickWriter;
use crate::domain::{DailyResults, GradedPick, Outcome, Pick};
use crate::persistence::ResultsSnapshot;
use crate::services::grader::PickGrader;
use chrono::Local;
use tracing::{info, warn};

/// Graded picks shown individually in a recap thread
const THREAD_PICK_CAP: usize = 3;

pub struct RecapService {
    grader: PickGrader,
    snapshot: ResultsSnapshot,
}

impl RecapService {
    pub fn new(grader: PickGrader, snapshot: ResultsSnapshot) -> Self {
        Self { grader, snapshot }
    }

    /// Grade today's picks and persist the snapshot. Snapshot write
    /// failures are logged, not fatal.
    pub async fn compute(&self, picks: &[Pick]) -> DailyResults {
        let mut results = DailyResults::new(Local::now().date_naive());

        for pick in picks {
            let grade = self.grader.grade(&pick.text).await;
            let mut graded = GradedPick::from_grade(&pick.id, &pick.text, pick.timestamp, &grade);
            graded.image = pick
                .attached_images
                .iter()
                .find_map(|img| img.local_path.clone());
            graded.links = pick.links.clone();
            results.push_graded(graded);
        }

        info!(
            "Graded {} picks: {}W {}L {}P {} pending",
            results.total_picks, results.wins, results.losses, results.pushes, results.pending
        );

        if let Err(e) = self.snapshot.save(&results) {
            warn!("Error saving daily results: {}", e);
        }
        results
    }
}

/// One-line read on the day, pending count included when present
pub fn performance_text(results: &DailyResults) -> String {
    let mut text = if results.wins > results.losses {
        "Another winning day.".to_string()
    } else if results.wins == results.losses {
        "Broke even - back tomorrow.".to_string()
    } else {
        "Bounce back tomorrow.".to_string()
    };
    if results.pending > 0 {
        text.push_str(&format!(" {} still pending.", results.pending));
    }
    text
}

/// The single recap post; a no-picks day gets its own message
pub fn recap_tweet(results: &DailyResults, writer: &mut PickWriter) -> String {
    if results.total_picks == 0 {
        return no_picks_tweet(writer);
    }
    writer.format_recap_tweet(
        &results.record_string(),
        &results.win_rate_string(),
        &performance_text(results),
    )
}

fn no_picks_tweet(writer: &mut PickWriter) -> String {
    writer.format_recap_tweet(
        "0-0",
        "N/A",
        "No official picks today - sometimes patience is the play.",
    )
}

/// Summary post plus up to three individually graded picks
pub fn detailed_thread(results: &DailyResults, writer: &mut PickWriter) -> Vec<String> {
    let mut tweets = vec![recap_tweet(results, writer)];

    for pick in results.picks.iter().filter(|p| p.graded).take(THREAD_PICK_CAP) {
        let marker = match pick.outcome {
            Outcome::Win => "✅",
            Outcome::Loss => "❌",
            _ => "➖",
        };
        let mut excerpt: String = pick.text.chars().take(120).collect();
        if pick.text.chars().count() > 120 {
            excerpt.push_str("...");
        }
        let reason: String = pick.reason.chars().take(50).collect();

        let mut tweet = format!("{} {}\n\nResult: {}", marker, excerpt, pick.outcome);
        if !reason.is_empty() {
            tweet.push('\n');
            tweet.push_str(&reason);
        }
        tweets.push(tweet);
    }

    tweets
}

/// Image for the recap post: a winning pick's image first, then any
/// pick's image
pub fn best_image(results: &DailyResults) -> Option<String> {
    results
        .picks
        .iter()
        .find(|p| p.outcome == Outcome::Win && p.image.is_some())
        .or_else(|| results.picks.iter().find(|p| p.image.is_some()))
        .and_then(|p| p.image.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::gemini::{GeminiClient, GeminiConfig};
    use crate::agent::writer::Selector;
    use crate::config::{PostingConfig, SportsConfig};
    use crate::domain::{Confidence, GradeResult};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn writer() -> PickWriter {
        PickWriter::new(
            PostingConfig::default(),
            SportsConfig::default(),
            GeminiClient::new(GeminiConfig::default()).unwrap(),
            Selector::from_seed(1),
        )
    }

    fn graded_pick(id: &str, outcome: Outcome, image: Option<&str>) -> GradedPick {
        let grade = match outcome {
            Outcome::Pending => GradeResult::pending(Confidence::Low, "pending"),
            other => GradeResult::graded(other, "Final: A 110 - B 100"),
        };
        let mut pick = GradedPick::from_grade(
            id,
            "Lakers ML -150",
            Utc.with_ymd_and_hms(2025, 1, 15, 20, 0, 0).unwrap(),
            &grade,
        );
        pick.image = image.map(str::to_string);
        pick
    }

    fn day(picks: Vec<GradedPick>) -> DailyResults {
        DailyResults::from_grades(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), picks)
    }

    #[test]
    fn performance_text_tracks_record() {
        let winning = day(vec![
            graded_pick("1", Outcome::Win, None),
            graded_pick("2", Outcome::Loss, None),
            graded_pick("3", Outcome::Win, None),
        ]);
        assert!(performance_text(&winning).contains("winning day"));

        let even = day(vec![
            graded_pick("1", Outcome::Win, None),
            graded_pick("2", Outcome::Loss, None),
            graded_pick("3", Outcome::Pending, None),
        ]);
        let text = performance_text(&even);
        assert!(text.contains("Broke even"));
        assert!(text.contains("1 still pending"));
    }

    #[test]
    fn recap_tweet_fits_and_mentions_record() {
        let results = day(vec![
            graded_pick("1", Outcome::Win, None),
            graded_pick("2", Outcome::Win, None),
            graded_pick("3", Outcome::Loss, None),
        ]);
        let mut writer = writer();
        let tweet = recap_tweet(&results, &mut writer);
        assert!(tweet.chars().count() <= 280);
        assert!(tweet.contains("2W-1L"));
        assert!(tweet.contains("67%"));
    }

    #[test]
    fn no_picks_day_has_its_own_message() {
        let results = day(vec![]);
        let mut writer = writer();
        let tweet = recap_tweet(&results, &mut writer);
        assert!(tweet.contains("patience"));
        assert!(tweet.chars().count() <= 280);
    }

    #[test]
    fn thread_caps_individual_picks() {
        let results = day(vec![
            graded_pick("1", Outcome::Win, None),
            graded_pick("2", Outcome::Loss, None),
            graded_pick("3", Outcome::Push, None),
            graded_pick("4", Outcome::Win, None),
            graded_pick("5", Outcome::Pending, None),
        ]);
        let mut writer = writer();
        let tweets = detailed_thread(&results, &mut writer);
        // summary + 3 graded (pending excluded, cap applied)
        assert_eq!(tweets.len(), 4);
        assert!(tweets[1].contains("Result: WIN"));
        assert!(tweets.iter().all(|t| t.chars().count() <= 280));
    }

    #[test]
    fn best_image_prefers_winners() {
        let results = day(vec![
            graded_pick("1", Outcome::Loss, Some("loss.png")),
            graded_pick("2", Outcome::Win, Some("win.png")),
        ]);
        assert_eq!(best_image(&results).as_deref(), Some("win.png"));

        let no_winner = day(vec![graded_pick("1", Outcome::Loss, Some("loss.png"))]);
        assert_eq!(best_image(&no_winner).as_deref(), Some("loss.png"));

        let none = day(vec![graded_pick("1", Outcome::Win, None)]);
        assert_eq!(best_image(&none), None);
    }
}
