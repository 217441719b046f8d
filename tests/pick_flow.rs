//! Scenario tests over the public API: ingest filtering, dedup, grading,
//! and post composition. No network; games and messages are constructed.

use pickcast::agent::writer::{PickWriter, Selector, POST_CHAR_LIMIT};
use pickcast::config::{PostingConfig, SportsConfig};
use pickcast::domain::{
    Confidence, DailyResults, GameRecord, GameStatus, GradeResult, GradedPick, Outcome, TeamScore,
};
use pickcast::persistence::{MemoryLedger, PostedLedger};
use pickcast::services::grader::{grade_with_game, match_game};
use pickcast::services::ingest::{extract_picks, is_betting_like};
use pickcast::{GeminiClient, GeminiConfig};

fn game(home: (&str, i64), away: (&str, i64), completed: bool) -> GameRecord {
    GameRecord {
        id: "game".into(),
        name: format!("{} at {}", away.0, home.0),
        date: "2025-01-15T00:30Z".into(),
        status: if completed {
            GameStatus::Completed
        } else {
            GameStatus::InProgress
        },
        status_detail: if completed { "Final" } else { "Halftime" }.into(),
        completed,
        home: TeamScore {
            name: home.0.into(),
            abbreviation: String::new(),
            score: home.1,
            winner: false,
        },
        away: TeamScore {
            name: away.0.into(),
            abbreviation: String::new(),
            score: away.1,
            winner: false,
        },
    }
}

fn writer(seed: u64) -> PickWriter {
    PickWriter::new(
        PostingConfig::default(),
        SportsConfig::default(),
        GeminiClient::new(GeminiConfig::default()).unwrap(),
        Selector::from_seed(seed),
    )
}

#[test]
fn lakers_moneyline_scenario() {
    // Pick "Lakers ML -150", Lakers at home 112-105, game final
    let games = vec![game(("Los Angeles Lakers", 112), ("Phoenix Suns", 105), true)];
    let matched = match_game("Lakers ML -150", &games).expect("should match the Lakers game");
    let grade = grade_with_game("Lakers ML -150", &matched);

    assert_eq!(grade.outcome, Outcome::Win);
    assert!(grade.graded);
    assert_eq!(grade.confidence, Confidence::High);
}

#[test]
fn spread_pick_requires_manual_verification() {
    let games = vec![game(
        ("Golden State Warriors", 120),
        ("Sacramento Kings", 110),
        true,
    )];
    let matched = match_game("Warriors -5.5", &games).unwrap();
    let grade = grade_with_game("Warriors -5.5", &matched);

    assert_eq!(grade.outcome, Outcome::Pending);
    assert!(!grade.graded);
    assert_eq!(grade.confidence, Confidence::Medium);
    assert!(grade.reason.to_lowercase().contains("manual"));
}

#[test]
fn unmatched_pick_stays_pending() {
    let games = vec![game(("Boston Celtics", 100), ("Miami Heat", 90), true)];
    assert!(match_game("Oilers ML tonight", &games).is_none());
}

#[test]
fn total_grading_scenarios() {
    // Line 215.5, total 220 -> over wins
    let g = game(("Boston Celtics", 115), ("Miami Heat", 105), true);
    assert_eq!(
        grade_with_game("Celtics over 215.5", &g).outcome,
        Outcome::Win
    );

    // Total 210 -> over loses
    let g = game(("Boston Celtics", 110), ("Miami Heat", 100), true);
    assert_eq!(
        grade_with_game("Celtics over 215.5", &g).outcome,
        Outcome::Loss
    );

    // Line 220, total 220 -> push either direction
    let g = game(("Boston Celtics", 115), ("Miami Heat", 105), true);
    assert_eq!(grade_with_game("Heat over 220", &g).outcome, Outcome::Push);
    assert_eq!(grade_with_game("Heat under 220", &g).outcome, Outcome::Push);
}

#[test]
fn dedup_excludes_posted_ids() {
    let messages: Vec<pickcast::adapters::ChannelMessage> = serde_json::from_value(
        serde_json::json!([
            {"id": "1", "content": "Lakers ML -150",
             "timestamp": "2025-01-15T18:00:00+00:00",
             "author": {"username": "capper", "bot": false}},
            {"id": "2", "content": "Celtics over 215.5",
             "timestamp": "2025-01-15T18:05:00+00:00",
             "author": {"username": "capper", "bot": false}},
            {"id": "3", "content": "lunch was great",
             "timestamp": "2025-01-15T18:10:00+00:00",
             "author": {"username": "capper", "bot": false}}
        ]),
    )
    .unwrap();

    let mut ledger = MemoryLedger::new(100);
    ledger.add("1").unwrap();

    let unposted: Vec<_> = extract_picks(&messages)
        .into_iter()
        .filter(|p| !ledger.contains(&p.id))
        .collect();

    assert_eq!(unposted.len(), 1);
    assert_eq!(unposted[0].id, "2");

    // After marking the remaining pick, nothing is left
    ledger.add("2").unwrap();
    let remaining: Vec<_> = extract_picks(&messages)
        .into_iter()
        .filter(|p| !ledger.contains(&p.id))
        .collect();
    assert!(remaining.is_empty());
}

#[test]
fn non_betting_channel_yields_no_picks_and_no_writes() {
    let messages: Vec<pickcast::adapters::ChannelMessage> = serde_json::from_value(
        serde_json::json!([
            {"id": "1", "content": "morning everyone",
             "timestamp": "2025-01-15T18:00:00+00:00",
             "author": {"username": "a", "bot": false}},
            {"id": "2", "content": "",
             "timestamp": "2025-01-15T18:01:00+00:00",
             "author": {"username": "b", "bot": false}},
            {"id": "3", "content": "Lakers ML -150",
             "timestamp": "2025-01-15T18:02:00+00:00",
             "author": {"username": "bridge", "bot": true}}
        ]),
    )
    .unwrap();

    let ledger = MemoryLedger::new(100);
    let picks = extract_picks(&messages);
    assert!(picks.is_empty());
    assert!(ledger.is_empty());
}

#[test]
fn betting_filter_edges() {
    assert!(!is_betting_like(""));
    assert!(is_betting_like("+150 on the road dog"));
    assert!(is_betting_like("two units, hammer it"));
    assert!(!is_betting_like("great weather out"));
}

#[test]
fn ledger_retains_newest_hundred() {
    let mut ledger = MemoryLedger::new(100);
    for i in 0..250 {
        ledger.add(&i.to_string()).unwrap();
    }
    assert_eq!(ledger.len(), 100);
    assert!(ledger.contains("249"));
    assert!(ledger.contains("150"));
    assert!(!ledger.contains("149"));
}

#[test]
fn composed_posts_never_exceed_limit() {
    for seed in 0..25u64 {
        let mut w = writer(seed);
        let long = "angles on angles for this play ".repeat(25);
        let tweet = w.format_tweet(
            "Tyrese Maxey UNDER 10.5 Rebs + Ast @ -109",
            Some(&long),
            None,
            Some("https://book.example/slip/abcdef0123456789"),
        );
        assert!(
            tweet.chars().count() <= POST_CHAR_LIMIT,
            "seed {} produced {} chars",
            seed,
            tweet.chars().count()
        );
    }
}

#[test]
fn daily_results_invariant_holds() {
    let outcomes = [
        Outcome::Win,
        Outcome::Loss,
        Outcome::Push,
        Outcome::Pending,
        Outcome::Win,
        Outcome::Pending,
    ];
    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
    let picks = outcomes.iter().map(|&o| {
        let grade = match o {
            Outcome::Pending => GradeResult::pending(Confidence::Low, "not finished"),
            other => GradeResult::graded(other, "final"),
        };
        GradedPick::from_grade("id", "text", chrono::Utc::now(), &grade)
    });
    let results = DailyResults::from_grades(date, picks);

    assert_eq!(
        results.wins + results.losses + results.pushes + results.pending,
        results.total_picks
    );
    assert_eq!(results.wins, 2);
    assert_eq!(results.pending, 2);
}
