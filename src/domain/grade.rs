//! Grading outcome types and bet-type classification

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Win,
    Loss,
    Push,
    Pending,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Win => write!(f, "WIN"),
            Outcome::Loss => write!(f, "LOSS"),
            Outcome::Push => write!(f, "PUSH"),
            Outcome::Pending => write!(f, "PENDING"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Outcome of matching one pick against a game.
///
/// Invariant: `graded` is true exactly when `outcome` is Win/Loss/Push;
/// Pending results are always ungraded. The constructors are the only way
/// to build one, which keeps the invariant by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeResult {
    pub outcome: Outcome,
    pub graded: bool,
    pub confidence: Confidence,
    pub reason: String,
}

impl GradeResult {
    pub fn pending(confidence: Confidence, reason: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Pending,
            graded: false,
            confidence,
            reason: reason.into(),
        }
    }

    pub fn graded(outcome: Outcome, reason: impl Into<String>) -> Self {
        debug_assert!(outcome != Outcome::Pending);
        Self {
            outcome,
            graded: true,
            confidence: Confidence::High,
            reason: reason.into(),
        }
    }
}

/// Bet categories the grader understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    Moneyline,
    Total,
    Spread,
    Unknown,
}

enum BetRule {
    ContainsAny(&'static [&'static str]),
    SignedNumber,
}

/// Precedence-ordered classification rules. Free-text sniffing is kept out
/// of the grader itself so the precedence is testable on its own.
const BET_RULES: &[(BetKind, BetRule)] = &[
    (BetKind::Moneyline, BetRule::ContainsAny(&["ml", "moneyline"])),
    (BetKind::Total, BetRule::ContainsAny(&["over", "under"])),
    (BetKind::Spread, BetRule::SignedNumber),
];

fn signed_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[+-]\d+\.?\d*").unwrap())
}

impl BetKind {
    /// Classify a pick's text. First matching rule wins; anything that
    /// matches no rule is Unknown.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        for (kind, rule) in BET_RULES {
            let hit = match rule {
                BetRule::ContainsAny(words) => words.iter().any(|w| lower.contains(w)),
                BetRule::SignedNumber => signed_number_re().is_match(text),
            };
            if hit {
                return *kind;
            }
        }
        BetKind::Unknown
    }
}
