//! Round-level rates over recorded game results
//!
//! Every rate is 0 for an empty result set.

use equilibria_common::GameResult;
use serde::{Deserialize, Serialize};

fn fraction_of_rounds(results: &[GameResult], predicate: impl Fn(&GameResult) -> bool) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().filter(|r| predicate(*r)).count() as f64 / results.len() as f64
}

/// Fraction of individual moves (both players) that were cooperate
pub fn cooperation_rate(results: &[GameResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let cooperations: u64 = results.iter().map(|r| r.cooperate_moves() as u64).sum();
    cooperations as f64 / (2 * results.len()) as f64
}

/// Fraction of rounds where both players cooperated
pub fn mutual_cooperation_rate(results: &[GameResult]) -> f64 {
    fraction_of_rounds(results, GameResult::is_mutual_cooperation)
}

/// Fraction of rounds where both players defected
pub fn mutual_defection_rate(results: &[GameResult]) -> f64 {
    fraction_of_rounds(results, GameResult::is_mutual_defection)
}

/// Fraction of rounds where exactly one player cooperated
pub fn exploitation_rate(results: &[GameResult]) -> f64 {
    fraction_of_rounds(results, GameResult::is_exploitation)
}

/// Mean combined score of both players per round
pub fn mean_total_score(results: &[GameResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(GameResult::total_score).sum::<f64>() / results.len() as f64
}

/// All round-level rates of a result set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub rounds: usize,
    pub cooperation_rate: f64,
    pub mutual_cooperation_rate: f64,
    pub mutual_defection_rate: f64,
    pub exploitation_rate: f64,
    pub mean_total_score: f64,
}

impl RoundSummary {
    pub fn from_results(results: &[GameResult]) -> Self {
        Self {
            rounds: results.len(),
            cooperation_rate: cooperation_rate(results),
            mutual_cooperation_rate: mutual_cooperation_rate(results),
            mutual_defection_rate: mutual_defection_rate(results),
            exploitation_rate: exploitation_rate(results),
            mean_total_score: mean_total_score(results),
        }
    }
}
