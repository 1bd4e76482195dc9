//! # Equilibria Evolution
//!
//! Population dynamics engine for the Equilibria game-theory core.
//!
//! ## Replicator Update
//!
//! ```text
//! fitness(s) = Σ_t p(t) × payoff(s, t)
//! p'(s)      = fitness(s) / Σ_u fitness(u)
//! ```
//!
//! Where:
//! - p(t): current population share of strategy t
//! - payoff(s, t): own payoff of s against t
//!
//! ## Layout
//!
//! - [`population`]: immutable generation snapshots
//! - [`replicator`]: the update rule
//! - [`history`]: append-only generation sequence
//! - [`simulation`]: run driver owning registry, matrix and history
//! - [`tournament`]: iterated matches producing game results

pub mod history;
pub mod population;
pub mod replicator;
pub mod simulation;
pub mod tournament;

use serde::{Deserialize, Serialize};

pub use history::GenerationHistory;
pub use population::PopulationState;
pub use replicator::{fitness_landscape, FitnessLandscape, ReplicatorRule, ReplicatorStep};
pub use simulation::{RunSummary, Simulation, StopReason};
pub use tournament::{play_match, MatchConfig, Standing, Tournament, TournamentReport};

/// Default generation limit of a run
pub const DEFAULT_MAX_GENERATIONS: u64 = 100;

/// Default rounds per iterated match
pub const DEFAULT_MATCH_ROUNDS: u32 = 200;

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Share normalisation of the replicator step
    pub rule: ReplicatorRule,
    /// Generation limit for configured runs
    pub max_generations: u64,
    /// Stop as soon as two consecutive generations match
    pub stop_when_stable: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rule: ReplicatorRule::Normalized,
            max_generations: DEFAULT_MAX_GENERATIONS,
            stop_when_stable: true,
        }
    }
}
