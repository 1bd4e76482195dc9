//! # Equilibria Common
//!
//! Shared reference data and records for the Equilibria game-theory core.
//!
//! ## Core Types
//!
//! - [`Strategy`]/[`StrategyRegistry`]: strategy reference data addressed by [`StrategyId`]
//! - [`PerStrategy`]: registry-sized accumulator indexed by strategy
//! - [`PayoffMatrix`]: (own, opponent) -> (own payoff, opponent payoff)
//! - [`GameResult`]: a single pairwise round
//!
//! ## Errors
//!
//! Construction problems surface as [`EquilibriaError`]. Numeric edge cases
//! never do; they resolve to neutral values where they occur.

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{EquilibriaError, PayoffError, RegistryError, Result};
pub use types::{
    game_result::GameResult,
    payoff::{MovePayoffs, PayoffMatrix},
    strategy::{Behavior, Move, PerStrategy, Strategy, StrategyId, StrategyRegistry},
};

/// Equilibria version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Share of the population a strategy must reach to count as dominant
pub const DOMINANCE_SHARE: f64 = 0.5;

/// Minimum history length before stability is judged
pub const MIN_STABILITY_SAMPLES: usize = 5;

/// Minimum history length before growth rates are computed
pub const MIN_EFFECTIVENESS_SAMPLES: usize = 2;
