//! # Equilibria
//!
//! Facade over the Equilibria workspace crates.
//!
//! - [`common`]: strategies, payoff matrices, game results, errors
//! - [`evolution`]: replicator dynamics, generation history, tournaments
//! - [`analytics`]: cooperation/stability metrics, event detection, insights

pub use equilibria_analytics as analytics;
pub use equilibria_common as common;
pub use equilibria_evolution as evolution;
