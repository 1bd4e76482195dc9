//! # Equilibria Lab
//!
//! Timed evolutionary runs driven from configuration.
//!
//! A run seeds a scenario ([`scenario`]), steps the replicator once per
//! tick until the generation limit, a stable population or shutdown
//! ([`runner`]), then reports the history through the analytics engine.

pub mod config;
pub mod runner;
pub mod scenario;

pub use config::{LabConfig, Scenario};
pub use runner::{LabReport, LabRunner, StopCause};
pub use scenario::ScenarioSetup;

/// Lab version
pub const LAB_VERSION: &str = env!("CARGO_PKG_VERSION");
