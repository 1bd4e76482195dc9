//! Lab configuration
//!
//! Layers, lowest priority first: built-in defaults, an optional
//! `equilibria.toml` in the working directory, then `EQUILIBRIA__`
//! environment variables (`EQUILIBRIA__SIMULATION__GENERATIONS=250`).

use std::collections::BTreeMap;

use anyhow::Result;
use equilibria_common::{EquilibriaError, MovePayoffs};
use equilibria_evolution::{ReplicatorRule, DEFAULT_MATCH_ROUNDS, DEFAULT_MAX_GENERATIONS};
use serde::{Deserialize, Serialize};

/// Starting count of each strategy when none are configured
pub const DEFAULT_STRATEGY_COUNT: u64 = 50;

/// Lab runner configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabConfig {
    /// Run loop settings
    pub simulation: SimulationSettings,
    /// Strategy line-up and starting counts
    pub population: PopulationSettings,
    /// Move payoff table
    pub payoff: MovePayoffs,
    /// Iterated play settings (line-up scenario only)
    pub tournament: TournamentSettings,
}

impl LabConfig {
    /// Load configuration from defaults, file and environment
    pub fn load() -> Result<Self> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        let cfg = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::with_name("equilibria").required(false))
            .add_source(
                config::Environment::with_prefix("EQUILIBRIA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let lab: Self = cfg.try_deserialize()?;
        lab.validate()?;
        Ok(lab)
    }

    /// Reject settings the runner cannot work with
    pub fn validate(&self) -> equilibria_common::Result<()> {
        let noise = self.tournament.noise;
        if !(0.0..=1.0).contains(&noise) {
            return Err(EquilibriaError::Config(format!(
                "tournament.noise must be within [0, 1], got {}",
                noise
            )));
        }
        if self.simulation.tick_ms == 0 {
            return Err(EquilibriaError::Config(
                "simulation.tick_ms must be positive".to_string(),
            ));
        }
        let counts = &self.population.counts;
        if !counts.is_empty() && counts.values().all(|&count| count == 0) {
            return Err(EquilibriaError::Config(
                "population.counts needs at least one strategy with a positive count".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run loop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Generation limit
    pub generations: u64,
    /// Replicator normalisation
    pub rule: ReplicatorRule,
    /// Delay between generations in milliseconds
    pub tick_ms: u64,
    /// Stop once two consecutive generations match
    pub stop_when_stable: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            generations: DEFAULT_MAX_GENERATIONS,
            rule: ReplicatorRule::Normalized,
            tick_ms: 50,
            stop_when_stable: true,
        }
    }
}

/// Which strategies take part
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Unconditional cooperators against unconditional defectors
    #[default]
    Classic,
    /// The iterated-game line-up; payoffs come from a round-robin tournament
    Lineup,
}

/// Strategy line-up and starting counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationSettings {
    pub scenario: Scenario,
    /// Starting count per strategy key; unlisted strategies start at zero.
    /// Left empty, every strategy of the scenario starts at
    /// [`DEFAULT_STRATEGY_COUNT`].
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
}

impl Default for PopulationSettings {
    fn default() -> Self {
        Self {
            scenario: Scenario::Classic,
            counts: BTreeMap::new(),
        }
    }
}

/// Iterated play settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Rounds per match
    pub rounds: u32,
    /// Move flip probability for the noisy tournament
    pub noise: f64,
    /// RNG seed shared by the clean and noisy tournaments
    pub seed: u64,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_MATCH_ROUNDS,
            noise: 0.05,
            seed: 7,
        }
    }
}
