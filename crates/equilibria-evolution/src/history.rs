//! GenerationHistory - Append-only sequence of generation snapshots
//!
//! Index 0 is the initial population; insertion order is generation order.

use equilibria_common::{EquilibriaError, Result, StrategyId};
use serde::Serialize;
use std::ops::Deref;

use crate::population::PopulationState;

/// Ordered generation snapshots of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenerationHistory {
    states: Vec<PopulationState>,
}

impl GenerationHistory {
    /// Start a history from its initial population
    pub fn new(initial: PopulationState) -> Self {
        Self {
            states: vec![initial],
        }
    }

    /// Append the next generation
    ///
    /// The snapshot must be exactly one generation after the latest entry.
    pub fn push(&mut self, state: PopulationState) -> Result<()> {
        let expected = self.latest().generation() + 1;
        if state.generation() != expected {
            return Err(EquilibriaError::History(format!(
                "expected generation {}, got {}",
                expected,
                state.generation()
            )));
        }
        if state.population().len() != self.latest().population().len() {
            return Err(EquilibriaError::History(format!(
                "generation {} tracks {} strategies, history tracks {}",
                state.generation(),
                state.population().len(),
                self.latest().population().len()
            )));
        }
        self.states.push(state);
        Ok(())
    }

    pub fn initial(&self) -> &PopulationState {
        &self.states[0]
    }

    pub fn latest(&self) -> &PopulationState {
        // never empty: constructed with an initial state and only appended to
        &self.states[self.states.len() - 1]
    }

    pub fn as_slice(&self) -> &[PopulationState] {
        &self.states
    }

    /// Count series of one strategy across all generations
    pub fn counts_of(&self, id: StrategyId) -> Vec<u64> {
        self.states.iter().map(|s| s.count(id)).collect()
    }

    /// Cooperation rate of every generation
    pub fn cooperation_series(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.cooperation_rate()).collect()
    }

    /// Latest total minus initial total
    pub fn total_drift(&self) -> i64 {
        self.latest().total() as i64 - self.initial().total() as i64
    }

    /// Drop everything after the initial population
    pub fn truncate_to_initial(&mut self) {
        self.states.truncate(1);
    }
}

impl Deref for GenerationHistory {
    type Target = [PopulationState];

    fn deref(&self) -> &[PopulationState] {
        &self.states
    }
}
