//! PopulationState - One generation snapshot
//!
//! A snapshot is built once and never mutated; stepping produces a new
//! snapshot. The cooperation rate is derived from the counts at
//! construction and has no setter.

use equilibria_common::{EquilibriaError, PerStrategy, Result, StrategyId, StrategyRegistry};
use serde::Serialize;

/// Strategy counts for one generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationState {
    generation: u64,
    population: PerStrategy<u64>,
    cooperation_rate: f64,
}

impl PopulationState {
    /// Create a snapshot; the cooperation rate is the share of individuals
    /// playing a nice strategy
    pub fn new(generation: u64, population: PerStrategy<u64>, registry: &StrategyRegistry) -> Self {
        let total: u64 = population.values().iter().sum();
        let cooperators: u64 = population
            .iter()
            .filter(|(id, _)| registry.get(*id).is_some_and(|s| s.is_nice))
            .map(|(_, count)| *count)
            .sum();
        let cooperation_rate = if total == 0 {
            0.0
        } else {
            cooperators as f64 / total as f64
        };

        Self {
            generation,
            population,
            cooperation_rate,
        }
    }

    /// Generation 0 snapshot
    pub fn initial(population: PerStrategy<u64>, registry: &StrategyRegistry) -> Self {
        Self::new(0, population, registry)
    }

    /// Generation 0 snapshot from `(strategy key, count)` pairs
    ///
    /// Strategies not listed start at zero.
    pub fn from_counts(registry: &StrategyRegistry, counts: &[(&str, u64)]) -> Result<Self> {
        let mut population = PerStrategy::filled(registry, 0u64);
        for (key, count) in counts {
            population[registry.resolve(key)?] = *count;
        }
        Ok(Self::initial(population, registry))
    }

    /// Next generation with the given counts
    pub fn successor(&self, population: PerStrategy<u64>, registry: &StrategyRegistry) -> Self {
        Self::new(self.generation + 1, population, registry)
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn population(&self) -> &PerStrategy<u64> {
        &self.population
    }

    /// Count for one strategy (0 for ids outside the snapshot)
    #[inline]
    pub fn count(&self, id: StrategyId) -> u64 {
        self.population.get(id).copied().unwrap_or(0)
    }

    /// Total population size
    pub fn total(&self) -> u64 {
        self.population.values().iter().sum()
    }

    /// Share of the population held by a strategy (0 for an empty population)
    pub fn share(&self, id: StrategyId) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(id) as f64 / total as f64
    }

    /// Per-strategy shares; all zero for an empty population
    pub fn proportions(&self) -> PerStrategy<f64> {
        let total = self.total();
        let values: Vec<f64> = self
            .population
            .values()
            .iter()
            .map(|&count| {
                if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                }
            })
            .collect();
        PerStrategy::from_vec(values)
    }

    #[inline]
    pub fn cooperation_rate(&self) -> f64 {
        self.cooperation_rate
    }

    /// Strategies with a non-zero count
    pub fn survivors(&self) -> impl Iterator<Item = StrategyId> + '_ {
        self.population
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, _)| id)
    }

    /// Strategy with the largest count; ties resolve to the earliest id
    pub fn leader(&self) -> Option<StrategyId> {
        self.population
            .iter()
            .fold(None, |best: Option<(StrategyId, u64)>, (id, &count)| match best {
                Some((_, best_count)) if best_count >= count => best,
                _ => Some((id, count)),
            })
            .map(|(id, _)| id)
    }

    /// Same counts as `other`, ignoring generation numbers
    pub fn same_composition(&self, other: &PopulationState) -> bool {
        self.population == other.population
    }

    /// Ensure the snapshot is sized for the registry
    pub fn check_registry(&self, registry: &StrategyRegistry) -> Result<()> {
        if self.population.len() != registry.len() {
            return Err(EquilibriaError::History(format!(
                "population tracks {} strategies, registry has {}",
                self.population.len(),
                registry.len()
            )));
        }
        Ok(())
    }
}
