//! Discrete replicator dynamics
//!
//! ## Update rule
//!
//! ```text
//! fitness(s)  = Σ_t p(t) × payoff(s, t)
//! p'(s)       = w(s) / Σ_u w(u)
//! count'(s)   = round(p'(s) × N)
//! ```
//!
//! Where `w(s) = fitness(s)` under [`ReplicatorRule::Normalized`] and
//! `w(s) = p(s) × fitness(s)` under [`ReplicatorRule::ShareWeighted`].
//!
//! Counts are rounded per strategy and never renormalised, so the total can
//! drift by up to one individual per strategy each step.

use equilibria_common::{PayoffMatrix, PerStrategy, StrategyId, StrategyRegistry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::population::PopulationState;

/// How fitness is turned into next-generation shares
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplicatorRule {
    /// New share is a strategy's fitness over the summed fitness of all strategies
    #[default]
    Normalized,
    /// Classical replicator: new share is current share times fitness over mean fitness.
    /// Extinct strategies stay extinct.
    ShareWeighted,
}

/// Per-strategy fitness against the current population
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitnessLandscape {
    /// Population-weighted average payoff of each strategy
    pub fitness: PerStrategy<f64>,
    /// Share-weighted mean fitness of the population
    pub mean_fitness: f64,
}

impl FitnessLandscape {
    /// Strategies whose fitness exceeds the population mean
    pub fn above_mean(&self) -> Vec<StrategyId> {
        self.fitness
            .iter()
            .filter(|(_, f)| **f > self.mean_fitness)
            .map(|(id, _)| id)
            .collect()
    }
}

/// Fitness of every strategy against the current proportions
pub fn fitness_landscape(state: &PopulationState, matrix: &PayoffMatrix) -> FitnessLandscape {
    let proportions = state.proportions();
    let fitness = PerStrategy::from_vec(
        proportions
            .iter()
            .map(|(own, _)| {
                proportions
                    .iter()
                    .map(|(opponent, share)| share * matrix.payoff(own, opponent))
                    .sum::<f64>()
            })
            .collect(),
    );
    let mean_fitness: f64 = proportions
        .iter()
        .map(|(id, share)| share * fitness[id])
        .sum();

    FitnessLandscape {
        fitness,
        mean_fitness,
    }
}

/// One application of the replicator update
#[derive(Debug, Clone, Copy)]
pub struct ReplicatorStep<'a> {
    registry: &'a StrategyRegistry,
    matrix: &'a PayoffMatrix,
    rule: ReplicatorRule,
}

impl<'a> ReplicatorStep<'a> {
    /// Step with the default [`ReplicatorRule::Normalized`] rule
    ///
    /// The matrix must cover every registered strategy.
    pub fn new(registry: &'a StrategyRegistry, matrix: &'a PayoffMatrix) -> Self {
        Self {
            registry,
            matrix,
            rule: ReplicatorRule::default(),
        }
    }

    pub fn with_rule(mut self, rule: ReplicatorRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn rule(&self) -> ReplicatorRule {
        self.rule
    }

    /// Compute the next generation
    ///
    /// An empty population, or one whose weights sum to zero, carries its
    /// counts over unchanged.
    pub fn next(&self, state: &PopulationState) -> PopulationState {
        let total = state.total();
        if total == 0 {
            return state.successor(state.population().clone(), self.registry);
        }

        let landscape = fitness_landscape(state, self.matrix);
        let proportions = state.proportions();
        let weights: Vec<f64> = landscape
            .fitness
            .iter()
            .map(|(id, fitness)| match self.rule {
                ReplicatorRule::Normalized => *fitness,
                ReplicatorRule::ShareWeighted => proportions[id] * fitness,
            })
            .collect();
        let total_weight: f64 = weights.iter().sum();

        if total_weight == 0.0 || !total_weight.is_finite() {
            debug!(
                generation = state.generation(),
                "zero total fitness, population carried over"
            );
            return state.successor(state.population().clone(), self.registry);
        }

        let counts: Vec<u64> = weights
            .iter()
            .map(|weight| {
                let share = weight / total_weight;
                (share * total as f64).round().max(0.0) as u64
            })
            .collect();
        let next = state.successor(PerStrategy::from_vec(counts), self.registry);

        debug!(
            generation = next.generation(),
            total = next.total(),
            mean_fitness = landscape.mean_fitness,
            cooperation_rate = next.cooperation_rate(),
            "replicator step"
        );
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equilibria_common::{Behavior, MovePayoffs, Strategy};

    fn classic(cooperators: u64, defectors: u64) -> (StrategyRegistry, PopulationState) {
        let registry = StrategyRegistry::classic();
        let state = PopulationState::from_counts(
            &registry,
            &[("cooperators", cooperators), ("defectors", defectors)],
        )
        .unwrap();
        (registry, state)
    }

    #[test]
    fn test_prisoners_dilemma_favors_defectors() {
        let (registry, state) = classic(50, 50);
        let matrix = PayoffMatrix::prisoners_dilemma();

        let landscape = fitness_landscape(&state, &matrix);
        assert!((landscape.fitness[StrategyId(0)] - 1.5).abs() < 1e-12);
        assert!((landscape.fitness[StrategyId(1)] - 3.0).abs() < 1e-12);
        assert_eq!(landscape.above_mean(), vec![StrategyId(1)]);

        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.generation(), 1);
        assert!(next.count(StrategyId(1)) > 50);
        assert!(next.count(StrategyId(0)) < 50);
        // 1.5 / 4.5 and 3.0 / 4.5 of 100
        assert_eq!(next.population().values(), &[33, 67]);
    }

    #[test]
    fn test_share_weighted_rule() {
        let (registry, state) = classic(50, 50);
        let matrix = PayoffMatrix::prisoners_dilemma();
        let step = ReplicatorStep::new(&registry, &matrix).with_rule(ReplicatorRule::ShareWeighted);
        assert_eq!(step.rule(), ReplicatorRule::ShareWeighted);

        let next = step.next(&state);
        assert!(next.count(StrategyId(1)) > 50);
        assert!(next.count(StrategyId(0)) < 50);
    }

    #[test]
    fn test_share_weighted_keeps_extinct_strategies_extinct() {
        let (registry, state) = classic(100, 0);
        let matrix = PayoffMatrix::prisoners_dilemma();
        let next = ReplicatorStep::new(&registry, &matrix)
            .with_rule(ReplicatorRule::ShareWeighted)
            .next(&state);
        assert_eq!(next.population().values(), &[100, 0]);
    }

    #[test]
    fn test_normalized_rule_reintroduces_absent_strategies() {
        // payoff(D, C) = 5 > 0, so defectors reappear under the normalized rule
        let (registry, state) = classic(100, 0);
        let matrix = PayoffMatrix::prisoners_dilemma();
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.population().values(), &[38, 63]);
    }

    #[test]
    fn test_normalized_rule_can_shrink_above_mean_strategy() {
        // fitness(C) = 0.3, fitness(D) = 1.4, mean 1.29
        let (registry, state) = classic(10, 90);
        let matrix = PayoffMatrix::prisoners_dilemma();
        let landscape = fitness_landscape(&state, &matrix);
        assert!((landscape.mean_fitness - 1.29).abs() < 1e-12);
        assert_eq!(landscape.above_mean(), vec![StrategyId(1)]);

        // 1.4 / 1.7 of 100 pulls defectors down to 82
        let normalized = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(normalized.population().values(), &[18, 82]);

        // 0.9 * 1.4 / 1.29 of 100
        let weighted = ReplicatorStep::new(&registry, &matrix)
            .with_rule(ReplicatorRule::ShareWeighted)
            .next(&state);
        assert_eq!(weighted.population().values(), &[2, 98]);
    }

    #[test]
    fn test_zero_fitness_is_a_no_op() {
        let (registry, state) = classic(20, 80);
        let matrix = PayoffMatrix::two_by_two(&MovePayoffs {
            cc: 0.0,
            cd: 0.0,
            dc: 0.0,
            dd: 0.0,
        });
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.generation(), 1);
        assert!(next.same_composition(&state));
    }

    #[test]
    fn test_empty_population_is_a_no_op() {
        let (registry, state) = classic(0, 0);
        let matrix = PayoffMatrix::prisoners_dilemma();
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.total(), 0);
        assert_eq!(next.generation(), 1);
    }

    #[test]
    fn test_symmetric_payoffs_are_a_fixed_point() {
        let (registry, state) = classic(50, 50);
        let matrix = PayoffMatrix::two_by_two(&MovePayoffs {
            cc: 2.0,
            cd: 2.0,
            dc: 2.0,
            dd: 2.0,
        });
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert!(next.same_composition(&state));
    }

    #[test]
    fn test_rounding_drift_is_not_corrected() {
        // three equal strategies over 100 individuals round to 33 each
        let registry = StrategyRegistry::new(vec![
            Strategy::cooperators(),
            Strategy::defectors(),
            Strategy::from_behavior(Behavior::Grudger),
        ])
        .unwrap();
        let matrix = PayoffMatrix::from_fn(3, |_, _| (1.0, 1.0));
        let state = PopulationState::initial(PerStrategy::from_vec(vec![34, 33, 33]), &registry);
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.population().values(), &[33, 33, 33]);
        assert_eq!(next.total(), 99);
    }

    #[test]
    fn test_counts_never_negative() {
        let (registry, state) = classic(30, 70);
        let matrix = PayoffMatrix::new(vec![
            vec![(-4.0, -4.0), (1.0, 1.0)],
            vec![(1.0, 1.0), (2.0, 2.0)],
        ])
        .unwrap();
        let next = ReplicatorStep::new(&registry, &matrix).next(&state);
        assert_eq!(next.count(StrategyId(0)), 0);
        assert!(next.count(StrategyId(1)) > 0);
    }
}
