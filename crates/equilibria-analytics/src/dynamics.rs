//! Per-strategy metrics over a generation history
//!
//! ## Stability
//!
//! ```text
//! cv        = σ / μ        (population standard deviation of the count series)
//! stability = 1 / cv       (0 when cv is 0)
//! ```
//!
//! A perfectly flat series has cv = 0 and therefore scores 0, the same as a
//! strategy that never existed.

use equilibria_common::{
    GameResult, PerStrategy, StrategyRegistry, MIN_EFFECTIVENESS_SAMPLES, MIN_STABILITY_SAMPLES,
};
use equilibria_evolution::PopulationState;

use crate::rates::mean_total_score;

/// Mean per-step relative growth `(cur - prev) / prev` of each strategy
///
/// Steps starting from a zero count are skipped; a strategy with no usable
/// step scores 0. All zero for fewer than two generations.
pub fn strategy_effectiveness(
    history: &[PopulationState],
    strategies: &StrategyRegistry,
) -> PerStrategy<f64> {
    if history.len() < MIN_EFFECTIVENESS_SAMPLES {
        return PerStrategy::filled(strategies, 0.0);
    }

    PerStrategy::from_fn(strategies, |id| {
        let (sum, steps) = history
            .windows(2)
            .filter_map(|pair| {
                let prev = pair[0].count(id);
                let cur = pair[1].count(id);
                (prev > 0).then(|| (cur as f64 - prev as f64) / prev as f64)
            })
            .fold((0.0, 0u64), |(sum, steps), growth| (sum + growth, steps + 1));

        if steps == 0 {
            0.0
        } else {
            sum / steps as f64
        }
    })
}

/// Inverse coefficient of variation of each strategy's count series
///
/// All zero for fewer than five generations.
pub fn evolutionary_stability(
    history: &[PopulationState],
    strategies: &StrategyRegistry,
) -> PerStrategy<f64> {
    if history.len() < MIN_STABILITY_SAMPLES {
        return PerStrategy::filled(strategies, 0.0);
    }

    let n = history.len() as f64;
    PerStrategy::from_fn(strategies, |id| {
        let mean = history.iter().map(|s| s.count(id) as f64).sum::<f64>() / n;
        if mean <= 0.0 {
            return 0.0;
        }
        let variance = history
            .iter()
            .map(|s| (s.count(id) as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        let cv = variance.sqrt() / mean;

        if cv > 0.0 {
            1.0 / cv
        } else {
            0.0
        }
    })
}

/// Relative change in mean total score per round caused by noise
///
/// `(mean_noisy - mean_clean) / mean_clean`. Impact is not attributed per
/// strategy: every strategy receives the same population-wide value. All
/// zero when either set is empty or the clean mean is zero.
pub fn noise_impact(
    noisy: &[GameResult],
    clean: &[GameResult],
    strategies: &StrategyRegistry,
) -> PerStrategy<f64> {
    if noisy.is_empty() || clean.is_empty() {
        return PerStrategy::filled(strategies, 0.0);
    }

    let mean_clean = mean_total_score(clean);
    if mean_clean == 0.0 {
        return PerStrategy::filled(strategies, 0.0);
    }
    let impact = (mean_total_score(noisy) - mean_clean) / mean_clean;

    PerStrategy::filled(strategies, impact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use equilibria_common::{Move, MovePayoffs, StrategyId};

    fn history(series: &[(u64, u64)]) -> (StrategyRegistry, Vec<PopulationState>) {
        let registry = StrategyRegistry::classic();
        let states = series
            .iter()
            .enumerate()
            .map(|(generation, &(c, d))| {
                PopulationState::new(
                    generation as u64,
                    PerStrategy::from_vec(vec![c, d]),
                    &registry,
                )
            })
            .collect();
        (registry, states)
    }

    #[test]
    fn test_effectiveness_needs_two_generations() {
        let (registry, states) = history(&[(50, 50)]);
        let scores = strategy_effectiveness(&states, &registry);
        assert_eq!(scores.values(), &[0.0, 0.0]);

        let scores = strategy_effectiveness(&[], &registry);
        assert_eq!(scores.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_effectiveness_averages_growth() {
        // cooperators: -0.5 then -0.5; defectors: +0.5 then +1/3
        let (registry, states) = history(&[(40, 60), (20, 90), (10, 120)]);
        let scores = strategy_effectiveness(&states, &registry);
        assert!((scores[StrategyId(0)] + 0.5).abs() < 1e-12);
        assert!((scores[StrategyId(1)] - (0.5 + 1.0 / 3.0) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_effectiveness_skips_steps_from_zero() {
        // 0 -> 10 is skipped, 10 -> 20 counts
        let (registry, states) = history(&[(0, 10), (10, 10), (20, 10)]);
        let scores = strategy_effectiveness(&states, &registry);
        assert!((scores[StrategyId(0)] - 1.0).abs() < 1e-12);
        assert_eq!(scores[StrategyId(1)], 0.0);

        let (registry, states) = history(&[(0, 10), (0, 10)]);
        assert_eq!(strategy_effectiveness(&states, &registry)[StrategyId(0)], 0.0);
    }

    #[test]
    fn test_stability_needs_five_generations() {
        let (registry, states) = history(&[(10, 90), (20, 80), (30, 70), (40, 60)]);
        let scores = evolutionary_stability(&states, &registry);
        assert_eq!(scores.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_stability_is_inverse_cv() {
        // cooperators 10,20,30,40,50: mean 30, population sd = sqrt(200)
        let (registry, states) =
            history(&[(10, 90), (20, 80), (30, 70), (40, 60), (50, 50)]);
        let scores = evolutionary_stability(&states, &registry);
        let expected = 30.0 / 200f64.sqrt();
        assert!((scores[StrategyId(0)] - expected).abs() < 1e-9);
        // defectors: mean 70, same spread
        assert!(scores[StrategyId(1)] > scores[StrategyId(0)]);
    }

    #[test]
    fn test_flat_or_absent_series_scores_zero() {
        let (registry, states) = history(&[(0, 50); 6]);
        let scores = evolutionary_stability(&states, &registry);
        assert_eq!(scores.values(), &[0.0, 0.0]);
    }

    #[test]
    fn test_noise_impact_is_one_global_value() {
        let registry = StrategyRegistry::classic();
        let payoffs = MovePayoffs::prisoners_dilemma();
        let clean = vec![GameResult::scored(Move::Cooperate, Move::Cooperate, &payoffs); 4];
        let noisy = vec![
            GameResult::scored(Move::Cooperate, Move::Cooperate, &payoffs),
            GameResult::scored(Move::Defect, Move::Defect, &payoffs),
        ];

        // clean mean 6, noisy mean 4
        let impact = noise_impact(&noisy, &clean, &registry);
        assert!((impact[StrategyId(0)] + 1.0 / 3.0).abs() < 1e-12);
        // not attributed per strategy
        assert_eq!(impact[StrategyId(0)], impact[StrategyId(1)]);
    }

    #[test]
    fn test_noise_impact_empty_inputs() {
        let registry = StrategyRegistry::classic();
        let payoffs = MovePayoffs::prisoners_dilemma();
        let some = vec![GameResult::scored(Move::Defect, Move::Defect, &payoffs)];
        assert_eq!(noise_impact(&[], &some, &registry).values(), &[0.0, 0.0]);
        assert_eq!(noise_impact(&some, &[], &registry).values(), &[0.0, 0.0]);
    }
}
