//! # Equilibria Analytics
//!
//! Pure, deterministic metrics over game results and generation histories.
//!
//! ## Metrics
//!
//! - [`rates`]: cooperation, mutual cooperation/defection, exploitation
//! - [`dynamics`]: strategy effectiveness, evolutionary stability, noise impact
//! - [`events`]: extinction / emergence / dominance detection
//! - [`insights`]: summary lines for a finished run
//!
//! Empty or undersized input never fails: every function degrades to a
//! neutral value (0, an all-zero mapping, or an empty list).

pub mod dynamics;
pub mod events;
pub mod insights;
pub mod rates;

use chrono::{DateTime, Utc};
use equilibria_common::{GameResult, StrategyRegistry};
use equilibria_evolution::PopulationState;
use serde::Serialize;
use tracing::{debug, instrument};

pub use dynamics::{evolutionary_stability, noise_impact, strategy_effectiveness};
pub use events::{detect_significant_events, EventKind, SignificantEvent};
pub use insights::generate_evolution_insights;
pub use rates::{
    cooperation_rate, exploitation_rate, mean_total_score, mutual_cooperation_rate,
    mutual_defection_rate, RoundSummary,
};

/// Per-strategy row of an [`EvolutionReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyMetrics {
    pub key: String,
    pub name: String,
    pub color: String,
    pub final_count: u64,
    pub final_share: f64,
    pub effectiveness: f64,
    pub stability: f64,
}

/// Everything the analytics layer derives from one run
#[derive(Debug, Clone, Serialize)]
pub struct EvolutionReport {
    pub generated_at: DateTime<Utc>,
    pub generations: usize,
    pub final_cooperation_rate: f64,
    pub strategies: Vec<StrategyMetrics>,
    pub events: Vec<SignificantEvent>,
    pub insights: Vec<String>,
    /// Round-level rates, when game results were supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rounds: Option<RoundSummary>,
}

/// Entry point bundling the individual metric functions
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    /// Round-level summary of a result set
    pub fn summarize_rounds(results: &[GameResult]) -> RoundSummary {
        RoundSummary::from_results(results)
    }

    /// Full report over a generation history
    #[instrument(skip_all, fields(generations = history.len()))]
    pub fn evolution_report(
        history: &[PopulationState],
        strategies: &StrategyRegistry,
    ) -> EvolutionReport {
        let effectiveness = strategy_effectiveness(history, strategies);
        let stability = evolutionary_stability(history, strategies);
        let events = detect_significant_events(history, strategies);
        let insights = generate_evolution_insights(history, strategies);
        let last = history.last();

        let rows = strategies
            .iter()
            .map(|(id, strategy)| StrategyMetrics {
                key: strategy.key.clone(),
                name: strategy.name.clone(),
                color: strategy.color.clone(),
                final_count: last.map(|s| s.count(id)).unwrap_or(0),
                final_share: last.map(|s| s.share(id)).unwrap_or(0.0),
                effectiveness: effectiveness[id],
                stability: stability[id],
            })
            .collect();

        debug!(events = events.len(), insights = insights.len(), "evolution report built");

        EvolutionReport {
            generated_at: Utc::now(),
            generations: history.len(),
            final_cooperation_rate: last.map(|s| s.cooperation_rate()).unwrap_or(0.0),
            strategies: rows,
            events,
            insights,
            rounds: None,
        }
    }

    /// Report over a history plus the game results played alongside it
    pub fn evolution_report_with_rounds(
        history: &[PopulationState],
        strategies: &StrategyRegistry,
        results: &[GameResult],
    ) -> EvolutionReport {
        let mut report = Self::evolution_report(history, strategies);
        report.rounds = Some(Self::summarize_rounds(results));
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equilibria_common::{Move, MovePayoffs, PerStrategy};

    fn states(series: &[(u64, u64)], registry: &StrategyRegistry) -> Vec<PopulationState> {
        series
            .iter()
            .enumerate()
            .map(|(generation, &(c, d))| {
                PopulationState::new(generation as u64, PerStrategy::from_vec(vec![c, d]), registry)
            })
            .collect()
    }

    #[test]
    fn test_report_rows_follow_registry() {
        let registry = StrategyRegistry::classic();
        let history = states(&[(50, 50), (33, 67), (29, 71)], &registry);
        let report = AnalyticsEngine::evolution_report(&history, &registry);

        assert_eq!(report.generations, 3);
        assert_eq!(report.strategies.len(), 2);
        assert_eq!(report.strategies[1].key, "defectors");
        assert_eq!(report.strategies[1].final_count, 71);
        assert!((report.final_cooperation_rate - 0.29).abs() < 1e-12);
        assert!(report.rounds.is_none());
        assert!(!report.insights.is_empty());
    }

    #[test]
    fn test_empty_history_report() {
        let registry = StrategyRegistry::classic();
        let report = AnalyticsEngine::evolution_report(&[], &registry);
        assert_eq!(report.generations, 0);
        assert_eq!(report.final_cooperation_rate, 0.0);
        assert!(report.events.is_empty());
        assert!(report.insights.is_empty());
        assert!(report.strategies.iter().all(|s| s.final_count == 0));
    }

    #[test]
    fn test_report_serializes() {
        let registry = StrategyRegistry::classic();
        let history = states(&[(0, 90), (10, 90)], &registry);
        let results = vec![GameResult::scored(
            Move::Cooperate,
            Move::Defect,
            &MovePayoffs::prisoners_dilemma(),
        )];
        let report = AnalyticsEngine::evolution_report_with_rounds(&history, &registry, &results);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["events"][0]["kind"], "emergence");
        assert_eq!(json["events"][0]["strategy"], 0);
        assert_eq!(json["rounds"]["exploitation_rate"], 1.0);
    }
}
