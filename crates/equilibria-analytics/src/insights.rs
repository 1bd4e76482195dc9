//! Plain-language summary lines for a finished run

use equilibria_common::{PerStrategy, StrategyId, StrategyRegistry, DOMINANCE_SHARE};
use equilibria_evolution::PopulationState;

use crate::dynamics::{evolutionary_stability, strategy_effectiveness};
use crate::events::{detect_significant_events, EventKind};

/// Cooperation changes smaller than this read as "held steady"
const STEADY_COOPERATION_DELTA: f64 = 0.005;

/// Whole percent, halves rounded up
fn percent(share: f64) -> String {
    format!("{}%", (share * 100.0).round() as i64)
}

fn best(scores: &PerStrategy<f64>) -> Option<(StrategyId, f64)> {
    scores
        .iter()
        .filter(|(_, score)| **score > 0.0)
        .fold(None, |best: Option<(StrategyId, f64)>, (id, &score)| match best {
            Some((_, top)) if top >= score => best,
            _ => Some((id, score)),
        })
}

/// Summary lines describing how the population evolved
///
/// Empty for an empty history.
pub fn generate_evolution_insights(
    history: &[PopulationState],
    strategies: &StrategyRegistry,
) -> Vec<String> {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return Vec::new();
    };
    let mut insights = Vec::new();

    match last.leader().filter(|_| last.total() > 0) {
        Some(leader) => {
            let share = last.share(leader);
            let verb = if share >= DOMINANCE_SHARE {
                "dominates"
            } else {
                "leads"
            };
            insights.push(format!(
                "{} {} the final population with {} of individuals",
                strategies.name_of(leader),
                verb,
                percent(share)
            ));
        }
        None => insights.push("The population died out".to_string()),
    }

    let extinct: Vec<String> = strategies
        .ids()
        .filter(|&id| first.count(id) > 0 && last.count(id) == 0)
        .map(|id| strategies.name_of(id))
        .collect();
    if !extinct.is_empty() {
        insights.push(format!("{} went extinct", extinct.join(", ")));
    }

    if history.len() >= 2 {
        let (start, end) = (first.cooperation_rate(), last.cooperation_rate());
        let line = if (end - start).abs() < STEADY_COOPERATION_DELTA {
            format!("Cooperation held steady at {}", percent(end))
        } else if end > start {
            format!("Cooperation rose from {} to {}", percent(start), percent(end))
        } else {
            format!("Cooperation fell from {} to {}", percent(start), percent(end))
        };
        insights.push(line);
    }

    if let Some((id, growth)) = best(&strategy_effectiveness(history, strategies)) {
        insights.push(format!(
            "{} grew fastest, averaging {:+.1}% per generation",
            strategies.name_of(id),
            growth * 100.0
        ));
    }

    if let Some((id, score)) = best(&evolutionary_stability(history, strategies)) {
        insights.push(format!(
            "{} was the most stable strategy (stability score {:.2})",
            strategies.name_of(id),
            score
        ));
    }

    let shifts = detect_significant_events(history, strategies)
        .iter()
        .filter(|e| e.kind == EventKind::Dominance)
        .count();
    match shifts {
        0 => {}
        1 => insights.push("Dominance changed hands once".to_string()),
        n => insights.push(format!("Dominance changed hands {} times", n)),
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_reports_dominant_share() {
        let (registry, states) = history(&[(55, 45), (35, 65), (20, 80)]);
        let insights = generate_evolution_insights(&states, &registry);
        assert_eq!(
            insights[0],
            "Defectors dominates the final population with 80% of individuals"
        );
        assert!(insights.contains(&"Cooperation fell from 55% to 20%".to_string()));
        assert!(insights.iter().any(|l| l.starts_with("Defectors grew fastest")));
        assert!(insights.contains(&"Dominance changed hands once".to_string()));
    }

    #[test]
    fn test_percent_rounds_halves_up() {
        assert_eq!(percent(0.125), "13%");
        assert_eq!(percent(0.625), "63%");
        assert_eq!(percent(0.8), "80%");
        assert_eq!(percent(0.0), "0%");

        // 1 of 8 cooperating
        let (registry, states) = history(&[(1, 7), (1, 7)]);
        let insights = generate_evolution_insights(&states, &registry);
        assert!(insights.contains(&"Cooperation held steady at 13%".to_string()));
    }

    #[test]
    fn test_reports_extinction() {
        let (registry, states) = history(&[(10, 90), (0, 100)]);
        let insights = generate_evolution_insights(&states, &registry);
        assert!(insights.contains(&"Cooperators went extinct".to_string()));
    }

    #[test]
    fn test_leading_without_majority() {
        let registry = StrategyRegistry::axelrod();
        let mut counts = PerStrategy::filled(&registry, 10u64);
        counts[StrategyId(2)] = 40;
        let states = vec![PopulationState::initial(counts, &registry)];

        let insights = generate_evolution_insights(&states, &registry);
        assert_eq!(insights.len(), 1);
        // 40 of 110
        assert_eq!(
            insights[0],
            "Tit for Tat leads the final population with 36% of individuals"
        );
    }

    #[test]
    fn test_steady_cooperation_and_stability() {
        let (registry, states) = history(&[(50, 50), (52, 48), (50, 50), (48, 52), (50, 50)]);
        let insights = generate_evolution_insights(&states, &registry);
        assert!(insights.contains(&"Cooperation held steady at 50%".to_string()));
        assert!(insights.iter().any(|l| l.contains("most stable")));
    }

    #[test]
    fn test_empty_inputs() {
        let registry = StrategyRegistry::classic();
        assert!(generate_evolution_insights(&[], &registry).is_empty());

        let (registry, states) = history(&[(0, 0)]);
        assert_eq!(
            generate_evolution_insights(&states, &registry),
            vec!["The population died out".to_string()]
        );
    }
}
