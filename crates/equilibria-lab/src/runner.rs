//! Timed generation loop

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use equilibria_analytics::{noise_impact, AnalyticsEngine, EvolutionReport};
use equilibria_common::{PerStrategy, Result, StrategyRegistry};
use equilibria_evolution::{ReplicatorRule, Simulation, SimulationConfig};
use serde::Serialize;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{LabConfig, Scenario};
use crate::scenario::{ScenarioSetup, TournamentPair};

/// Why the lab loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    GenerationLimit,
    Stable,
    Interrupted,
}

/// Tournament outcome attached to a line-up run
#[derive(Debug, Clone, Serialize)]
pub struct TournamentSummary {
    pub rounds_per_match: u32,
    pub noise: f64,
    /// Highest average score without noise
    pub winner: Option<String>,
    pub noisy_winner: Option<String>,
    /// Relative change in mean round score caused by noise, per strategy key
    pub noise_impact: BTreeMap<String, f64>,
}

/// Payoff structure of the matrix the run evolved under
#[derive(Debug, Clone, Serialize)]
pub struct EquilibriumSummary {
    /// Pure Nash equilibria as (row, column) strategy keys
    pub pure_nash: Vec<(String, String)>,
    pub dominant_strategy: Option<String>,
}

/// JSON document printed at the end of a lab run
#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub run_id: Uuid,
    pub scenario: Scenario,
    pub rule: ReplicatorRule,
    pub steps: u64,
    pub stop: StopCause,
    pub final_generation: u64,
    pub final_population: BTreeMap<String, u64>,
    pub equilibrium: EquilibriumSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tournament: Option<TournamentSummary>,
    pub evolution: EvolutionReport,
}

fn keyed<T: Copy>(registry: &StrategyRegistry, values: &PerStrategy<T>) -> BTreeMap<String, T> {
    registry
        .iter()
        .map(|(id, strategy)| (strategy.key.clone(), values[id]))
        .collect()
}

fn key_of(registry: &StrategyRegistry, id: equilibria_common::StrategyId) -> String {
    registry
        .get(id)
        .map(|s| s.key.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Drives a [`Simulation`] one generation per tick
pub struct LabRunner {
    scenario: Scenario,
    tick: Duration,
    simulation: Simulation,
    tournaments: Option<TournamentPair>,
}

impl LabRunner {
    pub fn new(config: &LabConfig) -> Result<Self> {
        let setup = ScenarioSetup::from_config(config)?;
        let simulation = Simulation::new(
            setup.registry,
            setup.matrix,
            setup.initial,
            SimulationConfig {
                rule: config.simulation.rule,
                max_generations: config.simulation.generations,
                stop_when_stable: config.simulation.stop_when_stable,
            },
        )?;

        Ok(Self {
            scenario: config.population.scenario,
            tick: Duration::from_millis(config.simulation.tick_ms),
            simulation,
            tournaments: setup.tournaments,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Step once per tick until the generation limit, stability or `shutdown`
    pub async fn run<F>(mut self, shutdown: F) -> Result<LabReport>
    where
        F: Future<Output = ()>,
    {
        let limit = self.simulation.config().max_generations;
        let stop_when_stable = self.simulation.config().stop_when_stable;

        let mut interval = time::interval(self.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(
            run_id = %self.simulation.run_id(),
            limit,
            tick_ms = self.tick.as_millis() as u64,
            "lab run started"
        );

        let mut steps = 0u64;
        let stop = loop {
            if steps >= limit {
                break StopCause::GenerationLimit;
            }
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Received shutdown signal");
                    break StopCause::Interrupted;
                }
                _ = interval.tick() => {
                    let state = self.simulation.step()?;
                    steps += 1;
                    debug!(
                        generation = state.generation(),
                        cooperation_rate = state.cooperation_rate(),
                        population = state.total(),
                        "generation"
                    );
                    if stop_when_stable && self.simulation.is_stable() {
                        break StopCause::Stable;
                    }
                }
            }
        };

        info!(steps, stop = ?stop, "lab run finished");
        Ok(self.report(steps, stop))
    }

    fn report(&self, steps: u64, stop: StopCause) -> LabReport {
        let registry = self.simulation.registry();
        let matrix = self.simulation.matrix();
        let history = self.simulation.history();
        let latest = self.simulation.latest();

        let (evolution, tournament) = match &self.tournaments {
            Some(pair) => {
                let impact = noise_impact(&pair.noisy.results, &pair.clean.results, registry);
                (
                    AnalyticsEngine::evolution_report_with_rounds(
                        history,
                        registry,
                        &pair.clean.results,
                    ),
                    Some(TournamentSummary {
                        rounds_per_match: pair.rounds,
                        noise: pair.noise,
                        winner: pair.clean.winner().map(|id| key_of(registry, id)),
                        noisy_winner: pair.noisy.winner().map(|id| key_of(registry, id)),
                        noise_impact: keyed(registry, &impact),
                    }),
                )
            }
            None => (AnalyticsEngine::evolution_report(history, registry), None),
        };

        LabReport {
            run_id: self.simulation.run_id(),
            scenario: self.scenario,
            rule: self.simulation.config().rule,
            steps,
            stop,
            final_generation: latest.generation(),
            final_population: keyed(registry, latest.population()),
            equilibrium: EquilibriumSummary {
                pure_nash: matrix
                    .pure_nash_equilibria()
                    .into_iter()
                    .map(|(row, col)| (key_of(registry, row), key_of(registry, col)))
                    .collect(),
                dominant_strategy: matrix.dominant_strategy().map(|id| key_of(registry, id)),
            },
            tournament,
            evolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> LabConfig {
        let mut config = LabConfig::default();
        config.simulation.tick_ms = 10;
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_classic_run_settles() {
        let runner = LabRunner::new(&fast_config()).unwrap();
        let report = runner.run(std::future::pending()).await.unwrap();

        assert_eq!(report.stop, StopCause::Stable);
        assert_eq!(report.final_population["cooperators"], 29);
        assert_eq!(report.final_population["defectors"], 71);
        assert_eq!(report.final_generation, report.steps);
        assert_eq!(report.equilibrium.dominant_strategy.as_deref(), Some("defectors"));
        assert_eq!(
            report.equilibrium.pure_nash,
            vec![("defectors".to_string(), "defectors".to_string())]
        );
        assert!(report.tournament.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_generation_limit() {
        let mut config = fast_config();
        config.simulation.generations = 3;
        config.simulation.stop_when_stable = false;

        let report = LabRunner::new(&config)
            .unwrap()
            .run(std::future::pending())
            .await
            .unwrap();
        assert_eq!(report.stop, StopCause::GenerationLimit);
        assert_eq!(report.steps, 3);
        assert_eq!(report.evolution.generations, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_interrupts() {
        let mut config = fast_config();
        config.simulation.stop_when_stable = false;
        config.simulation.generations = 1_000;

        let report = LabRunner::new(&config)
            .unwrap()
            .run(time::sleep(Duration::from_millis(55)))
            .await
            .unwrap();
        assert_eq!(report.stop, StopCause::Interrupted);
        assert!(report.steps > 0 && report.steps < 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lineup_reports_tournament() {
        let mut config = fast_config();
        config.population.scenario = Scenario::Lineup;
        config.tournament.rounds = 20;
        config.simulation.generations = 5;

        let report = LabRunner::new(&config)
            .unwrap()
            .run(std::future::pending())
            .await
            .unwrap();

        let tournament = report.tournament.unwrap();
        assert_eq!(tournament.rounds_per_match, 20);
        assert_eq!(tournament.noise_impact.len(), 8);
        assert!(report.evolution.rounds.is_some());
        assert_eq!(report.final_population.len(), 8);
    }
}
