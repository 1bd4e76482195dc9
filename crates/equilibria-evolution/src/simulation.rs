//! Simulation driver: owns the run inputs and its generation history

use equilibria_common::{PayoffMatrix, Result, StrategyRegistry};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::history::GenerationHistory;
use crate::population::PopulationState;
use crate::replicator::ReplicatorStep;
use crate::SimulationConfig;

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The requested number of generations was produced
    GenerationLimit,
    /// Two consecutive generations had identical counts
    Stable,
}

/// Outcome of [`Simulation::run_until_stable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Generations produced by this call
    pub steps: u64,
    pub reason: StopReason,
}

/// One evolutionary run over a fixed registry and payoff matrix
#[derive(Debug, Clone)]
pub struct Simulation {
    run_id: Uuid,
    registry: StrategyRegistry,
    matrix: PayoffMatrix,
    config: SimulationConfig,
    history: GenerationHistory,
}

impl Simulation {
    /// Create a run; the matrix and initial population must match the registry
    pub fn new(
        registry: StrategyRegistry,
        matrix: PayoffMatrix,
        initial: PopulationState,
        config: SimulationConfig,
    ) -> Result<Self> {
        matrix.check_registry(&registry)?;
        initial.check_registry(&registry)?;

        let run_id = Uuid::now_v7();
        info!(
            %run_id,
            strategies = registry.len(),
            population = initial.total(),
            rule = ?config.rule,
            "simulation created"
        );

        Ok(Self {
            run_id,
            registry,
            matrix,
            config,
            history: GenerationHistory::new(initial),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn matrix(&self) -> &PayoffMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    pub fn into_history(self) -> GenerationHistory {
        self.history
    }

    pub fn latest(&self) -> &PopulationState {
        self.history.latest()
    }

    /// Advance one generation and return it
    pub fn step(&mut self) -> Result<&PopulationState> {
        let next = ReplicatorStep::new(&self.registry, &self.matrix)
            .with_rule(self.config.rule)
            .next(self.history.latest());
        self.history.push(next)?;
        Ok(self.history.latest())
    }

    /// Advance `generations` times
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run(&mut self, generations: u64) -> Result<&GenerationHistory> {
        for _ in 0..generations {
            self.step()?;
        }
        info!(
            generation = self.latest().generation(),
            cooperation_rate = self.latest().cooperation_rate(),
            "run finished"
        );
        Ok(&self.history)
    }

    /// Whether the last step left every count unchanged
    pub fn is_stable(&self) -> bool {
        match self.history.as_slice() {
            [.., previous, latest] => latest.same_composition(previous),
            _ => false,
        }
    }

    /// Advance until the population stops changing or `max_generations` steps ran
    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub fn run_until_stable(&mut self, max_generations: u64) -> Result<RunSummary> {
        let mut steps = 0;
        while steps < max_generations {
            self.step()?;
            steps += 1;
            if self.is_stable() {
                info!(
                    steps,
                    generation = self.latest().generation(),
                    "population stable"
                );
                return Ok(RunSummary {
                    steps,
                    reason: StopReason::Stable,
                });
            }
        }
        Ok(RunSummary {
            steps,
            reason: StopReason::GenerationLimit,
        })
    }

    /// Run with the configured generation limit and stability setting
    pub fn run_configured(&mut self) -> Result<RunSummary> {
        if self.config.stop_when_stable {
            self.run_until_stable(self.config.max_generations)
        } else {
            let steps = self.config.max_generations;
            self.run(steps)?;
            Ok(RunSummary {
                steps,
                reason: StopReason::GenerationLimit,
            })
        }
    }

    /// Discard every generation after the initial one
    pub fn reset(&mut self) {
        self.history.truncate_to_initial();
        info!(run_id = %self.run_id, "simulation reset");
    }
}
