//! Scenario assembly: registry, payoff matrix and initial population

use equilibria_common::{PayoffMatrix, PerStrategy, Result, StrategyRegistry};
use equilibria_evolution::{MatchConfig, PopulationState, Tournament, TournamentReport};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::{LabConfig, Scenario, DEFAULT_STRATEGY_COUNT};

/// Clean and noisy round-robins played with the same seed
#[derive(Debug, Clone)]
pub struct TournamentPair {
    pub rounds: u32,
    /// Flip probability of the noisy run
    pub noise: f64,
    pub clean: TournamentReport,
    pub noisy: TournamentReport,
}

/// Inputs of one lab run
#[derive(Debug, Clone)]
pub struct ScenarioSetup {
    pub registry: StrategyRegistry,
    pub matrix: PayoffMatrix,
    pub initial: PopulationState,
    /// Present for the line-up scenario
    pub tournaments: Option<TournamentPair>,
}

impl ScenarioSetup {
    pub fn from_config(config: &LabConfig) -> Result<Self> {
        let scenario = config.population.scenario;
        let registry = match scenario {
            Scenario::Classic => StrategyRegistry::classic(),
            Scenario::Lineup => StrategyRegistry::axelrod(),
        };
        let initial = initial_population(config, &registry)?;

        let (matrix, tournaments) = match scenario {
            Scenario::Classic => (PayoffMatrix::from_moves(&registry, &config.payoff), None),
            Scenario::Lineup => {
                let clean = MatchConfig {
                    rounds: config.tournament.rounds,
                    noise: 0.0,
                    payoffs: config.payoff,
                };
                let noisy = MatchConfig {
                    noise: config.tournament.noise,
                    ..clean
                };
                let seed = config.tournament.seed;

                let clean = Tournament::new(&registry, clean)
                    .round_robin(&mut StdRng::seed_from_u64(seed));
                let noisy = Tournament::new(&registry, noisy)
                    .round_robin(&mut StdRng::seed_from_u64(seed));
                info!(
                    winner = ?clean.winner().map(|id| registry.name_of(id)),
                    noisy_winner = ?noisy.winner().map(|id| registry.name_of(id)),
                    "tournaments played"
                );

                let pair = TournamentPair {
                    rounds: config.tournament.rounds,
                    noise: config.tournament.noise,
                    clean,
                    noisy,
                };
                (pair.clean.matrix.clone(), Some(pair))
            }
        };

        Ok(Self {
            registry,
            matrix,
            initial,
            tournaments,
        })
    }
}

fn initial_population(config: &LabConfig, registry: &StrategyRegistry) -> Result<PopulationState> {
    let counts = &config.population.counts;
    if counts.is_empty() {
        return Ok(PopulationState::initial(
            PerStrategy::filled(registry, DEFAULT_STRATEGY_COUNT),
            registry,
        ));
    }

    let mut population = PerStrategy::filled(registry, 0u64);
    for (key, count) in counts {
        population[registry.resolve(key)?] = *count;
    }
    Ok(PopulationState::initial(population, registry))
}
