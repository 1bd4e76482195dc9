//! Iterated games between strategy behaviors
//!
//! Matches produce [`GameResult`]s tagged with the two strategies that
//! played them. A round-robin tournament also yields the average per-round
//! payoff of every pairing, which can drive the replicator as a
//! [`PayoffMatrix`].
//!
//! ## Noise
//!
//! With probability `noise` an intended move is flipped before it is played.
//! Behaviors react to the moves actually played, not the intended ones.

use equilibria_common::{
    Behavior, GameResult, Move, MovePayoffs, PayoffMatrix, StrategyId, StrategyRegistry,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Parameters shared by every match of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Rounds per match
    pub rounds: u32,
    /// Probability that a move is flipped (0.0 - 1.0)
    pub noise: f64,
    /// Move payoff table
    pub payoffs: MovePayoffs,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            rounds: crate::DEFAULT_MATCH_ROUNDS,
            noise: 0.0,
            payoffs: MovePayoffs::prisoners_dilemma(),
        }
    }
}

/// Intended next move of `behavior` given the moves played so far
pub fn next_move<R: Rng + ?Sized>(
    behavior: &Behavior,
    own: &[Move],
    opponent: &[Move],
    rng: &mut R,
) -> Move {
    let last_opponent = opponent.last().copied();
    match behavior {
        Behavior::AlwaysCooperate => Move::Cooperate,
        Behavior::AlwaysDefect => Move::Defect,
        Behavior::TitForTat => last_opponent.unwrap_or(Move::Cooperate),
        Behavior::TitForTwoTats => match opponent {
            [.., Move::Defect, Move::Defect] => Move::Defect,
            _ => Move::Cooperate,
        },
        Behavior::GenerousTitForTat { generosity } => match last_opponent {
            Some(Move::Defect) if !rng.gen_bool(generosity.clamp(0.0, 1.0)) => Move::Defect,
            _ => Move::Cooperate,
        },
        Behavior::Grudger => {
            if opponent.contains(&Move::Defect) {
                Move::Defect
            } else {
                Move::Cooperate
            }
        }
        // win-stay, lose-shift: cooperate after matching moves
        Behavior::Pavlov => match (own.last(), last_opponent) {
            (Some(mine), Some(theirs)) if *mine != theirs => Move::Defect,
            _ => Move::Cooperate,
        },
        Behavior::Random {
            cooperate_probability,
        } => {
            if rng.gen_bool(cooperate_probability.clamp(0.0, 1.0)) {
                Move::Cooperate
            } else {
                Move::Defect
            }
        }
    }
}

fn apply_noise<R: Rng + ?Sized>(intended: Move, noise: f64, rng: &mut R) -> Move {
    if noise > 0.0 && rng.gen_bool(noise.min(1.0)) {
        intended.flipped()
    } else {
        intended
    }
}

/// Play one iterated match between two strategies
pub fn play_match<R: Rng + ?Sized>(
    registry: &StrategyRegistry,
    player1: StrategyId,
    player2: StrategyId,
    config: &MatchConfig,
    rng: &mut R,
) -> Vec<GameResult> {
    let behavior1 = registry[player1].behavior;
    let behavior2 = registry[player2].behavior;
    let rounds = config.rounds as usize;

    let mut moves1: Vec<Move> = Vec::with_capacity(rounds);
    let mut moves2: Vec<Move> = Vec::with_capacity(rounds);
    let mut results = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        let intended1 = next_move(&behavior1, &moves1, &moves2, rng);
        let intended2 = next_move(&behavior2, &moves2, &moves1, rng);
        let played1 = apply_noise(intended1, config.noise, rng);
        let played2 = apply_noise(intended2, config.noise, rng);

        moves1.push(played1);
        moves2.push(played2);
        results.push(
            GameResult::scored(played1, played2, &config.payoffs).with_players(player1, player2),
        );
    }

    results
}

/// Ranking entry of a tournament
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub strategy: StrategyId,
    pub total_score: f64,
    pub rounds_played: u64,
    pub average_score: f64,
}

/// Everything a round-robin produced
#[derive(Debug, Clone, Serialize)]
pub struct TournamentReport {
    /// Every round of every match, in play order
    pub results: Vec<GameResult>,
    /// Strategies ranked by average score per round, best first
    pub standings: Vec<Standing>,
    /// Average per-round payoff of each pairing
    pub matrix: PayoffMatrix,
}

impl TournamentReport {
    /// Rounds played by a given pairing, in either seat order
    pub fn results_between(&self, a: StrategyId, b: StrategyId) -> Vec<GameResult> {
        self.results
            .iter()
            .filter(|r| match r.players {
                Some(pair) => pair == (a, b) || pair == (b, a),
                None => false,
            })
            .copied()
            .collect()
    }

    pub fn winner(&self) -> Option<StrategyId> {
        self.standings.first().map(|s| s.strategy)
    }
}

/// Round-robin over every registered strategy, self-play included
#[derive(Debug, Clone)]
pub struct Tournament<'a> {
    registry: &'a StrategyRegistry,
    config: MatchConfig,
}

impl<'a> Tournament<'a> {
    pub fn new(registry: &'a StrategyRegistry, config: MatchConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Play each unordered pairing once
    pub fn round_robin<R: Rng + ?Sized>(&self, rng: &mut R) -> TournamentReport {
        let n = self.registry.len();
        let mut results = Vec::new();
        let mut pair_scores = vec![0.0f64; n * n];
        let mut pair_rounds = vec![0u64; n * n];

        for a in self.registry.ids() {
            for b in self.registry.ids().filter(|b| *b >= a) {
                let played = play_match(self.registry, a, b, &self.config, rng);
                for round in &played {
                    pair_scores[a.0 * n + b.0] += round.player1_score;
                    pair_rounds[a.0 * n + b.0] += 1;
                    if a != b {
                        pair_scores[b.0 * n + a.0] += round.player2_score;
                        pair_rounds[b.0 * n + a.0] += 1;
                    }
                }
                debug!(player1 = %a, player2 = %b, rounds = played.len(), "match played");
                results.extend(played);
            }
        }

        let average = |own: StrategyId, opp: StrategyId| {
            let idx = own.0 * n + opp.0;
            if pair_rounds[idx] == 0 {
                0.0
            } else {
                pair_scores[idx] / pair_rounds[idx] as f64
            }
        };
        let matrix = PayoffMatrix::from_fn(n, |own, opp| (average(own, opp), average(opp, own)));
        let standings = Self::standings(self.registry, &results);

        info!(
            strategies = n,
            rounds = results.len(),
            noise = self.config.noise,
            "tournament finished"
        );

        TournamentReport {
            results,
            standings,
            matrix,
        }
    }

    fn standings(registry: &StrategyRegistry, results: &[GameResult]) -> Vec<Standing> {
        let mut totals = vec![(0.0f64, 0u64); registry.len()];
        for round in results {
            if let Some((p1, p2)) = round.players {
                totals[p1.0].0 += round.player1_score;
                totals[p1.0].1 += 1;
                totals[p2.0].0 += round.player2_score;
                totals[p2.0].1 += 1;
            }
        }

        let mut standings: Vec<Standing> = registry
            .ids()
            .map(|id| {
                let (total_score, rounds_played) = totals[id.0];
                Standing {
                    strategy: id,
                    total_score,
                    rounds_played,
                    average_score: if rounds_played == 0 {
                        0.0
                    } else {
                        total_score / rounds_played as f64
                    },
                }
            })
            .collect();
        standings.sort_by(|a, b| b.average_score.total_cmp(&a.average_score));
        standings
    }
}
