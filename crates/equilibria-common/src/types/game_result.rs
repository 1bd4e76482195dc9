//! GameResult - One pairwise round of a two-action game

use serde::{Deserialize, Serialize};

use super::payoff::MovePayoffs;
use super::strategy::{Move, StrategyId};

/// Record of a single round, read-only once created
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub player1_move: Move,
    pub player2_move: Move,
    pub player1_score: f64,
    pub player2_score: f64,
    /// Strategies behind player 1 and player 2, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<(StrategyId, StrategyId)>,
}

impl GameResult {
    pub fn new(
        player1_move: Move,
        player2_move: Move,
        player1_score: f64,
        player2_score: f64,
    ) -> Self {
        Self {
            player1_move,
            player2_move,
            player1_score,
            player2_score,
            players: None,
        }
    }

    /// Score a pair of moves against a payoff table
    pub fn scored(player1_move: Move, player2_move: Move, payoffs: &MovePayoffs) -> Self {
        let (s1, s2) = payoffs.score(player1_move, player2_move);
        Self::new(player1_move, player2_move, s1, s2)
    }

    /// Tag the round with the strategies that played it
    pub fn with_players(mut self, player1: StrategyId, player2: StrategyId) -> Self {
        self.players = Some((player1, player2));
        self
    }

    /// Combined score of both players
    #[inline]
    pub fn total_score(&self) -> f64 {
        self.player1_score + self.player2_score
    }

    /// Number of cooperate moves in the round (0-2)
    #[inline]
    pub fn cooperate_moves(&self) -> u32 {
        self.player1_move.is_cooperate() as u32 + self.player2_move.is_cooperate() as u32
    }

    #[inline]
    pub fn is_mutual_cooperation(&self) -> bool {
        self.cooperate_moves() == 2
    }

    #[inline]
    pub fn is_mutual_defection(&self) -> bool {
        self.cooperate_moves() == 0
    }

    /// Exactly one player cooperated
    #[inline]
    pub fn is_exploitation(&self) -> bool {
        self.cooperate_moves() == 1
    }
}
