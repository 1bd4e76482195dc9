//! PayoffMatrix - (own strategy, opponent strategy) -> (own payoff, opponent payoff)
//!
//! ## Prisoner's Dilemma
//!
//! ```text
//!              opponent C   opponent D
//! own C          3, 3         0, 5
//! own D          5, 0         1, 1
//! ```

use serde::{Deserialize, Serialize};

use super::strategy::{Move, StrategyId, StrategyRegistry};
use crate::error::{PayoffError, Result};

/// Payoff table of a symmetric two-action game, keyed by moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovePayoffs {
    /// Both cooperate (reward)
    pub cc: f64,
    /// Own cooperate, opponent defects (sucker)
    pub cd: f64,
    /// Own defect, opponent cooperates (temptation)
    pub dc: f64,
    /// Both defect (punishment)
    pub dd: f64,
}

impl Default for MovePayoffs {
    fn default() -> Self {
        Self::prisoners_dilemma()
    }
}

impl MovePayoffs {
    /// T=5 > R=3 > P=1 > S=0
    pub const fn prisoners_dilemma() -> Self {
        Self {
            cc: 3.0,
            cd: 0.0,
            dc: 5.0,
            dd: 1.0,
        }
    }

    /// Payoffs for (own, opponent) moves
    #[inline]
    pub fn score(&self, own: Move, opponent: Move) -> (f64, f64) {
        match (own, opponent) {
            (Move::Cooperate, Move::Cooperate) => (self.cc, self.cc),
            (Move::Cooperate, Move::Defect) => (self.cd, self.dc),
            (Move::Defect, Move::Cooperate) => (self.dc, self.cd),
            (Move::Defect, Move::Defect) => (self.dd, self.dd),
        }
    }

    /// Whether the table satisfies T > R > P > S
    pub fn is_prisoners_dilemma(&self) -> bool {
        self.dc > self.cc && self.cc > self.dd && self.dd > self.cd
    }
}

/// NxN payoff matrix over registered strategies, row-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPayoffMatrix")]
pub struct PayoffMatrix {
    size: usize,
    cells: Vec<(f64, f64)>,
}

/// Unchecked wire form of [`PayoffMatrix`]
#[derive(Deserialize)]
struct RawPayoffMatrix {
    size: usize,
    cells: Vec<(f64, f64)>,
}

impl TryFrom<RawPayoffMatrix> for PayoffMatrix {
    type Error = PayoffError;

    fn try_from(raw: RawPayoffMatrix) -> std::result::Result<Self, Self::Error> {
        let RawPayoffMatrix { size, cells } = raw;
        if size.checked_mul(size) != Some(cells.len()) {
            return Err(PayoffError::CellCount {
                size,
                cells: cells.len(),
            });
        }
        if let Some(i) = cells
            .iter()
            .position(|(own, opp)| !own.is_finite() || !opp.is_finite())
        {
            return Err(PayoffError::NonFinite {
                row: i / size,
                col: i % size,
            });
        }
        Ok(Self { size, cells })
    }
}

impl PayoffMatrix {
    /// Build from rows of `(own, opponent)` payoff pairs
    pub fn new(rows: Vec<Vec<(f64, f64)>>) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != size {
                return Err(PayoffError::NotSquare {
                    rows: size,
                    row,
                    len: cols.len(),
                }
                .into());
            }
            for (col, (own, opp)) in cols.into_iter().enumerate() {
                if !own.is_finite() || !opp.is_finite() {
                    return Err(PayoffError::NonFinite { row, col }.into());
                }
                cells.push((own, opp));
            }
        }
        Ok(Self { size, cells })
    }

    /// Build by evaluating `f(own, opponent)` for every pair
    pub fn from_fn(size: usize, mut f: impl FnMut(StrategyId, StrategyId) -> (f64, f64)) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                cells.push(f(StrategyId(row), StrategyId(col)));
            }
        }
        Self { size, cells }
    }

    /// Standard Prisoner's Dilemma over [`StrategyRegistry::classic`]
    pub fn prisoners_dilemma() -> Self {
        Self::two_by_two(&MovePayoffs::prisoners_dilemma())
    }

    /// 2x2 matrix where strategy 0 cooperates and strategy 1 defects
    pub fn two_by_two(payoffs: &MovePayoffs) -> Self {
        let moves = [Move::Cooperate, Move::Defect];
        Self::from_fn(2, |own, opp| payoffs.score(moves[own.0], moves[opp.0]))
    }

    /// NxN matrix for a population of unconditional players
    ///
    /// Nice strategies always cooperate, the rest always defect.
    pub fn from_moves(registry: &StrategyRegistry, payoffs: &MovePayoffs) -> Self {
        let pure_move = |id: StrategyId| {
            if registry[id].is_nice {
                Move::Cooperate
            } else {
                Move::Defect
            }
        };
        Self::from_fn(registry.len(), |own, opp| {
            payoffs.score(pure_move(own), pure_move(opp))
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// `(own, opponent)` payoffs when `own` meets `opponent`
    #[inline]
    pub fn payoffs(&self, own: StrategyId, opponent: StrategyId) -> (f64, f64) {
        self.cells[own.0 * self.size + opponent.0]
    }

    /// Own payoff when `own` meets `opponent`
    #[inline]
    pub fn payoff(&self, own: StrategyId, opponent: StrategyId) -> f64 {
        self.payoffs(own, opponent).0
    }

    /// Ensure the matrix covers every registered strategy
    pub fn check_registry(&self, registry: &StrategyRegistry) -> Result<()> {
        if self.size != registry.len() {
            return Err(PayoffError::DimensionMismatch {
                matrix: self.size,
                registry: registry.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Pure-strategy Nash equilibria as (row, column) strategy pairs
    ///
    /// A cell is an equilibrium when the row strategy is a best response to
    /// the column strategy and vice versa. Ties count as best responses.
    pub fn pure_nash_equilibria(&self) -> Vec<(StrategyId, StrategyId)> {
        let ids = || (0..self.size).map(StrategyId);
        let mut equilibria = Vec::new();
        for row in ids() {
            for col in ids() {
                let (row_payoff, col_payoff) = self.payoffs(row, col);
                let row_best = ids().all(|alt| self.payoffs(alt, col).0 <= row_payoff);
                let col_best = ids().all(|alt| self.payoffs(row, alt).1 <= col_payoff);
                if row_best && col_best {
                    equilibria.push((row, col));
                }
            }
        }
        equilibria
    }

    /// A strategy strictly better than every alternative against every opponent
    pub fn dominant_strategy(&self) -> Option<StrategyId> {
        let ids = || (0..self.size).map(StrategyId);
        ids().find(|&candidate| {
            ids().filter(|&alt| alt != candidate).all(|alt| {
                ids().all(|opp| self.payoff(candidate, opp) > self.payoff(alt, opp))
            })
        })
    }
}
