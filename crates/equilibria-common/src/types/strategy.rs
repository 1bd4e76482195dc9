//! Strategy - Reference data for the strategies taking part in a run
//!
//! Strategies are registered once per run in a [`StrategyRegistry`]. Every
//! other record (population counts, game results, analytics outputs) refers
//! to a strategy through its dense [`StrategyId`], and per-strategy values
//! are kept in a registry-sized [`PerStrategy`] vector instead of a string
//! keyed map.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::error::{RegistryError, Result};

/// Dense index of a strategy inside its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategyId(pub usize);

impl StrategyId {
    /// Position of the strategy in registry order
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for StrategyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single move in a two-action game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// The opposite move (used by the noise model)
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Move::Cooperate => Move::Defect,
            Move::Defect => Move::Cooperate,
        }
    }

    #[inline]
    pub fn is_cooperate(self) -> bool {
        matches!(self, Move::Cooperate)
    }
}

/// How a strategy chooses its moves in an iterated game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Behavior {
    /// Always cooperate
    AlwaysCooperate,
    /// Always defect
    AlwaysDefect,
    /// Cooperate first, then copy the opponent's last move
    TitForTat,
    /// Defect only after two consecutive opponent defections
    TitForTwoTats,
    /// Tit for Tat that forgives a defection with the given probability
    GenerousTitForTat { generosity: f64 },
    /// Cooperate until the opponent defects once, then defect forever
    Grudger,
    /// Win-stay, lose-shift
    Pavlov,
    /// Cooperate with the given probability
    Random { cooperate_probability: f64 },
}

impl Behavior {
    /// Whether the behavior never defects first
    pub fn is_nice(&self) -> bool {
        !matches!(self, Behavior::AlwaysDefect | Behavior::Random { .. })
    }

    /// Whether the behavior returns to cooperation after punishing
    pub fn is_forgiving(&self) -> bool {
        matches!(
            self,
            Behavior::AlwaysCooperate
                | Behavior::TitForTat
                | Behavior::TitForTwoTats
                | Behavior::GenerousTitForTat { .. }
                | Behavior::Pavlov
        )
    }
}

/// Strategy reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Stable key (e.g. "tit_for_tat"), unique inside a registry
    pub key: String,
    /// Display name
    pub name: String,
    /// Display color (CSS hex)
    pub color: String,
    /// Never defects first
    pub is_nice: bool,
    /// Returns to cooperation after retaliating
    pub is_forgiving: bool,
    /// Move selection rule for iterated play
    pub behavior: Behavior,
}

impl Strategy {
    /// Create a strategy whose flags are derived from its behavior
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        behavior: Behavior,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            color: color.into(),
            is_nice: behavior.is_nice(),
            is_forgiving: behavior.is_forgiving(),
            behavior,
        }
    }

    /// Unconditional cooperators of the two-strategy population game
    pub fn cooperators() -> Self {
        Self::new("cooperators", "Cooperators", "#22c55e", Behavior::AlwaysCooperate)
    }

    /// Unconditional defectors of the two-strategy population game
    pub fn defectors() -> Self {
        Self::new("defectors", "Defectors", "#ef4444", Behavior::AlwaysDefect)
    }

    /// Canonical strategy for a behavior
    pub fn from_behavior(behavior: Behavior) -> Self {
        match behavior {
            Behavior::AlwaysCooperate => {
                Self::new("always_cooperate", "Always Cooperate", "#22c55e", behavior)
            }
            Behavior::AlwaysDefect => {
                Self::new("always_defect", "Always Defect", "#ef4444", behavior)
            }
            Behavior::TitForTat => Self::new("tit_for_tat", "Tit for Tat", "#3b82f6", behavior),
            Behavior::TitForTwoTats => {
                Self::new("tit_for_two_tats", "Tit for Two Tats", "#06b6d4", behavior)
            }
            Behavior::GenerousTitForTat { .. } => Self::new(
                "generous_tit_for_tat",
                "Generous Tit for Tat",
                "#8b5cf6",
                behavior,
            ),
            Behavior::Grudger => Self::new("grudger", "Grudger", "#f59e0b", behavior),
            Behavior::Pavlov => Self::new("pavlov", "Pavlov", "#ec4899", behavior),
            Behavior::Random { .. } => Self::new("random", "Random", "#6b7280", behavior),
        }
    }
}

/// Ordered, immutable set of strategies for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRegistry {
    strategies: Vec<Strategy>,
}

impl StrategyRegistry {
    /// Build a registry; keys must be unique and at least one strategy given
    pub fn new(strategies: Vec<Strategy>) -> Result<Self> {
        if strategies.is_empty() {
            return Err(RegistryError::Empty.into());
        }
        for (i, strategy) in strategies.iter().enumerate() {
            if strategies[..i].iter().any(|s| s.key == strategy.key) {
                return Err(RegistryError::DuplicateKey(strategy.key.clone()).into());
            }
        }
        Ok(Self { strategies })
    }

    /// Cooperators vs defectors
    pub fn classic() -> Self {
        Self {
            strategies: vec![Strategy::cooperators(), Strategy::defectors()],
        }
    }

    /// The iterated-game line-up used by tournaments
    pub fn axelrod() -> Self {
        let behaviors = [
            Behavior::AlwaysCooperate,
            Behavior::AlwaysDefect,
            Behavior::TitForTat,
            Behavior::TitForTwoTats,
            Behavior::GenerousTitForTat { generosity: 0.1 },
            Behavior::Grudger,
            Behavior::Pavlov,
            Behavior::Random {
                cooperate_probability: 0.5,
            },
        ];
        Self {
            strategies: behaviors.into_iter().map(Strategy::from_behavior).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn get(&self, id: StrategyId) -> Option<&Strategy> {
        self.strategies.get(id.0)
    }

    /// Look up a strategy id by key
    pub fn id_of(&self, key: &str) -> Option<StrategyId> {
        self.strategies
            .iter()
            .position(|s| s.key == key)
            .map(StrategyId)
    }

    /// Like [`Self::id_of`] but failing on unknown keys
    pub fn resolve(&self, key: &str) -> Result<StrategyId> {
        self.id_of(key)
            .ok_or_else(|| RegistryError::UnknownKey(key.to_string()).into())
    }

    /// All ids in registry order
    pub fn ids(&self) -> impl Iterator<Item = StrategyId> + '_ {
        (0..self.strategies.len()).map(StrategyId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrategyId, &Strategy)> + '_ {
        self.strategies
            .iter()
            .enumerate()
            .map(|(i, s)| (StrategyId(i), s))
    }

    /// Display name for an id, falling back to the id itself
    pub fn name_of(&self, id: StrategyId) -> String {
        self.get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

impl Index<StrategyId> for StrategyRegistry {
    type Output = Strategy;

    fn index(&self, id: StrategyId) -> &Strategy {
        &self.strategies[id.0]
    }
}

/// Registry-sized accumulator indexed by [`StrategyId`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PerStrategy<T> {
    values: Vec<T>,
}

impl<T: Clone> PerStrategy<T> {
    /// One slot per registered strategy, all set to `value`
    pub fn filled(registry: &StrategyRegistry, value: T) -> Self {
        Self {
            values: vec![value; registry.len()],
        }
    }
}

impl<T> PerStrategy<T> {
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Build by evaluating `f` for every registered strategy
    pub fn from_fn(registry: &StrategyRegistry, f: impl FnMut(StrategyId) -> T) -> Self {
        Self {
            values: registry.ids().map(f).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: StrategyId) -> Option<&T> {
        self.values.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StrategyId, &T)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| (StrategyId(i), v))
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T> Index<StrategyId> for PerStrategy<T> {
    type Output = T;

    fn index(&self, id: StrategyId) -> &T {
        &self.values[id.0]
    }
}

impl<T> IndexMut<StrategyId> for PerStrategy<T> {
    fn index_mut(&mut self, id: StrategyId) -> &mut T {
        &mut self.values[id.0]
    }
}
