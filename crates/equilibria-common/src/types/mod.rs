//! Core data types for Equilibria

pub mod game_result;
pub mod payoff;
pub mod strategy;
