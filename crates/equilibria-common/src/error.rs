//! Error types for Equilibria
//!
//! Numeric degeneracies (empty input, zero denominators) are not errors;
//! they resolve to neutral values at the call site. These variants cover
//! structural problems only.

use thiserror::Error;

/// Result type alias using EquilibriaError
pub type Result<T> = std::result::Result<T, EquilibriaError>;

/// Unified error type for Equilibria operations
#[derive(Debug, Error)]
pub enum EquilibriaError {
    // Strategy registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // Payoff matrix errors
    #[error("Payoff error: {0}")]
    Payoff(#[from] PayoffError),

    // Generation history errors
    #[error("History error: {0}")]
    History(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Strategy registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate strategy key: {0}")]
    DuplicateKey(String),

    #[error("Unknown strategy key: {0}")]
    UnknownKey(String),

    #[error("Registry is empty")]
    Empty,
}

/// Payoff matrix construction errors
#[derive(Debug, Error)]
pub enum PayoffError {
    #[error("Matrix is not square: {rows} rows, row {row} has {len} cells")]
    NotSquare { rows: usize, row: usize, len: usize },

    #[error("Matrix dimension {matrix} does not match registry size {registry}")]
    DimensionMismatch { matrix: usize, registry: usize },

    #[error("Matrix of size {size} needs size * size cells, got {cells}")]
    CellCount { size: usize, cells: usize },

    #[error("Non-finite payoff at ({row}, {col})")]
    NonFinite { row: usize, col: usize },
}
