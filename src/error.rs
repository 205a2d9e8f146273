//! Error type shared by the oracle, the evaluator and the solvers.
//!
//! Infeasibility of a single candidate is not an error: it is reported as an
//! objective value of `f64::INFINITY`. Errors abort the current call.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("invalid coordinate (latitude {latitude}, longitude {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("invalid weight {weight} on edge {from} -> {to}")]
    InvalidWeight { from: usize, to: usize, weight: f64 },

    #[error("unknown node {0}")]
    UnknownNode(usize),

    #[error("duplicate node {0}")]
    DuplicateNode(usize),

    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("distance oracle was built for graph {found:016x}, expected {expected:016x}")]
    OracleMismatch { expected: u64, found: u64 },

    #[error("distance cache does not match graph: {0}")]
    CacheMismatch(String),

    #[error("solver proved the model infeasible")]
    SolverInfeasible,

    #[error("solver reached its time limit of {seconds}s without proving optimality")]
    SolverTimeLimit { seconds: f64 },

    #[error("solver failed: {0}")]
    Solver(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub fn cache_mismatch(message: impl Into<String>) -> Self {
        Self::CacheMismatch(message.into())
    }

    pub fn solver(message: impl Into<String>) -> Self {
        Self::Solver(message.into())
    }
}
