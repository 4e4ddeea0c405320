//! Error handling for RotorKit.
//!
//! Solver errors cover input shape problems only. Degenerate geometry
//! (collinear or concentric circle centers) is not an error: the solver
//! returns a zeroed sentinel with the `degenerate` flag set, so the
//! render path always has something valid to draw.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Solver input error type
///
/// Represents structural problems with solver input. Non-finite
/// amplitudes and phases are not represented here; they are coerced to
/// zero during input construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Wrong number of calibration runs supplied
    #[error("Expected {expected} calibration runs, got {actual}")]
    InvalidRunCount {
        /// The required number of runs.
        expected: usize,
        /// The number of runs actually supplied.
        actual: usize,
    },
}

/// Main error type for RotorKit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Solver input error
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
