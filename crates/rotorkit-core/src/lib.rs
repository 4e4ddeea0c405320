//! # RotorKit Core
//!
//! Balancing math and data model for RotorKit.
//! Provides the three-run trilateration solver, the vector-summation
//! method, and the shared types both the visualizer and the HTTP
//! service are built on.

pub mod error;
pub mod solver;
pub mod types;

pub use error::{Error, Result, SolverError};
pub use solver::{
    calculate_vectors, normalize_angle, solve, solve_intersection, DEGENERACY_EPSILON,
};
pub use types::{
    IntersectionSolution, PolarVector, RunColor, SolverInput, TestRun, VectorSumResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
