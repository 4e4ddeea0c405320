//! Shared data model: calibration runs, solver input, and solver output.
//!
//! Solver outputs are derived values. They are recomputed on every
//! solve call and never mutated in place; consumers that cache them for
//! redraw treat the cache as a snapshot, not a source of truth.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SolverError};

/// Legend identity of a calibration run.
///
/// The color identifies the run in legends and on the canvas; it plays
/// no role in the solver math. Run order is significant only for this
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunColor {
    One,
    Two,
    Three,
}

impl RunColor {
    /// All colors in run order.
    pub const ALL: [RunColor; 3] = [RunColor::One, RunColor::Two, RunColor::Three];

    /// Canvas stroke color (hex).
    pub fn hex(&self) -> &'static str {
        match self {
            RunColor::One => "#22c55e",
            RunColor::Two => "#a855f7",
            RunColor::Three => "#eab308",
        }
    }

    /// Label used for the run's circle in the trilateration view.
    pub fn circle_label(&self) -> &'static str {
        match self {
            RunColor::One => "C1",
            RunColor::Two => "C2",
            RunColor::Three => "C3",
        }
    }

    /// Label used for the run's vector in the vector view.
    pub fn vector_label(&self) -> &'static str {
        match self {
            RunColor::One => "V1",
            RunColor::Two => "V2",
            RunColor::Three => "V3",
        }
    }
}

/// A single calibration test run: measured amplitude and phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRun {
    pub amplitude: f64,
    pub phase_deg: f64,
    pub color: RunColor,
}

impl TestRun {
    /// Creates a run, coercing unparseable measurements to zero.
    ///
    /// A non-finite amplitude or phase is treated as `0.0` and a
    /// negative amplitude is clamped to `0.0`. This is the documented
    /// input policy, not a failure path.
    pub fn new(amplitude: f64, phase_deg: f64, color: RunColor) -> Self {
        Self {
            amplitude: sanitize(amplitude).max(0.0),
            phase_deg: sanitize(phase_deg),
            color,
        }
    }
}

/// Maps a non-finite measurement to the documented default of zero.
pub(crate) fn sanitize(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Complete input for one solve: base amplitude plus exactly three runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverInput {
    pub base_amplitude: f64,
    pub runs: [TestRun; 3],
}

impl SolverInput {
    pub fn new(base_amplitude: f64, runs: [TestRun; 3]) -> Self {
        Self {
            base_amplitude: sanitize(base_amplitude),
            runs,
        }
    }

    /// Builds input from a run slice, enforcing the three-run contract.
    pub fn from_slice(base_amplitude: f64, runs: &[TestRun]) -> Result<Self> {
        let runs: [TestRun; 3] = runs
            .try_into()
            .map_err(|_| SolverError::InvalidRunCount {
                expected: 3,
                actual: runs.len(),
            })?;
        Ok(Self::new(base_amplitude, runs))
    }
}

/// Result of the circle-intersection solve.
///
/// `rms_error` is part of the solution contract, reported on success as
/// well: it is the residual of the fit over the three circles. When
/// `degenerate` is set the remaining fields are the zero sentinel and
/// consumers must check the flag rather than catch anything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntersectionSolution {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub theta_deg: f64,
    pub rms_error: f64,
    pub degenerate: bool,
}

impl IntersectionSolution {
    /// The zero sentinel returned for a degenerate linear system.
    pub fn degenerate() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            r: 0.0,
            theta_deg: 0.0,
            rms_error: 0.0,
            degenerate: true,
        }
    }
}

/// A magnitude/phase pair in plane units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolarVector {
    pub r: f64,
    pub theta_deg: f64,
}

impl PolarVector {
    pub fn new(r: f64, theta_deg: f64) -> Self {
        Self { r, theta_deg }
    }

    /// Cartesian components (plane convention, Y up).
    pub fn to_cartesian(&self) -> (f64, f64) {
        let rad = self.theta_deg.to_radians();
        (self.r * rad.cos(), self.r * rad.sin())
    }
}

/// Result of the vector-summation method.
///
/// The opposite vector is the resultant rotated 180 degrees with the
/// same magnitude; it is where the correction mass goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorSumResult {
    pub resultant: PolarVector,
    pub opposite: PolarVector,
}
