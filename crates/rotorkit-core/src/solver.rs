//! Closed-form balancing solvers.
//!
//! Two methods over the same three calibration runs:
//!
//! - **Circle intersection (trilateration)**: each run defines a circle
//!   with center at `polar(v0, phase)` and radius equal to the measured
//!   amplitude. The radical lines of the circle pairs (1,2) and (1,3)
//!   form a 2x2 linear system whose solution is the correction point.
//! - **Vector summation**: the Cartesian sum of the three run vectors;
//!   the correction goes opposite the resultant.
//!
//! Both are pure and deterministic: equal inputs give bit-identical
//! output, with no iteration or randomness. The same formulation runs
//! behind the HTTP service and any interactive frontend; the two call
//! sites must never diverge.

use tracing::{debug, warn};

use crate::types::{sanitize, IntersectionSolution, PolarVector, SolverInput, TestRun, VectorSumResult};

/// Determinant threshold below which the linear system is degenerate
/// (collinear or concentric circle centers).
pub const DEGENERACY_EPSILON: f64 = 1e-9;

/// Circle center and radius in Cartesian plane units.
#[derive(Debug, Clone, Copy)]
struct Circle {
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Circle {
    /// Circle for one calibration run: center at `polar(v0, phase)`,
    /// radius equal to the run amplitude.
    fn from_run(v0: f64, run: &TestRun) -> Self {
        let rad = run.phase_deg.to_radians();
        Self {
            cx: v0 * rad.cos(),
            cy: v0 * rad.sin(),
            radius: run.amplitude,
        }
    }
}

/// Maps an angle in degrees into `[0, 360)`; negative inputs wrap
/// forward (-10 becomes 350).
pub fn normalize_angle(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative can round to exactly 360.0
    if d >= 360.0 {
        0.0
    } else {
        d
    }
}

/// Solves the intersection of the three run circles.
///
/// Returns the correction point in both Cartesian and polar form plus
/// the RMS residual over the three circles. The residual is part of the
/// solution contract and is reported on success as well.
///
/// A degenerate system (determinant below [`DEGENERACY_EPSILON`])
/// yields the zero sentinel with the `degenerate` flag set; this
/// function never panics and never returns an `Err`.
pub fn solve_intersection(v0: f64, runs: &[TestRun; 3]) -> IntersectionSolution {
    let v0 = sanitize(v0);
    let c1 = Circle::from_run(v0, &runs[0]);
    let c2 = Circle::from_run(v0, &runs[1]);
    let c3 = Circle::from_run(v0, &runs[2]);

    // Radical line of each pair:
    // 2x(cx1 - cxi) + 2y(cy1 - cyi)
    //   = (ri^2 - r1^2) + (cx1^2 - cxi^2) + (cy1^2 - cyi^2)
    let a1 = 2.0 * (c1.cx - c2.cx);
    let b1 = 2.0 * (c1.cy - c2.cy);
    let val1 = (c2.radius.powi(2) - c1.radius.powi(2))
        + (c1.cx.powi(2) - c2.cx.powi(2))
        + (c1.cy.powi(2) - c2.cy.powi(2));

    let a2 = 2.0 * (c1.cx - c3.cx);
    let b2 = 2.0 * (c1.cy - c3.cy);
    let val2 = (c3.radius.powi(2) - c1.radius.powi(2))
        + (c1.cx.powi(2) - c3.cx.powi(2))
        + (c1.cy.powi(2) - c3.cy.powi(2));

    let det = a1 * b2 - a2 * b1;
    if det.abs() < DEGENERACY_EPSILON {
        warn!(det, "Degenerate system: collinear or concentric circle centers");
        return IntersectionSolution::degenerate();
    }

    // Cramer's rule
    let px = (val1 * b2 - val2 * b1) / det;
    let py = (a1 * val2 - a2 * val1) / det;

    let r = px.hypot(py);
    let theta_deg = normalize_angle(py.atan2(px).to_degrees());

    // RMS residual of the fit: sqrt(sum((dist(P, Ci) - ri)^2) / 3)
    let mut sum_sq = 0.0;
    for c in [&c1, &c2, &c3] {
        let dist = (px - c.cx).hypot(py - c.cy);
        let err = dist - c.radius;
        sum_sq += err * err;
    }
    let rms_error = (sum_sq / 3.0).sqrt();

    debug!(px, py, r, theta_deg, rms_error, "Intersection solved");

    IntersectionSolution {
        x: px,
        y: py,
        r,
        theta_deg,
        rms_error,
        degenerate: false,
    }
}

/// Sums the three run vectors and derives the opposite (correction)
/// vector: same magnitude, 180 degrees away.
///
/// Pure and order-independent; the sum is commutative.
pub fn calculate_vectors(runs: &[TestRun; 3]) -> VectorSumResult {
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    for run in runs {
        let rad = run.phase_deg.to_radians();
        sum_x += run.amplitude * rad.cos();
        sum_y += run.amplitude * rad.sin();
    }

    let r = sum_x.hypot(sum_y);
    let theta_deg = normalize_angle(sum_y.atan2(sum_x).to_degrees());

    VectorSumResult {
        resultant: PolarVector::new(r, theta_deg),
        opposite: PolarVector::new(r, normalize_angle(theta_deg + 180.0)),
    }
}

/// Runs both methods over one input.
pub fn solve(input: &SolverInput) -> (IntersectionSolution, VectorSumResult) {
    (
        solve_intersection(input.base_amplitude, &input.runs),
        calculate_vectors(&input.runs),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RunColor;

    fn runs(amps: [f64; 3], phases: [f64; 3]) -> [TestRun; 3] {
        [
            TestRun::new(amps[0], phases[0], RunColor::One),
            TestRun::new(amps[1], phases[1], RunColor::Two),
            TestRun::new(amps[2], phases[2], RunColor::Three),
        ]
    }

    #[test]
    fn test_normalize_angle_fixtures() {
        assert_eq!(normalize_angle(-10.0), 350.0);
        assert_eq!(normalize_angle(370.0), 10.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(-720.0), 0.0);
    }

    #[test]
    fn test_symmetric_runs_solve_to_origin() {
        let solution = solve_intersection(7.0, &runs([5.0, 5.0, 5.0], [0.0, 120.0, 240.0]));
        assert!(!solution.degenerate);
        assert!(solution.r.abs() < 1e-6, "r = {}", solution.r);
        assert!(solution.rms_error.abs() < 1e-6);
    }

    #[test]
    fn test_worked_fixture() {
        let solution = solve_intersection(7.0, &runs([4.0, 3.5, 5.0], [0.0, 120.0, 240.0]));
        assert!(!solution.degenerate);
        assert!((solution.x - 0.125).abs() < 1e-9, "x = {}", solution.x);
        assert!((solution.y - 0.5258011).abs() < 1e-5, "y = {}", solution.y);
        assert!((solution.r - 0.5404552).abs() < 1e-5, "r = {}", solution.r);
        assert!(
            (solution.theta_deg - 76.62716).abs() < 1e-3,
            "theta = {}",
            solution.theta_deg
        );
        assert!(
            (solution.rms_error - 2.8547216).abs() < 1e-3,
            "rms = {}",
            solution.rms_error
        );
    }

    #[test]
    fn test_repeated_solves_are_bit_identical() {
        let input = runs([4.0, 3.5, 5.0], [0.0, 120.0, 240.0]);
        let a = solve_intersection(7.0, &input);
        let b = solve_intersection(7.0, &input);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
        assert_eq!(a.r.to_bits(), b.r.to_bits());
        assert_eq!(a.theta_deg.to_bits(), b.theta_deg.to_bits());
        assert_eq!(a.rms_error.to_bits(), b.rms_error.to_bits());
    }

    #[test]
    fn test_collinear_centers_return_sentinel() {
        // All phases equal puts the three centers on one ray from the
        // origin (here they even coincide), so the system has no unique
        // intersection.
        let solution = solve_intersection(7.0, &runs([4.0, 3.5, 5.0], [0.0, 0.0, 0.0]));
        assert!(solution.degenerate);
        assert_eq!(solution.x, 0.0);
        assert_eq!(solution.y, 0.0);
        assert_eq!(solution.r, 0.0);
        assert_eq!(solution.theta_deg, 0.0);
        assert_eq!(solution.rms_error, 0.0);
    }

    #[test]
    fn test_zero_base_amplitude_is_degenerate() {
        // v0 = 0 makes the three centers concentric at the origin.
        let solution = solve_intersection(0.0, &runs([4.0, 3.5, 5.0], [0.0, 120.0, 240.0]));
        assert!(solution.degenerate);
    }

    #[test]
    fn test_balanced_vectors_cancel() {
        let sums = calculate_vectors(&runs([5.0, 5.0, 5.0], [0.0, 120.0, 240.0]));
        assert!(sums.resultant.r < 1e-6, "r = {}", sums.resultant.r);
        assert_eq!(sums.opposite.r, sums.resultant.r);
    }

    #[test]
    fn test_opposite_is_resultant_plus_half_turn() {
        let sums = calculate_vectors(&runs([4.0, 3.5, 5.0], [10.0, 130.0, 250.0]));
        let expected = normalize_angle(sums.resultant.theta_deg + 180.0);
        assert!((sums.opposite.theta_deg - expected).abs() < 1e-12);
        assert_eq!(sums.opposite.r, sums.resultant.r);
    }

    #[test]
    fn test_vector_sum_is_order_independent() {
        let a = calculate_vectors(&runs([4.0, 3.5, 5.0], [0.0, 120.0, 240.0]));
        let forward = runs([4.0, 3.5, 5.0], [0.0, 120.0, 240.0]);
        let shuffled = [forward[2], forward[0], forward[1]];
        let b = calculate_vectors(&shuffled);
        assert!((a.resultant.r - b.resultant.r).abs() < 1e-12);
        assert!((a.resultant.theta_deg - b.resultant.theta_deg).abs() < 1e-9);
    }
}
