//! # RotorKit Server
//!
//! HTTP wire contract for remote invocation of the balancing solver.
//! The handler runs the exact same closed-form solver as any client
//! embedding `rotorkit-core`; the two call sites sharing one
//! formulation (and one degeneracy epsilon) is part of the contract.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::debug;

use rotorkit_core::{
    solve, IntersectionSolution, RunColor, SolverInput, TestRun, VectorSumResult,
};

/// One calibration run as it appears on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunPayload {
    pub r: f64,
    pub theta: f64,
}

/// Request body for `POST /calculate`. The fixed-size array enforces
/// the exactly-three-runs contract at deserialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateRequest {
    pub v0: f64,
    pub runs: [RunPayload; 3],
}

impl CalculateRequest {
    fn to_input(&self) -> SolverInput {
        let runs: [TestRun; 3] = std::array::from_fn(|i| {
            TestRun::new(self.runs[i].r, self.runs[i].theta, RunColor::ALL[i])
        });
        SolverInput::new(self.v0, runs)
    }
}

/// Response body: both solver methods over the same input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculateResponse {
    pub solution: IntersectionSolution,
    pub vectors: VectorSumResult,
}

/// Builds the application router.
pub fn router() -> Router {
    Router::new()
        .route("/calculate", post(calculate))
        .layer(TraceLayer::new_for_http())
}

async fn calculate(Json(request): Json<CalculateRequest>) -> Json<CalculateResponse> {
    let input = request.to_input();
    let (solution, vectors) = solve(&input);
    debug!(
        v0 = input.base_amplitude,
        r = solution.r,
        theta = solution.theta_deg,
        degenerate = solution.degenerate,
        "Solved calculate request"
    );
    Json(CalculateResponse { solution, vectors })
}
