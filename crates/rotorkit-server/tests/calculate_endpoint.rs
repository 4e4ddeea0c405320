//! Wire-contract tests for `POST /calculate`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use rotorkit_server::router;

async fn post_calculate(body: Value) -> (StatusCode, Value) {
    let response = router()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/calculate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_calculate_returns_solution_and_vectors() {
    let (status, body) = post_calculate(json!({
        "v0": 7.0,
        "runs": [
            { "r": 4.0, "theta": 0.0 },
            { "r": 3.5, "theta": 120.0 },
            { "r": 5.0, "theta": 240.0 }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let solution = &body["solution"];
    assert!((solution["x"].as_f64().unwrap() - 0.125).abs() < 1e-9);
    assert!((solution["thetaDeg"].as_f64().unwrap() - 76.627).abs() < 1e-2);
    assert!(solution["rmsError"].as_f64().unwrap() > 0.0);
    assert_eq!(solution["degenerate"], Value::Bool(false));

    let vectors = &body["vectors"];
    let res_theta = vectors["resultant"]["thetaDeg"].as_f64().unwrap();
    let opp_theta = vectors["opposite"]["thetaDeg"].as_f64().unwrap();
    assert!(((opp_theta - res_theta).rem_euclid(360.0) - 180.0).abs() < 1e-9);
    assert_eq!(
        vectors["resultant"]["r"].as_f64().unwrap(),
        vectors["opposite"]["r"].as_f64().unwrap()
    );
}

#[tokio::test]
async fn test_degenerate_input_yields_flagged_sentinel_not_error() {
    let (status, body) = post_calculate(json!({
        "v0": 7.0,
        "runs": [
            { "r": 4.0, "theta": 0.0 },
            { "r": 3.5, "theta": 0.0 },
            { "r": 5.0, "theta": 0.0 }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    let solution = &body["solution"];
    assert_eq!(solution["degenerate"], Value::Bool(true));
    assert_eq!(solution["r"].as_f64().unwrap(), 0.0);
    assert_eq!(solution["rmsError"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_wrong_run_count_is_rejected() {
    let (status, _) = post_calculate(json!({
        "v0": 7.0,
        "runs": [
            { "r": 4.0, "theta": 0.0 },
            { "r": 3.5, "theta": 120.0 }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_balanced_runs_solve_to_near_zero() {
    let (status, body) = post_calculate(json!({
        "v0": 7.0,
        "runs": [
            { "r": 5.0, "theta": 0.0 },
            { "r": 5.0, "theta": 120.0 },
            { "r": 5.0, "theta": 240.0 }
        ]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["solution"]["r"].as_f64().unwrap() < 1e-6);
    assert!(body["vectors"]["resultant"]["r"].as_f64().unwrap() < 1e-6);
}
