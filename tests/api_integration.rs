//! End-to-end API tests against the bundled profile.
#![cfg(feature = "api")]

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::util::ServiceExt;

use h2_sizing::api::{AppState, router};
use h2_sizing::config::DispatchConfig;
use h2_sizing::sim::engine::simulate;

const RESULT_KEYS: &[&str] = &[
    "totalHydrogenGenerated",
    "totalHydrogenSupplied",
    "totalHydrogenVented",
    "peakStock",
    "zeroSupplyHours",
    "zeroSupplyDays",
    "numberOfCylinders",
    "capitalCost",
];

fn sizing_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/sizing")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn json_body(resp: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body should read");
    serde_json::from_slice(&body).expect("body should be JSON")
}

#[tokio::test]
async fn baseline_request_matches_library_result() {
    let profile = common::default_profile();
    let expected = simulate(&profile, &DispatchConfig::baseline());
    let state = Arc::new(AppState::new(profile));

    let resp = router(state.clone())
        .oneshot(sizing_request("{}"))
        .await
        .expect("request should complete");
    assert_eq!(resp.status(), StatusCode::OK);

    let json = json_body(resp).await;
    let obj = json.as_object().expect("result should be an object");
    for key in RESULT_KEYS {
        assert!(obj.contains_key(*key), "missing key {key}");
    }
    assert_eq!(
        obj.get("numberOfCylinders").and_then(Value::as_u64),
        Some(expected.number_of_cylinders)
    );
    assert_eq!(
        obj.get("peakStock").and_then(Value::as_f64),
        Some(expected.peak_stock)
    );
}

#[tokio::test]
async fn repeated_request_is_served_from_cache() {
    let state = Arc::new(AppState::new(common::default_profile()));

    for _ in 0..2 {
        let resp = router(state.clone())
            .oneshot(sizing_request(r#"{"config": {"installed_capacity": 5000.0}}"#))
            .await
            .expect("request should complete");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let cache = state.cache.lock().expect("cache lock");
    assert_eq!((cache.hits(), cache.misses()), (1, 1));
}

#[tokio::test]
async fn both_profile_sources_are_rejected() {
    let state = Arc::new(AppState::new(common::default_profile()));
    let resp = router(state)
        .oneshot(sizing_request(r#"{"profile": [1.0], "profile_csv": "1"}"#))
        .await
        .expect("request should complete");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = json_body(resp).await;
    assert!(json.get("error").is_some());
}
