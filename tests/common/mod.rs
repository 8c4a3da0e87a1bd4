//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use tower::util::ServiceExt;

use library_service::api::{self, AppState};
use library_service::domain::FixedClock;
use library_service::gateway::SimulatedGateway;
use library_service::store::InMemoryLibraryStore;

/// Instant every test clock is measured from
pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap()
}

/// Router over `store` with the clock set `days` after [`start`].
pub fn app_at(store: &InMemoryLibraryStore, gateway: &SimulatedGateway, days: i64) -> Router {
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(gateway.clone()),
        Arc::new(FixedClock::new(start()).advanced_by_days(days)),
    );

    api::create_router()
        .layer(middleware::from_fn(api::middleware::logging_middleware))
        .layer(middleware::from_fn(api::middleware::context_middleware))
        .with_state(state)
}

pub fn gateway(decline_above: Decimal) -> SimulatedGateway {
    SimulatedGateway::new(decline_above)
}

/// Send a request and decode the JSON answer (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    let request = match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
