#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{NaiveDate, Utc};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use tourmgmt_api::config::ServerConfig;
use tourmgmt_api::negotiation::TourMediaTypes;
use tourmgmt_api::router::build_app_router;
use tourmgmt_api::state::AppState;
use tourmgmt_core::types::FALLBACK_MANAGER_ID;
use tourmgmt_db::models::tour::{Show, Tour};
use tourmgmt_db::repositories::InMemoryTourRepository;
use tower::ServiceExt;
use uuid::Uuid;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
    }
}

/// Build the full application router backed by `repo`.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack that production uses.
pub fn build_test_app(repo: InMemoryTourRepository) -> Router {
    let config = test_config();
    let state = AppState {
        repo: Arc::new(repo),
        media_types: Arc::new(TourMediaTypes::build().unwrap()),
    };
    build_app_router(state, &config).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A stored tour with two shows, listed out of date order.
pub fn seeded_tour(name: &str) -> Tour {
    let id = Uuid::new_v4();
    let show = |day: u32, venue: &str| Show {
        id: Uuid::new_v4(),
        tour_id: id,
        date: date(2025, 7, day),
        venue: venue.to_string(),
        city: Some("Berlin".to_string()),
        country: Some("Germany".to_string()),
    };
    Tour {
        id,
        manager_id: Uuid::new_v4(),
        name: name.to_string(),
        description: Some("Club dates".to_string()),
        start_date: date(2025, 7, 1),
        end_date: date(2025, 7, 14),
        estimated_profits: Decimal::new(1_250_000, 2),
        shows: vec![show(9, "SO36"), show(2, "Astra")],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn fallback_manager() -> String {
    FALLBACK_MANAGER_ID.to_string()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_accept(app: Router, uri: &str, accept: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(ACCEPT, accept)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_with_content_type(
    app: Router,
    uri: &str,
    content_type: &str,
    body: serde_json::Value,
) -> Response<Body> {
    post_raw(app, uri, Some(content_type), body.to_string()).await
}

pub async fn post_raw(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::POST).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    patch_raw(app, uri, Some("application/json-patch+json"), body.to_string()).await
}

pub async fn patch_raw(
    app: Router,
    uri: &str,
    content_type: Option<&str>,
    body: String,
) -> Response<Body> {
    let mut builder = Request::builder().method(Method::PATCH).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
