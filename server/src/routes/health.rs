//! Liveness endpoints. Neither requires a bearer token.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

const BANNER: &str = "MedBox Document Server";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(|| async { Json(health()) }))
        .route("/", get(|| async { BANNER }))
}

fn health() -> HealthResponse {
    HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    }
}
