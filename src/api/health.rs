use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub database: String,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let version = env!("CARGO_PKG_VERSION").to_string();

    let (status, code, database) = match state.ledger.ping().await {
        Ok(()) => ("healthy", StatusCode::OK, "up"),
        Err(e) => {
            warn!(error = %e, "Health check could not reach the ledger");
            ("degraded", StatusCode::SERVICE_UNAVAILABLE, "down")
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        version,
        environment: state.environment.clone(),
        database: database.to_string(),
    };

    (code, Json(response))
}
