use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;
use utoipa::ToSchema;

use crate::api::router::AppState;

/// Health check response
#[derive(serde::Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub database: String,
}

/// GET /health
/// Liveness plus a database round trip when Postgres is configured
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let (status, database) = match &state.pool {
        None => (StatusCode::OK, "memory"),
        Some(pool) => {
            let check = tokio::time::timeout(
                Duration::from_secs(2),
                sqlx::query("SELECT 1").execute(pool.as_ref()),
            )
            .await;
            match check {
                Ok(Ok(_)) => (StatusCode::OK, "connected"),
                Ok(Err(e)) => {
                    tracing::warn!("Health check database error: {}", e);
                    (StatusCode::SERVICE_UNAVAILABLE, "error")
                }
                Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "timeout"),
            }
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "healthy" } else { "unhealthy" },
            "service": "animal_cms",
            "version": env!("CARGO_PKG_VERSION"),
            "database": database,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
