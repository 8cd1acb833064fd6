use axum::Json;

use crate::dto::HealthResponse;

/// GET /health - Liveness check.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
