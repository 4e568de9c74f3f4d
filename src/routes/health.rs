use crate::{error::AppError, routes::ApiQuery, server::Server};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct HealthCheckQuery {
    #[serde(default)]
    check: Option<String>,
}

/// Create health check routes
///
/// Without `check` the endpoint only reports liveness; `check=all` runs every
/// registered component check and `check=<name>` runs just that one.
pub fn create_health_routes() -> Router<Server> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(
    State(server): State<Server>,
    ApiQuery(params): ApiQuery<HealthCheckQuery>,
) -> Result<Json<Value>, AppError> {
    let health_response = server
        .health_service
        .check_health(params.check.as_deref())
        .await;

    let response_json = serde_json::to_value(&health_response)
        .map_err(|e| AppError::Internal(format!("Failed to serialize health response: {}", e)))?;

    Ok(Json(response_json))
}
