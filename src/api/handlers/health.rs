//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::infrastructure::resilience::{CircuitBreaker, CircuitState};
use crate::state::AppState;

/// Returns service health status with dependency checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Always. Reviews are served from fallback data while the
///   review API is down, so a degraded review API does not make the service
///   unhealthy; it is reported in the body instead.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "review_api": {
///       "status": "ok",
///       "message": "Circuit closed"
///     }
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let review_api = check_review_api(&state.review_breaker);
    let healthy = review_api.status == "ok";

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { review_api },
    })
}

/// Reports the review API breaker state.
fn check_review_api(breaker: &CircuitBreaker) -> CheckStatus {
    match breaker.state() {
        CircuitState::Closed => CheckStatus {
            status: "ok".to_string(),
            message: Some(match breaker.failure_count() {
                0 => "Circuit closed".to_string(),
                n => format!("Circuit closed, {n} recent failure(s)"),
            }),
        },
        CircuitState::HalfOpen => CheckStatus {
            status: "degraded".to_string(),
            message: Some("Circuit half-open, probing review API".to_string()),
        },
        CircuitState::Open => CheckStatus {
            status: "degraded".to_string(),
            message: Some("Circuit open, serving fallback reviews".to_string()),
        },
    }
}
