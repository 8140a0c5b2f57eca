//! HTTP server initialization and runtime setup.
//!
//! Wires the review API client, circuit breaker and repository together and
//! runs the Axum server until Ctrl+C.

use crate::config::Config;
use crate::domain::repositories::ReviewRepository;
use crate::infrastructure::resilience::CircuitBreaker;
use crate::infrastructure::reviews::{ExternalReviewRepository, ReviewApiClient};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Name of the breaker guarding the review API, used in logs and metrics.
pub const REVIEW_BREAKER_NAME: &str = "review-api";

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if the review API client cannot be constructed.
pub fn build_state(config: &Config) -> Result<AppState> {
    let client = ReviewApiClient::new(&config.review_api_settings())
        .context("Failed to create review API client")?;
    let breaker = Arc::new(CircuitBreaker::new(
        REVIEW_BREAKER_NAME,
        config.circuit_breaker_config(),
    ));

    let repository: Arc<dyn ReviewRepository> =
        Arc::new(ExternalReviewRepository::new(Arc::new(client), breaker.clone()));

    Ok(AppState::new(repository, breaker))
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The review API client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;
    tracing::info!(base_url = %config.review_api_base_url, "Review API client ready");

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
