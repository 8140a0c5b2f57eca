#![allow(dead_code)]

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use merch_reviews::domain::repositories::ReviewRepository;
use merch_reviews::infrastructure::resilience::{CircuitBreaker, CircuitBreakerConfig};
use merch_reviews::infrastructure::reviews::{
    ExternalReviewRepository, ReviewApiClient, ReviewApiSettings,
};
use merch_reviews::state::AppState;
use tokio::net::TcpListener;

pub const TEST_API_KEY: &str = "test-api-key";

/// Body the review API sends for the "clothing" group in the examples used
/// throughout the tests.
pub const GREAT_REVIEW_BODY: &str = r#"{
    "productId": "clothing",
    "productName": "Clothing",
    "reviews": {
        "formattedRating": "★★★★½ (4.5 av 5)",
        "totalReviews": "1 st",
        "reviews": [{ "content": "Great" }]
    }
}"#;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A base URL nothing listens on.
pub async fn unused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn test_settings(base_url: &str) -> ReviewApiSettings {
    ReviewApiSettings {
        base_url: base_url.to_string(),
        api_key: TEST_API_KEY.to_string(),
        api_key_header: "X-API-KEY".to_string(),
        send_bearer: true,
        timeout: Duration::from_secs(5),
    }
}

pub fn test_client(base_url: &str) -> ReviewApiClient {
    ReviewApiClient::new(&test_settings(base_url)).unwrap()
}

pub fn test_breaker(failure_threshold: u32) -> Arc<CircuitBreaker> {
    Arc::new(CircuitBreaker::new(
        "review-api-test",
        CircuitBreakerConfig {
            failure_threshold,
            break_duration: Duration::from_secs(30),
            ..CircuitBreakerConfig::default()
        },
    ))
}

pub fn test_repository(
    base_url: &str,
    breaker: Arc<CircuitBreaker>,
) -> ExternalReviewRepository<ReviewApiClient> {
    ExternalReviewRepository::new(Arc::new(test_client(base_url)), breaker)
}

pub fn create_test_state(base_url: &str) -> AppState {
    let breaker = test_breaker(3);
    let repository: Arc<dyn ReviewRepository> =
        Arc::new(test_repository(base_url, breaker.clone()));
    AppState::new(repository, breaker)
}
