//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ReviewService;
use crate::domain::repositories::ReviewRepository;
use crate::infrastructure::resilience::CircuitBreaker;

#[derive(Clone)]
pub struct AppState {
    pub review_service: Arc<ReviewService<dyn ReviewRepository>>,
    /// Breaker guarding the review API, shared with the repository; read by
    /// the health check.
    pub review_breaker: Arc<CircuitBreaker>,
}

impl AppState {
    pub fn new(repository: Arc<dyn ReviewRepository>, review_breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            review_service: Arc::new(ReviewService::new(repository)),
            review_breaker,
        }
    }
}
