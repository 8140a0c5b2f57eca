//! API route configuration.

use crate::api::handlers::product_reviews_handler;
use crate::state::AppState;
use axum::{Router, routing::get};

/// JSON API routes.
///
/// # Endpoints
///
/// - `GET /products/{product_id}/reviews` - Reviews and statistics for a product
pub fn routes() -> Router<AppState> {
    Router::new().route("/products/{product_id}/reviews", get(product_reviews_handler))
}
