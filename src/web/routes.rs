//! Storefront page route configuration.

use crate::state::AppState;
use crate::web::handlers::product_reviews_handler;
use axum::{Router, routing::get};

/// Server-rendered storefront pages.
///
/// # Endpoints
///
/// - `GET /products/{product_id}/reviews` - Review page for a product
pub fn routes() -> Router<AppState> {
    Router::new().route("/products/{product_id}/reviews", get(product_reviews_handler))
}
