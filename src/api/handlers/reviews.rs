//! Handler for product reviews.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::reviews::{ProductReviewsResponse, ReviewsQuery};
use crate::error::AppError;
use crate::state::AppState;

/// Returns reviews and aggregate statistics for a product.
///
/// # Endpoint
///
/// `GET /api/products/{product_id}/reviews`
///
/// # Query Parameters
///
/// - `limit` (optional): Reviews per page (default: 10, range: 1-100)
/// - `offset` (optional): Reviews to skip (default: 0)
///
/// Paging is applied to the fetched list; `stats` always describes every
/// review of the product.
///
/// # Response
///
/// ```json
/// {
///   "product_id": "P1",
///   "stats": { "average_rating": 4.5, "review_count": 1 },
///   "reviews": [
///     {
///       "id": "2b0f6c1e-...",
///       "customer_name": "Unknown",
///       "title": "No Title",
///       "content": "Great",
///       "rating": 5,
///       "created_at": "2026-01-01T12:00:00Z",
///       "status": "approved"
///     }
///   ],
///   "pagination": { "limit": 10, "offset": 0 }
/// }
/// ```
///
/// When the review API is unavailable the body has the same shape, filled
/// with synthesized reviews.
///
/// # Errors
///
/// Returns 400 Bad Request if the product id is blank or the query is invalid.
pub async fn product_reviews_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    query: Result<Query<ReviewsQuery>, QueryRejection>,
) -> Result<Json<ProductReviewsResponse>, AppError> {
    let Query(query) = query.map_err(|e| {
        AppError::bad_request("Invalid query parameters", json!({ "reason": e.body_text() }))
    })?;
    query.validate()?;

    let page = query.page();
    let reviews = state
        .review_service
        .product_reviews(&product_id, Some(page))
        .await?;

    Ok(Json(ProductReviewsResponse::new(&reviews, page)))
}
