//! Product review page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};

use crate::domain::entities::Review;
use crate::error::AppError;
use crate::state::AppState;

/// Template for the product review page.
///
/// Renders `templates/product_reviews.html` with:
/// - Average rating and review count
/// - One card per review, newest first
#[derive(Template, WebTemplate)]
#[template(path = "product_reviews.html")]
pub struct ProductReviewsTemplate {
    pub product_id: String,
    pub average_rating: String,
    pub review_count: u32,
    pub reviews: Vec<ReviewView>,
}

/// Display-ready review.
pub struct ReviewView {
    pub customer_name: String,
    pub title: String,
    pub content: String,
    pub stars: String,
    pub rating: u8,
    pub created_at: String,
    pub status: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            customer_name: review.customer_name().to_string(),
            title: review.title().to_string(),
            content: review.content().to_string(),
            stars: stars(review.rating()),
            rating: review.rating(),
            created_at: review.created_at().format("%Y-%m-%d").to_string(),
            status: review.status().to_string(),
        }
    }
}

/// Renders the review page for a product.
///
/// # Endpoint
///
/// `GET /products/{product_id}/reviews`
///
/// # Template
///
/// Uses `templates/product_reviews.html` for server-side rendering. The page
/// always renders; during a review API outage it shows fallback reviews.
pub async fn product_reviews_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<ProductReviewsTemplate, AppError> {
    let result = state
        .review_service
        .product_reviews(&product_id, None)
        .await?;

    Ok(ProductReviewsTemplate {
        product_id: result.stats.product_id().to_string(),
        average_rating: format!("{:.1}", result.stats.average_rating()),
        review_count: result.stats.review_count(),
        reviews: result.reviews.iter().map(ReviewView::from).collect(),
    })
}

fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}
