//! DTOs for the product review endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{ProductReviews, Review, ReviewPage, ReviewStatus};
use crate::domain::entities::product_reviews::DEFAULT_PAGE_LIMIT;

/// Largest page a client may request.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Query parameters of `GET /api/products/{product_id}/reviews`.
///
/// Uses `serde_with` to parse numbers from query strings.
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ReviewsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<usize>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<usize>,
}

impl ReviewsQuery {
    /// Requested window, with defaults applied.
    pub fn page(&self) -> ReviewPage {
        ReviewPage::new(
            self.limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT),
            self.offset.unwrap_or(0),
        )
    }
}

/// Reviews and statistics for a product.
#[derive(Debug, Serialize)]
pub struct ProductReviewsResponse {
    pub product_id: String,
    pub stats: ReviewStatsInfo,
    pub reviews: Vec<ReviewInfo>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct ReviewStatsInfo {
    pub average_rating: f64,
    pub review_count: u32,
}

#[derive(Debug, Serialize)]
pub struct ReviewInfo {
    pub id: Uuid,
    pub customer_name: String,
    pub title: String,
    pub content: String,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
    pub status: ReviewStatus,
}

#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub limit: usize,
    pub offset: usize,
}

impl From<&Review> for ReviewInfo {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id(),
            customer_name: review.customer_name().to_string(),
            title: review.title().to_string(),
            content: review.content().to_string(),
            rating: review.rating(),
            created_at: review.created_at(),
            status: review.status(),
        }
    }
}

impl ProductReviewsResponse {
    pub fn new(result: &ProductReviews, page: ReviewPage) -> Self {
        Self {
            product_id: result.stats.product_id().to_string(),
            stats: ReviewStatsInfo {
                average_rating: result.stats.average_rating(),
                review_count: result.stats.review_count(),
            },
            reviews: result.reviews.iter().map(ReviewInfo::from).collect(),
            pagination: PageInfo {
                limit: page.limit,
                offset: page.offset,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(raw: &str) -> ReviewsQuery {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn test_defaults() {
        let q = query("{}");
        assert!(q.validate().is_ok());
        assert_eq!(q.page(), ReviewPage::new(10, 0));
    }

    #[test]
    fn test_numbers_from_strings() {
        let q = query(r#"{"limit": "25", "offset": "50"}"#);
        assert!(q.validate().is_ok());
        assert_eq!(q.page(), ReviewPage::new(25, 50));
    }

    #[test]
    fn test_limit_bounds() {
        assert!(query(r#"{"limit": "0"}"#).validate().is_err());
        assert!(query(r#"{"limit": "101"}"#).validate().is_err());
        assert!(query(r#"{"limit": "1"}"#).validate().is_ok());
        assert!(query(r#"{"limit": "100"}"#).validate().is_ok());
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        assert!(serde_json::from_str::<ReviewsQuery>(r#"{"limit": "ten"}"#).is_err());
        assert!(serde_json::from_str::<ReviewsQuery>(r#"{"offset": "-1"}"#).is_err());
    }
}
