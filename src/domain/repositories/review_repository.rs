//! Repository trait for product review access.

use crate::domain::entities::{ProductId, ProductReviews, ReviewPage};
use async_trait::async_trait;

/// Source of reviews and statistics for storefront products.
///
/// Unlike the other repositories of a typical data layer this contract is
/// infallible: review display is not critical to browsing or purchasing, so
/// implementations degrade to a valid (possibly empty or synthetic) result
/// instead of returning an error.
///
/// # Implementations
///
/// - [`crate::infrastructure::reviews::ExternalReviewRepository`] - External API
///   guarded by a circuit breaker, with deterministic fallback data
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Fetches reviews and statistics for a product.
    ///
    /// `page` restricts the returned review list; `None` returns all reviews.
    /// Statistics always describe the full set.
    async fn get_product_reviews(
        &self,
        product_id: &ProductId,
        page: Option<ReviewPage>,
    ) -> ProductReviews;
}
