//! Product review retrieval service.

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::domain::entities::{ProductId, ProductReviews, ReviewPage};
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;

/// Service for retrieving reviews for the storefront.
///
/// Validates the caller's input and delegates to the repository. The
/// repository itself never fails, so the only errors here are input errors.
pub struct ReviewService<R: ReviewRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: ReviewRepository + ?Sized> ReviewService<R> {
    /// Creates a new review service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Retrieves reviews and statistics for a product.
    ///
    /// `page` windows the review list; statistics always cover all reviews.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the product id is blank.
    pub async fn product_reviews(
        &self,
        raw_product_id: &str,
        page: Option<ReviewPage>,
    ) -> Result<ProductReviews, AppError> {
        let product_id = ProductId::parse(raw_product_id).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "product_id": raw_product_id }))
        })?;

        let reviews = self.repository.get_product_reviews(&product_id, page).await;
        debug!(
            product_id = %product_id,
            reviews = reviews.reviews.len(),
            review_count = reviews.stats.review_count(),
            "Fetched product reviews"
        );

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockReviewRepository;
    use mockall::predicate::*;

    #[tokio::test]
    async fn test_product_reviews_delegates_with_trimmed_id() {
        let mut mock_repo = MockReviewRepository::new();
        let expected_id = ProductId::parse("P1").unwrap();
        let page = ReviewPage::new(5, 10);

        mock_repo
            .expect_get_product_reviews()
            .with(eq(expected_id.clone()), eq(Some(page)))
            .times(1)
            .returning(|id, _| ProductReviews::empty(id.clone()));

        let service = ReviewService::new(Arc::new(mock_repo));
        let result = service.product_reviews("  P1 ", Some(page)).await.unwrap();

        assert!(result.reviews.is_empty());
        assert_eq!(result.stats.product_id(), &expected_id);
    }

    #[tokio::test]
    async fn test_product_reviews_blank_id() {
        let mut mock_repo = MockReviewRepository::new();
        mock_repo.expect_get_product_reviews().times(0);

        let service = ReviewService::new(Arc::new(mock_repo));
        let result = service.product_reviews("   ", None).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_service_over_trait_object() {
        let mut mock_repo = MockReviewRepository::new();
        mock_repo
            .expect_get_product_reviews()
            .returning(|id, _| ProductReviews::empty(id.clone()));

        let repository: Arc<dyn ReviewRepository> = Arc::new(mock_repo);
        let service = ReviewService::new(repository);

        assert!(service.product_reviews("sku-1", None).await.is_ok());
    }
}
