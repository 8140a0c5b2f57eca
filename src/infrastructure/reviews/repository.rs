//! Circuit-breaker guarded review repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::client::ReviewSource;
use super::dto::{ExternalReview, ExternalReviewBatch};
use super::error::ReviewApiError;
use super::mock_generator::MockReviewGenerator;
use crate::domain::entities::{
    MAX_RATING, MIN_RATING, NewReview, ProductId, ProductReviews, Review, ReviewPage,
    ReviewStats, ReviewStatus,
};
use crate::domain::repositories::ReviewRepository;
use crate::infrastructure::resilience::CircuitBreaker;

/// Placeholder for a review without an author.
pub const UNKNOWN_CUSTOMER: &str = "Unknown";
/// Placeholder for a review without a title.
pub const MISSING_TITLE: &str = "No Title";
/// Placeholder for a review without text.
pub const MISSING_CONTENT: &str = "No Content";

/// Rating used when neither the review nor the aggregate offers a usable one.
const MIDPOINT_RATING: i32 = 3;

/// Review repository backed by the external review API.
///
/// Every call goes through the circuit breaker. Whenever the upstream cannot
/// be trusted (breaker open, transport failure, bad status, undecodable or
/// incomplete body) the result is synthesized by [`MockReviewGenerator`]
/// instead. Callers never see an error.
///
/// Pagination is applied locally after the fetch: the group endpoint has no
/// paging parameters, so the whole group feed is fetched and then windowed.
/// Statistics always describe the full set.
pub struct ExternalReviewRepository<S: ReviewSource + ?Sized> {
    source: Arc<S>,
    breaker: Arc<CircuitBreaker>,
    fallback: MockReviewGenerator,
}

impl<S: ReviewSource + ?Sized> ExternalReviewRepository<S> {
    pub fn new(source: Arc<S>, breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            source,
            breaker,
            fallback: MockReviewGenerator::new(),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    async fn fetch_guarded(&self, product_id: &ProductId) -> ProductReviews {
        let permit = match self.breaker.try_acquire() {
            Ok(permit) => permit,
            Err(broken) => {
                warn!(
                    product_id = %product_id,
                    breaker = broken.name,
                    retry_after_secs = broken.retry_after.map(|d| d.as_secs()),
                    "Review API circuit is open, serving fallback reviews"
                );
                counter!("review_fallback_total", "reason" => "circuit_open").increment(1);
                return self.fallback.generate(product_id);
            }
        };

        let trial = permit.is_trial();
        match self.fetch_and_map(product_id).await {
            Ok(reviews) => {
                permit.success();
                counter!("review_fetch_total", "outcome" => "upstream").increment(1);
                debug!(
                    product_id = %product_id,
                    reviews = reviews.reviews.len(),
                    trial,
                    "Served reviews from review API"
                );
                reviews
            }
            Err(e) => {
                let kind = e.kind();
                permit.failure(kind);
                error!(
                    product_id = %product_id,
                    error = %e,
                    kind = %kind,
                    trial,
                    failures = self.breaker.failure_count(),
                    "Review API call failed, serving fallback reviews"
                );
                counter!("review_fetch_total", "outcome" => "fallback").increment(1);
                counter!("review_fallback_total", "reason" => kind.as_str()).increment(1);
                self.fallback.generate(product_id)
            }
        }
    }

    async fn fetch_and_map(&self, product_id: &ProductId) -> Result<ProductReviews, ReviewApiError> {
        let ExternalReviewBatch { reviews, stats, .. } =
            self.source.fetch_reviews(product_id).await?;

        let items = reviews
            .ok_or_else(|| ReviewApiError::Incomplete("missing reviews collection".to_string()))?;
        let stats =
            stats.ok_or_else(|| ReviewApiError::Incomplete("missing review statistics".to_string()))?;

        let stats = ReviewStats::new(product_id.clone(), stats.average_rating, stats.review_count)
            .map_err(|e| ReviewApiError::Incomplete(e.to_string()))?;

        let fetched_at = Utc::now();
        let reviews = items
            .into_iter()
            .filter_map(|item| map_review(product_id, item, stats.average_rating(), fetched_at))
            .collect();

        Ok(ProductReviews::new(reviews, stats))
    }
}

#[async_trait]
impl<S: ReviewSource + ?Sized> ReviewRepository for ExternalReviewRepository<S> {
    async fn get_product_reviews(
        &self,
        product_id: &ProductId,
        page: Option<ReviewPage>,
    ) -> ProductReviews {
        let reviews = self.fetch_guarded(product_id).await;
        match page {
            Some(page) => reviews.paginate(page),
            None => reviews,
        }
    }
}

/// Turns one external review into a domain [`Review`].
///
/// Gaps are filled rather than rejected: a fresh id for an unparseable one,
/// placeholder texts, a rating derived from the aggregate average, the fetch
/// time as timestamp. A review still failing validation is logged and skipped
/// so the rest of the batch survives.
fn map_review(
    product_id: &ProductId,
    external: ExternalReview,
    average_rating: f64,
    fetched_at: DateTime<Utc>,
) -> Option<Review> {
    let id = external
        .id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw.trim()).ok())
        .unwrap_or_else(Uuid::new_v4);

    // The group feed only publishes moderated reviews.
    let status = match external.status.as_deref().map(str::trim) {
        None | Some("") => ReviewStatus::Approved,
        raw => ReviewStatus::from_source(raw),
    };

    let review = Review::new(NewReview {
        id,
        product_id: product_id.clone(),
        customer_name: text_or(external.customer_name, UNKNOWN_CUSTOMER),
        title: text_or(external.title, MISSING_TITLE),
        content: text_or(external.content, MISSING_CONTENT),
        rating: resolve_rating(external.rating, average_rating),
        created_at: external.created_at.unwrap_or(fetched_at),
        status,
    });

    match review {
        Ok(review) => Some(review),
        Err(e) => {
            warn!(product_id = %product_id, review_id = %id, error = %e, "Skipping invalid external review");
            None
        }
    }
}

/// Rounds a review's own rating into range, or falls back to the rounded
/// aggregate average, or to the scale midpoint.
fn resolve_rating(rating: Option<f64>, average_rating: f64) -> i32 {
    if let Some(rating) = rating.filter(|r| r.is_finite()) {
        return (rating.round() as i32).clamp(MIN_RATING, MAX_RATING);
    }

    let rounded = average_rating.round() as i32;
    if (MIN_RATING..=MAX_RATING).contains(&rounded) {
        rounded
    } else {
        MIDPOINT_RATING
    }
}

fn text_or(value: Option<String>, placeholder: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}
