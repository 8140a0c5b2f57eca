//! Aggregate review statistics for a product.

use super::{ProductId, Review, ReviewError};

/// Highest possible average rating.
pub const MAX_AVERAGE_RATING: f64 = 5.0;

/// Average rating and review count for one product.
///
/// Immutable; the average is always within `0.0..=5.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewStats {
    product_id: ProductId,
    average_rating: f64,
    review_count: u32,
}

impl ReviewStats {
    /// Builds statistics after validating the average.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::AverageOutOfRange`] if the average is NaN or
    /// outside `0.0..=5.0`.
    pub fn new(
        product_id: ProductId,
        average_rating: f64,
        review_count: u32,
    ) -> Result<Self, ReviewError> {
        if !(0.0..=MAX_AVERAGE_RATING).contains(&average_rating) {
            return Err(ReviewError::AverageOutOfRange(average_rating));
        }

        Ok(Self {
            product_id,
            average_rating,
            review_count,
        })
    }

    /// Statistics for a product without reviews.
    pub fn empty(product_id: ProductId) -> Self {
        Self {
            product_id,
            average_rating: 0.0,
            review_count: 0,
        }
    }

    /// Summarizes a set of reviews: mean rating rounded to one decimal.
    ///
    /// Every [`Review`] carries a rating in `1..=5`, so the mean is in range by
    /// construction.
    pub fn summarize(product_id: ProductId, reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self::empty(product_id);
        }

        let total: u32 = reviews.iter().map(|r| u32::from(r.rating())).sum();
        let mean = f64::from(total) / reviews.len() as f64;

        Self {
            product_id,
            average_rating: round_to_tenth(mean),
            review_count: reviews.len() as u32,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn review_count(&self) -> u32 {
        self.review_count
    }
}

/// Rounds to one decimal place, halves away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
