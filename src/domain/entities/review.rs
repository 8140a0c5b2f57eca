//! Review entity and its validation rules.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::{ProductId, ReviewStatus};

/// Lowest rating a review may carry.
pub const MIN_RATING: i32 = 1;
/// Highest rating a review may carry.
pub const MAX_RATING: i32 = 5;

/// Validation failures raised by the review value types.
#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    #[error("product id must not be empty")]
    EmptyProductId,

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i32),

    #[error("average rating must be between 0 and 5, got {0}")]
    AverageOutOfRange(f64),
}

/// Input data for constructing a [`Review`].
#[derive(Debug, Clone)]
pub struct NewReview {
    pub id: Uuid,
    pub product_id: ProductId,
    pub customer_name: String,
    pub title: String,
    pub content: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub status: ReviewStatus,
}

/// A customer review of a product.
///
/// Fields are private: [`Review::new`] is the only way to obtain an instance, so
/// every `Review` in the system has a rating in `1..=5` and non-blank texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    id: Uuid,
    product_id: ProductId,
    customer_name: String,
    title: String,
    content: String,
    rating: u8,
    created_at: DateTime<Utc>,
    status: ReviewStatus,
}

impl Review {
    /// Validates the input and builds a review.
    ///
    /// # Errors
    ///
    /// - [`ReviewError::EmptyField`] if the customer name, title or content is blank
    /// - [`ReviewError::RatingOutOfRange`] if the rating is outside `1..=5`
    pub fn new(input: NewReview) -> Result<Self, ReviewError> {
        require_text("customer_name", &input.customer_name)?;
        require_text("title", &input.title)?;
        require_text("content", &input.content)?;

        if !(MIN_RATING..=MAX_RATING).contains(&input.rating) {
            return Err(ReviewError::RatingOutOfRange(input.rating));
        }

        Ok(Self {
            id: input.id,
            product_id: input.product_id,
            customer_name: input.customer_name,
            title: input.title,
            content: input.content,
            rating: input.rating as u8,
            created_at: input.created_at,
            status: input.status,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), ReviewError> {
    if value.trim().is_empty() {
        return Err(ReviewError::EmptyField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> NewReview {
        NewReview {
            id: Uuid::new_v4(),
            product_id: ProductId::parse("P1").unwrap(),
            customer_name: "Alice".to_string(),
            title: "Great product!".to_string(),
            content: "I am very happy with this product.".to_string(),
            rating: 5,
            created_at: Utc::now(),
            status: ReviewStatus::Approved,
        }
    }

    #[test]
    fn test_review_creation() {
        let input = valid_input();
        let review = Review::new(input.clone()).unwrap();

        assert_eq!(review.id(), input.id);
        assert_eq!(review.product_id().as_str(), "P1");
        assert_eq!(review.customer_name(), "Alice");
        assert_eq!(review.title(), "Great product!");
        assert_eq!(review.content(), "I am very happy with this product.");
        assert_eq!(review.rating(), 5);
        assert_eq!(review.created_at(), input.created_at);
        assert_eq!(review.status(), ReviewStatus::Approved);
    }

    #[test]
    fn test_rating_bounds_are_inclusive() {
        for rating in MIN_RATING..=MAX_RATING {
            let review = Review::new(NewReview {
                rating,
                ..valid_input()
            });
            assert!(review.is_ok(), "rating {rating} should be accepted");
        }
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        for rating in [-1, 0, 6, 100] {
            let result = Review::new(NewReview {
                rating,
                ..valid_input()
            });
            assert_eq!(result.unwrap_err(), ReviewError::RatingOutOfRange(rating));
        }
    }

    #[test]
    fn test_blank_customer_name_is_rejected() {
        for name in ["", "   ", "\t\n"] {
            let result = Review::new(NewReview {
                customer_name: name.to_string(),
                ..valid_input()
            });
            assert_eq!(
                result.unwrap_err(),
                ReviewError::EmptyField {
                    field: "customer_name"
                }
            );
        }
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let result = Review::new(NewReview {
            title: "  ".to_string(),
            ..valid_input()
        });
        assert_eq!(result.unwrap_err(), ReviewError::EmptyField { field: "title" });
    }

    #[test]
    fn test_blank_content_is_rejected() {
        let result = Review::new(NewReview {
            content: String::new(),
            ..valid_input()
        });
        assert_eq!(
            result.unwrap_err(),
            ReviewError::EmptyField { field: "content" }
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ReviewError::RatingOutOfRange(7).to_string(),
            "rating must be between 1 and 5, got 7"
        );
        assert_eq!(
            ReviewError::EmptyField { field: "title" }.to_string(),
            "title must not be empty"
        );
    }
}
