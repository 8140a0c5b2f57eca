//! External review API integration.
//!
//! - [`ReviewApiClient`] - HTTP client for the bucketed group-review endpoint
//! - [`MockReviewGenerator`] - Deterministic fallback synthesis
//! - [`ExternalReviewRepository`] - Breaker-guarded [`ReviewRepository`]
//!   implementation that never fails
//!
//! [`ReviewRepository`]: crate::domain::repositories::ReviewRepository

mod client;
mod dto;
mod error;
mod mock_generator;
mod repository;

pub use client::{GROUP_REVIEWS_PATH, ReviewApiClient, ReviewApiSettings, ReviewSource};
pub use dto::{ExternalReview, ExternalReviewBatch, ExternalStats, parse_group_reviews};
pub use error::ReviewApiError;
pub use mock_generator::MockReviewGenerator;
pub use repository::{
    ExternalReviewRepository, MISSING_CONTENT, MISSING_TITLE, UNKNOWN_CUSTOMER,
};
