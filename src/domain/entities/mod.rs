//! Core domain entities for product reviews.
//!
//! All entities are immutable value types. Construction goes through validating
//! constructors, so an invalid instance cannot exist.
//!
//! # Entity Types
//!
//! - [`ProductId`] - Opaque, non-blank product identifier
//! - [`Review`] - A single customer review (built from [`NewReview`])
//! - [`ReviewStats`] - Average rating and review count
//! - [`ProductReviews`] - The `(reviews, stats)` pair handed to the storefront

pub mod product_id;
pub mod product_reviews;
pub mod review;
pub mod review_stats;
pub mod review_status;

pub use product_id::ProductId;
pub use product_reviews::{ProductReviews, ReviewPage};
pub use review::{MAX_RATING, MIN_RATING, NewReview, Review, ReviewError};
pub use review_stats::ReviewStats;
pub use review_status::ReviewStatus;
