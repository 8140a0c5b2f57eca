//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod reviews;

pub use health::health_handler;
pub use reviews::product_reviews_handler;
