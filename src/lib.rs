//! # Merch Reviews
//!
//! Product reviews for a storefront, backed by an external review API and
//! served through Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Review entities and the repository trait
//! - **Application Layer** ([`application`]) - Input validation and service orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Review API client, circuit breaker, fallback
//! - **API Layer** ([`api`]) - JSON handlers, DTOs, and middleware
//! - **Web Layer** ([`web`]) - Server-rendered review page
//!
//! ## Resilience
//!
//! The review API is unreliable. Every call goes through a circuit breaker;
//! when it is open, or a call fails or returns incomplete data, reviews are
//! synthesized deterministically from the product id. Review requests never
//! fail because of the upstream.
//!
//! ## Quick Start
//!
//! ```bash
//! export REVIEW_API_BASE_URL="https://reviews.example.com"
//! export REVIEW_API_KEY="..."
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::ReviewService;
    pub use crate::domain::entities::{ProductId, ProductReviews, Review, ReviewPage, ReviewStats};
    pub use crate::domain::repositories::ReviewRepository;
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
