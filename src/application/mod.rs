//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin tool.
//!
//! # Available Services
//!
//! - [`services::review_service::ReviewService`] - Product review retrieval

pub mod services;
