//! Business logic services for the application layer.

pub mod review_service;

pub use review_service::ReviewService;
