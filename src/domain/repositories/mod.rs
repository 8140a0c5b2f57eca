//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract; implementations live in
//! `crate::infrastructure`. Mock implementations are generated via `mockall`
//! for unit tests.

pub mod review_repository;

pub use review_repository::ReviewRepository;

#[cfg(test)]
pub use review_repository::MockReviewRepository;
