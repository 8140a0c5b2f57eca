//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! the concrete review source and the resilience machinery around it.
//!
//! # Modules
//!
//! - [`resilience`] - Circuit breaker guarding outbound calls
//! - [`reviews`] - Review API client, fallback generator and repository

pub mod resilience;
pub mod reviews;
