//! Domain layer containing review entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Immutable review value types
//! - [`repositories`] - Data access trait definitions
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Validation lives in entity constructors; nothing bypasses them

pub mod entities;
pub mod repositories;
