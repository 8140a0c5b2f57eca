//! Utility functions shared across layers.
//!
//! - [`bucketing`] - Stable product hashing and group bucketing
//! - [`rating_parser`] - Tolerant parsing of decorative rating/count strings

pub mod bucketing;
pub mod rating_parser;
