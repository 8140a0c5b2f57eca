//! Resilience primitives for calls to external services.
//!
//! - [`CircuitBreaker`] - Closed / open / half-open guard with a configurable
//!   threshold, cool-down, observation window and tripping failure kinds

mod circuit_breaker;

pub use circuit_breaker::{
    BrokenCircuit, CallPermit, CircuitBreaker, CircuitBreakerConfig, CircuitState, FailureKind,
};
