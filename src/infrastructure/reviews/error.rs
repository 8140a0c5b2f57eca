//! Errors raised while talking to the external review API.

use thiserror::Error;

use crate::infrastructure::resilience::FailureKind;

/// A failed review API call.
///
/// Expected "no reviews" outcomes (404, 204, empty array) are not errors; they
/// come back as an empty batch.
#[derive(Debug, Error)]
pub enum ReviewApiError {
    #[error("review API request timed out: {0}")]
    Timeout(String),

    #[error("could not connect to review API: {0}")]
    Connect(String),

    #[error("review API transport error: {0}")]
    Transport(String),

    #[error("review API responded with HTTP {status}")]
    Status { status: u16 },

    #[error("could not decode review API response: {0}")]
    Decode(String),

    #[error("review API returned incomplete data: {0}")]
    Incomplete(String),
}

impl ReviewApiError {
    /// Breaker accounting class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Connect(_) => FailureKind::Connect,
            Self::Transport(_) => FailureKind::Transport,
            Self::Status { .. } => FailureKind::Status,
            Self::Decode(_) => FailureKind::Decode,
            Self::Incomplete(_) => FailureKind::Incomplete,
        }
    }
}

impl From<reqwest::Error> for ReviewApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ReviewApiError::Timeout("t".into()).kind(), FailureKind::Timeout);
        assert_eq!(ReviewApiError::Connect("c".into()).kind(), FailureKind::Connect);
        assert_eq!(ReviewApiError::Status { status: 502 }.kind(), FailureKind::Status);
        assert_eq!(ReviewApiError::Decode("d".into()).kind(), FailureKind::Decode);
        assert_eq!(
            ReviewApiError::Incomplete("stats".into()).kind(),
            FailureKind::Incomplete
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ReviewApiError::Status { status: 503 }.to_string(),
            "review API responded with HTTP 503"
        );
    }
}
