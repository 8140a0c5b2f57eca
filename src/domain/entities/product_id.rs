//! Product identifier value type.

use std::fmt;

use serde::Serialize;

use super::ReviewError;

/// Opaque identifier of a storefront product.
///
/// The review subsystem never interprets the identifier beyond hashing it, so any
/// non-blank string is accepted. Surrounding whitespace is trimmed on parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Parses a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError::EmptyProductId`] if the value is empty or whitespace-only.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ReviewError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReviewError::EmptyProductId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  P1 ").unwrap();
        assert_eq!(id.as_str(), "P1");
        assert_eq!(id.to_string(), "P1");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(matches!(
            ProductId::parse(""),
            Err(ReviewError::EmptyProductId)
        ));
        assert!(matches!(
            ProductId::parse("   "),
            Err(ReviewError::EmptyProductId)
        ));
    }
}
