//! Wire format of the review API and the normalized transfer shape.
//!
//! The upstream contract is loose and has drifted between versions, so every
//! wire field is optional, camelCase and snake_case spellings are both
//! accepted, and a field with an unexpected type reads as absent instead of
//! failing the whole document. Malformed entries in the review list are
//! skipped individually.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use serde_with::{DefaultOnError, VecSkipError, serde_as};

use super::error::ReviewApiError;
use crate::utils::rating_parser::{
    DEFAULT_AVERAGE_RATING, formatted_rating_or_default, rating_from_value,
    review_count_from_value,
};

/// Top-level response of `GET /api/v1/group-reviews`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupReviewsResponse {
    /// Identifier of the group the upstream reviewed (not our product).
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "product_id", alias = "groupId", alias = "group_id")]
    pub product_id: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "product_name")]
    pub product_name: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub reviews: Option<ReviewsDetailDto>,
}

/// Aggregate block holding display-formatted stats and the review list.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsDetailDto {
    /// e.g. `"★★★★½ (4.5 av 5)"`
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "formatted_rating")]
    pub formatted_rating: Option<String>,

    /// Plain numeric average, sent by some API versions instead of the formatted one.
    #[serde(default, alias = "average_rating")]
    pub average_rating: Option<Value>,

    /// e.g. `"12 st"`, sometimes a bare number.
    #[serde(default, alias = "total_reviews")]
    pub total_reviews: Option<Value>,

    #[serde_as(as = "DefaultOnError<Option<VecSkipError<_>>>")]
    #[serde(default)]
    pub reviews: Option<Vec<ReviewContentDto>>,
}

/// A single review as sent by the API.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewContentDto {
    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "reviewId", alias = "review_id")]
    pub id: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "customer_name", alias = "author", alias = "reviewerName")]
    pub customer_name: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub title: Option<String>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "text", alias = "body")]
    pub content: Option<String>,

    #[serde(default)]
    pub rating: Option<Value>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default, alias = "created_at", alias = "date")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub status: Option<String>,
}

/// One review after tolerant parsing; still unvalidated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalReview {
    pub id: Option<String>,
    pub customer_name: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub rating: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Aggregate statistics after tolerant parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalStats {
    pub average_rating: f64,
    pub review_count: u32,
}

impl ExternalStats {
    pub fn zero() -> Self {
        Self {
            average_rating: 0.0,
            review_count: 0,
        }
    }
}

/// Normalized result of one review API call.
///
/// `None` in either field means the upstream omitted that part; deciding
/// whether that is acceptable is up to the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExternalReviewBatch {
    pub group: Option<String>,
    pub reviews: Option<Vec<ExternalReview>>,
    pub stats: Option<ExternalStats>,
}

impl ExternalReviewBatch {
    /// The "no reviews exist" sentinel: empty list and zeroed stats.
    pub fn empty() -> Self {
        Self {
            group: None,
            reviews: Some(Vec::new()),
            stats: Some(ExternalStats::zero()),
        }
    }

    pub fn review_count(&self) -> usize {
        self.reviews.as_ref().map_or(0, Vec::len)
    }
}

impl From<ReviewContentDto> for ExternalReview {
    fn from(dto: ReviewContentDto) -> Self {
        Self {
            id: dto.id,
            customer_name: dto.customer_name,
            title: dto.title,
            content: dto.content,
            rating: dto.rating.as_ref().and_then(rating_from_value),
            created_at: dto.created_at,
            status: dto.status,
        }
    }
}

impl ReviewsDetailDto {
    fn stats(&self) -> Option<ExternalStats> {
        if self.formatted_rating.is_none()
            && self.average_rating.is_none()
            && self.total_reviews.is_none()
        {
            return None;
        }

        let average_rating = self
            .formatted_rating
            .as_deref()
            .map(formatted_rating_or_default)
            .or_else(|| {
                self.average_rating
                    .as_ref()
                    .and_then(rating_from_value)
                    .map(|r| r.clamp(0.0, 5.0))
            })
            .unwrap_or(DEFAULT_AVERAGE_RATING);

        let review_count = self
            .total_reviews
            .as_ref()
            .map_or(0, review_count_from_value);

        Some(ExternalStats {
            average_rating,
            review_count,
        })
    }
}

impl From<GroupReviewsResponse> for ExternalReviewBatch {
    fn from(response: GroupReviewsResponse) -> Self {
        let Some(detail) = response.reviews else {
            return Self {
                group: response.product_id,
                reviews: None,
                stats: None,
            };
        };

        let mut stats = detail.stats();
        let reviews: Option<Vec<ExternalReview>> = detail
            .reviews
            .map(|items| items.into_iter().map(ExternalReview::from).collect());

        // An explicitly empty list is a normal "no reviews" answer.
        if stats.is_none() && reviews.as_ref().is_some_and(Vec::is_empty) {
            stats = Some(ExternalStats::zero());
        }

        Self {
            group: response.product_id,
            reviews,
            stats,
        }
    }
}

/// Decodes a review API response body.
///
/// A bare empty JSON array is the explicit empty result.
///
/// # Errors
///
/// Returns [`ReviewApiError::Decode`] if the body is not JSON or not an object.
pub fn parse_group_reviews(body: &[u8]) -> Result<ExternalReviewBatch, ReviewApiError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ReviewApiError::Decode(e.to_string()))?;

    if value.as_array().is_some_and(Vec::is_empty) {
        return Ok(ExternalReviewBatch::empty());
    }

    let response: GroupReviewsResponse =
        serde_json::from_value(value).map_err(|e| ReviewApiError::Decode(e.to_string()))?;

    Ok(response.into())
}
