//! HTTP client for the external review API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use super::dto::{ExternalReviewBatch, parse_group_reviews};
use super::error::ReviewApiError;
use crate::domain::entities::ProductId;
use crate::utils::bucketing::product_group;

/// Path of the group-level review endpoint, relative to the base URL.
pub const GROUP_REVIEWS_PATH: &str = "api/v1/group-reviews";

/// Characters of the response body included in debug logs.
const BODY_PREVIEW_CHARS: usize = 500;

/// Connection settings for [`ReviewApiClient`].
#[derive(Debug, Clone)]
pub struct ReviewApiSettings {
    pub base_url: String,
    pub api_key: String,
    pub api_key_header: String,
    /// Also send the key as `Authorization: Bearer <key>`.
    pub send_bearer: bool,
    pub timeout: Duration,
}

/// Anything that can produce a normalized review batch for a product.
///
/// # Implementations
///
/// - [`ReviewApiClient`] - The external group-review API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Fetches reviews for a product.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewApiError`] for transport failures and unexpected
    /// upstream answers. "No reviews" is not an error.
    async fn fetch_reviews(
        &self,
        product_id: &ProductId,
    ) -> Result<ExternalReviewBatch, ReviewApiError>;
}

/// Client for `GET {base_url}/api/v1/group-reviews?group={bucket}`.
///
/// The upstream API knows nothing about our products and only answers
/// group-level queries. Each product is therefore mapped onto a group label
/// with [`product_group`], and the group's reviews stand in for the product's.
///
/// Requests are bounded by the configured timeout. Dropping the future returned
/// by [`ReviewSource::fetch_reviews`] aborts the request.
#[derive(Debug, Clone)]
pub struct ReviewApiClient {
    client: Client,
    endpoint: Url,
}

impl ReviewApiClient {
    /// Builds the client with authentication headers and timeout applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL, header name or key cannot be used in
    /// a request, or the HTTP client cannot be built.
    pub fn new(settings: &ReviewApiSettings) -> Result<Self> {
        let endpoint = group_reviews_endpoint(&settings.base_url)?;

        let mut headers = HeaderMap::new();
        let header_name = HeaderName::from_bytes(settings.api_key_header.as_bytes())
            .with_context(|| format!("Invalid API key header name '{}'", settings.api_key_header))?;
        let mut key_value =
            HeaderValue::from_str(&settings.api_key).context("API key is not a valid header value")?;
        key_value.set_sensitive(true);
        headers.insert(header_name, key_value);

        if settings.send_bearer {
            let mut bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key))
                .context("API key is not a valid bearer token")?;
            bearer.set_sensitive(true);
            headers.insert(AUTHORIZATION, bearer);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .context("Failed to build review API HTTP client")?;

        Ok(Self { client, endpoint })
    }

    /// Full request URL for a product.
    pub fn request_url(&self, product_id: &ProductId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("group", product_group(product_id));
        url
    }
}

#[async_trait]
impl ReviewSource for ReviewApiClient {
    async fn fetch_reviews(
        &self,
        product_id: &ProductId,
    ) -> Result<ExternalReviewBatch, ReviewApiError> {
        let group = product_group(product_id);
        let url = self.request_url(product_id);

        info!(product_id = %product_id, group, url = %url, "Requesting group reviews from review API");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::NO_CONTENT {
            info!(product_id = %product_id, group, status = status.as_u16(), "Review API has no reviews for group");
            return Ok(ExternalReviewBatch::empty());
        }

        if !status.is_success() {
            warn!(product_id = %product_id, group, status = status.as_u16(), "Review API returned error status");
            return Err(ReviewApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        info!(
            product_id = %product_id,
            group,
            status = status.as_u16(),
            bytes = body.len(),
            "Received review API response"
        );
        debug!(body = %preview(&body), "Review API response body");

        let batch = parse_group_reviews(&body)?;

        info!(
            product_id = %product_id,
            group,
            reviews = batch.review_count(),
            has_reviews = batch.reviews.is_some(),
            has_stats = batch.stats.is_some(),
            average_rating = batch.stats.map(|s| s.average_rating),
            total_reviews = batch.stats.map(|s| s.review_count),
            "Parsed review API response"
        );

        Ok(batch)
    }
}

/// Resolves the group-review endpoint against a base URL.
///
/// The base may or may not end with a slash, and may carry a path prefix.
fn group_reviews_endpoint(base_url: &str) -> Result<Url> {
    let base = format!("{}/", base_url.trim().trim_end_matches('/'));
    let base = Url::parse(&base).with_context(|| format!("Invalid review API base URL '{base_url}'"))?;
    base.join(GROUP_REVIEWS_PATH)
        .context("Failed to build group review endpoint")
}

fn preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut preview: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    if text.chars().count() > BODY_PREVIEW_CHARS {
        preview.push('…');
    }
    preview
}
