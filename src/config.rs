//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! ```bash
//! export REVIEW_API_BASE_URL="https://reviews.example.com"
//! export REVIEW_API_KEY="..."
//! ```
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `REVIEW_API_KEY_HEADER` - Header carrying the API key (default: `X-API-KEY`)
//! - `REVIEW_API_SEND_BEARER` - Also send `Authorization: Bearer <key>` (default: `false`)
//! - `REVIEW_API_TIMEOUT_SECONDS` - Request timeout (default: 30, range: 1-300)
//! - `CIRCUIT_BREAKER_FAILURE_THRESHOLD` - Failures before opening (default: 3)
//! - `CIRCUIT_BREAKER_DURATION_SECONDS` - Cool-down while open (default: 30)
//! - `CIRCUIT_BREAKER_WINDOW_SECONDS` - Failure observation window (default: 60)
//! - `CIRCUIT_BREAKER_TRIP_ON` - Comma-separated failure kinds that count
//!   (`timeout`, `connect`, `transport`, `status`, `decode`, `incomplete`,
//!   or `all`; default: `all`)

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::infrastructure::resilience::{CircuitBreakerConfig, FailureKind};
use crate::infrastructure::reviews::ReviewApiSettings;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,

    // ── Review API ──────────────────────────────────────────────────────────
    /// Base URL of the external review API (`REVIEW_API_BASE_URL`).
    pub review_api_base_url: String,
    /// API key sent with every request (`REVIEW_API_KEY`). Never logged.
    pub review_api_key: String,
    pub review_api_key_header: String,
    pub review_api_send_bearer: bool,
    pub review_api_timeout_seconds: u64,

    // ── Circuit breaker ─────────────────────────────────────────────────────
    pub breaker_failure_threshold: u32,
    pub breaker_duration_seconds: u64,
    pub breaker_window_seconds: u64,
    pub breaker_trip_on: Vec<FailureKind>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if review API settings are missing or
    /// `CIRCUIT_BREAKER_TRIP_ON` names an unknown failure kind.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let review_api_base_url =
            env::var("REVIEW_API_BASE_URL").context("REVIEW_API_BASE_URL must be set")?;
        let review_api_key = env::var("REVIEW_API_KEY").context("REVIEW_API_KEY must be set")?;
        let review_api_key_header =
            env::var("REVIEW_API_KEY_HEADER").unwrap_or_else(|_| "X-API-KEY".to_string());

        let review_api_send_bearer = env::var("REVIEW_API_SEND_BEARER")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let review_api_timeout_seconds = env::var("REVIEW_API_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let breaker_failure_threshold = env::var("CIRCUIT_BREAKER_FAILURE_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        let breaker_duration_seconds = env::var("CIRCUIT_BREAKER_DURATION_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let breaker_window_seconds = env::var("CIRCUIT_BREAKER_WINDOW_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let breaker_trip_on = match env::var("CIRCUIT_BREAKER_TRIP_ON") {
            Ok(raw) => parse_trip_on(&raw).context("Invalid CIRCUIT_BREAKER_TRIP_ON")?,
            Err(_) => FailureKind::ALL.to_vec(),
        };

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            review_api_base_url,
            review_api_key,
            review_api_key_header,
            review_api_send_bearer,
            review_api_timeout_seconds,
            breaker_failure_threshold,
            breaker_duration_seconds,
            breaker_window_seconds,
            breaker_trip_on,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - the review API URL is not http(s) or the key is empty
    /// - a timeout or breaker setting is zero or out of range
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.review_api_base_url.starts_with("http://")
            && !self.review_api_base_url.starts_with("https://")
        {
            anyhow::bail!(
                "REVIEW_API_BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.review_api_base_url
            );
        }

        if self.review_api_key.trim().is_empty() {
            anyhow::bail!("REVIEW_API_KEY must not be empty");
        }

        if self.review_api_key_header.trim().is_empty() {
            anyhow::bail!("REVIEW_API_KEY_HEADER must not be empty");
        }

        if !(1..=300).contains(&self.review_api_timeout_seconds) {
            anyhow::bail!(
                "REVIEW_API_TIMEOUT_SECONDS must be between 1 and 300, got {}",
                self.review_api_timeout_seconds
            );
        }

        if self.breaker_failure_threshold == 0 {
            anyhow::bail!("CIRCUIT_BREAKER_FAILURE_THRESHOLD must be at least 1");
        }
        if self.breaker_duration_seconds == 0 {
            anyhow::bail!("CIRCUIT_BREAKER_DURATION_SECONDS must be greater than 0");
        }
        if self.breaker_window_seconds == 0 {
            anyhow::bail!("CIRCUIT_BREAKER_WINDOW_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// Connection settings for the review API client.
    pub fn review_api_settings(&self) -> ReviewApiSettings {
        ReviewApiSettings {
            base_url: self.review_api_base_url.clone(),
            api_key: self.review_api_key.clone(),
            api_key_header: self.review_api_key_header.clone(),
            send_bearer: self.review_api_send_bearer,
            timeout: Duration::from_secs(self.review_api_timeout_seconds),
        }
    }

    /// Policy for the review API circuit breaker.
    pub fn circuit_breaker_config(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.breaker_failure_threshold,
            break_duration: Duration::from_secs(self.breaker_duration_seconds),
            failure_window: Duration::from_secs(self.breaker_window_seconds),
            trip_on: self.breaker_trip_on.clone(),
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        let trip_on: Vec<&str> = self.breaker_trip_on.iter().map(FailureKind::as_str).collect();

        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Review API: {}", self.review_api_base_url);
        tracing::info!(
            "  Review API key: {} (header {}{})",
            mask_secret(&self.review_api_key),
            self.review_api_key_header,
            if self.review_api_send_bearer { " + bearer" } else { "" }
        );
        tracing::info!("  Review API timeout: {}s", self.review_api_timeout_seconds);
        tracing::info!(
            "  Circuit breaker: {} failures in {}s, open for {}s, trips on [{}]",
            self.breaker_failure_threshold,
            self.breaker_window_seconds,
            self.breaker_duration_seconds,
            trip_on.join(", ")
        );
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Parses a comma-separated list of failure kinds; `all` selects every kind.
fn parse_trip_on(raw: &str) -> Result<Vec<FailureKind>> {
    let mut kinds = Vec::new();
    for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if item.eq_ignore_ascii_case("all") {
            return Ok(FailureKind::ALL.to_vec());
        }
        let kind: FailureKind = item.parse().map_err(anyhow::Error::msg)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        anyhow::bail!("at least one failure kind is required");
    }
    Ok(kinds)
}

/// Masks a secret for logging, keeping only its first two characters.
///
/// - `sk_live_abcdef` → `sk***`
/// - `abc` → `***`
pub fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 4 {
        return "***".to_string();
    }
    let prefix: String = secret.chars().take(2).collect();
    format!("{prefix}***")
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ALL_VARS: [&str; 10] = [
        "REVIEW_API_BASE_URL",
        "REVIEW_API_KEY",
        "REVIEW_API_KEY_HEADER",
        "REVIEW_API_SEND_BEARER",
        "REVIEW_API_TIMEOUT_SECONDS",
        "CIRCUIT_BREAKER_FAILURE_THRESHOLD",
        "CIRCUIT_BREAKER_DURATION_SECONDS",
        "CIRCUIT_BREAKER_WINDOW_SECONDS",
        "CIRCUIT_BREAKER_TRIP_ON",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for var in ALL_VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            listen_addr: "0.0.0.0:3000".to_string(),
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            review_api_base_url: "https://reviews.example.com".to_string(),
            review_api_key: "test-key".to_string(),
            review_api_key_header: "X-API-KEY".to_string(),
            review_api_send_bearer: false,
            review_api_timeout_seconds: 30,
            breaker_failure_threshold: 3,
            breaker_duration_seconds: 30,
            breaker_window_seconds: 60,
            breaker_trip_on: FailureKind::ALL.to_vec(),
        }
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk_live_abcdef"), "sk***");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "***");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.listen_addr = "3000".to_string();
        assert!(config.validate().is_err());
        config.listen_addr = "0.0.0.0:3000".to_string();

        config.review_api_base_url = "ftp://reviews.example.com".to_string();
        assert!(config.validate().is_err());
        config.review_api_base_url = "http://localhost:8080".to_string();

        config.review_api_key = "  ".to_string();
        assert!(config.validate().is_err());
        config.review_api_key = "k".to_string();

        config.review_api_timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.review_api_timeout_seconds = 301;
        assert!(config.validate().is_err());
        config.review_api_timeout_seconds = 300;

        config.breaker_failure_threshold = 0;
        assert!(config.validate().is_err());
        config.breaker_failure_threshold = 1;

        config.breaker_duration_seconds = 0;
        assert!(config.validate().is_err());

        config.breaker_duration_seconds = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_derived_settings() {
        let config = valid_config();

        let settings = config.review_api_settings();
        assert_eq!(settings.base_url, "https://reviews.example.com");
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(!settings.send_bearer);

        let breaker = config.circuit_breaker_config();
        assert_eq!(breaker.failure_threshold, 3);
        assert_eq!(breaker.break_duration, Duration::from_secs(30));
        assert_eq!(breaker.failure_window, Duration::from_secs(60));
        assert_eq!(breaker.trip_on, FailureKind::ALL.to_vec());
    }

    #[test]
    fn test_parse_trip_on() {
        assert_eq!(
            parse_trip_on("timeout, connect,timeout").unwrap(),
            vec![FailureKind::Timeout, FailureKind::Connect]
        );
        assert_eq!(parse_trip_on("ALL").unwrap(), FailureKind::ALL.to_vec());
        assert!(parse_trip_on("timeout,flaky").is_err());
        assert!(parse_trip_on(" , ").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REVIEW_API_BASE_URL", "http://localhost:9000");
            env::set_var("REVIEW_API_KEY", "abc123");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.review_api_key_header, "X-API-KEY");
        assert!(!config.review_api_send_bearer);
        assert_eq!(config.review_api_timeout_seconds, 30);
        assert_eq!(config.breaker_failure_threshold, 3);
        assert_eq!(config.breaker_duration_seconds, 30);
        assert_eq!(config.breaker_window_seconds, 60);
        assert_eq!(config.breaker_trip_on, FailureKind::ALL.to_vec());
        assert!(config.validate().is_ok());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REVIEW_API_BASE_URL", "http://localhost:9000");
            env::set_var("REVIEW_API_KEY", "abc123");
            env::set_var("REVIEW_API_KEY_HEADER", "X-Reviews-Key");
            env::set_var("REVIEW_API_SEND_BEARER", "TRUE");
            env::set_var("REVIEW_API_TIMEOUT_SECONDS", "5");
            env::set_var("CIRCUIT_BREAKER_FAILURE_THRESHOLD", "7");
            env::set_var("CIRCUIT_BREAKER_TRIP_ON", "timeout,connect");
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.review_api_key_header, "X-Reviews-Key");
        assert!(config.review_api_send_bearer);
        assert_eq!(config.review_api_timeout_seconds, 5);
        assert_eq!(config.breaker_failure_threshold, 7);
        assert_eq!(
            config.breaker_trip_on,
            vec![FailureKind::Timeout, FailureKind::Connect]
        );

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_requires_review_api() {
        clear_env();
        assert!(Config::from_env().is_err());

        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REVIEW_API_BASE_URL", "http://localhost:9000");
        }
        assert!(Config::from_env().is_err());

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_unknown_trip_kind() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("REVIEW_API_BASE_URL", "http://localhost:9000");
            env::set_var("REVIEW_API_KEY", "abc123");
            env::set_var("CIRCUIT_BREAKER_TRIP_ON", "sometimes");
        }

        assert!(Config::from_env().is_err());

        clear_env();
    }
}
