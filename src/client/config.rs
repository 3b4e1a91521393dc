//! Client configuration options.

use std::time::Duration;

use crate::models::max_transaction_lookup_span;

/// Configuration for the PayPal reporting client.
///
/// # Example
///
/// ```
/// use paypal_reporting::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(60))
///     .with_user_agent("my-app/1.0")
///     .with_page_size(500);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout, applied to the credential exchange and every page
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Overrides the environment's API host (e.g. a proxy or a mock server)
    pub base_url: Option<String>,
    /// Longest date window requested in a single listing call
    pub max_lookup_span: chrono::Duration,
    /// Items per page requested from the listing endpoint; the API default
    /// applies when unset
    pub page_size: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("paypal-reporting/{} (Rust)", env!("CARGO_PKG_VERSION")),
            base_url: None,
            max_lookup_span: max_transaction_lookup_span(),
            page_size: None,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send requests to `base_url` instead of the environment's host.
    ///
    /// A path on `base_url` is kept as a prefix: with
    /// `http://proxy.internal/paypal` the token is requested from
    /// `http://proxy.internal/paypal/v1/oauth2/token`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the longest date window fetched per listing call.
    ///
    /// Must be positive; the API itself rejects windows longer than 31 days.
    pub fn with_max_lookup_span(mut self, span: chrono::Duration) -> Self {
        self.max_lookup_span = span;
        self
    }

    /// Set the number of items requested per page.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_lookup_span, chrono::Duration::days(31));
        assert!(config.base_url.is_none());
        assert!(config.page_size.is_none());
        assert!(config.user_agent.starts_with("paypal-reporting/"));
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::new()
            .with_base_url("http://127.0.0.1:8080")
            .with_max_lookup_span(chrono::Duration::days(7))
            .with_page_size(100);

        assert_eq!(config.base_url.as_deref(), Some("http://127.0.0.1:8080"));
        assert_eq!(config.max_lookup_span, chrono::Duration::days(7));
        assert_eq!(config.page_size, Some(100));
    }
}
