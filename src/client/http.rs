//! HTTP client implementation for the PayPal reporting API.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use url::Url;

use crate::api::TransactionsService;
use crate::auth::{Authenticator, ClientCredentials};
use crate::models::{AccessToken, TransactionRecord};
use crate::{Environment, Error, Result};

use super::config::ClientConfig;

/// The main client for interacting with the PayPal reporting API.
///
/// The client owns the HTTP connection pool, the [`Authenticator`] holding
/// the cached bearer token, and the configuration. Cloning is cheap and
/// clones share the token cache.
///
/// # Example
///
/// ```no_run
/// use chrono::{Duration, Utc};
/// use paypal_reporting::{ClientCredentials, Environment, PaypalClient};
///
/// # async fn example() -> paypal_reporting::Result<()> {
/// let client = PaypalClient::new(
///     ClientCredentials::new("client-id", "client-secret"),
///     Environment::Sandbox,
/// )?;
///
/// // Everything from the last 90 days, fetched in 31-day windows.
/// let transactions = client
///     .fetch_transactions(Utc::now() - Duration::days(90), None)
///     .await?;
/// println!("{} transactions", transactions.len());
/// # Ok(())
/// # }
/// ```
pub struct PaypalClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) authenticator: Authenticator,
    pub(crate) config: ClientConfig,
    pub(crate) base_url: Url,
}

impl PaypalClient {
    /// Create a client for `env` with the default configuration.
    ///
    /// No request is sent until the first fetch; the access token is
    /// obtained lazily.
    pub fn new(credentials: ClientCredentials, env: Environment) -> Result<Self> {
        Self::with_config(credentials, env, ClientConfig::default())
    }

    /// Create a client reading credentials from `PAYPAL_CLIENT_ID` and
    /// `PAYPAL_CLIENT_SECRET`.
    pub fn from_env(env: Environment) -> Result<Self> {
        Self::new(ClientCredentials::from_env()?, env)
    }

    /// Create a client with a custom configuration.
    pub fn with_config(
        credentials: ClientCredentials,
        env: Environment,
        config: ClientConfig,
    ) -> Result<Self> {
        let base_url = Url::parse(
            config
                .base_url
                .as_deref()
                .unwrap_or_else(|| env.api_base_url()),
        )?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid base URL: {}", base_url)));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let authenticator = Authenticator::new(http.clone(), base_url.clone(), credentials);

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                authenticator,
                config,
                base_url,
            }),
        })
    }

    /// Get the transactions service.
    pub fn transactions(&self) -> TransactionsService {
        TransactionsService::new(self.inner.clone())
    }

    /// Fetch every transaction between `start_time` and `end_time`
    /// (default: now), deduplicated.
    ///
    /// See [`TransactionsService::fetch`].
    pub async fn fetch_transactions(
        &self,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionRecord>> {
        self.transactions().fetch(start_time, end_time).await
    }

    /// Fetch a single window of transactions, without deduplication.
    ///
    /// See [`TransactionsService::fetch_batch`].
    pub async fn fetch_transactions_batch(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>> {
        self.transactions().fetch_batch(start_time, end_time).await
    }

    /// Get the authenticator holding the cached access token.
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    /// Discard the cached access token and obtain a fresh one.
    pub async fn refresh_token(&self) -> Result<()> {
        self.inner.authenticator.invalidate_and_refresh().await?;
        Ok(())
    }

    /// Get the base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    /// Build request headers with authentication.
    fn build_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token.bearer())
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(headers)
    }

    /// Make an authenticated GET request with query parameters.
    ///
    /// The bearer token is obtained from the authenticator first, which
    /// performs the credential exchange if no token is cached yet.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let token = self.authenticator.get_token().await?;

        let url = endpoint_url(&self.base_url, path);
        let headers = self.build_headers(&token)?;

        let response = self
            .http
            .get(url)
            .headers(headers)
            .query(query)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            Err(Error::from_api_response(status.as_u16(), body))
        }
    }
}

/// Append an endpoint `path` to `base_url`, keeping any path prefix the base
/// URL carries (`http://proxy/paypal` + `/v1/x` is `http://proxy/paypal/v1/x`).
pub(crate) fn endpoint_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    let joined = format!(
        "{}/{}",
        base_url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    url
}

impl Clone for PaypalClient {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl std::fmt::Debug for PaypalClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaypalClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> ClientCredentials {
        ClientCredentials::new("client-id", "client-secret")
    }

    #[test]
    fn test_uses_environment_host() {
        let client = PaypalClient::new(credentials(), Environment::Sandbox).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api-m.sandbox.paypal.com/");
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9999");
        let client = PaypalClient::with_config(credentials(), Environment::Live, config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:9999/");
    }

    #[test]
    fn test_endpoint_url_keeps_path_prefix() {
        let base = Url::parse("http://127.0.0.1:9999/paypal").unwrap();
        assert_eq!(
            endpoint_url(&base, "/v1/reporting/transactions").as_str(),
            "http://127.0.0.1:9999/paypal/v1/reporting/transactions"
        );

        let base = Url::parse("http://127.0.0.1:9999/paypal/").unwrap();
        assert_eq!(endpoint_url(&base, "/v1/oauth2/token").path(), "/paypal/v1/oauth2/token");

        let base = Url::parse("https://api-m.paypal.com").unwrap();
        assert_eq!(endpoint_url(&base, "/v1/oauth2/token").path(), "/v1/oauth2/token");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ClientConfig::default().with_base_url("not a url");
        let err = PaypalClient::with_config(credentials(), Environment::Live, config).unwrap_err();
        assert!(matches!(err, Error::UrlParse(_)));

        let config = ClientConfig::default().with_base_url("mailto:ops@example.com");
        let err = PaypalClient::with_config(credentials(), Environment::Live, config).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_debug_omits_secrets() {
        let client = PaypalClient::new(credentials(), Environment::Live).unwrap();
        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("client-secret"));
    }
}
