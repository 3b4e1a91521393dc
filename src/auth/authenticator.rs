//! Lazily-created, cached OAuth2 access token.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use super::ClientCredentials;
use crate::client::endpoint_url;
use crate::models::AccessToken;
use crate::{Error, Result};

/// Path of the OAuth2 token endpoint.
pub const TOKEN_PATH: &str = "/v1/oauth2/token";

/// Supplies the bearer token for every outbound request.
///
/// # Thread Safety
///
/// The cached token sits behind an async mutex that stays locked for the
/// whole "check the cache, else exchange and store" sequence. Concurrent
/// callers sharing one `Authenticator` therefore trigger at most one
/// credential exchange.
pub struct Authenticator {
    http: reqwest::Client,
    base_url: Url,
    credentials: ClientCredentials,
    token: Mutex<Option<AccessToken>>,
}

impl Authenticator {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, credentials: ClientCredentials) -> Self {
        Self {
            http,
            base_url,
            credentials,
            token: Mutex::new(None),
        }
    }

    /// Return the cached token, exchanging credentials for one first if
    /// none is cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the exchange fails. Nothing is
    /// cached in that case, so the next call tries again.
    pub async fn get_token(&self) -> Result<AccessToken> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.exchange().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Discard the cached token and exchange credentials for a new one.
    ///
    /// The cache is left empty if the exchange fails.
    pub async fn invalidate_and_refresh(&self) -> Result<AccessToken> {
        let mut cached = self.token.lock().await;
        *cached = None;

        let token = self.exchange().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Whether a token is currently cached.
    pub async fn has_token(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Client id the authenticator exchanges.
    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// Token endpoint with the client id and secret embedded as userinfo.
    /// The transport turns them into a basic `Authorization` header.
    fn token_url(&self) -> Result<Url> {
        let mut url = endpoint_url(&self.base_url, TOKEN_PATH);
        url.set_username(self.credentials.client_id())
            .and_then(|_| url.set_password(Some(self.credentials.client_secret())))
            .map_err(|_| {
                Error::Config(format!(
                    "Cannot embed credentials in token URL for host {:?}",
                    self.base_url.host_str()
                ))
            })?;
        Ok(url)
    }

    async fn exchange(&self) -> Result<AccessToken> {
        tracing::info!(client_id = self.client_id(), "Requesting OAuth2 access token");

        let response = self
            .http
            .post(self.token_url()?)
            .header(ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                Error::Authentication(format!("Token exchange request failed: {}", e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            return Err(Error::Authentication(format!(
                "Token exchange failed ({}): {}",
                status.as_u16(),
                body
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            Error::Authentication(format!("Token exchange response unreadable: {}", e.without_url()))
        })?;
        let token_response: TokenResponse = serde_json::from_slice(&bytes).map_err(|e| {
            Error::Authentication(format!("Token exchange response malformed: {}", e))
        })?;

        tracing::info!(
            expires_in = ?token_response.expires_in,
            "Obtained OAuth2 access token"
        );

        Ok(AccessToken::new(token_response.access_token))
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}
