//! Error types for the PayPal reporting client.
//!
//! Failures fall into three groups:
//!
//! - [`Error::Authentication`]: the OAuth2 credential exchange failed.
//! - [`Error::Request`]: a listing request failed. It names the endpoint
//!   path and the date window being fetched, and wraps the transport-level
//!   cause ([`Error::Http`], [`Error::Json`] or [`Error::Api`]).
//! - [`Error::InvalidRange`] and the other input/configuration variants,
//!   raised before any request is sent.
//!
//! Nothing in this crate retries. Every error aborts the fetch in flight and
//! no partial result is returned.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::models::DateWindow;

/// A specialized `Result` type for PayPal reporting operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all PayPal reporting operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed at the transport level (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-2xx response
    #[error("API error: status={status}, name={name:?}, message={message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error name from the API (e.g. `INVALID_REQUEST`)
        name: Option<String>,
        /// Human-readable error message
        message: String,
        /// PayPal correlation id, quoted when contacting support
        debug_id: Option<String>,
        /// Raw response body for debugging
        body: Value,
    },

    /// The OAuth2 credential exchange failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A paginated request failed; the whole fetch was aborted.
    #[error("Request to {path} failed{}: {source}", describe_window(.window))]
    Request {
        /// Endpoint path that failed
        path: String,
        /// Date window being fetched when the failure occurred
        window: Option<DateWindow>,
        /// Underlying cause
        #[source]
        source: Box<Error>,
    },

    /// The end of the requested range lies before its start.
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested start
        start: DateTime<Utc>,
        /// Requested end
        end: DateTime<Utc>,
    },

    /// Invalid input provided to a function
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_window(window: &Option<DateWindow>) -> String {
    match window {
        Some(window) => format!(" for window {}", window),
        None => String::new(),
    }
}

impl Error {
    /// Returns `true` if this error is potentially transient.
    ///
    /// The client never retries on its own; this is a hint for callers that
    /// schedule their own re-invocation.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) => true,
            Error::Api { status, .. } => *status == 429 || *status >= 500,
            Error::Request { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication(_))
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => (400..500).contains(status),
            Error::Request { source, .. } => source.is_client_error(),
            Error::InvalidRange { .. }
            | Error::InvalidInput(_)
            | Error::Config(_)
            | Error::UrlParse(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Api { status, .. } => *status >= 500,
            Error::Request { source, .. } => source.is_server_error(),
            _ => false,
        }
    }

    /// HTTP status code carried by this error, looking through
    /// [`Error::Request`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            Error::Request { source, .. } => source.status(),
            _ => None,
        }
    }

    /// The date window named by a request failure.
    pub fn window(&self) -> Option<&DateWindow> {
        match self {
            Error::Request { window, .. } => window.as_ref(),
            _ => None,
        }
    }

    /// Wrap a transport-level failure with the request it belongs to.
    pub(crate) fn request(path: &str, window: Option<DateWindow>, source: Error) -> Self {
        Error::Request {
            path: path.to_string(),
            window,
            source: Box::new(source),
        }
    }

    /// Create an API error from a response
    pub(crate) fn from_api_response(status: u16, body: Value) -> Self {
        let field = |key: &str| body.get(key).and_then(|v| v.as_str()).map(String::from);

        let name = field("name").or_else(|| field("error"));
        let debug_id = field("debug_id");
        let message = field("message")
            .or_else(|| field("error_description"))
            .unwrap_or_else(|| "Unknown API error".to_string());

        Error::Api {
            status,
            name,
            message,
            debug_id,
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn window() -> DateWindow {
        DateWindow::new(
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_error_retryable() {
        assert!(Error::from_api_response(503, Value::Null).is_retryable());
        assert!(Error::from_api_response(429, Value::Null).is_retryable());
        assert!(!Error::from_api_response(400, Value::Null).is_retryable());
        assert!(!Error::InvalidInput("bad".into()).is_retryable());
        assert!(!Error::Authentication("denied".into()).is_retryable());
    }

    #[test]
    fn test_error_auth() {
        assert!(Error::Authentication("failed".into()).is_auth_error());
        let wrapped = Error::request(
            "/v1/reporting/transactions",
            None,
            Error::from_api_response(401, Value::Null),
        );
        assert!(!wrapped.is_auth_error());
        assert_eq!(wrapped.status(), Some(401));
    }

    #[test]
    fn test_from_api_response() {
        let body = serde_json::json!({
            "name": "INVALID_REQUEST",
            "message": "Request is not well-formed, syntactically incorrect, or violates schema.",
            "debug_id": "8a1b2c3d4e5f6"
        });

        let err = Error::from_api_response(400, body);
        match err {
            Error::Api {
                status,
                name,
                message,
                debug_id,
                ..
            } => {
                assert_eq!(status, 400);
                assert_eq!(name.as_deref(), Some("INVALID_REQUEST"));
                assert!(message.starts_with("Request is not well-formed"));
                assert_eq!(debug_id.as_deref(), Some("8a1b2c3d4e5f6"));
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_from_oauth_error_body() {
        let body = serde_json::json!({
            "error": "invalid_client",
            "error_description": "Client Authentication failed"
        });

        match Error::from_api_response(401, body) {
            Error::Api { name, message, .. } => {
                assert_eq!(name.as_deref(), Some("invalid_client"));
                assert_eq!(message, "Client Authentication failed");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_request_error_names_path_and_window() {
        let err = Error::request(
            "/v1/reporting/transactions",
            Some(window()),
            Error::from_api_response(500, Value::Null),
        );

        let text = err.to_string();
        assert!(text.contains("/v1/reporting/transactions"));
        assert!(text.contains("2024-02-01T00:00:00Z"));
        assert!(text.contains("2024-03-15T00:00:00Z"));
        assert_eq!(err.window(), Some(&window()));
        assert!(err.is_server_error());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_invalid_range_is_client_error() {
        let w = window();
        let err = Error::InvalidRange {
            start: w.end(),
            end: w.start(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.status(), None);
    }
}
