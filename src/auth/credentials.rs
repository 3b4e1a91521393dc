//! OAuth2 client credentials.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::{Error, Result};

/// Environment variable holding the REST app's client id.
pub const CLIENT_ID_ENV: &str = "PAYPAL_CLIENT_ID";
/// Environment variable holding the REST app's client secret.
pub const CLIENT_SECRET_ENV: &str = "PAYPAL_CLIENT_SECRET";

/// Client id and secret of a PayPal REST app.
///
/// The secret is held in a [`SecretString`] and redacted from `Debug`
/// output.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl ClientCredentials {
    /// Create credentials from a client id and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
        }
    }

    /// Read credentials from `PAYPAL_CLIENT_ID` and `PAYPAL_CLIENT_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(read_env(CLIENT_ID_ENV)?, read_env(CLIENT_SECRET_ENV)?))
    }

    /// The client id.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::Config(format!("{} must be set", name))),
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credentials = ClientCredentials::new("AcL1ent", "EHs3cr3t");
        let debug_str = format!("{:?}", credentials);
        assert!(debug_str.contains("AcL1ent"));
        assert!(!debug_str.contains("EHs3cr3t"));
        assert_eq!(credentials.client_secret(), "EHs3cr3t");
    }

    #[test]
    fn test_missing_env_var() {
        let err = read_env("PAYPAL_REPORTING_TEST_UNSET_VARIABLE").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
