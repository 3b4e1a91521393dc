//! OAuth2 client-credentials authentication.
//!
//! The [`Authenticator`] exchanges a REST app's [`ClientCredentials`] for a
//! bearer token the first time one is needed and caches it for the rest of
//! its lifetime. It never refreshes on its own; callers that see a 401 can
//! force a new exchange with [`Authenticator::invalidate_and_refresh`].
//!
//! ```no_run
//! use paypal_reporting::{ClientCredentials, Environment, PaypalClient};
//!
//! # async fn example() -> paypal_reporting::Result<()> {
//! let client = PaypalClient::new(
//!     ClientCredentials::from_env()?,
//!     Environment::Sandbox,
//! )?;
//!
//! // Exchanges credentials now instead of on the first fetch.
//! let _token = client.authenticator().get_token().await?;
//! assert!(client.authenticator().has_token().await);
//! # Ok(())
//! # }
//! ```

mod authenticator;
mod credentials;

pub use authenticator::{Authenticator, TOKEN_PATH};
pub use credentials::{ClientCredentials, CLIENT_ID_ENV, CLIENT_SECRET_ENV};
