//! HTTP client and service layer for the PayPal reporting API.
//!
//! This module provides the main entry point [`PaypalClient`].
//!
//! # Example
//!
//! ```no_run
//! use chrono::{TimeZone, Utc};
//! use paypal_reporting::{ClientCredentials, Environment, PaypalClient};
//!
//! # async fn example() -> paypal_reporting::Result<()> {
//! let client = PaypalClient::new(
//!     ClientCredentials::new("client-id", "client-secret"),
//!     Environment::Sandbox,
//! )?;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let transactions = client.transactions().fetch(start, None).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::ClientConfig;
pub use http::PaypalClient;
pub use paginated::Page;
pub(crate) use http::{endpoint_url, ClientInner};
