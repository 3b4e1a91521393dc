//! # paypal-reporting
//!
//! An async Rust client for the PayPal transaction reporting API.
//!
//! The reporting endpoint answers at most 31 days per request and pages its
//! results. This crate hides both limits: a long date range is walked in
//! consecutive windows, each window is walked page by page, and records that
//! show up on both sides of a window boundary are deduplicated.
//!
//! ## Features
//!
//! - **Authentication**: OAuth2 client-credentials, token created lazily and
//!   cached for the lifetime of the client
//! - **Batching**: arbitrary date ranges split into API-sized windows
//! - **Pagination**: every page of every window, strictly in order
//! - **Fail-fast**: any failure aborts the whole fetch; no partial results,
//!   no hidden retries
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chrono::{Duration, Utc};
//! use paypal_reporting::{ClientCredentials, Environment, PaypalClient};
//!
//! #[tokio::main]
//! async fn main() -> paypal_reporting::Result<()> {
//!     let client = PaypalClient::new(
//!         ClientCredentials::new("client-id", "client-secret"),
//!         Environment::Sandbox,
//!     )?;
//!
//!     let transactions = client
//!         .fetch_transactions(Utc::now() - Duration::days(90), None)
//!         .await?;
//!
//!     for txn in &transactions {
//!         println!("{:?} {:?}", txn.transaction_id(), txn.amount());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! ```rust,no_run
//! use chrono::{TimeZone, Utc};
//! use paypal_reporting::{Error, PaypalClient};
//!
//! # async fn example(client: PaypalClient) {
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! match client.fetch_transactions(start, None).await {
//!     Ok(transactions) => println!("{} transactions", transactions.len()),
//!     Err(Error::Authentication(reason)) => eprintln!("check credentials: {}", reason),
//!     Err(err @ Error::Request { .. }) => {
//!         eprintln!("failed on window {:?}: {}", err.window(), err);
//!     }
//!     Err(err) => eprintln!("{}", err),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;

// Re-export primary types at crate root for convenience
pub use auth::{Authenticator, ClientCredentials};
pub use client::{ClientConfig, PaypalClient};
pub use error::{Error, Result};
pub use models::{
    AccessToken, Amount, DateWindow, Environment, TransactionPage, TransactionRecord,
    MAX_TRANSACTION_LOOKUP_DAYS,
};

/// Prelude module for convenient imports.
///
/// ```rust
/// use paypal_reporting::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::TransactionsService;
    pub use crate::auth::{Authenticator, ClientCredentials};
    pub use crate::client::{ClientConfig, PaypalClient};
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        AccessToken, Amount, DateWindow, Environment, TransactionPage, TransactionRecord,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_urls() {
        assert_eq!(Environment::Live.api_base_url(), "https://api-m.paypal.com");
        assert_eq!(
            Environment::Sandbox.api_base_url(),
            "https://api-m.sandbox.paypal.com"
        );
    }

    #[test]
    fn test_lookup_limit() {
        assert_eq!(MAX_TRANSACTION_LOOKUP_DAYS, 31);
        assert_eq!(ClientConfig::default().max_lookup_span.num_days(), 31);
    }
}
