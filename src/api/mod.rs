//! API service modules for PayPal endpoints.
//!
//! Each service provides methods for interacting with a specific
//! subset of the PayPal REST API.

mod transactions;

pub use transactions::{TransactionsQuery, TransactionsService, TRANSACTIONS_PATH};
