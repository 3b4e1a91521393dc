//! Data models for the PayPal reporting API.
//!
//! - [`primitives`] - Environment and access token types
//! - [`window`] - Date windows and lookup-span batching
//! - [`transaction`] - Transaction records and listing pages

pub mod primitives;
pub mod transaction;
pub mod window;

// Re-export commonly used types
pub use primitives::*;
pub use transaction::*;
pub use window::*;
