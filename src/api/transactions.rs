//! Transaction reporting service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::client::paginated::PageCursor;
use crate::client::ClientInner;
use crate::models::window::format_timestamp;
use crate::models::{dedup_records, DateWindow, TransactionPage, TransactionRecord};
use crate::Result;

/// Path of the transaction listing endpoint.
pub const TRANSACTIONS_PATH: &str = "/v1/reporting/transactions";

/// Service for the transaction listing endpoint.
///
/// The API accepts at most 31 days per request and pages its results.
/// [`fetch`](Self::fetch) hides both limits: it walks the requested range
/// window by window, walks every page of each window, and deduplicates the
/// combined result.
///
/// # Example
///
/// ```no_run
/// use chrono::{TimeZone, Utc};
///
/// # async fn example(client: paypal_reporting::PaypalClient) -> paypal_reporting::Result<()> {
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();
///
/// let transactions = client.transactions().fetch(start, Some(end)).await?;
/// for txn in &transactions {
///     println!("{:?}: {:?}", txn.transaction_id(), txn.amount());
/// }
/// # Ok(())
/// # }
/// ```
pub struct TransactionsService {
    inner: Arc<ClientInner>,
}

/// Query parameters of a listing request for one window.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionsQuery {
    /// Start of the window
    #[serde(serialize_with = "serialize_timestamp")]
    pub start_date: DateTime<Utc>,
    /// End of the window
    #[serde(serialize_with = "serialize_timestamp")]
    pub end_date: DateTime<Utc>,
}

impl From<DateWindow> for TransactionsQuery {
    fn from(window: DateWindow) -> Self {
        Self {
            start_date: window.start(),
            end_date: window.end(),
        }
    }
}

fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

impl TransactionsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Fetch every transaction between `start_time` and `end_time`.
    ///
    /// `end_time` defaults to now. The range is split into consecutive
    /// windows of at most the configured lookup span (31 days by default);
    /// neighbouring windows share their boundary instant. Each window is
    /// fetched with [`fetch_batch`](Self::fetch_batch), one after another,
    /// and records returned more than once are dropped, keeping the first
    /// occurrence.
    ///
    /// Both bounds are truncated to whole seconds before the range is
    /// split, since the API only accepts second-precision timestamps.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`](crate::Error::InvalidRange) if `end_time`
    ///   is before `start_time`; no request is sent.
    /// - [`Error::Authentication`](crate::Error::Authentication) if the
    ///   credential exchange fails.
    /// - [`Error::Request`](crate::Error::Request) naming the failing
    ///   window if any page request fails. Records from earlier windows are
    ///   discarded.
    pub async fn fetch(
        &self,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<TransactionRecord>> {
        let range = DateWindow::new(start_time, end_time.unwrap_or_else(Utc::now))?.whole_seconds();
        let batches = range.batches(self.inner.config.max_lookup_span)?;

        let mut transactions = Vec::new();
        for window in batches {
            transactions.extend(self.fetch_window(window).await?);
        }

        let fetched = transactions.len();
        let transactions = dedup_records(transactions);
        tracing::info!(
            range = %range,
            fetched,
            unique = transactions.len(),
            "Fetched transactions"
        );

        Ok(transactions)
    }

    /// Fetch a single window of transactions, walking every page.
    ///
    /// The window is sent as-is apart from truncation to whole seconds: it
    /// is neither split nor clipped to the lookup span, and the result is
    /// not deduplicated.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch).
    pub async fn fetch_batch(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Vec<TransactionRecord>> {
        self.fetch_window(DateWindow::new(start_time, end_time)?.whole_seconds())
            .await
    }

    async fn fetch_window(&self, window: DateWindow) -> Result<Vec<TransactionRecord>> {
        tracing::debug!(window = %window, "Fetching transaction window");

        PageCursor::<TransactionPage>::new(self.inner.clone(), TRANSACTIONS_PATH)
            .window(window)
            .collect(&TransactionsQuery::from(window))
            .await
    }
}
