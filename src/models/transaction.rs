//! Transaction records and reporting pages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

use crate::client::paginated::Page;

/// A single transaction as returned by the reporting API.
///
/// The record is kept as the raw JSON object the API sent. Two records are
/// equal when every field is equal, which is what deduplication across
/// window boundaries relies on. The accessors below only read well-known
/// fields and play no part in equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionRecord(Map<String, Value>);

impl TransactionRecord {
    /// Borrow the raw JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consume the record, returning the raw JSON object.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn info(&self, key: &str) -> Option<&Value> {
        self.0.get("transaction_info").and_then(|info| info.get(key))
    }

    /// `transaction_info.transaction_id`
    pub fn transaction_id(&self) -> Option<&str> {
        self.info("transaction_id").and_then(Value::as_str)
    }

    /// `transaction_info.transaction_status` (e.g. `S` for success).
    pub fn transaction_status(&self) -> Option<&str> {
        self.info("transaction_status").and_then(Value::as_str)
    }

    /// `transaction_info.transaction_amount`, parsed.
    pub fn amount(&self) -> Option<Amount> {
        let amount = self.info("transaction_amount")?;
        let currency_code = amount.get("currency_code")?.as_str()?.to_string();
        let value = Decimal::from_str(amount.get("value")?.as_str()?).ok()?;
        Some(Amount {
            currency_code,
            value,
        })
    }

    /// `transaction_info.transaction_initiation_date`, parsed.
    ///
    /// Accepts both `+0000` and `+00:00` offsets.
    pub fn initiation_date(&self) -> Option<DateTime<Utc>> {
        let raw = self.info("transaction_initiation_date")?.as_str()?;
        DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

impl From<Map<String, Value>> for TransactionRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A monetary amount with its ISO-4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    /// Currency code, e.g. `USD`
    pub currency_code: String,
    /// Amount value; negative for debits
    pub value: Decimal,
}

/// One page of the transaction listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionPage {
    /// Transactions on this page.
    pub transaction_details: Vec<TransactionRecord>,
    /// Total number of pages for the requested window.
    pub total_pages: u32,
    /// Page number of this response.
    #[serde(default)]
    pub page: Option<u32>,
    /// Total number of transactions in the requested window.
    #[serde(default)]
    pub total_items: Option<u32>,
    /// PayPal account the transactions belong to.
    #[serde(default)]
    pub account_number: Option<String>,
}

impl Page for TransactionPage {
    type Item = TransactionRecord;

    fn total_pages(&self) -> u32 {
        self.total_pages
    }

    fn into_items(self) -> Vec<TransactionRecord> {
        self.transaction_details
    }
}

/// Remove value-identical records, keeping the first occurrence of each and
/// the order in which they first appeared.
pub fn dedup_records(records: Vec<TransactionRecord>) -> Vec<TransactionRecord> {
    // Records are bucketed by transaction id and compared in full within a bucket.
    let mut buckets: HashMap<Option<String>, Vec<usize>> = HashMap::new();
    let mut unique: Vec<TransactionRecord> = Vec::with_capacity(records.len());

    for record in records {
        let bucket = buckets
            .entry(record.transaction_id().map(str::to_owned))
            .or_default();
        if bucket.iter().any(|&idx| unique[idx] == record) {
            continue;
        }
        bucket.push(unique.len());
        unique.push(record);
    }

    unique
}
