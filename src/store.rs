//! Transaction record store
//!
//! Loads the semicolon-delimited transaction feed once at startup and serves
//! per-user subsets. Unknown users yield an empty set, not an error; the API
//! layer turns "empty" into a not-found response.

use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::models::TransactionRecord;
use crate::Result;

/// One feed row. Every field but the client id may be missing.
#[derive(Debug, Deserialize)]
struct FeedRow {
    client_id: String,
    transaction_id: String,
    timestamp: Option<String>,
    amount: Option<f64>,
    mcc_code: Option<String>,
}

/// In-memory transaction store keyed by client id.
pub struct TransactionStore {
    records: HashMap<String, Vec<TransactionRecord>>,
}

impl TransactionStore {
    /// Load the feed from a `;`-delimited CSV with headers
    /// `client_id;transaction_id;timestamp;amount;mcc_code`.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;

        let mut records: HashMap<String, Vec<TransactionRecord>> = HashMap::new();
        for row in reader.deserialize::<FeedRow>() {
            let row = row?;
            records
                .entry(row.client_id)
                .or_default()
                .push(TransactionRecord {
                    transaction_id: row.transaction_id,
                    timestamp: row.timestamp.filter(|s| !s.is_empty()),
                    amount: row.amount,
                    mcc_code: row.mcc_code.filter(|s| !s.is_empty()),
                });
        }

        info!(
            users = records.len(),
            rows = records.values().map(Vec::len).sum::<usize>(),
            "Transaction feed loaded"
        );

        Ok(Self { records })
    }

    /// Build a store directly from rows (tests, alternative loaders).
    pub fn from_records(records: HashMap<String, Vec<TransactionRecord>>) -> Self {
        Self { records }
    }

    /// The transaction subset for one user, in feed order. Empty when the
    /// user is unknown.
    pub fn records_for(&self, user_id: &str) -> Vec<TransactionRecord> {
        self.records.get(user_id).cloned().unwrap_or_default()
    }
}
