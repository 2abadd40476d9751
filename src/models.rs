//! Core data models for the spending-insights agent

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

//
// ================= Transactions =================
//

/// One transaction row as it arrives from the feed.
///
/// Fields other than the id are optional: the feed occasionally ships rows
/// with missing columns, and each agent decides which fields it requires.
/// The timestamp stays textual here; agents that need dates coerce it with
/// [`parse_timestamp`] and drop rows that fail to parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub timestamp: Option<String>,
    pub amount: Option<f64>,
    pub mcc_code: Option<String>,
}

/// The per-request, read-only transaction subset for one user.
///
/// Shared by reference across concurrently running agents; never mutated
/// after construction.
pub type UserTransactionSet = Arc<Vec<TransactionRecord>>;

/// Timestamp formats accepted from the feed, tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// Coerce a feed timestamp into a UTC datetime.
///
/// Returns `None` for missing or unparseable values; callers drop such rows.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    // Date-only rows come through without a time component.
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

impl TransactionRecord {
    /// Coerced timestamp, if the row carries a parseable one.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

//
// ================= Agent Results =================
//

/// The outcome of one capability invocation.
///
/// Serializes either as a bare string (natural-language reply, or the
/// literal informational anomaly result) or as `{"response": "..."}` for
/// data-shape and insufficient-data notices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AgentResult {
    Notice { response: String },
    Answer(String),
}

impl AgentResult {
    pub fn answer(text: impl Into<String>) -> Self {
        AgentResult::Answer(text.into())
    }

    pub fn notice(text: impl Into<String>) -> Self {
        AgentResult::Notice {
            response: text.into(),
        }
    }

    pub fn is_notice(&self) -> bool {
        matches!(self, AgentResult::Notice { .. })
    }
}
