//! Analytics agents
//!
//! One module per capability plus the open-prompt fallback. Every agent
//! follows the same shape: validate the fields it needs (returning a notice
//! result instead of failing, so a bad set cannot abort sibling agents),
//! compute a deterministic numeric summary, render it into a prompt, and
//! forward the prompt to the analyst model.

pub mod anomaly;
pub mod budget;
pub mod categorization;
pub mod fallback;
pub mod recommendation;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use crate::catalog::Capability;
use crate::config::AgentConfig;
use crate::llm::CompletionClient;
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

/// Run the implementation carried by a capability variant.
pub async fn run_capability(
    capability: Capability,
    transactions: &[TransactionRecord],
    client: &dyn CompletionClient,
    config: &AgentConfig,
) -> Result<AgentResult> {
    match capability {
        Capability::AnomalyDetection => anomaly::run(transactions, client).await,
        Capability::BudgetPrediction => budget::run(transactions, client, config).await,
        Capability::RecommendationEngine => {
            recommendation::run(transactions, client, config).await
        }
        Capability::TransactionCategorization => {
            categorization::run(transactions, client).await
        }
    }
}

/// Fields an agent may require on every row of the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Amount,
    Timestamp,
    MccCode,
}

impl Field {
    fn is_present(self, record: &TransactionRecord) -> bool {
        match self {
            Field::Amount => record.amount.is_some(),
            Field::Timestamp => record.timestamp.is_some(),
            Field::MccCode => record.mcc_code.is_some(),
        }
    }
}

/// True when every row in the set carries all the given fields. The feed's
/// analog of a missing column is a field absent from some rows.
pub(crate) fn fields_present(transactions: &[TransactionRecord], fields: &[Field]) -> bool {
    transactions
        .iter()
        .all(|record| fields.iter().all(|field| field.is_present(record)))
}

/// Rows whose timestamps coerce to a date, paired with that date.
/// Unparseable rows are dropped.
pub(crate) fn with_parsed_timestamps(
    transactions: &[TransactionRecord],
) -> Vec<(DateTime<Utc>, &TransactionRecord)> {
    transactions
        .iter()
        .filter_map(|record| record.parsed_timestamp().map(|ts| (ts, record)))
        .collect()
}

/// Total spending per MCC code. Rows without an amount contribute nothing;
/// rows without a code fall under "unknown".
pub(crate) fn category_totals(transactions: &[TransactionRecord]) -> BTreeMap<String, f64> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in transactions {
        let Some(amount) = record.amount else {
            continue;
        };
        let code = record.mcc_code.clone().unwrap_or_else(|| "unknown".to_string());
        *totals.entry(code).or_insert(0.0) += amount;
    }
    totals
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::models::TransactionRecord;

    /// A fully populated transaction row for agent tests.
    pub(crate) fn record(id: &str, timestamp: &str, amount: f64, mcc: &str) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            timestamp: Some(timestamp.to_string()),
            amount: Some(amount),
            mcc_code: Some(mcc.to_string()),
        }
    }

    /// A row with no amount, for data-shape tests.
    pub(crate) fn record_without_amount(id: &str, timestamp: &str, mcc: &str) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id.to_string(),
            timestamp: Some(timestamp.to_string()),
            amount: None,
            mcc_code: Some(mcc.to_string()),
        }
    }
}
