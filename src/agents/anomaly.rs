//! Anomaly detection agent
//!
//! Flags transactions whose amount exceeds twice the mean of the set and
//! asks the analyst model to explain each flagged one. When nothing crosses
//! the threshold the agent answers directly without calling the model.

use tracing::info;

use super::{fields_present, Field};
use crate::llm::{ChatModel, CompletionClient};
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

const NO_ANOMALIES: &str = "No significant anomalies detected.";

/// Anomaly cutoff: twice the mean transaction amount.
pub(crate) fn anomaly_threshold(transactions: &[TransactionRecord]) -> f64 {
    let total: f64 = transactions.iter().filter_map(|t| t.amount).sum();
    2.0 * total / transactions.len() as f64
}

/// The `amount > threshold` subset, in set order.
pub(crate) fn flag_anomalies(
    transactions: &[TransactionRecord],
    threshold: f64,
) -> Vec<&TransactionRecord> {
    transactions
        .iter()
        .filter(|t| t.amount.is_some_and(|a| a > threshold))
        .collect()
}

pub async fn run(
    transactions: &[TransactionRecord],
    client: &dyn CompletionClient,
) -> Result<AgentResult> {
    if !fields_present(transactions, &[Field::Amount]) {
        return Ok(AgentResult::notice(
            "Invalid data format. Field 'amount' is missing.",
        ));
    }

    if transactions.is_empty() {
        return Ok(AgentResult::answer(NO_ANOMALIES));
    }

    let threshold = anomaly_threshold(transactions);
    let flagged = flag_anomalies(transactions, threshold);

    if flagged.is_empty() {
        info!("No transaction exceeds the anomaly threshold");
        return Ok(AgentResult::answer(NO_ANOMALIES));
    }

    let line_items = flagged
        .iter()
        .map(|t| {
            format!(
                "- **Transaction ID**: {}, **MCC Code**: {}, **Date and Time**: {}, **Amount**: {:.2} LEI",
                t.transaction_id,
                t.mcc_code.as_deref().unwrap_or("unknown"),
                t.timestamp.as_deref().unwrap_or("unknown"),
                t.amount.unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let prompt = format!(
        "Let's focus on the significant anomalies in LEI currency. The threshold for detecting \
         anomalies is {threshold:.2} LEI.\n\
         Please analyze only the following transactions and explain why each is flagged as an anomaly:\n\
         {line_items}\n\
         For each transaction, explain briefly why it is flagged as an anomaly in markdown format."
    );

    let reply = client.complete(&prompt, ChatModel::Analyst).await?;
    Ok(AgentResult::answer(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::{record, record_without_amount};
    use crate::llm::testing::MockCompletionClient;

    #[tokio::test]
    async fn test_no_outliers_means_no_llm_call() {
        // Mean 100, threshold 200: nothing crosses it.
        let rows = vec![
            record("t1", "2024-01-01 09:00:00", 90.0, "5411"),
            record("t2", "2024-01-02 09:00:00", 110.0, "5411"),
        ];
        let client = MockCompletionClient::failing();

        let result = run(&rows, &client).await.unwrap();
        assert_eq!(result, AgentResult::answer(NO_ANOMALIES));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_flagged_subset_is_exactly_above_threshold() {
        // Mean 300, threshold 600: only t3 crosses it.
        let rows = vec![
            record("t1", "2024-01-01 09:00:00", 100.0, "5411"),
            record("t2", "2024-01-02 09:00:00", 100.0, "5812"),
            record("t3", "2024-01-03 09:00:00", 700.0, "5999"),
        ];

        let threshold = anomaly_threshold(&rows);
        assert!((threshold - 600.0).abs() < 1e-9);

        let flagged = flag_anomalies(&rows, threshold);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].transaction_id, "t3");

        let client = MockCompletionClient::with_replies(vec!["t3 is unusual"]);
        let result = run(&rows, &client).await.unwrap();
        assert_eq!(result, AgentResult::answer("t3 is unusual"));
        assert_eq!(client.call_count(), 1);

        let calls = client.calls.lock().unwrap();
        let (prompt, model) = &calls[0];
        assert_eq!(*model, ChatModel::Analyst);
        assert!(prompt.contains("t3"));
        assert!(prompt.contains("700.00 LEI"));
        assert!(!prompt.contains("**Transaction ID**: t1,"));
    }

    #[tokio::test]
    async fn test_missing_amount_is_a_shape_notice() {
        let rows = vec![record_without_amount("t1", "2024-01-01 09:00:00", "5411")];
        let client = MockCompletionClient::failing();

        let result = run(&rows, &client).await.unwrap();
        assert!(result.is_notice());
        assert_eq!(client.call_count(), 0);
    }
}
