//! Investment recommendation agent
//!
//! Estimates monthly savings from the trailing twelve months of spending and
//! projects their compound future value over the configured horizons, then
//! asks the analyst model for strategy recommendations.

use chrono::Months;

use super::{fields_present, with_parsed_timestamps, Field};
use crate::config::AgentConfig;
use crate::llm::{ChatModel, CompletionClient};
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

/// Future value of a stream of equal monthly contributions (ordinary
/// annuity), compounded monthly.
pub(crate) fn future_value(monthly_savings: f64, years: u32, annual_rate: f64) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let total_months = (years * 12) as i32;
    monthly_savings * (((1.0 + monthly_rate).powi(total_months) - 1.0) / monthly_rate)
}

/// Spending over the trailing twelve months from the latest dated row.
/// Zero when no row carries a parseable timestamp.
pub(crate) fn trailing_year_spend(transactions: &[TransactionRecord]) -> f64 {
    let dated = with_parsed_timestamps(transactions);
    let Some(latest) = dated.iter().map(|(ts, _)| *ts).max() else {
        return 0.0;
    };
    let Some(cutoff) = latest.checked_sub_months(Months::new(12)) else {
        return 0.0;
    };

    dated
        .iter()
        .filter(|(ts, _)| *ts > cutoff)
        .filter_map(|(_, record)| record.amount)
        .sum()
}

pub async fn run(
    transactions: &[TransactionRecord],
    client: &dyn CompletionClient,
    config: &AgentConfig,
) -> Result<AgentResult> {
    if !fields_present(transactions, &[Field::Amount, Field::Timestamp]) {
        return Ok(AgentResult::notice(
            "Invalid data format. Fields 'amount' or 'timestamp' are missing.",
        ));
    }

    let total_spent = trailing_year_spend(transactions);
    let avg_monthly_savings = config.monthly_income - total_spent / 12.0;

    if avg_monthly_savings <= 0.0 {
        return Ok(AgentResult::notice(
            "The user does not have enough savings to invest based on the last 12 months of data.",
        ));
    }

    let projections: Vec<String> = config
        .projection_years
        .iter()
        .map(|&years| {
            format!(
                "for {} years: {:.2} LEI",
                years,
                future_value(avg_monthly_savings, years, config.annual_rate)
            )
        })
        .collect();

    let prompt = format!(
        "Based on the user's last 12 months of spending, their average monthly savings is \
         approximately {:.2} LEI.\n\
         Calculate the projected value of these savings if invested at a {:.0}% annual return \
         for {} years.\n\
         Projected values: {}.\n\
         Provide recommendations for investment strategies and suggest how to maximize returns \
         in markdown format.",
        avg_monthly_savings,
        config.annual_rate * 100.0,
        config
            .projection_years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        projections.join(", "),
    );

    let reply = client.complete(&prompt, ChatModel::Analyst).await?;
    Ok(AgentResult::answer(reply))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::record;
    use crate::llm::testing::MockCompletionClient;
    use crate::models::TransactionRecord;

    #[test]
    fn test_future_value_matches_annuity_formula() {
        // 500/month at 10% annual over 10 years of monthly compounding.
        let fv = future_value(500.0, 10, 0.10);
        assert!(
            (fv / 102_422.0 - 1.0).abs() < 1e-3,
            "unexpected future value: {fv}"
        );
    }

    #[test]
    fn test_trailing_window_excludes_older_rows() {
        let rows = vec![
            record("t1", "2022-01-15 09:00:00", 9_999.0, "5411"),
            record("t2", "2023-06-15 09:00:00", 200.0, "5411"),
            record("t3", "2024-01-15 09:00:00", 300.0, "5812"),
        ];
        // Latest is 2024-01-15; only t2 and t3 fall inside the window.
        assert!((trailing_year_spend(&rows) - 500.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_overspending_is_an_insufficient_savings_notice() {
        // 200k over the window swamps the 10k income assumption.
        let rows = vec![
            record("t1", "2024-01-15 09:00:00", 200_000.0, "5411"),
            record("t2", "2024-02-15 09:00:00", 100.0, "5411"),
        ];
        let client = MockCompletionClient::failing();
        let config = AgentConfig::default();

        let result = run(&rows, &client, &config).await.unwrap();
        assert!(result.is_notice());
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_timestamp_is_a_shape_notice() {
        let rows = vec![TransactionRecord {
            transaction_id: "t1".to_string(),
            timestamp: None,
            amount: Some(50.0),
            mcc_code: Some("5411".to_string()),
        }];
        let client = MockCompletionClient::failing();
        let config = AgentConfig::default();

        let result = run(&rows, &client, &config).await.unwrap();
        assert!(result.is_notice());
    }

    #[tokio::test]
    async fn test_prompt_carries_all_three_projections() {
        let rows = vec![
            record("t1", "2024-01-15 09:00:00", 1_200.0, "5411"),
            record("t2", "2024-02-15 09:00:00", 1_200.0, "5812"),
        ];
        let client = MockCompletionClient::with_replies(vec!["diversify"]);
        let config = AgentConfig::default();

        let result = run(&rows, &client, &config).await.unwrap();
        assert_eq!(result, AgentResult::answer("diversify"));

        // Savings: 10000 - 2400/12 = 9800/month.
        let calls = client.calls.lock().unwrap();
        let (prompt, model) = &calls[0];
        assert_eq!(*model, ChatModel::Analyst);
        assert!(prompt.contains("9800.00 LEI"));
        assert!(prompt.contains("for 5 years:"));
        assert!(prompt.contains("for 10 years:"));
        assert!(prompt.contains("for 20 years:"));
    }
}
