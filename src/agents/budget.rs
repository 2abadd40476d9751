//! Budget prediction agent
//!
//! Projects average monthly spending from the dated rows, finds the
//! top-spending MCC category and asks the analyst model for a plan to reach
//! the configured savings goal.

use super::{category_totals, fields_present, with_parsed_timestamps, Field};
use crate::config::AgentConfig;
use crate::llm::{ChatModel, CompletionClient};
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

/// Average days per month, used to turn a day span into months.
const DAYS_PER_MONTH: f64 = 30.44;

/// Share of the top category suggested as a cut.
const TOP_CATEGORY_CUT: f64 = 0.25;

/// Deterministic numeric summary behind the budget prompt.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BudgetSummary {
    pub total_spent: f64,
    pub months_spanned: f64,
    pub avg_monthly_spent: f64,
    pub top_category: String,
    pub top_category_total: f64,
    pub monthly_savings_target: f64,
    pub potential_savings: f64,
}

/// Compute the summary over rows with parseable timestamps. `None` when the
/// span is not positive (too little data to talk about monthly spending).
pub(crate) fn summarize(
    transactions: &[TransactionRecord],
    config: &AgentConfig,
) -> Option<BudgetSummary> {
    let dated = with_parsed_timestamps(transactions);

    let earliest = dated.iter().map(|(ts, _)| *ts).min()?;
    let latest = dated.iter().map(|(ts, _)| *ts).max()?;
    let months_spanned = (latest - earliest).num_days() as f64 / DAYS_PER_MONTH;
    if months_spanned <= 0.0 {
        return None;
    }

    let dated_records: Vec<TransactionRecord> =
        dated.iter().map(|(_, record)| (*record).clone()).collect();
    let total_spent: f64 = dated_records.iter().filter_map(|r| r.amount).sum();
    let avg_monthly_spent = total_spent / months_spanned;

    let totals = category_totals(&dated_records);
    let (top_category, top_category_total) = totals
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(code, total)| (code.clone(), *total))?;

    Some(BudgetSummary {
        total_spent,
        months_spanned,
        avg_monthly_spent,
        top_category,
        top_category_total,
        monthly_savings_target: config.savings_goal / config.savings_horizon_months as f64,
        potential_savings: top_category_total * TOP_CATEGORY_CUT,
    })
}

pub async fn run(
    transactions: &[TransactionRecord],
    client: &dyn CompletionClient,
    config: &AgentConfig,
) -> Result<AgentResult> {
    if !fields_present(
        transactions,
        &[Field::Amount, Field::Timestamp, Field::MccCode],
    ) {
        return Ok(AgentResult::notice(
            "Invalid data format. Fields 'amount', 'timestamp', or 'mcc_code' are missing.",
        ));
    }

    let Some(summary) = summarize(transactions, config) else {
        return Ok(AgentResult::notice(
            "Insufficient data to calculate monthly spending.",
        ));
    };

    let prompt = format!(
        "The user needs to save {:.0} LEI over the next {} months. This requires approximately \
         {:.2} LEI per month in savings.\n\
         The user spends on average {:.2} LEI per month ({:.2} LEI over {:.1} months of data).\n\
         The biggest spending category is MCC Code '{}', accounting for {:.2} LEI; cutting about \
         25% of it would free up {:.2} LEI.\n\
         Suggest how the user can gradually reduce spending in this category or other categories \
         to meet their savings goal. Please provide the response in markdown format.",
        config.savings_goal,
        config.savings_horizon_months,
        summary.monthly_savings_target,
        summary.avg_monthly_spent,
        summary.total_spent,
        summary.months_spanned,
        summary.top_category,
        summary.top_category_total,
        summary.potential_savings,
    );

    let reply = client.complete(&prompt, ChatModel::Analyst).await?;
    Ok(AgentResult::answer(reply))
}
