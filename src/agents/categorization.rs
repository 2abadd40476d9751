//! Transaction categorization agent
//!
//! Groups spending by MCC code and asks the analyst model for a summary,
//! the top-spending category, and the top three reduction suggestions.
//! Always calls the model; there is no short-circuit path.

use super::{category_totals, fields_present, Field};
use crate::llm::{ChatModel, CompletionClient};
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

pub async fn run(
    transactions: &[TransactionRecord],
    client: &dyn CompletionClient,
) -> Result<AgentResult> {
    if !fields_present(transactions, &[Field::Amount, Field::MccCode]) {
        return Ok(AgentResult::notice(
            "Invalid data format. Fields 'amount' or 'mcc_code' are missing.",
        ));
    }

    let totals = category_totals(transactions);
    let totals_listing = totals
        .iter()
        .map(|(code, total)| format!("{}: {:.2}", code, total))
        .collect::<Vec<_>>()
        .join(", ");

    let prompt = format!(
        "Based on the user's transaction data, categorize the expenses into groups such as \
         groceries, dining, transportation, and utilities.\n\
         The following are the total amounts spent in each category based on MCC codes: \
         {{{totals_listing}}}.\n\
         Highlight which category the user spends the most on, and suggest ways to optimize \
         their spending.\n\
         Provide insights into the top three areas where the user can reduce spending, and how \
         much should be saved in each category in markdown format.\n\
         Also, summarize the user's spending habits in the last 12 months, and provide any \
         suggestions for adjustments.",
    );

    let reply = client.complete(&prompt, ChatModel::Analyst).await?;
    Ok(AgentResult::answer(reply))
}
