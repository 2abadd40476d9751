//! Open-prompt fallback agent
//!
//! Invoked when the classifier matched nothing. Serializes the full
//! transaction set and forwards the user's request verbatim as one
//! open-ended question. Makes no field assumptions, so it never produces a
//! data-shape notice.

use crate::llm::{ChatModel, CompletionClient};
use crate::models::{AgentResult, TransactionRecord};
use crate::Result;

pub async fn run(
    transactions: &[TransactionRecord],
    request: &str,
    client: &dyn CompletionClient,
) -> Result<AgentResult> {
    let table = serde_json::to_string_pretty(transactions)?;

    let prompt = format!(
        "The user has provided the following transaction data in tabular format:\n\
         {table}\n\n\
         Based on this data, answer the following prompt from the user in markdown format:\n\
         {request}"
    );

    let reply = client.complete(&prompt, ChatModel::Analyst).await?;
    Ok(AgentResult::answer(reply))
}
