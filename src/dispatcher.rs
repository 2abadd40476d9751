//! Agent dispatcher
//!
//! Resolves a routing decision to agent implementations, runs every selected
//! capability concurrently against the same read-only transaction set, and
//! joins them in selection order. An empty decision routes to the fallback
//! agent and returns its single result unwrapped.

use std::sync::Arc;
use tracing::info;

use crate::agents::{self, fallback};
use crate::catalog::Capability;
use crate::classifier::RoutingDecision;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::llm::CompletionClient;
use crate::models::{AgentResult, UserTransactionSet};
use crate::Result;

/// Final output of one dispatch.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    /// One result per selected capability, in selection order.
    Routed(Vec<(Capability, AgentResult)>),
    /// The no-match path: a single fallback result.
    Fallback(AgentResult),
}

pub struct AgentDispatcher {
    client: Arc<dyn CompletionClient>,
    config: AgentConfig,
}

impl AgentDispatcher {
    pub fn new(client: Arc<dyn CompletionClient>, config: AgentConfig) -> Self {
        Self { client, config }
    }

    /// Run every capability in the decision concurrently and join all of
    /// them before returning. Capability-level notices stay in the mapping;
    /// a completion-service failure in any task surfaces as a request-level
    /// error once every task has settled.
    pub async fn dispatch(
        &self,
        request: &str,
        decision: &RoutingDecision,
        transactions: UserTransactionSet,
    ) -> Result<DispatchOutcome> {
        if decision.is_empty() {
            info!("No capability matched; routing to the fallback agent");
            let result = fallback::run(&transactions, request, self.client.as_ref()).await?;
            return Ok(DispatchOutcome::Fallback(result));
        }

        info!(capabilities = ?decision.capabilities, "Dispatching capabilities");

        let handles: Vec<_> = decision
            .capabilities
            .iter()
            .copied()
            .map(|capability| {
                let client = Arc::clone(&self.client);
                let transactions = Arc::clone(&transactions);
                let config = self.config;
                let handle = tokio::spawn(async move {
                    agents::run_capability(capability, &transactions, client.as_ref(), &config)
                        .await
                });
                (capability, handle)
            })
            .collect();

        // Join in selection order; completion order never shapes the output.
        // Every task settles before any error is propagated.
        let mut settled = Vec::with_capacity(handles.len());
        for (capability, handle) in handles {
            let result = handle
                .await
                .map_err(|e| AgentError::TaskJoin(e.to_string()));
            settled.push((capability, result));
        }

        let mut results = Vec::with_capacity(settled.len());
        for (capability, result) in settled {
            results.push((capability, result??));
        }

        Ok(DispatchOutcome::Routed(results))
    }
}
