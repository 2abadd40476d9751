//! Intent classifier
//!
//! Turns a free-text request into a set of capabilities using a two-stage
//! policy: a literal substring pass over capability names first, then an
//! LLM-assisted pass against the router model. Both stages are
//! case-insensitive. Zero matches is a valid decision and routes to the
//! fallback agent downstream.

use std::sync::Arc;
use tracing::info;

use crate::catalog::{Capability, CapabilityCatalog};
use crate::llm::{ChatModel, CompletionClient};
use crate::Result;

/// Which stage produced a routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingStage {
    /// A capability name appeared verbatim in the request.
    Literal,
    /// The router model suggested the capabilities.
    Assisted,
    /// Neither stage matched anything.
    Unmatched,
}

/// Ordered set of capabilities selected for one request.
#[derive(Debug, Clone)]
pub struct RoutingDecision {
    pub capabilities: Vec<Capability>,
    pub stage: RoutingStage,
}

impl RoutingDecision {
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

/// Two-stage intent classifier.
pub struct IntentClassifier {
    client: Arc<dyn CompletionClient>,
}

impl IntentClassifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Classify a request against the catalog.
    ///
    /// The literal pass short-circuits: when it matches, the router model is
    /// never called.
    pub async fn classify(
        &self,
        request: &str,
        catalog: &CapabilityCatalog,
    ) -> Result<RoutingDecision> {
        if let Some(decision) = Self::literal_pass(request, catalog) {
            info!(capabilities = ?decision.capabilities, "Literal pass matched");
            return Ok(decision);
        }

        let decision = self.assisted_pass(request, catalog).await?;
        info!(
            stage = ?decision.stage,
            capabilities = ?decision.capabilities,
            "Assisted pass completed"
        );
        Ok(decision)
    }

    /// Stage one: case-insensitive scan for capability names appearing
    /// verbatim in the request. `None` means "no literal match, ask the
    /// router model".
    pub fn literal_pass(request: &str, catalog: &CapabilityCatalog) -> Option<RoutingDecision> {
        let folded = request.to_lowercase();
        let matched: Vec<Capability> = catalog
            .iter()
            .filter(|c| folded.contains(c.name()))
            .collect();

        if matched.is_empty() {
            None
        } else {
            Some(RoutingDecision {
                capabilities: matched,
                stage: RoutingStage::Literal,
            })
        }
    }

    /// Stage two: enumerate the catalog to the router model and scan its
    /// reply for capability names.
    async fn assisted_pass(
        &self,
        request: &str,
        catalog: &CapabilityCatalog,
    ) -> Result<RoutingDecision> {
        let prompt = build_router_prompt(request, catalog);
        let reply = self.client.complete(&prompt, ChatModel::Router).await?;

        let capabilities = parse_router_reply(&reply, catalog);
        let stage = if capabilities.is_empty() {
            RoutingStage::Unmatched
        } else {
            RoutingStage::Assisted
        };

        Ok(RoutingDecision {
            capabilities,
            stage,
        })
    }
}

fn build_router_prompt(request: &str, catalog: &CapabilityCatalog) -> String {
    format!(
        "The following are the available methods:\n{}\n\n\
         Based on the following user prompt, identify which methods should be used:\n\
         \"{}\". Please answer shortly with just an array of matching methods.",
        catalog.describe_for_prompt(),
        request
    )
}

/// Scan a router reply for capability names, case-insensitively, preserving
/// catalog order.
pub fn parse_router_reply(reply: &str, catalog: &CapabilityCatalog) -> Vec<Capability> {
    let folded = reply.to_lowercase();
    catalog
        .iter()
        .filter(|c| folded.contains(c.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::testing::MockCompletionClient;

    fn classifier_with(client: MockCompletionClient) -> (IntentClassifier, Arc<MockCompletionClient>) {
        let client = Arc::new(client);
        (IntentClassifier::new(client.clone()), client)
    }

    #[tokio::test]
    async fn test_literal_pass_short_circuits_llm() {
        let (classifier, client) = classifier_with(MockCompletionClient::failing());
        let catalog = CapabilityCatalog::standard();

        let decision = classifier
            .classify("please run Anomaly_Detection on my account", &catalog)
            .await
            .unwrap();

        assert_eq!(decision.stage, RoutingStage::Literal);
        assert_eq!(decision.capabilities, vec![Capability::AnomalyDetection]);
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test]
    async fn test_assisted_pass_parses_reply_in_catalog_order() {
        let (classifier, client) = classifier_with(MockCompletionClient::with_replies(vec![
            "[\"transaction_categorization\", \"ANOMALY_DETECTION\"]",
        ]));
        let catalog = CapabilityCatalog::standard();

        let decision = classifier
            .classify("where does my money go, anything odd?", &catalog)
            .await
            .unwrap();

        assert_eq!(decision.stage, RoutingStage::Assisted);
        assert_eq!(
            decision.capabilities,
            vec![
                Capability::AnomalyDetection,
                Capability::TransactionCategorization,
            ]
        );
        assert_eq!(client.call_count(), 1);
        assert_eq!(client.calls.lock().unwrap()[0].1, ChatModel::Router);
    }

    #[tokio::test]
    async fn test_zero_matches_is_a_valid_decision() {
        let (classifier, _client) =
            classifier_with(MockCompletionClient::with_replies(vec!["[]"]));
        let catalog = CapabilityCatalog::standard();

        let decision = classifier
            .classify("what's the weather like?", &catalog)
            .await
            .unwrap();

        assert_eq!(decision.stage, RoutingStage::Unmatched);
        assert!(decision.is_empty());
    }

    #[tokio::test]
    async fn test_completion_failure_propagates() {
        let (classifier, _client) = classifier_with(MockCompletionClient::failing());
        let catalog = CapabilityCatalog::standard();

        let result = classifier.classify("help me out here", &catalog).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_router_prompt_enumerates_catalog_and_request() {
        let catalog = CapabilityCatalog::standard();
        let prompt = build_router_prompt("check my spending", &catalog);

        for capability in Capability::ALL {
            assert!(prompt.contains(capability.name()));
            assert!(prompt.contains(capability.description()));
        }
        assert!(prompt.contains("\"check my spending\""));
        assert!(prompt.contains("array of matching methods"));
    }
}
