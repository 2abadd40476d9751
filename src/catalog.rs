//! Capability catalog
//!
//! The closed set of financial-analysis capabilities offered to users.
//! Capability names and descriptions are the contract surface fed to the
//! intent classifier; the catalog is built once at startup and injected
//! into the classifier and dispatcher as an immutable value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One financial-analysis capability. Declaration order is the fixed
/// catalog iteration order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    AnomalyDetection,
    BudgetPrediction,
    RecommendationEngine,
    TransactionCategorization,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::AnomalyDetection,
        Capability::BudgetPrediction,
        Capability::RecommendationEngine,
        Capability::TransactionCategorization,
    ];

    /// Unique catalog key, also the key used in routed response mappings.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::AnomalyDetection => "anomaly_detection",
            Capability::BudgetPrediction => "budget_prediction",
            Capability::RecommendationEngine => "recommendation_engine",
            Capability::TransactionCategorization => "transaction_categorization",
        }
    }

    /// Human-readable description shown to the classifier model.
    pub fn description(&self) -> &'static str {
        match self {
            Capability::AnomalyDetection => {
                "Detects suspicious or unusual transactions in user data."
            }
            Capability::BudgetPrediction => {
                "Generates a personalized budget based on user spending patterns."
            }
            Capability::RecommendationEngine => {
                "Provides investment advice based on spending and saving behavior."
            }
            Capability::TransactionCategorization => {
                "Categorizes user transactions for better tracking and analysis."
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The ordered, immutable capability catalog.
#[derive(Debug, Clone)]
pub struct CapabilityCatalog {
    entries: Vec<Capability>,
}

impl CapabilityCatalog {
    /// The standard catalog: every capability, in declaration order.
    pub fn standard() -> Self {
        Self {
            entries: Capability::ALL.to_vec(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `name: description` lines for the classifier prompt.
    pub fn describe_for_prompt(&self) -> String {
        self.entries
            .iter()
            .map(|c| format!("{}: {}", c.name(), c.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for CapabilityCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order_is_deterministic() {
        let catalog = CapabilityCatalog::standard();
        let names: Vec<&str> = catalog.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "anomaly_detection",
                "budget_prediction",
                "recommendation_engine",
                "transaction_categorization",
            ]
        );
    }

    #[test]
    fn test_names_are_unique() {
        let catalog = CapabilityCatalog::standard();
        let mut names: Vec<&str> = catalog.iter().map(|c| c.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog.len());
    }

    #[test]
    fn test_prompt_listing_carries_every_entry() {
        let listing = CapabilityCatalog::standard().describe_for_prompt();
        for capability in Capability::ALL {
            assert!(listing.contains(capability.name()));
            assert!(listing.contains(capability.description()));
        }
    }
}
