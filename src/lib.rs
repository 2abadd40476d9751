//! Spending-Insights Agent
//!
//! A financial Q&A service that:
//! - Classifies a free-text request against a small capability catalog
//!   (literal match first, LLM-assisted second)
//! - Dispatches the matching analytics agents concurrently over the user's
//!   transaction history
//! - Falls back to an open-ended prompt when nothing matches
//!
//! PIPELINE:
//! REQUEST → CLASSIFY → DISPATCH → AGENTS (concurrent) → RECONCILED RESULT

pub mod agents;
pub mod api;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod llm;
pub mod models;
pub mod store;

pub use error::{AgentError, Result};

// Re-export common types
pub use catalog::{Capability, CapabilityCatalog};
pub use classifier::{IntentClassifier, RoutingDecision, RoutingStage};
pub use dispatcher::{AgentDispatcher, DispatchOutcome};
pub use models::{AgentResult, TransactionRecord, UserTransactionSet};
