//! REST API server
//!
//! Exposes the routing pipeline over HTTP: `POST /generate` takes a prompt
//! and a user id, classifies the prompt, dispatches the matching agents and
//! returns their replies.

use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::catalog::CapabilityCatalog;
use crate::classifier::IntentClassifier;
use crate::dispatcher::{AgentDispatcher, DispatchOutcome};
use crate::store::TransactionStore;

/// =============================
/// Request Model
/// =============================

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub user_id: String,
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub catalog: Arc<CapabilityCatalog>,
    pub classifier: Arc<IntentClassifier>,
    pub dispatcher: Arc<AgentDispatcher>,
    pub store: Arc<TransactionStore>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Generate Endpoint
/// =============================

async fn generate(
    State(state): State<ApiState>,
    Json(req): Json<GenerateRequest>,
) -> (StatusCode, Json<Value>) {
    if req.prompt.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No prompt provided"})),
        );
    }
    if req.user_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No user_id provided"})),
        );
    }

    info!(user_id = %req.user_id, "Received generate request");

    let records = state.store.records_for(&req.user_id);
    if records.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "User not found"})),
        );
    }
    let transactions = Arc::new(records);

    let decision = match state.classifier.classify(&req.prompt, &state.catalog).await {
        Ok(decision) => decision,
        Err(e) => {
            error!("Classification failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Classification failed: {}", e)})),
            );
        }
    };

    match state
        .dispatcher
        .dispatch(&req.prompt, &decision, transactions)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome_to_body(outcome))),
        Err(e) => {
            error!("Dispatch failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("Dispatch failed: {}", e)})),
            )
        }
    }
}

/// Shape a dispatch outcome into the `{"response": ...}` envelope. The
/// routed mapping keeps selection order on the wire.
fn outcome_to_body(outcome: DispatchOutcome) -> Value {
    match outcome {
        DispatchOutcome::Fallback(result) => json!({ "response": result }),
        DispatchOutcome::Routed(results) => {
            let mut mapping = serde_json::Map::with_capacity(results.len());
            for (capability, result) in results {
                mapping.insert(
                    capability.name().to_string(),
                    serde_json::to_value(result).unwrap_or(Value::Null),
                );
            }
            json!({ "response": Value::Object(mapping) })
        }
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    state: ApiState,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Capability;
    use crate::models::AgentResult;

    #[test]
    fn test_fallback_body_is_a_single_result() {
        let body = outcome_to_body(DispatchOutcome::Fallback(AgentResult::answer("hi")));
        assert_eq!(body, json!({"response": "hi"}));
    }

    #[test]
    fn test_routed_body_keeps_selection_order_and_shapes() {
        let body = outcome_to_body(DispatchOutcome::Routed(vec![
            (
                Capability::TransactionCategorization,
                AgentResult::answer("groceries"),
            ),
            (
                Capability::BudgetPrediction,
                AgentResult::notice("Insufficient data to calculate monthly spending."),
            ),
        ]));

        let response = body.get("response").unwrap().as_object().unwrap();
        let keys: Vec<&String> = response.keys().collect();
        assert_eq!(keys, vec!["transaction_categorization", "budget_prediction"]);
        assert_eq!(response["transaction_categorization"], json!("groceries"));
        assert_eq!(
            response["budget_prediction"],
            json!({"response": "Insufficient data to calculate monthly spending."})
        );
    }
}
