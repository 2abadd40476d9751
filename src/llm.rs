//! Ollama chat client
//!
//! The completion-service boundary. The core only needs "prompt in, text
//! out"; the trait keeps agents and the classifier testable without a live
//! model. Uses a long-lived reqwest::Client for connection pooling.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{error, info};

use crate::error::AgentError;
use crate::Result;

/// Which nominal model serves a call.
///
/// Router answers classification-style short questions; Analyst produces the
/// longer explanatory replies returned to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatModel {
    Router,
    Analyst,
}

/// Text-completion boundary. One call, one suspension point.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str, model: ChatModel) -> Result<String>;
}

/// Reusable Ollama chat client (connection-pooled).
pub struct OllamaClient {
    client: Client,
    base_url: String,
    router_model: String,
    analyst_model: String,
}

impl OllamaClient {
    pub fn new(base_url: String, router_model: String, analyst_model: String) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            // Cap unresponsive completion calls so dispatch cannot stall.
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            router_model,
            analyst_model,
        })
    }

    pub fn from_env() -> Result<Self> {
        let base_url = env::var("OLLAMA_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434".to_string());
        let router_model =
            env::var("OLLAMA_ROUTER_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        let analyst_model =
            env::var("OLLAMA_ANALYST_MODEL").unwrap_or_else(|_| "neural-chat".to_string());

        Self::new(base_url, router_model, analyst_model)
    }

    fn model_name(&self, model: ChatModel) -> &str {
        match model {
            ChatModel::Router => &self.router_model,
            ChatModel::Analyst => &self.analyst_model,
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for OllamaClient {
    async fn complete(&self, prompt: &str, model: ChatModel) -> Result<String> {
        let url = format!("{}/api/chat", self.base_url);
        let model_name = self.model_name(model);

        let request = ChatRequest {
            model: model_name.to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        info!(model = model_name, "Calling Ollama chat API");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Ollama request failed: {}", e);
                AgentError::Completion(format!("Ollama request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Ollama error response: {}", body);
            return Err(AgentError::Completion(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Ollama response: {}", e);
            AgentError::Completion(format!("Ollama parse error: {}", e))
        })?;

        if chat_response.message.content.is_empty() {
            return Err(AgentError::Completion(
                "Empty response from Ollama".to_string(),
            ));
        }

        Ok(chat_response.message.content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}
