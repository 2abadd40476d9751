use spending_insights_agent::{
    api::{start_server, ApiState},
    catalog::CapabilityCatalog,
    classifier::IntentClassifier,
    config::AgentConfig,
    dispatcher::AgentDispatcher,
    llm::OllamaClient,
    store::TransactionStore,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let api_port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("API_PORT"))
        .unwrap_or_else(|_| "8080".to_string())
        .parse()?;

    let feed_path = std::env::var("TRANSACTIONS_CSV")
        .unwrap_or_else(|_| "input/transactions.csv".to_string());

    info!("Spending-Insights Agent - API server");
    info!("Port: {}", api_port);
    info!("Transaction feed: {}", feed_path);

    // Create components
    let store = Arc::new(TransactionStore::from_csv(&feed_path)?);
    let client = Arc::new(OllamaClient::from_env()?);
    let catalog = Arc::new(CapabilityCatalog::standard());
    let config = AgentConfig::from_env();

    let state = ApiState {
        classifier: Arc::new(IntentClassifier::new(client.clone())),
        dispatcher: Arc::new(AgentDispatcher::new(client, config)),
        catalog,
        store,
    };

    info!("Pipeline initialized; starting API server");

    // Start API server
    start_server(state, api_port).await?;

    Ok(())
}
