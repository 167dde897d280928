use hybrid_analyst::{
    agent::Orchestrator, api::start_server, config::AnalystConfig, logging::init_tracing,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    init_tracing("info");

    let config = AnalystConfig::from_env()?;

    info!("Hybrid AI Analyst - API Server");
    info!(port = config.port, llm_enabled = config.llm_enabled(), "Configuration loaded");

    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);

    info!("Orchestrator initialized");

    start_server(orchestrator, config.port).await?;

    Ok(())
}
