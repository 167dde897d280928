use clap::Parser;
use hybrid_analyst::{
    agent::Orchestrator, config::AnalystConfig, logging::init_tracing, models::DocumentSource,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

/// Vet a startup from a memo and a monthly revenue CSV
#[derive(Parser, Debug)]
#[command(name = "analyst", version, about)]
struct Cli {
    /// Plain-text company memo
    #[arg(long, required_unless_present = "status")]
    memo: Option<PathBuf>,

    /// CSV with month and revenue columns
    #[arg(long, required_unless_present = "status")]
    financials: Option<PathBuf>,

    /// Print component status instead of running an analysis
    #[arg(long)]
    status: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

async fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = AnalystConfig::from_env()?;
    let orchestrator = Orchestrator::from_config(&config)?;

    if cli.status {
        let report = orchestrator.status().await;
        return Ok(to_json(&report, cli.pretty)?);
    }

    let (Some(memo), Some(financials)) = (cli.memo, cli.financials) else {
        return Err("--memo and --financials are required".into());
    };

    let result = orchestrator
        .run_analysis(
            &DocumentSource::path(memo),
            &DocumentSource::path(financials),
        )
        .await?;

    Ok(to_json(&result, cli.pretty)?)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing("warn");

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Analysis failed");
            eprintln!("Analysis failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
