//! # Shiftboard Main Entry Point

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use shiftboard::{
    clock::{Clock, SystemClock},
    config::ConfigLoader,
    repositories::Records,
    seeds::demo_records,
    server::{AppState, run_server},
    telemetry::init_tracing,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "shiftboard")]
#[command(about = "Employee scheduling API")]
struct Cli {
    /// Directory holding the layered .env files
    #[arg(long)]
    env_dir: Option<PathBuf>,

    /// Start with an empty store instead of the demo data
    #[arg(long, default_value_t = false)]
    empty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let loader = match cli.env_dir {
        Some(dir) => ConfigLoader::with_base_dir(dir),
        None => ConfigLoader::new(),
    };
    let config = loader.load().context("failed to load configuration")?;

    init_tracing(&config)?;
    info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        info!("Configuration: {}", redacted_json);
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let records = if cli.empty {
        Records::default()
    } else {
        demo_records(clock.today())
    };

    let state = AppState::build(config, clock, records)?;
    run_server(state).await
}
