//! Disease prediction service over symptom lists.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use medpredict_server::config::AppConfig;
use medpredict_server::routes;
use medpredict_server::state::SymptomState;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Parser)]
#[command(name = "symptom-api", version, about = "Symptom-based disease prediction API")]
struct Cli {
    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the model artifacts.
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(&cli) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn run(cli: &Cli) -> Result<()> {
    let config = AppConfig::load();

    let host = cli
        .host
        .clone()
        .or(config.symptom.host)
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = cli.port.or(config.symptom.port).unwrap_or(DEFAULT_PORT);
    let models_dir = cli
        .models_dir
        .clone()
        .or(config.models.dir)
        .unwrap_or_else(medpredict_adapters::artifacts_dir);

    let state = Arc::new(SymptomState::load(&models_dir));
    if !state.model_loaded() {
        warn!("Serving degraded: symptom model is unavailable, /predict will answer 503");
    }

    let app = routes::symptom::router(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("Invalid listen address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    println!("symptom-api listening on http://{addr}");

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
