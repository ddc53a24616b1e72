//! HerbTrace API server entry point

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trace_api::{run_server, ApiConfig, AppState};

#[derive(Parser)]
#[command(name = "trace-api")]
#[command(about = "HerbTrace provenance ledger API server")]
#[command(version)]
struct Cli {
    /// Host to bind to
    #[arg(short = 'H', long, env = "TRACE_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "TRACE_PORT", default_value = "3000")]
    port: u16,

    /// Disable permissive CORS
    #[arg(long)]
    no_cors: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = ApiConfig {
        host: cli.host,
        port: cli.port,
        enable_cors: !cli.no_cors,
    };

    run_server(config, AppState::new()).await
}
