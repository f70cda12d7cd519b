//! JSON-P gateway.
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ────────────────────┼─▶ trace ─▶ timeout ─▶ jsonp ─▶ forward ──────┼──▶ Upstream
//!                         │                       │                      │    Application
//!     Client Response     │                       ▼                      │
//!     ◀───────────────────┼─────────────── pad JSON as cb(...) ◀─────────┼───
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use jsonp_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use jsonp_gateway::observability::init_logging;
use jsonp_gateway::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "jsonp-gateway", version, about = "Adds JSON-P support in front of an HTTP application")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(long)]
    bind: Option<String>,

    /// Override upstream.address.
    #[arg(long)]
    upstream: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(upstream) = cli.upstream {
        config.upstream.address = upstream;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        callback_param = %config.jsonp.callback_param,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
