//! xeno-proxy
//!
//! Forwards bird-name lookups to the xeno-canto recordings API, strips the
//! media host from recording links and caches the result per term.
//!
//! ```text
//!   GET /api/birds?birdName=<term>
//!            │
//!            ▼
//!   ┌─────────────────┐  hit   ┌───────────────┐
//!   │ handlers.rs     │───────▶│ ResponseCache │
//!   └────────┬────────┘        └───────▲───────┘
//!            │ miss                    │ store (2xx only)
//!            ▼                         │
//!   ┌─────────────────┐        ┌───────┴───────┐
//!   │ UpstreamFetcher │───────▶│  transform    │
//!   └─────────────────┘        └───────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use xeno_proxy::config::{resolve_config, ConfigOverrides};
use xeno_proxy::observability::{logging, metrics};
use xeno_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "xeno-proxy")]
#[command(about = "Caching proxy for the xeno-canto recordings API", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        bind_address: cli.bind,
    };
    let config = resolve_config(cli.config.as_deref(), &overrides)?;

    logging::init_logging(&config.observability)?;

    tracing::info!("xeno-proxy v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config_file = ?cli.config,
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        transform = config.transform.enabled,
        coalesce_in_flight = config.cache.coalesce_in_flight,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
