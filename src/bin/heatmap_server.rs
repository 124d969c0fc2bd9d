//! Option Heatmap Server
//!
//! Serves the JSON API (and optionally the built front end).

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use option_heatmap::config::AppConfig;
use option_heatmap::data::YahooClient;
use option_heatmap::server::{self, AppState};
use option_heatmap::HeatmapResult;

#[derive(Parser)]
#[command(name = "heatmap_server")]
#[command(about = "Black-Scholes P&L heatmap API")]
struct Args {
    /// Path to configuration file (TOML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Directory with front-end assets
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> HeatmapResult<()> {
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.static_dir.is_some() {
        config.server.static_dir = args.static_dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level.0)),
        )
        .init();

    let market = YahooClient::new(config.market_data.clone());
    let state = AppState::new(Arc::new(market));

    server::serve(state, &config).await
}
