//! HTTP service for the web front end
//!
//! Provides:
//! - `GET  /`                     health message
//! - `GET  /api/options/{ticker}` option chain (calls and puts)
//! - `POST /api/contract`         resolve a contract from a chain
//! - `POST /api/heatmap`          P&L heatmap for a resolved contract
//!
//! Static front-end assets are served for any other path when a static
//! directory is configured. Provider calls block, so they run on tokio's
//! blocking pool.

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::AppConfig;
use crate::core::HeatmapResult;
use crate::data::MarketData;

pub use handlers::ApiError;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub market: Arc<dyn MarketData>,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketData>) -> Self {
        Self { market }
    }
}

/// Build the application router
pub fn router(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/", get(handlers::root))
        .route("/api/options/{ticker}", get(handlers::option_chain))
        .route("/api/contract", post(handlers::contract))
        .route("/api/heatmap", post(handlers::heatmap));

    let app = match &config.server.static_dir {
        Some(dir) => {
            tracing::info!("Serving static assets from {:?}", dir);
            api.fallback_service(ServeDir::new(dir))
        }
        None => api,
    };

    app.layer(cors).with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(state: AppState, config: &AppConfig) -> HeatmapResult<()> {
    let app = router(state, config);
    let addr = config.bind_address();

    let listener = tokio::net::TcpListener::bind(addr.as_str()).await?;
    tracing::info!("Heatmap server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
