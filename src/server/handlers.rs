//! Request handlers
//!
//! Every failure is reported as `400 {"detail": "..."}` so the front end can
//! show the message; one bad request never affects another.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::AppState;
use crate::core::{Contract, ExpiryMap, HeatmapError, HeatmapResult, OptionType};
use crate::data::{resolve_today, sanitize};
use crate::heatmap::{generate, HeatmapGrid};

/// Error response body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<HeatmapError> for ApiError {
    fn from(e: HeatmapError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: e.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            detail: format!("Invalid request body: {}", rejection.body_text()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!("Request failed ({}): {}", self.status, self.detail);
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

/// Run a blocking provider call off the async workers
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> HeatmapResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => Err(ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("worker failed: {}", e),
        }),
    }
}

fn parse_option_type(tag: Option<&str>) -> HeatmapResult<OptionType> {
    tag.map(str::parse::<OptionType>).unwrap_or(Ok(OptionType::Call))
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "API RUNNING" }))
}

/// GET /api/options/{ticker}
pub async fn option_chain(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!("Fetching option chain for {}", ticker);
    let market = state.market.clone();
    let chain = run_blocking(move || market.fetch_chain(&ticker)).await?;

    Ok(Json(json!({
        "calls": sanitize(&chain.calls)?,
        "puts": sanitize(&chain.puts)?,
    })))
}

/// Body of `POST /api/contract`
#[derive(Debug, Deserialize)]
pub struct ContractRequest {
    /// Expiration date, `YYYY-MM-DD`
    pub exp: String,
    pub strike: f64,
    /// One side of the chain as returned by `/api/options`
    pub chain: ExpiryMap,
    /// `c`/`p`; defaults to call
    #[serde(default)]
    pub option_type: Option<String>,
}

/// POST /api/contract
pub async fn contract(
    State(state): State<AppState>,
    payload: Result<Json<ContractRequest>, JsonRejection>,
) -> Result<Json<Contract>, ApiError> {
    let Json(request) = payload?;
    let option_type = parse_option_type(request.option_type.as_deref())?;

    let market = state.market.clone();
    let contract = run_blocking(move || {
        resolve_today(&request.chain, &request.exp, request.strike, option_type, market.as_ref())
    })
    .await?;

    Ok(Json(contract))
}

/// Body of `POST /api/heatmap`
#[derive(Debug, Deserialize)]
pub struct HeatmapRequest {
    pub contract: Contract,
    pub option_type: String,
    /// Missing, `null` and `0` all select the default rows
    #[serde(default)]
    pub range_max: Option<f64>,
    #[serde(default)]
    pub range_min: Option<f64>,
}

/// POST /api/heatmap
pub async fn heatmap(
    payload: Result<Json<HeatmapRequest>, JsonRejection>,
) -> Result<Json<HeatmapGrid>, ApiError> {
    let Json(request) = payload?;
    let option_type = parse_option_type(Some(&request.option_type))?;
    let contract = request.contract.with_option_type(option_type);

    let range_min = request.range_min.unwrap_or(0.0);
    let range_max = request.range_max.unwrap_or(0.0);
    let grid = generate(&contract, range_min, range_max)?;
    Ok(Json(grid))
}
