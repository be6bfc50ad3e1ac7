//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::debug;

use crate::cache::Engine;
use crate::config::Config;
use crate::error::ApiError;
use crate::metrics::StatsObserver;
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, ResetResponse, SearchRequest, SearchResponse,
    SetRequest, SetResponse, StatsResponse,
};

/// Result type returned by handlers.
pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// Application state shared across all handlers.
///
/// The engine does its own locking, so handlers only need shared handles.
#[derive(Clone)]
pub struct AppState {
    /// Cache engine
    pub engine: Arc<Engine>,
    /// Telemetry sink the engine reports into, read by `/stats`
    pub stats: Arc<StatsObserver>,
}

impl AppState {
    /// Creates a new AppState from an engine and the observer it reports to.
    pub fn new(engine: Arc<Engine>, stats: Arc<StatsObserver>) -> Self {
        Self { engine, stats }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the engine's evictor, so this must run inside a Tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        let stats = Arc::new(StatsObserver::new());
        let engine = Engine::new(config.engine_config(), stats.clone());
        Self::new(Arc::new(engine), stats)
    }
}

/// Handler for PUT /set
///
/// Stores a key-value pair with an optional duration-string TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> ApiResult<SetResponse> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    state.engine.set(req.key.as_str(), req.value, &req.expire)?;
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Misses are not errors; they come back with `found: false`.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<GetResponse> {
    let value = state.engine.get(&key);
    Json(GetResponse::new(key, value))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let existed = state.engine.del(&key);
    Json(DeleteResponse::new(key, existed))
}

/// Handler for POST /expire/:key
///
/// Expires the key immediately.
pub async fn expire_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let existed = state.engine.expire_key(&key);
    Json(DeleteResponse::new(key, existed))
}

/// Handler for POST /search
pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> ApiResult<SearchResponse> {
    let (pattern, mode) = req.resolve();
    debug!("search pattern={:?} mode={:?}", pattern, mode);

    let keys = state.engine.search(pattern, mode)?;
    Ok(Json(SearchResponse { keys }))
}

/// Handler for POST /reset
pub async fn reset_handler(State(state): State<AppState>) -> Json<ResetResponse> {
    Json(ResetResponse::new(state.engine.reset()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.stats.snapshot()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
