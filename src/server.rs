use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::sync::RwLock;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use crate::api::{ApiResponse, PageMeta, SearchData, SearchParams};
use crate::catalog::{Catalog, Track};
use crate::error::ApiError;
use crate::search::SearchEngine;

#[derive(Clone)]
pub struct AppState {
    search_engine: Arc<SearchEngine>,
    catalog: Arc<RwLock<Catalog>>,
    environment: String,
    started_at: Instant,
}

impl AppState {
    pub fn new(catalog: Catalog, environment: impl Into<String>) -> Self {
        Self {
            search_engine: Arc::new(SearchEngine::from_catalog(&catalog)),
            catalog: Arc::new(RwLock::new(catalog)),
            environment: environment.into(),
            started_at: Instant::now(),
        }
    }

    pub fn search_engine(&self) -> &SearchEngine {
        &self.search_engine
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime: String,
    timestamp: String,
    environment: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/search", get(search_handler))
        .route("/api/music/:id/play", post(play_handler))
        .route("/api/music/:id/like", post(like_handler))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server listening on http://{}", addr);
    tracing::info!("🔍 Search API available at http://{}/api/search?q=<query>", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        service: "newcool-search",
        version: env!("CARGO_PKG_VERSION"),
        uptime: format!("{}s", state.started_at.elapsed().as_secs()),
        timestamp: Utc::now().to_rfc3339(),
        environment: state.environment.clone(),
    })
}

async fn search_handler(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let params = SearchParams::from_pairs(pairs);
    if params.wants_stats() {
        let stats = state.search_engine.stats();
        return Ok(Json(ApiResponse::ok(stats)).into_response());
    }

    let request = params.validate()?;
    let start = Instant::now();

    let outcome = state.search_engine.search(&request.query, &request.options);
    let time_ms = start.elapsed().as_millis();

    tracing::info!(
        "Search query='{}' type={} returned {} results in {}ms",
        request.query,
        request.options.kind,
        outcome.total,
        time_ms
    );

    let meta = PageMeta {
        total: outcome.total,
        limit: request.options.limit,
        offset: request.options.offset,
    };
    let data = SearchData {
        filters: request.filters(),
        query: request.query,
        results: outcome.results,
    };

    Ok(Json(ApiResponse::paginated(data, meta)).into_response())
}

async fn play_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Track>>, ApiError> {
    update_track(&state, &id, Catalog::record_play).await
}

async fn like_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Track>>, ApiError> {
    update_track(&state, &id, Catalog::record_like).await
}

/// Applies a counter update and re-derives the index so search results
/// never report stale play/like counts.
async fn update_track(
    state: &AppState,
    id: &str,
    update: for<'a> fn(&'a mut Catalog, &str) -> Option<&'a Track>,
) -> Result<Json<ApiResponse<Track>>, ApiError> {
    let mut catalog = state.catalog.write().await;
    let track = update(&mut catalog, id).cloned().ok_or(ApiError::NotFound)?;
    state.search_engine.rebuild(&catalog);

    tracing::debug!("Track {} now at {} plays, {} likes", track.id, track.plays, track.likes);

    Ok(Json(ApiResponse::ok(track)))
}
