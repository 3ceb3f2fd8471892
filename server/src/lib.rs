use anyhow::{Context, Result};
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use docrank_core::{EngineConfig, EngineStats, Normalizer, NormalizerConfig, SearchEngine, SharedEngine, DEFAULT_TOP_K};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Upper bound on `limit` accepted by `/search`.
pub const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}
fn default_limit() -> usize { DEFAULT_TOP_K }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    /// Documents with a positive score, regardless of `limit`.
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub name: String,
    pub score: f32,
}

#[derive(Serialize)]
pub struct DocumentResponse {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Processed corpus the engine is built from.
    pub corpus_dir: PathBuf,
    /// Raw article bodies served by `/details`.
    pub raw_dir: PathBuf,
    pub engine: EngineConfig,
    pub normalizer: NormalizerConfig,
    /// Token required in `X-ADMIN-TOKEN` for admin endpoints; admin is disabled when unset.
    pub admin_token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SharedEngine>,
    pub normalizer: Arc<Normalizer>,
    pub config: Arc<AppConfig>,
}

pub fn build_app(config: AppConfig) -> Result<Router> {
    // Configuration errors are fatal: build everything before serving
    let normalizer = Normalizer::new(&config.normalizer).context("configuring normalizer")?;
    let engine = SearchEngine::build(&config.corpus_dir, config.engine)
        .with_context(|| format!("building search engine from {}", config.corpus_dir.display()))?;
    let app_state = AppState {
        engine: Arc::new(SharedEngine::new(engine)),
        normalizer: Arc::new(normalizer),
        config: Arc::new(config),
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/details/:name", get(details_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let engine = state.engine.current();
    let limit = params.limit.min(MAX_LIMIT);
    let mut ranked = engine.search_text(&state.normalizer, &params.q, engine.document_count());
    let total_hits = ranked.iter().take_while(|hit| hit.score > 0.0).count();
    ranked.truncate(limit);
    let results = ranked
        .into_iter()
        .map(|hit| SearchHit { name: hit.name, score: hit.score })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, total_hits, took_s = elapsed.as_secs_f64(), "search served");
    Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results })
}

pub async fn details_handler(State(state): State<AppState>, Path(name): Path<String>) -> Result<Json<DocumentResponse>, (StatusCode, String)> {
    let not_found = || (StatusCode::NOT_FOUND, format!("document not found: {name}"));
    if !is_plain_name(&name) {
        return Err(not_found());
    }
    let path = state.config.raw_dir.join(&name);
    if !path.is_file() {
        return Err(not_found());
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(Json(DocumentResponse { name, content })),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read document");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Names must refer to a file directly inside the raw directory.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(&['/', '\\', '\0'][..])
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<EngineStats>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let shared = Arc::clone(&state.engine);
    let corpus = state.config.corpus_dir.clone();
    let engine_config = state.config.engine;
    let rebuilt = tokio::task::spawn_blocking(move || shared.rebuild(corpus, engine_config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    match rebuilt {
        Ok(engine) => Ok(Json(engine.stats())),
        Err(e) => {
            tracing::warn!(error = %e, "reload failed, keeping current engine");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.config.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_only() {
        assert!(is_plain_name("Rust 1.0"));
        assert!(is_plain_name("notes..txt"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name("../secret"));
        assert!(!is_plain_name("a\\b"));
        assert!(!is_plain_name(""));
    }
}
