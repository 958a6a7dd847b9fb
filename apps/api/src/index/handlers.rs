//! Axum route handlers for the per-content-type index API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::index::migration::{migrate_legacy, MigrationOutcome};
use crate::index::render::render_results;
use crate::index::Ack;
use crate::models::item::{ContentType, CorpusEntry, Metadata, SearchResult};
use crate::state::AppState;

const DEFAULT_TOP_K: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<usize>,
    /// Hits with this `filename` are left out of `rendered`.
    #[serde(default)]
    pub exclude_filename: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub rendered: String,
}

#[derive(Debug, Serialize)]
pub struct CorpusResponse {
    pub content_type: ContentType,
    pub total: usize,
    pub items: Vec<CorpusEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MigrateRequest {
    #[serde(default)]
    pub target: Option<String>,
}

fn parse_content_type(raw: &str) -> Result<ContentType, AppError> {
    raw.parse::<ContentType>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/index/:content_type
///
/// Embeds `text` and appends it with its metadata to the content type.
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<Ack>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let ack = state
        .store
        .add(&request.text, request.metadata, &content_type)
        .await?;
    Ok(Json(ack))
}

/// GET /api/v1/index/:content_type
pub async fn handle_get_corpus(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> Result<Json<CorpusResponse>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let items = state.store.get_corpus(&content_type).await?;
    Ok(Json(CorpusResponse {
        content_type,
        total: items.len(),
        items,
    }))
}

/// DELETE /api/v1/index/:content_type
///
/// Empties the content type's index and corpus, on disk as well.
pub async fn handle_clear(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
) -> Result<Json<Value>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    state.store.clear(&content_type).await?;
    Ok(Json(json!({ "cleared": content_type })))
}

/// POST /api/v1/index/:content_type/search
pub async fn handle_search(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let top_k = request.top_k.unwrap_or(DEFAULT_TOP_K);
    if top_k == 0 {
        return Err(AppError::Validation("top_k must be at least 1".to_string()));
    }

    let results = state
        .store
        .search(&request.query, &content_type, top_k, None)
        .await?;
    let rendered = render_results(
        &results,
        &content_type,
        &state.config.public_base_url,
        request.exclude_filename.as_deref(),
    );
    Ok(Json(SearchResponse { results, rendered }))
}

/// POST /api/v1/index/migrate
///
/// Imports the pre-content-type index/corpus pair into `target` (default `resume`).
pub async fn handle_migrate(
    State(state): State<AppState>,
    body: Option<Json<MigrateRequest>>,
) -> Result<Json<MigrationOutcome>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let target = match request.target.as_deref() {
        Some(raw) => parse_content_type(raw)?,
        None => ContentType::Resume,
    };

    let outcome = migrate_legacy(
        &state.store,
        &state.config.legacy_index_file,
        &state.config.legacy_corpus_file,
        &target,
    )
    .await?;
    Ok(Json(outcome))
}
