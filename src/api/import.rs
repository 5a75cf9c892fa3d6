//! Import endpoints
//!
//! `POST /api/import` takes a caller-supplied query and imports whatever the
//! search returns. `POST /api/import/nightcord` runs the curated path: fixed
//! query, ranked sets only, curation rules applied.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::services::curation;
use crate::services::importer::BeatmapImporter;
use crate::services::osu_client::SearchOptions;
use crate::AppState;

/// Request body for POST /api/import
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Search query (required, non-blank)
    #[serde(default)]
    pub query: Option<String>,
}

/// Response for POST /api/import
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Sets processed by this run
    pub imported: usize,
}

/// Response for POST /api/import/nightcord
#[derive(Debug, Serialize)]
pub struct CuratedImportResponse {
    /// Rows newly created this run
    pub inserted: usize,
    /// Sets that passed curation
    pub total: usize,
}

/// POST /api/import
///
/// Imports beatmapsets matching a caller-supplied query, without curation.
pub async fn import_beatmaps(
    State(state): State<AppState>,
    body: Option<Json<ImportRequest>>,
) -> ApiResult<Json<ImportResponse>> {
    // An absent or unparseable body gets the same flat error as a missing query
    let query = match body
        .and_then(|Json(request)| request.query)
        .as_deref()
        .map(str::trim)
    {
        Some(query) if !query.is_empty() => query.to_string(),
        _ => return Err(ApiError::BadRequest("query required".to_string())),
    };

    info!(query = %query, "Starting import");

    let importer = BeatmapImporter::new(state.db.clone(), state.osu.clone());
    let outcome = importer
        .run(
            state.settings.osu_credentials(),
            &query,
            &SearchOptions::default(),
            None,
        )
        .await?;

    Ok(Json(ImportResponse {
        imported: outcome.total,
    }))
}

/// POST /api/import/nightcord
///
/// Runs the curated import for the 25-ji, Nightcord de. catalog.
pub async fn import_nightcord(
    State(state): State<AppState>,
) -> ApiResult<Json<CuratedImportResponse>> {
    info!("Starting curated import");

    let options = SearchOptions {
        ranked_only: true,
        ..SearchOptions::default()
    };

    let importer = BeatmapImporter::new(state.db.clone(), state.osu.clone());
    let outcome = importer
        .run(
            state.settings.osu_credentials(),
            curation::CURATED_QUERY,
            &options,
            Some(&state.curation),
        )
        .await?;

    Ok(Json(CuratedImportResponse {
        inserted: outcome.inserted,
        total: outcome.total,
    }))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/api/import", post(import_beatmaps))
        .route("/api/import/nightcord", post(import_nightcord))
}
