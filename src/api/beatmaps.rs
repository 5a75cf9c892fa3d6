//! Catalog browsing endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::info;

use crate::db;
use crate::error::ApiResult;
use crate::models::BeatmapRecord;
use crate::AppState;

/// Response for POST /api/beatmaps/clear
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub deleted: u64,
}

/// GET /api/beatmaps
///
/// Returns all catalog entries, newest beatmapset id first.
pub async fn list_beatmaps(State(state): State<AppState>) -> ApiResult<Json<Vec<BeatmapRecord>>> {
    let records = db::beatmaps::list_beatmaps(&state.db).await?;
    Ok(Json(records))
}

/// POST /api/beatmaps/clear
///
/// Deletes every catalog entry and reports how many were removed.
pub async fn clear_beatmaps(State(state): State<AppState>) -> ApiResult<Json<ClearResponse>> {
    let deleted = db::beatmaps::clear_beatmaps(&state.db).await?;
    info!(deleted, "Catalog cleared");

    Ok(Json(ClearResponse { deleted }))
}

/// Build catalog routes
pub fn beatmap_routes() -> Router<AppState> {
    Router::new()
        .route("/api/beatmaps", get(list_beatmaps))
        .route("/api/beatmaps/clear", post(clear_beatmaps))
}
