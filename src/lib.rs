//! beatshelf library - beatmapset catalog service
//!
//! Imports beatmapsets from the osu! web API into a local SQLite catalog and
//! serves them over a small HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;

use crate::config::Settings;
use crate::services::curation::CurationRules;
use crate::services::osu_client::OsuClient;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved configuration (osu! API credentials)
    pub settings: Settings,
    /// osu! web API client
    pub osu: OsuClient,
    /// Compiled curation rules for the curated import path
    pub curation: CurationRules,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, settings: Settings, osu: OsuClient, curation: CurationRules) -> Self {
        Self {
            db,
            settings,
            osu,
            curation,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::import_routes())
        .merge(api::beatmap_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
}
