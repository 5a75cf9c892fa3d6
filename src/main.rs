//! beatshelf - beatmapset catalog service
//!
//! Imports beatmapsets from the osu! web API into a local SQLite catalog and
//! serves them over a small HTTP API: generic and curated import endpoints,
//! catalog listing, and catalog clearing.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use beatshelf::config::Settings;
use beatshelf::services::curation::CurationRules;
use beatshelf::services::osu_client::OsuClient;
use beatshelf::{build_router, db, AppState};

/// Command-line arguments for beatshelf
#[derive(Parser, Debug)]
#[command(name = "beatshelf")]
#[command(about = "Beatmapset catalog service backed by the osu! web API")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5800", env = "BEATSHELF_PORT")]
    port: u16,

    /// SQLite database file for the catalog
    #[arg(short, long, default_value = "beatshelf.db", env = "BEATSHELF_DB")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting beatshelf v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let settings = Settings::load();
    if settings.osu_credentials().is_none() {
        warn!(
            "osu! API credentials not configured. Import endpoints will fail until configured via one of:\n\
             1. Environment: OSU_CLIENT_ID=... OSU_CLIENT_SECRET=...\n\
             2. TOML config: beatshelf.toml (osu_client_id = \"...\", osu_client_secret = \"...\")\n\
             \n\
             Register an OAuth application at: https://osu.ppy.sh/home/account/edit#new-oauth-application"
        );
    }

    let pool = db::init_database_pool(&args.database)
        .await
        .context("Failed to open catalog database")?;
    info!("Database: {}", args.database.display());

    let osu = OsuClient::new().context("Failed to build osu! API client")?;
    let curation = CurationRules::nightcord().context("Failed to compile curation rules")?;

    let state = AppState::new(pool, settings, osu, curation);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("beatshelf listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
