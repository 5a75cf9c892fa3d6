//! Import pipeline: search, curate, derive, persist
//!
//! `BeatmapImporter` runs the full pipeline against the osu! API;
//! `persist_sets` is the network-free tail (curation onward), which also
//! serves as the seam for fixture-driven tests.

use serde::Serialize;
use sqlx::SqlitePool;
use thiserror::Error;

use crate::config::OsuCredentials;
use crate::db;
use crate::models::beatmap::{BeatmapRecord, DifficultySummary};
use crate::services::curation::CurationRules;
use crate::services::osu_client::{
    BeatmapDifficulty, BeatmapSet, Covers, OsuClient, OsuError, SearchOptions,
};

/// Import pipeline errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// osu! API failure (credentials, token, or search)
    #[error(transparent)]
    Osu(#[from] OsuError),

    /// Catalog write failure
    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

/// Counts reported by an import run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    /// Rows newly created this run
    pub inserted: usize,
    /// Sets processed: curated sets when rules were applied, all fetched
    /// sets otherwise
    pub total: usize,
}

/// Reduce a fetched beatmapset to a catalog record.
///
/// Returns `None` when the set has no difficulties or its id does not fit
/// the catalog key. The hardest difficulty (strictly greatest star rating,
/// first wins ties, unrated counts as 0.0) supplies the representative
/// length, mode, and version label.
pub fn derive_record(set: &BeatmapSet) -> Option<BeatmapRecord> {
    if set.beatmaps.is_empty() {
        return None;
    }

    let bm_id = match i64::try_from(set.id) {
        Ok(id) => id,
        Err(_) => {
            tracing::warn!(bm_id = set.id, "Skipping set with id beyond the catalog key range");
            return None;
        }
    };

    let hardest = set
        .beatmaps
        .iter()
        .skip(1)
        .fold(&set.beatmaps[0], |best, candidate| {
            if rating(candidate) > rating(best) {
                candidate
            } else {
                best
            }
        });

    let seconds = hardest.total_length.unwrap_or(0);

    let summaries = set
        .beatmaps
        .iter()
        .map(|b| DifficultySummary {
            id: b.id,
            mode: b.mode.clone(),
            version: b.version.clone(),
            stars: b.difficulty_rating.unwrap_or(0.0),
        })
        .collect();

    Some(BeatmapRecord {
        bm_id,
        artist: set.preferred_artist().to_string(),
        title: set.preferred_title().to_string(),
        title_en: Some(set.title.clone()),
        mapper: set.creator.clone(),
        length: format_length(seconds),
        mode: hardest.mode.clone(),
        difficulty: hardest.version.clone(),
        ranked_at: set.ranked_date.as_deref().map(truncate_date),
        bg_url: background_url(&set.covers),
        beatmaps_json: summaries,
        created_at: None,
    })
}

fn rating(difficulty: &BeatmapDifficulty) -> f64 {
    difficulty.difficulty_rating.unwrap_or(0.0)
}

/// Format a length in seconds as M:SS (minutes are not wrapped into hours)
pub fn format_length(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// First 10 characters of an ISO 8601 date-time (the date part)
fn truncate_date(date: &str) -> String {
    date.chars().take(10).collect()
}

/// Highest-resolution cover art available, if any
fn background_url(covers: &Covers) -> Option<String> {
    [&covers.cover_2x, &covers.cover, &covers.card, &covers.list]
        .into_iter()
        .find_map(|url| url.as_deref().filter(|u| !u.is_empty()))
        .map(str::to_owned)
}

/// Orchestrates one import run against the osu! API
pub struct BeatmapImporter {
    db: SqlitePool,
    osu: OsuClient,
}

impl BeatmapImporter {
    pub fn new(db: SqlitePool, osu: OsuClient) -> Self {
        Self { db, osu }
    }

    /// Run the full pipeline: token, paginated search, optional curation,
    /// then create-or-skip writes. Fails before any network call when
    /// credentials are absent.
    pub async fn run(
        &self,
        credentials: Option<&OsuCredentials>,
        query: &str,
        options: &SearchOptions,
        rules: Option<&CurationRules>,
    ) -> Result<ImportOutcome, ImportError> {
        let credentials = credentials.ok_or_else(|| {
            OsuError::Credentials(
                "set OSU_CLIENT_ID / OSU_CLIENT_SECRET, or osu_client_id / osu_client_secret in beatshelf.toml"
                    .to_string(),
            )
        })?;

        let token = self.osu.fetch_token(credentials).await?;
        let sets = self.osu.search_beatmapsets(&token, query, options).await?;

        self.persist_sets(sets, rules).await
    }

    /// Curate (when rules are given), derive catalog fields, and write each
    /// surviving set. `total` counts curated sets, including any skipped for
    /// having no difficulties; `inserted` counts rows actually created.
    pub async fn persist_sets(
        &self,
        sets: Vec<BeatmapSet>,
        rules: Option<&CurationRules>,
    ) -> Result<ImportOutcome, ImportError> {
        let fetched = sets.len();

        let curated: Vec<BeatmapSet> = match rules {
            Some(rules) => sets.into_iter().filter(|set| rules.matches(set)).collect(),
            None => sets,
        };

        if rules.is_some() {
            tracing::info!(fetched, curated = curated.len(), "Curation filter applied");
        }

        let mut inserted = 0;
        for set in &curated {
            let record = match derive_record(set) {
                Some(record) => record,
                None => {
                    tracing::debug!(bm_id = set.id, "Skipping set with no difficulties");
                    continue;
                }
            };

            if db::beatmaps::upsert_beatmap(&self.db, &record).await? {
                inserted += 1;
            }
        }

        let outcome = ImportOutcome {
            inserted,
            total: curated.len(),
        };

        tracing::info!(
            inserted = outcome.inserted,
            total = outcome.total,
            "Import batch persisted"
        );

        Ok(outcome)
    }
}
