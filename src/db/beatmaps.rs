//! Beatmap catalog persistence
//!
//! Difficulty summaries are stored as a JSON array in the `beatmaps_json`
//! TEXT column.

use anyhow::Result;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::models::beatmap::{BeatmapRecord, DifficultySummary};

/// Insert a catalog row, ignoring the write when `bm_id` already exists.
/// Returns whether a new row was created.
pub async fn upsert_beatmap(pool: &SqlitePool, record: &BeatmapRecord) -> Result<bool> {
    let beatmaps_json = serde_json::to_string(&record.beatmaps_json)?;

    let result = sqlx::query(
        r#"
        INSERT INTO beatmaps (
            bm_id, artist, title, title_en, mapper, length,
            mode, difficulty, ranked_at, bg_url, beatmaps_json
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(bm_id) DO NOTHING
        "#,
    )
    .bind(record.bm_id)
    .bind(&record.artist)
    .bind(&record.title)
    .bind(&record.title_en)
    .bind(&record.mapper)
    .bind(&record.length)
    .bind(&record.mode)
    .bind(&record.difficulty)
    .bind(&record.ranked_at)
    .bind(&record.bg_url)
    .bind(beatmaps_json)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all catalog rows, newest beatmapset id first
pub async fn list_beatmaps(pool: &SqlitePool) -> Result<Vec<BeatmapRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT bm_id, artist, title, title_en, mapper, length,
               mode, difficulty, ranked_at, bg_url, beatmaps_json, created_at
        FROM beatmaps
        ORDER BY bm_id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(row_to_record).collect())
}

/// Delete every catalog row, returning how many were removed
pub async fn clear_beatmaps(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM beatmaps").execute(pool).await?;
    Ok(result.rows_affected())
}

fn row_to_record(row: &SqliteRow) -> BeatmapRecord {
    let bm_id: i64 = row.get("bm_id");

    let raw: String = row.get("beatmaps_json");
    let beatmaps_json: Vec<DifficultySummary> = match serde_json::from_str(&raw) {
        Ok(summaries) => summaries,
        Err(e) => {
            tracing::warn!(bm_id, error = %e, "Corrupt beatmaps_json column; serving empty difficulty list");
            Vec::new()
        }
    };

    BeatmapRecord {
        bm_id,
        artist: row.get("artist"),
        title: row.get("title"),
        title_en: row.get("title_en"),
        mapper: row.get("mapper"),
        length: row.get("length"),
        mode: row.get("mode"),
        difficulty: row.get("difficulty"),
        ranked_at: row.get("ranked_at"),
        bg_url: row.get("bg_url"),
        beatmaps_json,
        created_at: row.get("created_at"),
    }
}
