//! Catalog record types
//!
//! A `BeatmapRecord` is one beatmapset reduced to the display fields the
//! catalog serves; the raw API shape lives in `services::osu_client`.

use serde::{Deserialize, Serialize};

/// Per-difficulty summary stored alongside each catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultySummary {
    /// Difficulty (beatmap) id
    pub id: u64,
    /// Play mode ("osu", "taiko", "fruits", "mania")
    pub mode: String,
    /// Difficulty name
    pub version: String,
    /// Star rating (0.0 when the API omitted it)
    pub stars: f64,
}

/// One catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatmapRecord {
    /// Beatmapset id from the osu! API
    pub bm_id: i64,
    /// Artist, preferring the native-script spelling
    pub artist: String,
    /// Title, preferring the native-script spelling
    pub title: String,
    /// Romanized title
    pub title_en: Option<String>,
    /// Mapper (set creator)
    pub mapper: String,
    /// Length of the hardest difficulty, formatted M:SS
    pub length: String,
    /// Play mode of the hardest difficulty
    pub mode: String,
    /// Version label of the hardest difficulty
    pub difficulty: String,
    /// Ranked date (YYYY-MM-DD), absent for unranked sets
    pub ranked_at: Option<String>,
    /// Background cover URL, highest resolution available
    pub bg_url: Option<String>,
    /// Every difficulty in the set
    pub beatmaps_json: Vec<DifficultySummary>,
    /// Row creation timestamp, set by the database on insert
    #[serde(default)]
    pub created_at: Option<String>,
}
