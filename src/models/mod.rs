//! Data models for the beatmap catalog

pub mod beatmap;

pub use beatmap::{BeatmapRecord, DifficultySummary};
