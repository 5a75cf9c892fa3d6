//! Service modules for the import pipeline

pub mod curation;
pub mod importer;
pub mod osu_client;

pub use curation::CurationRules;
pub use importer::{BeatmapImporter, ImportError, ImportOutcome};
pub use osu_client::{BeatmapSet, OsuClient, OsuError, SearchOptions};
