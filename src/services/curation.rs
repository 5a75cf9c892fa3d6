//! Curation rules for the curated import path
//!
//! A fetched set is retained only when two independent matchers both hit: the
//! series matcher against tags, title, and source, and the collection matcher
//! against artist, title, and tags. Each matcher is a case-insensitive
//! alternation over known aliases.

use regex::{Regex, RegexBuilder};

use crate::services::osu_client::BeatmapSet;

/// Search query submitted to the osu! API for the curated import path
pub const CURATED_QUERY: &str = "プロジェクトセカイ カラフルステージ！ feat.初音ミク";

/// Aliases for the Project Sekai series, including shorthand romanizations
const SERIES_PATTERN: &str =
    r"プロジェクトセカイ(?: カラフルステージ)?|プロセカ|pjsk|prsk|project sekai";

/// Aliases for the 25-ji, Nightcord de. unit (various spacings and punctuation)
const COLLECTION_PATTERN: &str =
    r"nigo|niigo|25[- ]?ji[,]?\s?nightcord de\.|25[- ]?ji|25ji|25時.?ナイトコード.?で。?";

/// Compiled matcher pair for curated imports
#[derive(Debug, Clone)]
pub struct CurationRules {
    series: Regex,
    collection: Regex,
}

impl CurationRules {
    /// Compile a rule pair from two alternation patterns
    pub fn new(series_pattern: &str, collection_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            series: case_insensitive(series_pattern)?,
            collection: case_insensitive(collection_pattern)?,
        })
    }

    /// Rules for the 25-ji, Nightcord de. catalog
    pub fn nightcord() -> Result<Self, regex::Error> {
        Self::new(SERIES_PATTERN, COLLECTION_PATTERN)
    }

    /// Whether a set belongs in the curated catalog.
    ///
    /// Both matchers must hit: series on tags, preferred title, or source;
    /// collection on preferred artist, preferred title, or tags.
    pub fn matches(&self, set: &BeatmapSet) -> bool {
        let tags = set.tags.as_deref().unwrap_or("");
        let source = set.source.as_deref().unwrap_or("");
        let title = set.preferred_title();
        let artist = set.preferred_artist();

        let series_hit = self.series.is_match(tags)
            || self.series.is_match(title)
            || self.series.is_match(source);

        let collection_hit = self.collection.is_match(artist)
            || self.collection.is_match(title)
            || self.collection.is_match(tags);

        series_hit && collection_hit
    }
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::osu_client::Covers;

    fn set_with(artist: &str, title: &str, tags: &str, source: &str) -> BeatmapSet {
        BeatmapSet {
            id: 1,
            artist: artist.to_string(),
            artist_unicode: None,
            title: title.to_string(),
            title_unicode: None,
            creator: "mapper".to_string(),
            source: Some(source.to_string()),
            tags: Some(tags.to_string()),
            ranked_date: None,
            covers: Covers::default(),
            beatmaps: Vec::new(),
        }
    }

    #[test]
    fn test_requires_both_matchers() {
        let rules = CurationRules::new("alpha|beta", "gamma").unwrap();

        let both = set_with("gamma band", "some song", "alpha", "");
        let series_only = set_with("other band", "some song", "alpha", "");
        let collection_only = set_with("gamma band", "some song", "unrelated", "");
        let neither = set_with("other band", "some song", "unrelated", "");

        assert!(rules.matches(&both));
        assert!(!rules.matches(&series_only));
        assert!(!rules.matches(&collection_only));
        assert!(!rules.matches(&neither));
    }

    #[test]
    fn test_series_checks_tags_title_and_source() {
        let rules = CurationRules::new("alpha", "gamma").unwrap();

        let via_tags = set_with("gamma", "song", "alpha", "");
        let via_title = set_with("gamma", "alpha anthem", "", "");
        let via_source = set_with("gamma", "song", "", "alpha game");
        // The series matcher does not look at the artist field
        let via_artist_only = set_with("gamma alpha", "song", "", "");

        assert!(rules.matches(&via_tags));
        assert!(rules.matches(&via_title));
        assert!(rules.matches(&via_source));
        assert!(!rules.matches(&via_artist_only));
    }

    #[test]
    fn test_collection_checks_artist_title_and_tags() {
        let rules = CurationRules::new("alpha", "gamma").unwrap();

        let via_artist = set_with("gamma band", "song", "alpha", "");
        let via_title = set_with("band", "gamma song", "alpha", "");
        let via_tags = set_with("band", "song", "alpha gamma", "");
        // The collection matcher does not look at the source field
        let via_source_only = set_with("band", "song", "alpha", "gamma");

        assert!(rules.matches(&via_artist));
        assert!(rules.matches(&via_title));
        assert!(rules.matches(&via_tags));
        assert!(!rules.matches(&via_source_only));
    }

    #[test]
    fn test_matching_uses_preferred_unicode_fields() {
        let rules = CurationRules::nightcord().unwrap();

        let mut set = set_with("romanized artist", "romanized title", "project sekai", "");
        set.artist_unicode = Some("25時、ナイトコードで。".to_string());

        assert!(rules.matches(&set));
    }

    #[test]
    fn test_nightcord_accepts_romanized_aliases() {
        let rules = CurationRules::nightcord().unwrap();

        let canonical = set_with(
            "25-ji, Nightcord de. x Hatsune Miku",
            "Jackpot Sad Girl",
            "prsk project sekai colorful stage",
            "プロジェクトセカイ カラフルステージ！ feat.初音ミク",
        );
        let shorthand = set_with("niigo", "some song", "PJSK", "");

        assert!(rules.matches(&canonical));
        assert!(rules.matches(&shorthand));
    }

    #[test]
    fn test_nightcord_is_case_insensitive() {
        let rules = CurationRules::nightcord().unwrap();

        let set = set_with("25-JI, NIGHTCORD DE. X KAFU", "song", "PROJECT SEKAI", "");
        assert!(rules.matches(&set));
    }

    #[test]
    fn test_nightcord_rejects_series_without_collection() {
        let rules = CurationRules::nightcord().unwrap();

        // Project Sekai set from a different unit
        let set = set_with(
            "Leo/need",
            "Stella After the Rain",
            "project sekai leoneed",
            "",
        );
        assert!(!rules.matches(&set));
    }

    #[test]
    fn test_nightcord_rejects_collection_without_series() {
        let rules = CurationRules::nightcord().unwrap();

        // "nigo" hit with no series context
        let set = set_with("nigo", "unrelated song", "electronic", "");
        assert!(!rules.matches(&set));
    }

    #[test]
    fn test_nightcord_matches_japanese_unit_name() {
        let rules = CurationRules::nightcord().unwrap();

        let set = set_with("25時、ナイトコードで。", "悪ノ大罪", "プロセカ", "");
        assert!(rules.matches(&set));
    }
}
