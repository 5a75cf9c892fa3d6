//! osu! web API client
//!
//! Authenticates with the client-credentials OAuth grant and fetches
//! beatmapsets from `/api/v2/beatmapsets/search`, following the opaque
//! `cursor_string` across pages until the configured caps are reached.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::OsuCredentials;

const OSU_TOKEN_URL: &str = "https://osu.ppy.sh/oauth/token";
const OSU_SEARCH_URL: &str = "https://osu.ppy.sh/api/v2/beatmapsets/search";
const USER_AGENT: &str = "beatshelf/0.1.0";

/// Default cap on accumulated results per search
pub const DEFAULT_MAX_RESULTS: usize = 200;
/// Default cap on pages fetched per search
pub const DEFAULT_MAX_PAGES: usize = 15;

/// osu! API client errors
#[derive(Debug, Error)]
pub enum OsuError {
    /// Client credentials absent or blank; detected before any network call
    #[error("osu! credentials not configured: {0}")]
    Credentials(String),

    /// HTTP client construction failure
    #[error("HTTP client error: {0}")]
    Client(String),

    /// Token endpoint failure (network, non-success status, or bad payload)
    #[error("osu! token request failed: {0}")]
    Token(String),

    /// Search failure before any page was retrieved
    #[error("osu! beatmapset search failed: {0}")]
    Search(String),
}

/// Cover art URLs for a beatmapset
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Covers {
    pub cover: Option<String>,
    #[serde(rename = "cover@2x")]
    pub cover_2x: Option<String>,
    pub card: Option<String>,
    pub list: Option<String>,
}

/// One difficulty within a beatmapset
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeatmapDifficulty {
    /// Difficulty (beatmap) id
    pub id: u64,
    /// Play mode ("osu", "taiko", "fruits", "mania")
    pub mode: String,
    /// Difficulty name
    pub version: String,
    /// Star rating
    pub difficulty_rating: Option<f64>,
    /// Length in seconds
    pub total_length: Option<u64>,
}

/// A beatmapset as returned by the search endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BeatmapSet {
    /// Beatmapset id
    pub id: u64,
    /// Romanized artist
    pub artist: String,
    /// Native-script artist
    pub artist_unicode: Option<String>,
    /// Romanized title
    pub title: String,
    /// Native-script title
    pub title_unicode: Option<String>,
    /// Mapper (set creator)
    pub creator: String,
    /// Source media (game, album, ...)
    pub source: Option<String>,
    /// Space-separated tag list
    pub tags: Option<String>,
    /// Ranked date-time (ISO 8601), absent for unranked sets
    pub ranked_date: Option<String>,
    /// Cover art URLs
    #[serde(default)]
    pub covers: Covers,
    /// Difficulties in the set
    #[serde(default)]
    pub beatmaps: Vec<BeatmapDifficulty>,
}

impl BeatmapSet {
    /// Native-script title when present and non-empty, romanized otherwise
    pub fn preferred_title(&self) -> &str {
        match self.title_unicode.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.title,
        }
    }

    /// Native-script artist when present and non-empty, romanized otherwise
    pub fn preferred_artist(&self) -> &str {
        match self.artist_unicode.as_deref() {
            Some(artist) if !artist.is_empty() => artist,
            _ => &self.artist,
        }
    }
}

/// One page of search results
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub beatmapsets: Vec<BeatmapSet>,
    /// Opaque cursor for the next page; absent or empty at the end
    pub cursor_string: Option<String>,
}

/// Pagination limits for a beatmapset search
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Stop once at least this many sets have been accumulated
    pub max_results: usize,
    /// Stop after this many pages
    pub max_pages: usize,
    /// Restrict the search to ranked sets
    pub ranked_only: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            max_pages: DEFAULT_MAX_PAGES,
            ranked_only: false,
        }
    }
}

/// Outcome of fetching a single search page
#[derive(Debug)]
pub(crate) enum PageFetch {
    /// Parsed page
    Page(SearchPage),
    /// Non-success HTTP status; pagination stops, accumulated sets stand
    Refused(u16),
    /// Transport or decode failure
    Failed(String),
}

/// Accumulate search pages until a cap is reached or the cursor runs out.
///
/// A refused page (non-success status) ends pagination with whatever has been
/// accumulated so far. A failed fetch after at least one good page degrades to
/// a partial result with a warning; a failure on the first page is an error.
pub(crate) async fn collect_pages<F, Fut>(
    options: &SearchOptions,
    mut fetch: F,
) -> Result<Vec<BeatmapSet>, OsuError>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: std::future::Future<Output = PageFetch>,
{
    let mut sets: Vec<BeatmapSet> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    while sets.len() < options.max_results && pages < options.max_pages {
        match fetch(cursor.take()).await {
            PageFetch::Page(page) => {
                pages += 1;
                sets.extend(page.beatmapsets);

                // An absent or empty cursor means the API has no further pages
                match page.cursor_string.filter(|c| !c.is_empty()) {
                    Some(next) => cursor = Some(next),
                    None => break,
                }
            }
            PageFetch::Refused(status) => {
                tracing::warn!(
                    status,
                    page = pages + 1,
                    "Beatmapset search returned non-success status; stopping pagination"
                );
                break;
            }
            PageFetch::Failed(reason) if sets.is_empty() => {
                return Err(OsuError::Search(reason));
            }
            PageFetch::Failed(reason) => {
                tracing::warn!(
                    error = %reason,
                    page = pages + 1,
                    kept = sets.len(),
                    "Search page failed after partial fetch; keeping accumulated sets"
                );
                break;
            }
        }
    }

    Ok(sets)
}

/// Token request body for the client-credentials grant
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    scope: &'a str,
}

/// Token endpoint response (extra fields ignored)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// osu! web API client
#[derive(Debug, Clone)]
pub struct OsuClient {
    http_client: reqwest::Client,
}

impl OsuClient {
    pub fn new() -> Result<Self, OsuError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| OsuError::Client(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Acquire a bearer token via the client-credentials grant
    ///
    /// Validates the credentials before any network call; blank values are a
    /// configuration error, not an API error.
    pub async fn fetch_token(&self, credentials: &OsuCredentials) -> Result<String, OsuError> {
        if credentials.client_id.trim().is_empty() || credentials.client_secret.trim().is_empty() {
            return Err(OsuError::Credentials(
                "client id and secret must be non-empty".to_string(),
            ));
        }

        let body = TokenRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
            grant_type: "client_credentials",
            scope: "public",
        };

        tracing::debug!("Requesting osu! API token");

        let response = self
            .http_client
            .post(OSU_TOKEN_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| OsuError::Token(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(OsuError::Token(format!(
                "status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| OsuError::Token(e.to_string()))?;

        tracing::debug!("osu! API token acquired");

        Ok(token.access_token)
    }

    /// Fetch beatmapsets matching `query`, following the cursor across pages
    /// until the caps in `options` are reached or the API stops returning one.
    pub async fn search_beatmapsets(
        &self,
        token: &str,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<BeatmapSet>, OsuError> {
        tracing::debug!(
            query = %query,
            max_results = options.max_results,
            max_pages = options.max_pages,
            "Searching beatmapsets"
        );

        let ranked_only = options.ranked_only;
        let sets = collect_pages(options, |cursor| {
            self.fetch_search_page(token, query, ranked_only, cursor)
        })
        .await?;

        tracing::info!(query = %query, count = sets.len(), "Beatmapset search complete");

        Ok(sets)
    }

    async fn fetch_search_page(
        &self,
        token: &str,
        query: &str,
        ranked_only: bool,
        cursor: Option<String>,
    ) -> PageFetch {
        let mut params: Vec<(&str, &str)> = vec![("q", query)];
        if ranked_only {
            params.push(("categories", "ranked"));
        }
        if let Some(cursor) = cursor.as_deref() {
            params.push(("cursor_string", cursor));
        }

        let response = match self
            .http_client
            .get(OSU_SEARCH_URL)
            .bearer_auth(token)
            .query(&params)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return PageFetch::Failed(e.to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return PageFetch::Refused(status.as_u16());
        }

        match response.json::<SearchPage>().await {
            Ok(page) => PageFetch::Page(page),
            Err(e) => PageFetch::Failed(e.to_string()),
        }
    }
}
