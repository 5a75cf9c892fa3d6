//! Configuration resolution for beatshelf
//!
//! osu! API credentials are resolved with ENV → TOML priority. A source only
//! counts when both halves of the credential pair are present and non-blank;
//! otherwise resolution falls through to the next source.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Environment variables holding the osu! OAuth client credentials
pub const ENV_CLIENT_ID: &str = "OSU_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "OSU_CLIENT_SECRET";

/// osu! OAuth client credentials (client-credentials grant)
#[derive(Debug, Clone)]
pub struct OsuCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// TOML config file contents
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub osu_client_id: Option<String>,
    pub osu_client_secret: Option<String>,
}

/// Resolved service settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    osu: Option<OsuCredentials>,
}

impl Settings {
    /// Resolve settings from environment variables and TOML config
    pub fn load() -> Self {
        Self::from_sources(env_credentials(), load_toml_config())
    }

    /// Resolve credentials with ENV → TOML priority
    fn from_sources(env: Option<OsuCredentials>, toml: TomlConfig) -> Self {
        let toml_creds = credential_pair(toml.osu_client_id, toml.osu_client_secret, "TOML");

        let mut sources = Vec::new();
        if env.is_some() {
            sources.push("environment");
        }
        if toml_creds.is_some() {
            sources.push("TOML");
        }

        // Warn if multiple sources (potential misconfiguration)
        if sources.len() > 1 {
            warn!(
                "osu! API credentials found in multiple sources: {}. Using environment (highest priority).",
                sources.join(", ")
            );
        }

        let osu = match (env, toml_creds) {
            (Some(creds), _) => {
                info!("osu! API credentials loaded from environment");
                Some(creds)
            }
            (None, Some(creds)) => {
                info!("osu! API credentials loaded from TOML config");
                Some(creds)
            }
            (None, None) => None,
        };

        Self { osu }
    }

    /// Configured credentials, if both halves were supplied
    pub fn osu_credentials(&self) -> Option<&OsuCredentials> {
        self.osu.as_ref()
    }
}

/// Validate a credential value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Pair up id and secret, requiring both to be valid
fn credential_pair(
    client_id: Option<String>,
    client_secret: Option<String>,
    source: &str,
) -> Option<OsuCredentials> {
    let client_id = client_id.filter(|v| is_valid_value(v));
    let client_secret = client_secret.filter(|v| is_valid_value(v));

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) => Some(OsuCredentials {
            client_id,
            client_secret,
        }),
        (None, None) => None,
        _ => {
            warn!(
                "Ignoring partial osu! credentials from {} (need both client id and secret)",
                source
            );
            None
        }
    }
}

fn env_credentials() -> Option<OsuCredentials> {
    credential_pair(
        std::env::var(ENV_CLIENT_ID).ok(),
        std::env::var(ENV_CLIENT_SECRET).ok(),
        "environment",
    )
}

/// Candidate config file locations, in priority order
fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = std::env::var("BEATSHELF_CONFIG") {
        candidates.push(PathBuf::from(path));
    }

    candidates.push(PathBuf::from("beatshelf.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("beatshelf").join("config.toml"));
    }

    candidates
}

/// Read the first parseable TOML config file, if any
fn load_toml_config() -> TomlConfig {
    for path in config_file_candidates() {
        if !path.exists() {
            continue;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<TomlConfig>(&content) {
                Ok(config) => {
                    info!("Loaded config file: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Ignoring unparseable config file {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                warn!("Ignoring unreadable config file {}: {}", path.display(), e);
            }
        }
    }

    TomlConfig::default()
}
