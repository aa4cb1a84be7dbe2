use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// =============================================================================
// Fetch-related constants
// =============================================================================

/// Timeout for a single catalog request in milliseconds (30 seconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// User agent sent with every catalog request
pub const DEFAULT_USER_AGENT: &str = concat!("platform-version-resolver/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Upstream endpoints
// =============================================================================

/// Mojang version manifest listing every game version
pub const DEFAULT_MINECRAFT_MANIFEST_URL: &str =
    "https://piston-meta.mojang.com/mc/game/version_manifest_v2.json";

/// PaperMC API root; projects live under `/projects/{project}`
pub const DEFAULT_PAPERMC_BASE_URL: &str = "https://api.papermc.io/v2";

const APP_DIR_NAME: &str = "platform-version-resolver";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolver configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    pub fetch: FetchConfig,
    pub catalogs: CatalogsConfig,
}

/// HTTP settings shared by all catalog requests
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Upstream catalog endpoints
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogsConfig {
    pub minecraft_manifest_url: String,
    pub papermc_base_url: String,
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            minecraft_manifest_url: DEFAULT_MINECRAFT_MANIFEST_URL.to_string(),
            papermc_base_url: DEFAULT_PAPERMC_BASE_URL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a JSON file, defaulting any missing field
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly given file, or the default location when present.
    ///
    /// A missing file at the default location yields the default configuration;
    /// a missing explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = config_path();
                if path.is_file() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Returns the path to the config directory for platform-version-resolver.
/// Uses $XDG_CONFIG_HOME/platform-version-resolver if XDG_CONFIG_HOME is set,
/// otherwise falls back to ~/.config/platform-version-resolver,
/// or ./platform-version-resolver if neither is available.
pub fn config_dir() -> PathBuf {
    config_dir_with_env(std::env::var("XDG_CONFIG_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

fn config_dir_with_env(xdg_config_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let config_dir = xdg_config_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));

    config_dir.join(APP_DIR_NAME)
}
