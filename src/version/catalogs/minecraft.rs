//! Mojang version manifest catalog implementation

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use tracing::info;

use crate::config::DEFAULT_MINECRAFT_MANIFEST_URL;
use crate::platform::CatalogFamily;
use crate::version::catalog::CatalogSource;
use crate::version::catalogs::fetch_json;
use crate::version::error::CatalogError;
use crate::version::types::Catalog;

/// Version manifest served by Mojang
#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntry {
    id: String,
    #[serde(rename = "type")]
    release_type: ReleaseType,
    release_time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReleaseType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    #[serde(other)]
    Other,
}

/// Catalog of game releases, newest first by release time
pub struct MinecraftCatalog {
    client: reqwest::Client,
    manifest_url: String,
}

impl MinecraftCatalog {
    /// Creates a new MinecraftCatalog reading the manifest at `manifest_url`
    pub fn new(client: reqwest::Client, manifest_url: &str) -> Self {
        Self {
            client,
            manifest_url: manifest_url.to_string(),
        }
    }

    /// Creates a catalog against the public Mojang manifest
    pub fn with_default_url(client: reqwest::Client) -> Self {
        Self::new(client, DEFAULT_MINECRAFT_MANIFEST_URL)
    }

    fn parse_release_time(&self, entry: &ManifestEntry) -> Result<DateTime<FixedOffset>, CatalogError> {
        DateTime::parse_from_rfc3339(&entry.release_time).map_err(|e| CatalogError::Parse {
            url: self.manifest_url.clone(),
            message: format!(
                "invalid releaseTime '{}' for version {}: {}",
                entry.release_time, entry.id, e
            ),
        })
    }
}

#[async_trait::async_trait]
impl CatalogSource for MinecraftCatalog {
    fn family(&self) -> CatalogFamily {
        CatalogFamily::Minecraft
    }

    async fn fetch_catalog(&self, _name: &str) -> Result<Catalog, CatalogError> {
        let manifest: VersionManifest = fetch_json(&self.client, &self.manifest_url).await?;

        let mut releases = manifest
            .versions
            .into_iter()
            .filter(|entry| entry.release_type == ReleaseType::Release)
            .map(|entry| Ok((self.parse_release_time(&entry)?, entry.id)))
            .collect::<Result<Vec<_>, CatalogError>>()?;

        // Newest first; entries sharing a timestamp keep manifest order
        releases.sort_by(|(a, _), (b, _)| b.cmp(a));

        let catalog = Catalog::new(releases.into_iter().map(|(_, id)| id).collect());
        info!(
            "Cached {} Minecraft versions (excluding snapshots)",
            catalog.len()
        );

        Ok(catalog)
    }
}
