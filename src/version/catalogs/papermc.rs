//! PaperMC project API catalog implementation

use serde::Deserialize;
use tracing::info;

use crate::config::DEFAULT_PAPERMC_BASE_URL;
use crate::platform::CatalogFamily;
use crate::version::catalog::CatalogSource;
use crate::version::catalogs::fetch_json;
use crate::version::error::CatalogError;
use crate::version::normalize::{cmp_precedence, normalize};
use crate::version::types::Catalog;

/// Identifiers containing these markers are not releases. Matching is
/// case-sensitive, so `-SNAPSHOT` builds stay in the catalog.
const PRERELEASE_MARKERS: [&str; 2] = ["pre", "snapshot"];

/// Response from the PaperMC project endpoint
#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

/// Catalog of a PaperMC project's versions, newest first by semver
pub struct PaperMcCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl PaperMcCatalog {
    /// Creates a new PaperMcCatalog with a custom base URL
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a catalog against the public PaperMC API
    pub fn with_default_url(client: reqwest::Client) -> Self {
        Self::new(client, DEFAULT_PAPERMC_BASE_URL)
    }
}

/// Keep release identifiers that normalize, sorted newest first
fn release_versions(versions: Vec<String>) -> Vec<String> {
    let mut releases: Vec<_> = versions
        .into_iter()
        .filter(|v| !PRERELEASE_MARKERS.iter().any(|marker| v.contains(marker)))
        .filter_map(|v| normalize(&v).map(|normalized| (normalized, v)))
        .collect();

    releases.sort_by(|(a, _), (b, _)| cmp_precedence(b, a));

    releases.into_iter().map(|(_, raw)| raw).collect()
}

#[async_trait::async_trait]
impl CatalogSource for PaperMcCatalog {
    fn family(&self) -> CatalogFamily {
        CatalogFamily::PaperMc
    }

    async fn fetch_catalog(&self, name: &str) -> Result<Catalog, CatalogError> {
        let project = name.to_lowercase();
        let url = format!("{}/projects/{}", self.base_url, project);

        let response: ProjectResponse = fetch_json(&self.client, &url).await?;

        let catalog = Catalog::new(release_versions(response.versions));
        info!("Cached {} {} versions", catalog.len(), project);

        Ok(catalog)
    }
}
