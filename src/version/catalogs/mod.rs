//! Catalog implementations for fetching release versions

pub mod minecraft;
pub mod papermc;

pub use minecraft::MinecraftCatalog;
pub use papermc::PaperMcCatalog;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::version::error::CatalogError;

/// Build the HTTP client shared by every catalog of a run
pub fn build_client(config: &FetchConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_millis(config.timeout_ms))
        .build()
}

/// GET `url` and decode its JSON body.
///
/// Any non-success status is fatal regardless of the body, which is kept on
/// the error for diagnostics.
async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, CatalogError> {
    debug!("Fetching catalog from {}", url);

    let transport = |source| CatalogError::Transport {
        url: url.to_string(),
        source: Arc::new(source),
    };

    let response = client.get(url).send().await.map_err(transport)?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("Catalog source returned status {}: {}", status, url);
        return Err(CatalogError::Status {
            url: url.to_string(),
            status,
            body,
        });
    }

    let body = response.text().await.map_err(transport)?;

    serde_json::from_str(&body).map_err(|e| {
        warn!("Failed to parse catalog response from {}: {}", url, e);
        CatalogError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        }
    })
}
