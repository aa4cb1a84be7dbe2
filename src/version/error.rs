use std::sync::Arc;

use thiserror::Error;

/// Fatal failure while retrieving an upstream catalog.
///
/// `Transport` and `Status` are fetch failures, `Parse` means the upstream
/// answered with something that is not the expected document. None of them
/// are retried.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("Network error while fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },

    #[error("Failed to fetch {url}: status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response from {url}: {message}")]
    Parse { url: String, message: String },
}

impl CatalogError {
    /// Returns true for network and non-success status failures
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            CatalogError::Transport { .. } | CatalogError::Status { .. }
        )
    }
}
