//! Catalog trait for fetching release versions from an upstream source

#[cfg(test)]
use mockall::automock;

use crate::platform::CatalogFamily;
use crate::version::error::CatalogError;
use crate::version::types::Catalog;

/// Trait for fetching the release catalog of one platform family
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the family this source serves
    fn family(&self) -> CatalogFamily;

    /// Fetches the release-only catalog for a project of this family
    ///
    /// # Arguments
    /// * `name` - Lowercase project name (e.g., "velocity"); ignored by
    ///   single-catalog families
    ///
    /// # Returns
    /// * `Ok(Catalog)` - Release versions, ordered from newest to oldest
    /// * `Err(CatalogError)` - If the fetch or parsing fails
    async fn fetch_catalog(&self, name: &str) -> Result<Catalog, CatalogError>;
}
