//! Catalog test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use platform_version_resolver::config::{CatalogsConfig, ResolverConfig};
use platform_version_resolver::input::PlatformDependencies;
use platform_version_resolver::platform::CatalogFamily;
use platform_version_resolver::version::catalog::CatalogSource;
use platform_version_resolver::version::error::CatalogError;
use platform_version_resolver::version::resolver::Resolver;
use platform_version_resolver::version::types::Catalog;

/// In-memory catalog source counting how often it is asked for a catalog
pub struct MockCatalog {
    family: CatalogFamily,
    catalogs: HashMap<String, Vec<String>>,
    fetches: AtomicUsize,
}

impl MockCatalog {
    pub fn new(family: CatalogFamily) -> Self {
        Self {
            family,
            catalogs: HashMap::new(),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_versions(mut self, name: &str, versions: Vec<&str>) -> Self {
        self.catalogs.insert(
            name.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    fn family(&self) -> CatalogFamily {
        self.family
    }

    async fn fetch_catalog(&self, name: &str) -> Result<Catalog, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        match self.catalogs.get(name) {
            Some(versions) => Ok(Catalog::new(versions.clone())),
            None => Err(CatalogError::Parse {
                url: format!("mock://{}/{}", self.family.as_str(), name),
                message: "unknown project".to_string(),
            }),
        }
    }
}

/// Create a resolver over two mock sources, returning them for inspection
pub fn create_test_resolver(
    minecraft: MockCatalog,
    papermc: MockCatalog,
) -> (Resolver, Arc<MockCatalog>, Arc<MockCatalog>) {
    let minecraft = Arc::new(minecraft);
    let papermc = Arc::new(papermc);
    let resolver = Resolver::new(minecraft.clone(), papermc.clone());
    (resolver, minecraft, papermc)
}

/// Configuration pointing both catalog sources at a local mock server
pub fn local_config(server_url: &str) -> ResolverConfig {
    ResolverConfig {
        catalogs: CatalogsConfig {
            minecraft_manifest_url: format!("{}/mc/game/version_manifest_v2.json", server_url),
            papermc_base_url: format!("{}/v2", server_url),
        },
        ..ResolverConfig::default()
    }
}

/// Build a platform mapping from string slices
pub fn dependencies(entries: &[(&str, &[&str])]) -> PlatformDependencies {
    entries
        .iter()
        .map(|(platform, patterns)| {
            (
                platform.to_string(),
                patterns.iter().map(|p| p.to_string()).collect(),
            )
        })
        .collect()
}
