//! Per-platform resolution of version patterns
//!
//! The resolver owns one [`CatalogCache`], so a resolver instance is one run:
//! every catalog it touches is fetched at most once and reused for every
//! platform and every subsequent call.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use futures::future::try_join_all;
use indexmap::IndexSet;
use semver::Version;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::input::PlatformDependencies;
use crate::platform::{CatalogFamily, CatalogKey, catalog_key_for};
use crate::version::cache::CatalogCache;
use crate::version::catalog::CatalogSource;
use crate::version::catalogs::{MinecraftCatalog, PaperMcCatalog, build_client};
use crate::version::error::CatalogError;
use crate::version::matcher::{MatchOutcome, match_pattern};
use crate::version::normalize::{cmp_precedence, normalize};
use crate::version::range::VersionRange;
use crate::version::types::{Catalog, PlatformWarning, Resolution, ResolveWarning};

pub struct Resolver {
    minecraft: Arc<dyn CatalogSource>,
    papermc: Arc<dyn CatalogSource>,
    cache: CatalogCache,
}

impl Resolver {
    pub fn new(minecraft: Arc<dyn CatalogSource>, papermc: Arc<dyn CatalogSource>) -> Self {
        Self {
            minecraft,
            papermc,
            cache: CatalogCache::new(),
        }
    }

    /// Build a resolver talking to the endpoints named in `config`, sharing
    /// one HTTP client between both catalog sources
    pub fn from_config(config: &ResolverConfig) -> reqwest::Result<Self> {
        let client = build_client(&config.fetch)?;

        Ok(Self::new(
            Arc::new(MinecraftCatalog::new(
                client.clone(),
                &config.catalogs.minecraft_manifest_url,
            )),
            Arc::new(PaperMcCatalog::new(client, &config.catalogs.papermc_base_url)),
        ))
    }

    fn source(&self, family: CatalogFamily) -> &Arc<dyn CatalogSource> {
        match family {
            CatalogFamily::Minecraft => &self.minecraft,
            CatalogFamily::PaperMc => &self.papermc,
        }
    }

    async fn catalog(&self, key: &CatalogKey) -> Result<Arc<Catalog>, CatalogError> {
        let source = self.source(key.family);

        self.cache
            .get_or_fetch(key, || {
                debug!(
                    "Fetching catalog {} from the {} source",
                    key,
                    source.family().as_str()
                );
                source.fetch_catalog(&key.name)
            })
            .await
    }

    /// Return the catalog backing `platform`, fetching it on first use.
    ///
    /// Platforms without a catalog yield `Ok(None)` and never touch the network.
    pub async fn catalog_for_platform(
        &self,
        platform: &str,
    ) -> Result<Option<Arc<Catalog>>, CatalogError> {
        match catalog_key_for(platform) {
            Some(key) => self.catalog(&key).await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolve every platform's patterns to concrete versions.
    ///
    /// Catalogs needed by the input are fetched concurrently up front; any
    /// fetch failure aborts the whole run. Matching then proceeds platform by
    /// platform in input order.
    pub async fn resolve(
        &self,
        dependencies: &PlatformDependencies,
    ) -> Result<Resolution, CatalogError> {
        let keys: IndexSet<CatalogKey> = dependencies
            .keys()
            .filter_map(|platform| catalog_key_for(platform))
            .collect();

        let fetched = try_join_all(keys.iter().map(|key| self.catalog(key))).await?;
        let catalogs: HashMap<&CatalogKey, Arc<Catalog>> = keys.iter().zip(fetched).collect();

        let mut resolution = Resolution::default();

        for (platform, patterns) in dependencies {
            let catalog = catalog_key_for(platform).and_then(|key| catalogs.get(&key).cloned());
            let mut merged: IndexSet<String> = IndexSet::new();

            for pattern in patterns {
                let outcome = match &catalog {
                    Some(catalog) => match_pattern(pattern, catalog),
                    None => validate_standalone(pattern),
                };

                for warning in outcome.warnings {
                    warn!("{}: {}", platform, warning);
                    resolution.warnings.push(PlatformWarning {
                        platform: platform.clone(),
                        warning,
                    });
                }

                merged.extend(outcome.matches);
            }

            let mut versions: Vec<String> = merged.into_iter().collect();
            sort_descending(&mut versions);

            debug!(
                "Resolved {} pattern(s) for {} to {} version(s)",
                patterns.len(),
                platform,
                versions.len()
            );
            resolution.versions.insert(platform.clone(), versions);
        }

        Ok(resolution)
    }
}

/// Check a pattern for a platform without a catalog; the pattern always
/// passes through, with a warning unless it is an exact version
fn validate_standalone(pattern: &str) -> MatchOutcome {
    let warning = if is_exact_version(pattern) {
        None
    } else if VersionRange::parse(pattern).is_some() {
        Some(ResolveWarning::RangeNotExpanded {
            pattern: pattern.to_string(),
        })
    } else {
        Some(ResolveWarning::NotSemver {
            pattern: pattern.to_string(),
        })
    };

    MatchOutcome {
        matches: vec![pattern.to_string()],
        warnings: warning.into_iter().collect(),
    }
}

fn is_exact_version(pattern: &str) -> bool {
    let trimmed = pattern.trim();
    Version::parse(trimmed.strip_prefix('v').unwrap_or(trimmed)).is_ok()
}

/// Newest first. Pairs where either side does not normalize fall back to
/// reverse byte order, so the relation is not transitive over mixed input.
fn compare_descending(a: &str, b: &str) -> Ordering {
    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => cmp_precedence(&b, &a),
        _ => b.cmp(a),
    }
}

/// Stable insertion sort by [`compare_descending`].
///
/// `slice::sort_by` may panic when the comparator is not a total order.
fn sort_descending(versions: &mut [String]) {
    for i in 1..versions.len() {
        let mut j = i;
        while j > 0 && compare_descending(&versions[j - 1], &versions[j]) == Ordering::Greater {
            versions.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::catalog::MockCatalogSource;
    use rstest::rstest;

    fn catalog(versions: &[&str]) -> Catalog {
        Catalog::new(versions.iter().map(|v| v.to_string()).collect())
    }

    fn deps(entries: &[(&str, &[&str])]) -> PlatformDependencies {
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

    fn source(family: CatalogFamily) -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        source.expect_family().return_const(family);
        source
    }

    /// A source that must never be asked for a catalog
    fn unused(family: CatalogFamily) -> MockCatalogSource {
        let mut source = source(family);
        source.expect_fetch_catalog().times(0);
        source
    }

    fn minecraft(versions: &'static [&'static str]) -> MockCatalogSource {
        let mut source = source(CatalogFamily::Minecraft);
        source
            .expect_fetch_catalog()
            .times(1)
            .returning(move |_| Ok(catalog(versions)));
        source
    }

    #[tokio::test]
    async fn resolve_expands_x_range_newest_first() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4", "1.20.1", "1.20.0", "1.19.4"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("PAPER", &["1.20.x"])]))
            .await
            .unwrap();

        assert_eq!(
            result.versions_for("PAPER").unwrap(),
            ["1.20.4", "1.20.1", "1.20.0"]
        );
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn resolve_deduplicates_overlapping_patterns() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4", "1.20.1", "1.20.0", "1.19.4"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("PAPER", &["1.20.1", "1.20.x", "1.20.1"])]))
            .await
            .unwrap();

        assert_eq!(
            result.versions_for("PAPER").unwrap(),
            ["1.20.4", "1.20.1", "1.20.0"]
        );
    }

    #[tokio::test]
    async fn resolve_twice_is_identical_and_fetches_once() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4", "1.16.5-fixed", "1.16.5"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );
        let input = deps(&[("PAPER", &["1.16.5-fixed", "1.20.4"])]);

        let first = resolver.resolve(&input).await.unwrap();
        let second = resolver.resolve(&input).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            first.versions_for("PAPER").unwrap(),
            ["1.20.4", "1.16.5-fixed"]
        );
    }

    #[tokio::test]
    async fn resolve_requests_proxy_catalogs_by_lowercase_name() {
        let mut papermc = source(CatalogFamily::PaperMc);
        papermc
            .expect_fetch_catalog()
            .withf(|name| name == "velocity")
            .times(1)
            .returning(|_| Ok(catalog(&["3.3.0", "3.1.1", "3.1.0"])));
        papermc
            .expect_fetch_catalog()
            .withf(|name| name == "waterfall")
            .times(1)
            .returning(|_| Ok(catalog(&["1.21", "1.20", "1.19"])));

        let resolver = Resolver::new(
            Arc::new(unused(CatalogFamily::Minecraft)),
            Arc::new(papermc),
        );

        let result = resolver
            .resolve(&deps(&[("VELOCITY", &["3.1.x"]), ("WATERFALL", &[">=1.20"])]))
            .await
            .unwrap();

        assert_eq!(result.versions_for("VELOCITY").unwrap(), ["3.1.1", "3.1.0"]);
        assert_eq!(result.versions_for("WATERFALL").unwrap(), ["1.21", "1.20"]);
    }

    #[tokio::test]
    async fn resolve_passes_unknown_platforms_through_without_fetching() {
        let resolver = Resolver::new(
            Arc::new(unused(CatalogFamily::Minecraft)),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("FOLIA", &["2.0.0"])]))
            .await
            .unwrap();

        assert_eq!(result.versions_for("FOLIA").unwrap(), ["2.0.0"]);
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn resolve_pins_mixed_ordering_for_standalone_platforms() {
        let resolver = Resolver::new(
            Arc::new(unused(CatalogFamily::Minecraft)),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("FOLIA", &["1.19", "experimental", "1.20.4"])]))
            .await
            .unwrap();

        assert_eq!(
            result.versions_for("FOLIA").unwrap(),
            ["experimental", "1.20.4", "1.19"]
        );
        assert_eq!(
            result.warnings,
            vec![
                PlatformWarning {
                    platform: "FOLIA".to_string(),
                    warning: ResolveWarning::RangeNotExpanded {
                        pattern: "1.19".to_string()
                    },
                },
                PlatformWarning {
                    platform: "FOLIA".to_string(),
                    warning: ResolveWarning::NotSemver {
                        pattern: "experimental".to_string()
                    },
                },
            ]
        );
    }

    #[tokio::test]
    async fn resolve_records_unresolved_patterns_per_platform() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4", "1.19.4"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("PAPER", &["nonsense", "1.19.4"])]))
            .await
            .unwrap();

        assert_eq!(result.versions_for("PAPER").unwrap(), ["1.19.4"]);
        assert_eq!(
            result.warnings,
            vec![PlatformWarning {
                platform: "PAPER".to_string(),
                warning: ResolveWarning::Unresolved {
                    pattern: "nonsense".to_string()
                },
            }]
        );
    }

    #[tokio::test]
    async fn resolve_keeps_input_platform_order() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let result = resolver
            .resolve(&deps(&[("FOLIA", &["1.0.0"]), ("PAPER", &["1.20.4"]), ("ANY", &[])]))
            .await
            .unwrap();

        let platforms: Vec<_> = result.versions.keys().map(String::as_str).collect();
        assert_eq!(platforms, ["FOLIA", "PAPER", "ANY"]);
        assert!(result.versions_for("ANY").unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_propagates_catalog_errors() {
        let mut papermc = source(CatalogFamily::PaperMc);
        papermc.expect_fetch_catalog().times(1).returning(|_| {
            Err(CatalogError::Parse {
                url: "http://localhost/projects/velocity".to_string(),
                message: "expected an object".to_string(),
            })
        });

        let resolver = Resolver::new(
            Arc::new(unused(CatalogFamily::Minecraft)),
            Arc::new(papermc),
        );

        let result = resolver
            .resolve(&deps(&[("FOLIA", &["1.0.0"]), ("VELOCITY", &["3.x"])]))
            .await;

        assert!(matches!(result, Err(CatalogError::Parse { .. })));
    }

    #[tokio::test]
    async fn catalog_for_platform_shares_the_run_cache() {
        let resolver = Resolver::new(
            Arc::new(minecraft(&["1.20.4", "1.19.4"])),
            Arc::new(unused(CatalogFamily::PaperMc)),
        );

        let catalog = resolver.catalog_for_platform("PAPER").await.unwrap().unwrap();
        resolver
            .resolve(&deps(&[("PAPER", &["1.19.x"])]))
            .await
            .unwrap();

        assert_eq!(catalog.versions(), ["1.20.4", "1.19.4"]);
        assert!(resolver.catalog_for_platform("FOLIA").await.unwrap().is_none());
    }

    #[rstest]
    #[case("2.0.0", None)]
    #[case("v2.0.0", None)]
    #[case("2.0.0-beta.1", None)]
    #[case("^2.0", Some(ResolveWarning::RangeNotExpanded { pattern: "^2.0".to_string() }))]
    #[case("2.x", Some(ResolveWarning::RangeNotExpanded { pattern: "2.x".to_string() }))]
    #[case("git-abc123", Some(ResolveWarning::NotSemver { pattern: "git-abc123".to_string() }))]
    fn validate_standalone_passes_pattern_through(
        #[case] pattern: &str,
        #[case] warning: Option<ResolveWarning>,
    ) {
        let outcome = validate_standalone(pattern);

        assert_eq!(outcome.matches, vec![pattern.to_string()]);
        assert_eq!(outcome.warnings, warning.into_iter().collect::<Vec<_>>());
    }

    #[rstest]
    #[case(&["1.19", "1.20.4", "1.8.9"], &["1.20.4", "1.19", "1.8.9"])]
    #[case(&["1.20", "1.20.0"], &["1.20", "1.20.0"])]
    #[case(&["1.20.0", "1.20"], &["1.20.0", "1.20"])]
    #[case(&["b", "a", "c"], &["c", "b", "a"])]
    #[case(&["1.20.4-rc1", "1.20.4"], &["1.20.4", "1.20.4-rc1"])]
    fn sort_descending_orders_by_normalized_version(
        #[case] input: &[&str],
        #[case] expected: &[&str],
    ) {
        let mut versions: Vec<String> = input.iter().map(|v| v.to_string()).collect();

        sort_descending(&mut versions);

        assert_eq!(versions, expected);
    }
}
