//! Common types for version resolution

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Release versions known to an upstream source, newest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    versions: Vec<String>,
}

impl Catalog {
    /// Creates a catalog, dropping repeated entries after their first occurrence
    pub fn new(versions: Vec<String>) -> Self {
        let versions: IndexSet<String> = versions.into_iter().collect();
        Self {
            versions: versions.into_iter().collect(),
        }
    }

    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    pub fn contains(&self, version: &str) -> bool {
        self.versions.iter().any(|v| v == version)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// Non-fatal diagnostic raised while resolving a single pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolveWarning {
    /// The pattern contains `latest`, which is never expanded
    UnsupportedToken { pattern: String },
    /// Neither range nor exact matching found anything in the catalog
    Unresolved { pattern: String },
    /// A valid range on a platform without a catalog, kept verbatim
    RangeNotExpanded { pattern: String },
    /// Not a version or range on a platform without a catalog, kept verbatim
    NotSemver { pattern: String },
}

impl ResolveWarning {
    pub fn pattern(&self) -> &str {
        match self {
            ResolveWarning::UnsupportedToken { pattern }
            | ResolveWarning::Unresolved { pattern }
            | ResolveWarning::RangeNotExpanded { pattern }
            | ResolveWarning::NotSemver { pattern } => pattern,
        }
    }
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveWarning::UnsupportedToken { pattern } => write!(
                f,
                "'latest' is not supported in version patterns, treating '{}' as an exact match",
                pattern
            ),
            ResolveWarning::Unresolved { pattern } => {
                write!(f, "No matches found for version pattern: {}", pattern)
            }
            ResolveWarning::RangeNotExpanded { pattern } => write!(
                f,
                "Cannot resolve range '{}' without a list of available versions, using as-is",
                pattern
            ),
            ResolveWarning::NotSemver { pattern } => {
                write!(f, "Invalid semver pattern '{}', using as-is", pattern)
            }
        }
    }
}

/// A warning together with the platform it was raised for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformWarning {
    pub platform: String,
    #[serde(flatten)]
    pub warning: ResolveWarning,
}

/// Outcome of one resolution run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Resolution {
    /// Resolved versions per platform, in input order, newest first
    pub versions: IndexMap<String, Vec<String>>,
    pub warnings: Vec<PlatformWarning>,
}

impl Resolution {
    pub fn versions_for(&self, platform: &str) -> Option<&[String]> {
        self.versions.get(platform).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_new_drops_duplicates_keeping_first_position() {
        let catalog = Catalog::new(vec![
            "1.20.4".to_string(),
            "1.20.1".to_string(),
            "1.20.4".to_string(),
            "1.19.4".to_string(),
        ]);

        assert_eq!(catalog.versions(), ["1.20.4", "1.20.1", "1.19.4"]);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("1.19.4"));
        assert!(!catalog.contains("1.19"));
    }

    #[test]
    fn warning_serializes_with_kind_tag_and_platform() {
        let warning = PlatformWarning {
            platform: "PAPER".to_string(),
            warning: ResolveWarning::Unresolved {
                pattern: "nonsense".to_string(),
            },
        };

        assert_eq!(
            serde_json::to_value(&warning).unwrap(),
            serde_json::json!({
                "platform": "PAPER",
                "kind": "unresolved",
                "pattern": "nonsense"
            })
        );
    }
}
