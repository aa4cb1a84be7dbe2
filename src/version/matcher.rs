//! Matching a single pattern against a single catalog

use tracing::debug;

use crate::version::normalize::{normalize, normalize_pattern};
use crate::version::range::VersionRange;
use crate::version::types::{Catalog, ResolveWarning};

/// Catalog entries selected by one pattern, plus any warnings raised
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    /// Raw catalog strings in catalog order
    pub matches: Vec<String>,
    pub warnings: Vec<ResolveWarning>,
}

/// Match `pattern` against `catalog`.
///
/// The pattern is first tried as a version range over the normalized catalog
/// entries. When that yields nothing (invalid range, or a range matching no
/// entry) the raw pattern is compared verbatim with the raw entries. A pattern
/// matching neither way contributes nothing and raises
/// [`ResolveWarning::Unresolved`].
pub fn match_pattern(pattern: &str, catalog: &Catalog) -> MatchOutcome {
    let normalized = normalize_pattern(pattern);
    let mut warnings: Vec<ResolveWarning> = normalized.warning.into_iter().collect();

    let mut matches = match VersionRange::parse(&normalized.pattern) {
        Some(range) => range_matches(&range, catalog),
        None => {
            debug!("Pattern '{}' is not a valid semver range", normalized.pattern);
            Vec::new()
        }
    };

    if matches.is_empty() {
        matches = catalog
            .versions()
            .iter()
            .filter(|version| version.as_str() == pattern)
            .cloned()
            .collect();
    }

    if matches.is_empty() {
        warnings.push(ResolveWarning::Unresolved {
            pattern: pattern.to_string(),
        });
    }

    MatchOutcome { matches, warnings }
}

/// Catalog entries whose normalized form satisfies `range`; entries that do
/// not normalize never match
fn range_matches(range: &VersionRange, catalog: &Catalog) -> Vec<String> {
    catalog
        .versions()
        .iter()
        .filter(|raw| normalize(raw).is_some_and(|version| range.satisfies(&version)))
        .cloned()
        .collect()
}
