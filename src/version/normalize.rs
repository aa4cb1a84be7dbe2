//! Best-effort conversion of loose version strings into semver
//!
//! Upstream catalogs mix strict semantic versions (`1.20.4`) with loosely
//! numbered releases (`1.20`) and opaque identifiers (`1.16.5-fixed`,
//! `23w13a`). Comparison and range matching happen on the coerced
//! [`Version`], while callers always keep the raw string.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

use crate::version::types::ResolveWarning;

/// Leading run of up to three dot-separated numeric components
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[vV=]?(\d+)(?:\.(\d+))?(?:\.(\d+))?").expect("numeric prefix regex is valid")
});

/// Normalize a raw version string into a comparable semver value.
///
/// Strict semantic versions, optionally behind one `v` or `=`, are returned
/// as parsed. Anything else is coerced
/// from its leading numeric components, padding missing minor/patch with
/// zeros and discarding whatever follows.
///
/// Examples:
/// - "1.20.4" -> 1.20.4
/// - "1.20" -> 1.20.0
/// - "1.8.8-R0.1" -> 1.8.8-R0.1 (strict)
/// - "v1.2.3-rc.1" -> 1.2.3-rc.1
/// - "1.20.1.2" -> 1.20.1
/// - "23w13a" -> 23.0.0
/// - "latest" -> None
pub fn normalize(raw: &str) -> Option<Version> {
    let unprefixed = raw.strip_prefix(['v', '=']).unwrap_or(raw);
    if let Ok(version) = Version::parse(unprefixed) {
        return Some(version);
    }
    coerce(raw)
}

fn coerce(raw: &str) -> Option<Version> {
    let captures = NUMERIC_PREFIX.captures(raw.trim_start())?;
    let component = |index: usize| -> Option<u64> {
        match captures.get(index) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    Some(Version::new(component(1)?, component(2)?, component(3)?))
}

/// Compare two versions by semver precedence, ignoring build metadata
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| a.pre.cmp(&b.pre))
}

/// A pattern after wildcard rewriting, plus the warning it raised if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPattern<'a> {
    pub pattern: Cow<'a, str>,
    pub warning: Option<ResolveWarning>,
}

/// Adapt a user pattern to range syntax.
///
/// `1.19.x` becomes `1.19.*`. Patterns containing `latest` are returned
/// unchanged together with [`ResolveWarning::UnsupportedToken`].
pub fn normalize_pattern(pattern: &str) -> NormalizedPattern<'_> {
    if let Some(base) = pattern.strip_suffix(".x") {
        return NormalizedPattern {
            pattern: Cow::Owned(format!("{}.*", base)),
            warning: None,
        };
    }

    let warning = pattern
        .contains("latest")
        .then(|| ResolveWarning::UnsupportedToken {
            pattern: pattern.to_string(),
        });

    NormalizedPattern {
        pattern: Cow::Borrowed(pattern),
        warning,
    }
}
