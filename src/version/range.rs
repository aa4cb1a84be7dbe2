//! Version range grammar
//!
//! Supports the node-semver range syntax users write in platform patterns:
//! - `1.2.3` - exact match
//! - `1.2`, `1`, `1.2.x`, `1.2.*`, `*` - X-ranges (missing parts are wildcards)
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3`, `=1.2.3` - comparison operators
//! - `1.0.0 - 2.0.0` - hyphen ranges (inclusive)
//! - `>=1.0.0 <2.0.0` - AND (space-separated), `^1.0.0 || ^2.0.0` - OR
//!
//! Upper bounds derived from partial versions exclude the prereleases of the
//! next release (`1.2.x` is `>=1.2.0 <1.3.0-0`), and a prerelease version only
//! satisfies a comparator set that names a prerelease of the same
//! `major.minor.patch`.

use semver::{Prerelease, Version};

use crate::version::normalize::cmp_precedence;

/// Parsed range: any of its comparator sets must be satisfied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    sets: Vec<ComparatorSet>,
}

/// Space-separated comparators: all must be satisfied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ComparatorSet {
    bounds: Vec<Bound>,
}

/// Primitive comparator every range form is desugared into
#[derive(Debug, Clone, PartialEq, Eq)]
enum Bound {
    Eq(Version),
    Gte(Version),
    Gt(Version),
    Lte(Version),
    Lt(Version),
    /// `< major.minor.patch-0`: below the release triple, its prereleases included
    Below(u64, u64, u64),
}

impl VersionRange {
    /// Parse a range expression, `None` if it is not valid range syntax
    pub fn parse(input: &str) -> Option<Self> {
        let sets = input
            .split("||")
            .map(ComparatorSet::parse)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { sets })
    }

    /// Check if a version satisfies this range
    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set.satisfies(version))
    }
}

impl ComparatorSet {
    fn parse(input: &str) -> Option<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();

        if let [from, "-", to] = tokens.as_slice() {
            return Self::parse_hyphen(from, to);
        }

        let mut bounds = Vec::new();
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            // `>= 1.2.3`: the operator may stand apart from its version
            let comparator = if is_operator(token) {
                format!("{}{}", token, tokens.next()?)
            } else {
                token.to_string()
            };
            bounds.extend(parse_comparator(&comparator)?);
        }

        Some(Self { bounds })
    }

    /// Parse hyphen range like "1.0.0 - 2.0.0"
    fn parse_hyphen(from: &str, to: &str) -> Option<Self> {
        let from = Partial::parse(from)?;
        let to = Partial::parse(to)?;

        let mut bounds = Vec::new();
        if from.major.is_some() {
            bounds.push(Bound::Gte(from.floor()));
        }
        match (to.major, to.minor, to.patch) {
            (None, _, _) => {}
            (Some(major), None, _) => bounds.push(Bound::Below(major.saturating_add(1), 0, 0)),
            (Some(major), Some(minor), None) => {
                bounds.push(Bound::Below(major, minor.saturating_add(1), 0))
            }
            (Some(_), Some(_), Some(_)) => bounds.push(Bound::Lte(to.floor())),
        }

        Some(Self { bounds })
    }

    fn satisfies(&self, version: &Version) -> bool {
        if !self.bounds.iter().all(|bound| bound.matches(version)) {
            return false;
        }
        if version.pre.is_empty() {
            return true;
        }

        self.bounds.iter().any(|bound| {
            bound.version().is_some_and(|v| {
                !v.pre.is_empty()
                    && (v.major, v.minor, v.patch) == (version.major, version.minor, version.patch)
            })
        })
    }
}

impl Bound {
    fn matches(&self, version: &Version) -> bool {
        use std::cmp::Ordering::{Equal, Greater, Less};

        match self {
            Bound::Eq(v) => cmp_precedence(version, v) == Equal,
            Bound::Gte(v) => cmp_precedence(version, v) != Less,
            Bound::Gt(v) => cmp_precedence(version, v) == Greater,
            Bound::Lte(v) => cmp_precedence(version, v) != Greater,
            Bound::Lt(v) => cmp_precedence(version, v) == Less,
            Bound::Below(major, minor, patch) => {
                (version.major, version.minor, version.patch) < (*major, *minor, *patch)
            }
        }
    }

    fn version(&self) -> Option<&Version> {
        match self {
            Bound::Eq(v) | Bound::Gte(v) | Bound::Gt(v) | Bound::Lte(v) | Bound::Lt(v) => Some(v),
            Bound::Below(..) => None,
        }
    }
}

const OPERATORS: [&str; 8] = [">=", "<=", "~>", ">", "<", "=", "^", "~"];

fn is_operator(token: &str) -> bool {
    OPERATORS.contains(&token)
}

/// Desugar a single comparator (`^1.2`, `>=1.0.0`, `1.x`, ...) into bounds
fn parse_comparator(input: &str) -> Option<Vec<Bound>> {
    let op = OPERATORS
        .iter()
        .find(|op| input.starts_with(**op))
        .copied()
        .unwrap_or("");
    let partial = Partial::parse(&input[op.len()..])?;
    let floor = partial.floor();

    let bounds = match (op, partial.major, partial.minor, partial.patch) {
        // Wildcard major: everything, or nothing for strict comparisons
        ("" | "=" | ">=" | "<=" | "~" | "~>" | "^", None, _, _) => vec![],
        (">" | "<", None, _, _) => vec![Bound::Below(0, 0, 0)],

        ("" | "=", Some(_), Some(_), Some(_)) => vec![Bound::Eq(floor)],
        ("" | "=" | "~" | "~>" | "^", Some(major), None, _) => {
            vec![Bound::Gte(floor), Bound::Below(major.saturating_add(1), 0, 0)]
        }
        ("" | "=" | "~" | "~>", Some(major), Some(minor), _) => {
            vec![Bound::Gte(floor), Bound::Below(major, minor.saturating_add(1), 0)]
        }

        (">=", Some(_), _, _) => vec![Bound::Gte(floor)],
        (">", Some(_), Some(_), Some(_)) => vec![Bound::Gt(floor)],
        (">", Some(major), None, _) => vec![Bound::Gte(Version::new(major.saturating_add(1), 0, 0))],
        (">", Some(major), Some(minor), None) => {
            vec![Bound::Gte(Version::new(major, minor.saturating_add(1), 0))]
        }
        ("<", Some(_), Some(_), Some(_)) => vec![Bound::Lt(floor)],
        ("<", Some(major), minor, None) => vec![Bound::Below(major, minor.unwrap_or(0), 0)],
        ("<=", Some(_), Some(_), Some(_)) => vec![Bound::Lte(floor)],
        ("<=", Some(major), None, _) => vec![Bound::Below(major.saturating_add(1), 0, 0)],
        ("<=", Some(major), Some(minor), None) => {
            vec![Bound::Below(major, minor.saturating_add(1), 0)]
        }

        // ^1.2.3 -> >=1.2.3 <2.0.0
        // ^0.2.3 -> >=0.2.3 <0.3.0
        // ^0.0.3 -> >=0.0.3 <0.0.4
        // ^0.0 -> >=0.0.0 <0.1.0
        ("^", Some(major), Some(minor), patch) => {
            let upper = if major > 0 {
                Bound::Below(major.saturating_add(1), 0, 0)
            } else if minor > 0 || patch.is_none() {
                Bound::Below(0, minor.saturating_add(1), 0)
            } else {
                Bound::Below(0, 0, patch.unwrap_or(0).saturating_add(1))
            };
            vec![Bound::Gte(floor), upper]
        }

        _ => return None,
    };

    Some(bounds)
}

/// A possibly partial version such as `1`, `1.2`, `1.2.x` or `1.2.3-rc.1`
#[derive(Debug)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let input = input
            .strip_prefix(['v', 'V', '='])
            .unwrap_or(input)
            .trim_start();
        if input.is_empty() {
            return None;
        }

        if let Ok(version) = Version::parse(input) {
            return Some(Self {
                major: Some(version.major),
                minor: Some(version.minor),
                patch: Some(version.patch),
                pre: version.pre,
            });
        }

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut components = [None; 3];
        let mut wildcard = false;
        for (slot, part) in components.iter_mut().zip(&parts) {
            if *part == "*" || part.eq_ignore_ascii_case("x") {
                wildcard = true;
                continue;
            }
            let value = parse_numeric(part)?;
            // 1.x.3 is 1.x
            if !wildcard {
                *slot = Some(value);
            }
        }

        let [major, minor, patch] = components;
        Some(Self {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
        })
    }

    /// Lowest version covered by this partial (missing parts become 0)
    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: semver::BuildMetadata::EMPTY,
        }
    }
}

/// A numeric identifier: ASCII digits without a leading zero
fn parse_numeric(part: &str) -> Option<u64> {
    let digits_only = !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits_only || (part.len() > 1 && part.starts_with('0')) {
        return None;
    }
    part.parse().ok()
}
