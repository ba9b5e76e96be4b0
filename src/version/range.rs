//! npm semver ranges
//!
//! Supports the range grammar used by npm:
//! - `1.2.3`, `=1.2.3`, `v1.2.3` - exact match
//! - `^1.2.3` - compatible with version (>=1.2.3 <2.0.0)
//! - `~1.2.3`, `~>1.2.3` - approximately equivalent (>=1.2.3 <1.3.0)
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `1.2.x`, `1.x`, `1.2`, `1`, `*` - wildcards and partial versions
//! - `1.2.3 - 2.3.4` - hyphen ranges
//! - `>=1.0.0 <2.0.0` - space separated comparators, all must match
//! - `^1.0.0 || ^2.0.0` - alternatives, any must match
//!
//! Every term is lowered to plain comparators. Upper bounds derived from `^`,
//! `~` and wildcards exclude the prereleases of the bound (`<2.0.0-0`).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease, Version};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid version `{0}`")]
    InvalidVersion(String),

    #[error("operator `{0}` has no version")]
    DanglingOperator(String),

    #[error("malformed hyphen range `{0}`")]
    MalformedHyphen(String),
}

/// A parsed npm range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmRange {
    raw: String,
    alternatives: Vec<ComparatorSet>,
}

impl NpmRange {
    /// Parse a range expression
    pub fn parse(range: &str) -> Result<Self, RangeError> {
        let alternatives = range
            .split("||")
            .map(ComparatorSet::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: range.trim().to_string(),
            alternatives,
        })
    }

    /// Check if a version satisfies this range
    ///
    /// A prerelease version only satisfies a comparator set when
    /// `include_prerelease` is set, or when the set names a prerelease of the
    /// same `major.minor.patch`.
    pub fn satisfies(&self, version: &Version, include_prerelease: bool) -> bool {
        self.alternatives
            .iter()
            .any(|set| set.satisfies(version, include_prerelease))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for NpmRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NpmRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Space separated terms that must all match
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComparatorSet(Vec<VersionRange>);

impl ComparatorSet {
    fn parse(spec: &str) -> Result<Self, RangeError> {
        let tokens: Vec<&str> = spec.split_whitespace().collect();

        // Hyphen range: exactly "A - B"
        if tokens.contains(&"-") {
            return match tokens.as_slice() {
                [from, "-", to] => Ok(Self(vec![VersionRange::Hyphen {
                    from: Partial::parse(from)?,
                    to: Partial::parse(to)?,
                }])),
                _ => Err(RangeError::MalformedHyphen(spec.trim().to_string())),
            };
        }

        let mut ranges = Vec::new();
        let mut tokens = tokens.into_iter();
        while let Some(token) = tokens.next() {
            // An operator may be separated from its version by whitespace
            let range = if Operator::is_bare(token) {
                let version = tokens
                    .next()
                    .ok_or_else(|| RangeError::DanglingOperator(token.to_string()))?;
                VersionRange::parse(&format!("{token}{version}"))?
            } else {
                VersionRange::parse(token)?
            };
            ranges.push(range);
        }

        Ok(Self(ranges))
    }

    fn satisfies(&self, version: &Version, include_prerelease: bool) -> bool {
        let comparators: Vec<Comparator> = self
            .0
            .iter()
            .flat_map(|range| range.comparators(include_prerelease))
            .collect();

        if !comparators.iter().all(|c| c.matches(version)) {
            return false;
        }

        if version.pre.is_empty() || include_prerelease {
            return true;
        }

        comparators.iter().any(|c| {
            !c.version.pre.is_empty()
                && c.version.major == version.major
                && c.version.minor == version.minor
                && c.version.patch == version.patch
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Operator {
    fn is_bare(token: &str) -> bool {
        matches!(token, "=" | ">" | ">=" | "<" | "<=" | "^" | "~" | "~>")
    }
}

/// A single term of a comparator set
#[derive(Debug, Clone, PartialEq, Eq)]
enum VersionRange {
    /// Bare or operator-prefixed version (`1.2.3`, `>=1.2`, `<2`)
    Primitive(Operator, Partial),
    /// Caret range: ^1.2.3 means >=1.2.3 <2.0.0 (or special cases for 0.x)
    Caret(Partial),
    /// Tilde range: ~1.2.3 means >=1.2.3 <1.3.0
    Tilde(Partial),
    /// Hyphen range: 1.0.0 - 2.0.0 means >=1.0.0 <=2.0.0
    Hyphen { from: Partial, to: Partial },
}

impl VersionRange {
    fn parse(spec: &str) -> Result<Self, RangeError> {
        let spec = spec.trim();

        if let Some(rest) = spec.strip_prefix("~>") {
            Ok(VersionRange::Tilde(Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix('~') {
            Ok(VersionRange::Tilde(Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix('^') {
            Ok(VersionRange::Caret(Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix(">=") {
            Ok(VersionRange::Primitive(Operator::Gte, Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix('>') {
            Ok(VersionRange::Primitive(Operator::Gt, Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix("<=") {
            Ok(VersionRange::Primitive(Operator::Lte, Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix('<') {
            Ok(VersionRange::Primitive(Operator::Lt, Partial::parse(rest)?))
        } else if let Some(rest) = spec.strip_prefix('=') {
            Ok(VersionRange::Primitive(Operator::Eq, Partial::parse(rest)?))
        } else {
            Ok(VersionRange::Primitive(Operator::Eq, Partial::parse(spec)?))
        }
    }

    /// Lower this term to plain comparators. An empty list matches any release.
    fn comparators(&self, include_prerelease: bool) -> Vec<Comparator> {
        match self {
            VersionRange::Primitive(op, p) => primitive(*op, p, include_prerelease),
            VersionRange::Caret(p) => {
                let Some(major) = p.major else {
                    return Vec::new();
                };
                // ^0.2.3 -> <0.3.0, ^0.0.3 -> <0.0.4, everything else bumps major
                let upper = match (major, p.minor, p.patch) {
                    (_, None, _) => below(major + 1, 0, 0),
                    (0, Some(0), Some(patch)) => below(0, 0, patch + 1),
                    (0, Some(minor), _) => below(0, minor + 1, 0),
                    _ => below(major + 1, 0, 0),
                };
                vec![
                    Comparator::new(Operator::Gte, p.floor(include_prerelease)),
                    Comparator::new(Operator::Lt, upper),
                ]
            }
            VersionRange::Tilde(p) => {
                let Some(major) = p.major else {
                    return Vec::new();
                };
                let upper = match p.minor {
                    None => below(major + 1, 0, 0),
                    Some(minor) => below(major, minor + 1, 0),
                };
                vec![
                    Comparator::new(Operator::Gte, p.floor(include_prerelease)),
                    Comparator::new(Operator::Lt, upper),
                ]
            }
            VersionRange::Hyphen { from, to } => {
                let mut comparators = Vec::new();
                if from.major.is_some() {
                    comparators.push(Comparator::new(
                        Operator::Gte,
                        from.floor(include_prerelease),
                    ));
                }
                match (to.major, to.minor, to.patch) {
                    (None, _, _) => {}
                    (Some(major), None, _) => {
                        comparators.push(Comparator::new(Operator::Lt, below(major + 1, 0, 0)))
                    }
                    (Some(major), Some(minor), None) => comparators
                        .push(Comparator::new(Operator::Lt, below(major, minor + 1, 0))),
                    (Some(_), Some(_), Some(_)) => {
                        comparators.push(Comparator::new(Operator::Lte, to.floor(false)))
                    }
                }
                comparators
            }
        }
    }
}

/// Lower an operator applied to a possibly partial version
fn primitive(op: Operator, p: &Partial, include_prerelease: bool) -> Vec<Comparator> {
    let Some(major) = p.major else {
        return match op {
            // `>*` and `<*` can never match
            Operator::Gt | Operator::Lt => vec![Comparator::new(Operator::Lt, below(0, 0, 0))],
            _ => Vec::new(),
        };
    };

    if p.is_full() {
        return vec![Comparator::new(op, p.floor(false))];
    }

    // Next version past the wildcard: 1.x -> 2.0.0, 1.2.x -> 1.3.0
    let (next_major, next_minor) = match p.minor {
        None => (major + 1, 0),
        Some(minor) => (major, minor + 1),
    };

    match op {
        Operator::Eq => vec![
            Comparator::new(Operator::Gte, p.floor(include_prerelease)),
            Comparator::new(Operator::Lt, below(next_major, next_minor, 0)),
        ],
        Operator::Gt => vec![Comparator::new(
            Operator::Gte,
            floor_of(next_major, next_minor, include_prerelease),
        )],
        Operator::Gte => vec![Comparator::new(Operator::Gte, p.floor(include_prerelease))],
        Operator::Lt => vec![Comparator::new(
            Operator::Lt,
            below(major, p.minor.unwrap_or(0), 0),
        )],
        Operator::Lte => vec![Comparator::new(
            Operator::Lt,
            below(next_major, next_minor, 0),
        )],
    }
}

/// The lowest prerelease of a version (`1.2.3-0`), the tightest exclusive upper bound
fn below(major: u64, minor: u64, patch: u64) -> Version {
    let mut version = Version::new(major, minor, patch);
    version.pre = lowest_prerelease();
    version
}

fn floor_of(major: u64, minor: u64, include_prerelease: bool) -> Version {
    if include_prerelease {
        below(major, minor, 0)
    } else {
        Version::new(major, minor, 0)
    }
}

fn lowest_prerelease() -> Prerelease {
    Prerelease::new("0").expect("`0` is a valid prerelease identifier")
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Operator,
    version: Version,
}

impl Comparator {
    fn new(op: Operator, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, version: &Version) -> bool {
        let ordering = version.cmp_precedence(&self.version);
        match self.op {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
        }
    }
}

/// A version whose trailing components may be wildcards (`1`, `1.2`, `1.x`, `*`)
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(spec: &str) -> Result<Self, RangeError> {
        let invalid = || RangeError::InvalidVersion(spec.to_string());

        let trimmed = spec.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let (rest, build) = match trimmed.split_once('+') {
            Some((rest, build)) => (rest, Some(build)),
            None => (trimmed, None),
        };
        if let Some(build) = build {
            BuildMetadata::new(build).map_err(|_| invalid())?;
        }

        let (core, pre) = match rest.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).map_err(|_| invalid())?),
            None => (rest, Prerelease::EMPTY),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return Err(invalid());
        }

        let mut numbers = [None; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                break;
            }
            *slot = Some(parse_numeric(part).ok_or_else(invalid)?);
        }
        let [major, minor, patch] = numbers;

        let partial = Self {
            major,
            minor,
            patch,
            pre,
        };
        if !partial.pre.is_empty() && !partial.is_full() {
            return Err(invalid());
        }
        Ok(partial)
    }

    fn is_full(&self) -> bool {
        self.major.is_some() && self.minor.is_some() && self.patch.is_some()
    }

    /// The smallest version this partial covers, wildcards filled with zero
    fn floor(&self, include_prerelease: bool) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        if self.is_full() {
            version.pre = self.pre.clone();
        } else if include_prerelease {
            version.pre = lowest_prerelease();
        }
        version
    }
}

/// Largest integer npm accepts in a version (`Number.MAX_SAFE_INTEGER`)
const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Numeric identifier without leading zeros, at most [`MAX_SAFE_INTEGER`]
fn parse_numeric(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse().ok().filter(|n| *n <= MAX_SAFE_INTEGER)
}
