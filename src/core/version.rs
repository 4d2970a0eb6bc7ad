//! OSGi versions and version ranges.
//!
//! A version is `major[.minor[.micro[.qualifier]]]`. A range is either a bare
//! version (meaning "this version or later") or an interval such as
//! `[1.0,2.0)`. Containment is evaluated through a PubGrub range.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use pubgrub::Range;
use serde::{Serialize, Serializer};

use crate::core::errors::ManifestError;

/// An OSGi version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
    pub qualifier: String,
}

impl Version {
    /// The `0.0.0` version used whenever a version is absent or malformed.
    pub const ZERO: Version = Version {
        major: 0,
        minor: 0,
        micro: 0,
        qualifier: String::new(),
    };

    /// Create a version without a qualifier.
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Version {
            major,
            minor,
            micro,
            qualifier: String::new(),
        }
    }

    /// Set the qualifier.
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    /// Parse a version string.
    ///
    /// Surrounding whitespace and double quotes are ignored.
    pub fn parse(s: &str) -> Result<Self, ManifestError> {
        let trimmed = unquote(s.trim());
        if trimmed.is_empty() {
            return Err(ManifestError::version(s, "empty version"));
        }

        let mut parts = trimmed.splitn(4, '.');
        let mut numbers = [0u64; 3];

        for i in 0..3 {
            // Fewer components are fine, but a qualifier needs all three
            let Some(part) = parts.next() else {
                return Ok(Version::new(numbers[0], numbers[1], numbers[2]));
            };
            numbers[i] = parse_component(part).ok_or_else(|| {
                ManifestError::version(
                    s,
                    format!("component {} (`{}`) is not a number", i + 1, part),
                )
            })?;
        }

        let qualifier = match parts.next() {
            None => "",
            Some("") => return Err(ManifestError::version(s, "empty qualifier")),
            Some(q) => q,
        };
        if !qualifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ManifestError::version(
                s,
                format!("invalid qualifier `{}`", qualifier),
            ));
        }

        Ok(Version::new(numbers[0], numbers[1], numbers[2]).with_qualifier(qualifier))
    }

    /// Parse a version, falling back to `0.0.0`.
    pub fn parse_or_zero(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|e| {
            tracing::debug!("{}; using 0.0.0", e);
            Version::ZERO
        })
    }
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
        .trim()
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.micro.cmp(&other.micro))
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if !self.qualifier.is_empty() {
            write!(f, ".{}", self.qualifier)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A version interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    floor: Version,
    floor_inclusive: bool,
    /// Upper bound and whether it is inclusive.
    ceiling: Option<(Version, bool)>,
}

impl VersionRange {
    /// The range matching every version.
    pub fn any() -> Self {
        VersionRange {
            floor: Version::ZERO,
            floor_inclusive: true,
            ceiling: None,
        }
    }

    /// `[floor, ∞)`
    pub fn at_least(floor: Version) -> Self {
        VersionRange {
            floor,
            floor_inclusive: true,
            ceiling: None,
        }
    }

    /// An explicit interval.
    pub fn between(
        floor: Version,
        floor_inclusive: bool,
        ceiling: Version,
        ceiling_inclusive: bool,
    ) -> Self {
        VersionRange {
            floor,
            floor_inclusive,
            ceiling: Some((ceiling, ceiling_inclusive)),
        }
    }

    /// Parse a range expression.
    pub fn parse(expr: &str) -> Result<Self, ManifestError> {
        let trimmed = unquote(expr.trim());

        let floor_inclusive = match trimmed.chars().next() {
            Some('[') => true,
            Some('(') => false,
            _ => return Version::parse(trimmed).map(VersionRange::at_least),
        };

        let ceiling_inclusive = match trimmed.chars().last() {
            Some(']') if trimmed.len() > 1 => true,
            Some(')') if trimmed.len() > 1 => false,
            _ => return Err(ManifestError::version(expr, "unterminated interval")),
        };

        let inner = &trimmed[1..trimmed.len() - 1];
        let (floor, ceiling) = inner
            .split_once(',')
            .ok_or_else(|| ManifestError::version(expr, "interval needs two bounds"))?;
        if ceiling.contains(',') {
            return Err(ManifestError::version(expr, "interval has more than two bounds"));
        }

        let floor = Version::parse(floor)?;
        let ceiling = Version::parse(ceiling)?;
        if ceiling < floor {
            return Err(ManifestError::version(expr, "ceiling is below floor"));
        }

        Ok(VersionRange::between(
            floor,
            floor_inclusive,
            ceiling,
            ceiling_inclusive,
        ))
    }

    /// Parse a range, falling back to "any version".
    pub fn parse_or_any(expr: &str) -> Self {
        Self::parse(expr).unwrap_or_else(|e| {
            tracing::debug!("{}; matching any version", e);
            VersionRange::any()
        })
    }

    /// The lower bound.
    pub fn floor(&self) -> &Version {
        &self.floor
    }

    /// The upper bound, if any, with its inclusivity.
    pub fn ceiling(&self) -> Option<(&Version, bool)> {
        self.ceiling.as_ref().map(|(v, inclusive)| (v, *inclusive))
    }

    /// Convert to a PubGrub range.
    pub fn to_range(&self) -> Range<Version> {
        let lower = if self.floor_inclusive {
            Range::higher_than(self.floor.clone())
        } else {
            Range::strictly_higher_than(self.floor.clone())
        };

        match &self.ceiling {
            None => lower,
            Some((ceiling, true)) => lower.intersection(&Range::lower_than(ceiling.clone())),
            Some((ceiling, false)) => {
                lower.intersection(&Range::strictly_lower_than(ceiling.clone()))
            }
        }
    }

    /// Check whether a version falls inside this range.
    pub fn contains(&self, version: &Version) -> bool {
        self.to_range().contains(version)
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        VersionRange::any()
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ceiling {
            None => write!(f, "{}", self.floor),
            Some((ceiling, ceiling_inclusive)) => write!(
                f,
                "{}{},{}{}",
                if self.floor_inclusive { '[' } else { '(' },
                self.floor,
                ceiling,
                if *ceiling_inclusive { ']' } else { ')' }
            ),
        }
    }
}

impl FromStr for VersionRange {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::parse(s)
    }
}
