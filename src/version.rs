// src/version.rs

//! Version handling and range satisfaction for recipe declarations
//!
//! Versions are dotted tuples of numeric or alphanumeric components
//! ("3.26.3", "24.1", "master"). Ranges are inclusive on both ends and
//! written `lo:hi`, `lo:`, `:hi`, or a bare version. A bare or upper-bound
//! version matches by prefix, so `3.18` as an upper bound admits `3.18.4`.
//! Named branch versions ("master", "develop") track the newest sources and
//! order above every numbered release.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One dot-separated version component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    Num(u64),
    Alpha(String),
}

impl Component {
    fn parse(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => Component::Num(n),
            Err(_) => Component::Alpha(s.to_string()),
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Num(a), Component::Num(b)) => a.cmp(b),
            (Component::Alpha(a), Component::Alpha(b)) => a.cmp(b),
            // Numbered releases sort after named branches/pre-releases
            (Component::Num(_), Component::Alpha(_)) => Ordering::Greater,
            (Component::Alpha(_), Component::Num(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Num(n) => write!(f, "{}", n),
            Component::Alpha(s) => write!(f, "{}", s),
        }
    }
}

/// Moving branches of an upstream repository; newer than any release
const BRANCH_NAMES: &[&str] = &["develop", "main", "master", "head", "trunk", "stable"];

/// A dotted version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string. Total: every non-empty string is a version.
    pub fn parse(s: &str) -> Self {
        let components = s
            .trim()
            .split('.')
            .filter(|p| !p.is_empty())
            .map(Component::parse)
            .collect();
        Self { components }
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Is this a named branch version like `master` or `develop`?
    pub fn is_branch(&self) -> bool {
        matches!(
            self.components.first(),
            Some(Component::Alpha(s)) if BRANCH_NAMES.contains(&s.as_str())
        )
    }

    /// Compare against an upper bound, treating the bound as a prefix:
    /// `3.18.4` is not greater than the bound `3.18`.
    fn cmp_upper_bound(&self, bound: &Version) -> Ordering {
        match (self.is_branch(), bound.is_branch()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        for (mine, theirs) in self.components.iter().zip(bound.components.iter()) {
            match mine.cmp(theirs) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        if self.components.len() >= bound.components.len() {
            // Equal prefix; anything under the bound is within it
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_branch(), other.is_branch()) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            _ => {}
        }
        for (mine, theirs) in self.components.iter().zip(other.components.iter()) {
            match mine.cmp(theirs) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.components.len().cmp(&other.components.len())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::parse(s)
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl TryFrom<String> for Version {
    type Error = std::convert::Infallible;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Ok(Version::parse(&s))
    }
}

impl From<Version> for String {
    fn from(v: Version) -> String {
        v.to_string()
    }
}

/// An inclusive version range
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRange {
    lo: Option<Version>,
    hi: Option<Version>,
}

impl VersionRange {
    /// Any version
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse `lo:hi`, `lo:`, `:hi`, or a bare version (prefix match)
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return Self::any();
        }
        let bound = |part: &str| {
            let v = Version::parse(part);
            if v.is_empty() { None } else { Some(v) }
        };
        match s.split_once(':') {
            Some((lo, hi)) => Self {
                lo: bound(lo),
                hi: bound(hi),
            },
            None => {
                let v = Version::parse(s);
                Self {
                    lo: Some(v.clone()),
                    hi: Some(v),
                }
            }
        }
    }

    pub fn contains(&self, version: &Version) -> bool {
        if let Some(lo) = &self.lo {
            if version < lo {
                return false;
            }
        }
        if let Some(hi) = &self.hi {
            if version.cmp_upper_bound(hi) == Ordering::Greater {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.lo, &self.hi) {
            (None, None) => write!(f, ":"),
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (lo, hi) => {
                if let Some(lo) = lo {
                    write!(f, "{}", lo)?;
                }
                write!(f, ":")?;
                if let Some(hi) = hi {
                    write!(f, "{}", hi)?;
                }
                Ok(())
            }
        }
    }
}

/// A comma-separated union of ranges, e.g. `3.17.0:3.17.3,3.18.0`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionRanges {
    ranges: Vec<VersionRange>,
}

impl VersionRanges {
    /// Any version
    pub fn any() -> Self {
        Self::default()
    }

    pub fn parse(s: &str) -> Self {
        let ranges = s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(VersionRange::parse)
            .collect();
        Self { ranges }
    }

    pub fn contains(&self, version: &Version) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(version))
    }

    pub fn is_any(&self) -> bool {
        self.ranges.is_empty()
    }
}

impl From<&str> for VersionRanges {
    fn from(s: &str) -> Self {
        VersionRanges::parse(s)
    }
}

impl fmt::Display for VersionRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ranges.is_empty() {
            return write!(f, ":");
        }
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}
