//! Build version parsing and ordering.
//!
//! Upgrade decisions hinge on comparing the software versions that members
//! advertise through gossip tags. Tag values are operator-supplied strings,
//! so the parser is lenient: an optional `v` prefix, `MAJOR` / `MAJOR.MINOR`
//! shorthand (missing parts are zero), and trailing build metadata (`+...`,
//! ignored for ordering) are all accepted. Anything else is a parse error,
//! which normalization swallows into [`BuildVersion::sentinel`] so a
//! mis-tagged node is treated as the oldest in the cluster rather than
//! aborting the tick.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a version string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    #[error("empty version string")]
    Empty,
    #[error("malformed version string: {0:?}")]
    Malformed(String),
}

/// A parsed semantic version.
///
/// Ordering follows semver: the `major.minor.patch` triple first, then
/// pre-release identifiers (a pre-release sorts below its release, numeric
/// identifiers below alphanumeric ones). Build metadata is dropped at parse
/// time and never affects ordering or equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildVersion {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Vec<PreId>,
}

/// One dot-separated pre-release identifier.
///
/// Variant order matters: derived `Ord` puts every numeric identifier below
/// every alphanumeric one, per the semver precedence rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum PreId {
    Numeric(u64),
    Text(String),
}

impl BuildVersion {
    /// Creates a release version (no pre-release identifiers).
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Vec::new(),
        }
    }

    /// The version assigned to members whose upgrade tag is missing or
    /// unparseable.
    ///
    /// Must compare strictly less than any realistic production version;
    /// clusters running pre-0.0.1 builds cannot use upgrade migrations.
    pub fn sentinel() -> Self {
        Self::new(0, 0, 1)
    }

    /// Returns true if this is the missing-tag sentinel.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

impl Ord for BuildVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (self.pre.is_empty(), other.pre.is_empty()) {
                (true, true) => Ordering::Equal,
                // a release outranks its own pre-releases
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => self.pre.cmp(&other.pre),
            })
    }
}

impl PartialOrd for BuildVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for BuildVersion {
    type Err = VersionParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let s = raw.trim();
        let s = s.strip_prefix('v').or_else(|| s.strip_prefix('V')).unwrap_or(s);
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // build metadata is syntactically allowed but never compared
        let s = match s.split_once('+') {
            Some((core, _meta)) => core,
            None => s,
        };

        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (s, None),
        };

        let fields: Vec<&str> = core.split('.').collect();
        if fields.len() > 3 {
            return Err(VersionParseError::Malformed(raw.to_string()));
        }
        let mut nums = [0u64; 3];
        for (i, field) in fields.iter().enumerate() {
            nums[i] = parse_numeric(field, raw)?;
        }

        let pre = match pre {
            None => Vec::new(),
            Some(p) => parse_pre(p, raw)?,
        };

        Ok(Self {
            major: nums[0],
            minor: nums[1],
            patch: nums[2],
            pre,
        })
    }
}

fn parse_numeric(field: &str, raw: &str) -> Result<u64, VersionParseError> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError::Malformed(raw.to_string()));
    }
    field
        .parse()
        .map_err(|_| VersionParseError::Malformed(raw.to_string()))
}

fn parse_pre(pre: &str, raw: &str) -> Result<Vec<PreId>, VersionParseError> {
    pre.split('.')
        .map(|id| {
            if id.is_empty() {
                Err(VersionParseError::Malformed(raw.to_string()))
            } else if id.bytes().all(|b| b.is_ascii_digit()) {
                id.parse()
                    .map(PreId::Numeric)
                    .map_err(|_| VersionParseError::Malformed(raw.to_string()))
            } else if id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
                Ok(PreId::Text(id.to_string()))
            } else {
                Err(VersionParseError::Malformed(raw.to_string()))
            }
        })
        .collect()
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        for (i, id) in self.pre.iter().enumerate() {
            f.write_str(if i == 0 { "-" } else { "." })?;
            match id {
                PreId::Numeric(n) => write!(f, "{n}")?,
                PreId::Text(t) => f.write_str(t)?,
            }
        }
        Ok(())
    }
}

impl Serialize for BuildVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BuildVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
