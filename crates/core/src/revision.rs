//! Revision identifiers and migration targets.
//!
//! Revisions form a singly linked history: each migration names itself and
//! the revision it was written on top of.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const REVISION_LEN: usize = 12;

/// A 12-character lowercase hex revision id, e.g. `6d1b38f242fe`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RevisionId(String);

impl RevisionId {
    /// Validates and wraps `raw`.
    pub fn new(raw: impl Into<String>) -> Result<Self, CoreError> {
        let raw = raw.into();
        let valid = raw.len() == REVISION_LEN
            && raw.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if valid { Ok(Self(raw)) } else { Err(CoreError::InvalidRevision(raw)) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RevisionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RevisionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RevisionId> for String {
    fn from(value: RevisionId) -> Self {
        value.0
    }
}

/// Where an upgrade should stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UpgradeTarget {
    /// The newest registered revision.
    Head,
    /// Apply this many pending migrations (`+N`).
    Steps(usize),
    /// Stop once this revision is applied.
    Revision(RevisionId),
}

/// Where a downgrade should stop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DowngradeTarget {
    /// Revert everything, including the base migration.
    Base,
    /// Revert this many applied migrations (`-N`).
    Steps(usize),
    /// Revert until this revision is the current one.
    Revision(RevisionId),
}

fn parse_steps(digits: &str, original: &str) -> Result<usize, CoreError> {
    match digits.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CoreError::InvalidTarget(original.to_owned())),
    }
}

impl FromStr for UpgradeTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("head") || s.eq_ignore_ascii_case("heads") {
            return Ok(Self::Head);
        }
        if let Some(digits) = s.strip_prefix('+') {
            return parse_steps(digits, s).map(Self::Steps);
        }
        RevisionId::new(s)
            .map(Self::Revision)
            .map_err(|_| CoreError::InvalidTarget(s.to_owned()))
    }
}

impl FromStr for DowngradeTarget {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("base") {
            return Ok(Self::Base);
        }
        if let Some(digits) = s.strip_prefix('-') {
            return parse_steps(digits, s).map(Self::Steps);
        }
        RevisionId::new(s)
            .map(Self::Revision)
            .map_err(|_| CoreError::InvalidTarget(s.to_owned()))
    }
}

impl fmt::Display for UpgradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Head => f.write_str("head"),
            Self::Steps(n) => write!(f, "+{n}"),
            Self::Revision(rev) => write!(f, "{rev}"),
        }
    }
}

impl fmt::Display for DowngradeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Steps(n) => write!(f, "-{n}"),
            Self::Revision(rev) => write!(f, "{rev}"),
        }
    }
}
