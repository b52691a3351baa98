//! Berth domain entity

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult};

/// Positive berth number, the public identity of a berth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct BerthNumber(i32);

impl BerthNumber {
    /// Fails with [`DomainError::InvalidBerth`] unless `1 <= raw <= i32::MAX`.
    pub fn new(raw: i64) -> DomainResult<Self> {
        match i32::try_from(raw) {
            Ok(n) if n >= 1 => Ok(Self(n)),
            _ => Err(DomainError::InvalidBerth(raw)),
        }
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for BerthNumber {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<BerthNumber> for i32 {
    fn from(n: BerthNumber) -> Self {
        n.0
    }
}

impl From<BerthNumber> for i64 {
    fn from(n: BerthNumber) -> Self {
        i64::from(n.0)
    }
}

impl fmt::Display for BerthNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Berth length class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BerthKind {
    Long,
    Short,
}

impl BerthKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Long => "long",
            Self::Short => "short",
        }
    }
}

impl FromStr for BerthKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(Self::Long),
            "short" => Ok(Self::Short),
            other => Err(DomainError::Validation(format!(
                "kind: expected 'long' or 'short', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for BerthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mooring slot
#[derive(Debug, Clone, PartialEq)]
pub struct Berth {
    pub number: BerthNumber,
    pub kind: BerthKind,
    /// Free-text condition report ("ok", "broken cleat on the left", ...)
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a berth
#[derive(Debug, Clone)]
pub struct NewBerth {
    pub number: BerthNumber,
    pub kind: BerthKind,
    pub state: String,
}

impl NewBerth {
    pub fn new(number: BerthNumber, kind: BerthKind, state: &str) -> DomainResult<Self> {
        Ok(Self {
            number,
            kind,
            state: validate_state(state)?,
        })
    }
}

/// Partial update of the mutable berth fields. The number never changes.
#[derive(Debug, Clone, Default)]
pub struct BerthPatch {
    pub kind: Option<BerthKind>,
    pub state: Option<String>,
}

impl Berth {
    /// Merge `patch` into a copy of this berth, validating the result.
    pub fn patched(&self, patch: BerthPatch) -> DomainResult<Berth> {
        let mut next = self.clone();
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(state) = patch.state {
            next.state = validate_state(&state)?;
        }
        Ok(next)
    }
}

/// Trimmed state text, 2 to 300 characters.
pub fn validate_state(state: &str) -> DomainResult<String> {
    let state = state.trim();
    let len = state.chars().count();
    if !(2..=300).contains(&len) {
        return Err(DomainError::Validation(
            "state must be 2-300 characters".into(),
        ));
    }
    Ok(state.to_string())
}
