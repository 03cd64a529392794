//! Run domain model.
//!
//! # Responsibility
//! - Define the immutable record for one exercise session.
//! - Map `Location` to and from its persisted text form.
//!
//! # Invariants
//! - `id` is assigned by the caller, never generated here.
//! - `completed_on` is expected to be >= `started_on`; not enforced.
//! - `miles` is expected to be non-negative; not enforced.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Caller-assigned run identifier, backed by the `run.id` primary key.
pub type RunId = i32;

/// Where a run took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    Indoor,
    Outdoor,
}

impl Location {
    /// Text form used in the `run.location` column and in seed documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indoor => "INDOOR",
            Self::Outdoor => "OUTDOOR",
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when text does not name a known `Location` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocationError(pub String);

impl Display for ParseLocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown location `{}`; expected INDOOR|OUTDOOR", self.0)
    }
}

impl Error for ParseLocationError {}

impl FromStr for Location {
    type Err = ParseLocationError;

    // Exact match only: the stored text is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "INDOOR" => Ok(Self::Indoor),
            "OUTDOOR" => Ok(Self::Outdoor),
            other => Err(ParseLocationError(other.to_string())),
        }
    }
}

/// One recorded exercise session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: RunId,
    pub title: String,
    /// Local wall-clock start, no timezone.
    pub started_on: NaiveDateTime,
    pub completed_on: NaiveDateTime,
    pub miles: i32,
    pub location: Location,
}

impl Run {
    pub fn new(
        id: RunId,
        title: impl Into<String>,
        started_on: NaiveDateTime,
        completed_on: NaiveDateTime,
        miles: i32,
        location: Location,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            started_on,
            completed_on,
            miles,
            location,
        }
    }
}

/// Seed document shape: `{ "runs": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCollection {
    pub runs: Vec<Run>,
}
