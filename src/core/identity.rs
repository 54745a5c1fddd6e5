//! Identifiers for cases and their nested records
//!
//! Cases get a human-readable, sequence-based ID (`DL-2026-0042`) assigned by the
//! store. Notes, pause records and attachments use `PREFIX-<ULID>` so they sort by
//! creation time and never collide across cases.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Errors raised while parsing an identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("Invalid case ID '{0}': expected PREFIX-YYYY-NNNN")]
    InvalidCaseId(String),

    #[error("Invalid record ID '{0}': expected PREFIX-ULID")]
    InvalidRecordId(String),

    #[error("Unknown record prefix: {0}")]
    UnknownPrefix(String),
}

/// Whether `prefix` can head a case ID that parses back
///
/// Prefixes are ASCII letters only. Digits or dashes would make the ID ambiguous
/// to split.
pub fn is_valid_case_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic())
}

/// Human-readable case identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseId {
    prefix: String,
    year: i32,
    sequence: u32,
}

impl CaseId {
    /// Build the ID for the given sequence number in the year of `at`
    pub fn new(prefix: &str, at: chrono::DateTime<chrono::Utc>, sequence: u32) -> Self {
        Self {
            prefix: prefix.to_uppercase(),
            year: at.year(),
            sequence,
        }
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:04}", self.prefix, self.year, self.sequence)
    }
}

impl FromStr for CaseId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts = s.splitn(3, '-');
        let (Some(prefix), Some(year), Some(seq)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(IdParseError::InvalidCaseId(s.to_string()));
        };

        if !is_valid_case_prefix(prefix) {
            return Err(IdParseError::InvalidCaseId(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| IdParseError::InvalidCaseId(s.to_string()))?;
        let sequence: u32 = seq
            .parse()
            .map_err(|_| IdParseError::InvalidCaseId(s.to_string()))?;

        Ok(Self {
            prefix: prefix.to_uppercase(),
            year,
            sequence,
        })
    }
}

impl TryFrom<String> for CaseId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CaseId> for String {
    fn from(id: CaseId) -> Self {
        id.to_string()
    }
}

/// Prefix for records nested inside a case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordPrefix {
    Note,
    Pause,
    Att,
}

impl RecordPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordPrefix::Note => "NOTE",
            RecordPrefix::Pause => "PAUSE",
            RecordPrefix::Att => "ATT",
        }
    }
}

impl fmt::Display for RecordPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "NOTE" => Ok(RecordPrefix::Note),
            "PAUSE" => Ok(RecordPrefix::Pause),
            "ATT" => Ok(RecordPrefix::Att),
            _ => Err(IdParseError::UnknownPrefix(s.to_string())),
        }
    }
}

/// Identifier for a note, pause record or attachment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId {
    prefix: RecordPrefix,
    ulid: Ulid,
}

impl RecordId {
    pub fn new(prefix: RecordPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> RecordPrefix {
        self.prefix
    }

    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for RecordId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| IdParseError::InvalidRecordId(s.to_string()))?;
        let prefix: RecordPrefix = prefix.parse()?;
        let ulid =
            Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidRecordId(s.to_string()))?;
        Ok(Self { prefix, ulid })
    }
}

impl TryFrom<String> for RecordId {
    type Error = IdParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.to_string()
    }
}
