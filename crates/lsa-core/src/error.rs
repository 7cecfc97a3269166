//! Error types for `lsa-core`.
//!
//! Per-row failures are never propagated past ingestion; they exist as values
//! so that each way a row can be rejected is distinct and testable.

use thiserror::Error;

use crate::zone::Zone;

/// Failure to turn a `H:MM AM|PM` string and a weekday into an instant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
  #[error("invalid time format: {0:?} (expected H:MM AM|PM)")]
  InvalidTimeFormat(String),

  #[error("invalid weekday: {0:?} (expected Monday..Friday)")]
  InvalidWeekday(String),

  /// The wall-clock time falls inside a daylight-saving gap.
  #[error("{time} does not exist on {date} in the campus timezone")]
  NonexistentLocalTime { date: String, time: String },
}

/// A location that matched none of the configured zone markers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location:?} does not belong to any zone")]
pub struct ZoneUnresolved {
  pub location: String,
}

/// Why a single spreadsheet row was left out of the schedule index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
  #[error("subject column not found")]
  MissingSubject,

  #[error("location column not found")]
  MissingLocation,

  #[error("start time column not found")]
  MissingStartTime,

  #[error(transparent)]
  ZoneUnresolved(#[from] ZoneUnresolved),

  #[error(transparent)]
  Time(#[from] TimeError),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown zone identifier: {0:?}")]
  UnknownZone(String),

  #[error("no destination configured for zone {0}")]
  MissingDestination(Zone),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
