//! Raw spreadsheet rows and the normalized class records built from them.

use std::{collections::HashMap, sync::LazyLock};

use chrono::DateTime;
use chrono_tz::Tz;
use regex::Regex;

// ─── Column names ────────────────────────────────────────────────────────────

pub const SUBJECT_COLUMN: &str = "Name";
pub const LOCATION_COLUMN: &str = "Allocated Location Name";
pub const START_TIME_COLUMN: &str = "Scheduled Start Time";

/// Prefix the timetabling system puts in front of Parkville locations.
pub const DEFAULT_SITE_PREFIX: &str = "PAR-";

// 4 letters then 5 digits, e.g. ABCD10001.
static CLASS_CODE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^[A-Za-z]{4}[0-9]{5}$").unwrap());

const CLASS_CODE_LEN: usize = 9;

// ─── RawRow ──────────────────────────────────────────────────────────────────

/// One spreadsheet row, keyed by header text. Empty cells are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
  fields: HashMap<String, String>,
}

impl RawRow {
  pub fn new() -> Self { Self::default() }

  /// Builder-style insert, mostly for tests and in-memory sources.
  pub fn with(mut self, column: &str, value: &str) -> Self {
    self.insert(column, value);
    self
  }

  pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
    self.fields.insert(column.into(), value.into());
  }

  pub fn get(&self, column: &str) -> Option<&str> {
    self.fields.get(column).map(String::as_str)
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn len(&self) -> usize { self.fields.len() }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
  K: Into<String>,
  V: Into<String>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      fields: iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }
}

// ─── ClassRecord ─────────────────────────────────────────────────────────────

/// A single class occurrence, filed under a weekday and zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRecord {
  /// Absolute start, resolved from `time` on the weekday it is filed under.
  pub start:    DateTime<Tz>,
  /// Canonical class code when one is present, otherwise the raw label.
  pub subject:  String,
  /// The start time exactly as written in the sheet.
  pub time:     String,
  /// Location with the site prefix removed.
  pub location: String,
}

/// Trim a subject label to its leading class code (`ABCD10001 Lecture` →
/// `ABCD10001`). Labels without a leading code are returned unchanged.
pub fn canonical_subject(subject: &str) -> String {
  let head: String = subject.chars().take(CLASS_CODE_LEN).collect();
  if CLASS_CODE.is_match(&head) {
    head
  } else {
    subject.to_string()
  }
}

/// Remove every occurrence of the site prefix from a location.
pub fn strip_site_prefix(location: &str, prefix: &str) -> String {
  if prefix.is_empty() {
    return location.trim().to_string();
  }
  location.replace(prefix, "").trim().to_string()
}
