//! The in-memory schedule index: built once from weekday sheets, then only
//! read.
//!
//! Ingestion pipeline, per row:
//!   subject → location (site prefix stripped) → zone → start time → instant
//!     └─ subject trimmed to class code → filed under `[day][zone]`

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use tracing::{debug, info, warn};

use crate::{
  clock::Clock,
  day::Day,
  error::RowError,
  record::{
    ClassRecord, DEFAULT_SITE_PREFIX, LOCATION_COLUMN, RawRow,
    START_TIME_COLUMN, SUBJECT_COLUMN, canonical_subject, strip_site_prefix,
  },
  time::parse_time_on,
  zone::{Zone, ZoneRules},
};

/// How far ahead of "now" a class counts as upcoming.
pub const DEFAULT_WINDOW: TimeDelta = TimeDelta::minutes(30);

// ─── Sources ─────────────────────────────────────────────────────────────────

/// Supplies the rows of each weekday's sheet, in sheet order.
///
/// A missing sheet means "no classes that day", not an error.
pub trait SheetSource {
  fn sheet(&self, day: Day) -> Option<Vec<RawRow>>;
}

/// A [`SheetSource`] held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
  sheets: HashMap<Day, Vec<RawRow>>,
}

impl MemorySource {
  pub fn new() -> Self { Self::default() }

  pub fn with_sheet(mut self, day: Day, rows: Vec<RawRow>) -> Self {
    self.sheets.insert(day, rows);
    self
  }

  pub fn insert(&mut self, day: Day, rows: Vec<RawRow>) {
    self.sheets.insert(day, rows);
  }
}

impl SheetSource for MemorySource {
  fn sheet(&self, day: Day) -> Option<Vec<RawRow>> {
    self.sheets.get(&day).cloned()
  }
}

// ─── Settings & report ───────────────────────────────────────────────────────

/// Knobs for turning rows into records.
#[derive(Debug, Clone)]
pub struct IngestSettings {
  pub rules:       ZoneRules,
  /// Removed from every location before zone resolution.
  pub site_prefix: String,
  /// Lookahead used by [`ScheduleIndex::upcoming`].
  pub window:      TimeDelta,
}

impl Default for IngestSettings {
  fn default() -> Self {
    Self {
      rules:       ZoneRules::default(),
      site_prefix: DEFAULT_SITE_PREFIX.to_string(),
      window:      DEFAULT_WINDOW,
    }
  }
}

/// Counts gathered while building an index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
  /// Days whose sheet was read, in order.
  pub days_loaded:        Vec<Day>,
  /// Days skipped because no sheet exists for them.
  pub days_missing:       Vec<Day>,
  pub rows_read:          usize,
  pub indexed:            usize,
  pub missing_subject:    usize,
  pub missing_location:   usize,
  pub missing_start_time: usize,
  pub unresolved_zone:    usize,
  pub invalid_time:       usize,
}

impl IngestReport {
  pub fn dropped(&self) -> usize { self.rows_read - self.indexed }

  fn record_drop(&mut self, err: &RowError) {
    match err {
      RowError::MissingSubject => self.missing_subject += 1,
      RowError::MissingLocation => self.missing_location += 1,
      RowError::MissingStartTime => self.missing_start_time += 1,
      RowError::ZoneUnresolved(_) => self.unresolved_zone += 1,
      RowError::Time(_) => self.invalid_time += 1,
    }
  }
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// Class records by weekday, then zone, in sheet row order.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ScheduleIndex {
  days:   BTreeMap<Day, BTreeMap<Zone, Vec<ClassRecord>>>,
  window: TimeDelta,
}

impl ScheduleIndex {
  /// Build the index from every sheet between today and Friday.
  ///
  /// Days before today are never loaded. Malformed rows are dropped with a
  /// diagnostic and counted in the returned report; they never abort the
  /// build.
  pub fn build(
    source: &dyn SheetSource,
    settings: &IngestSettings,
    clock: &dyn Clock,
  ) -> (Self, IngestReport) {
    let mut days = BTreeMap::new();
    let mut report = IngestReport::default();
    let today = Day::current(clock.now().date_naive());

    for day in Day::all().filter(|d| *d >= today) {
      let Some(rows) = source.sheet(day) else {
        debug!(day = %day, "no sheet for day");
        report.days_missing.push(day);
        continue;
      };

      info!(day = %day, "reading classes");
      report.days_loaded.push(day);
      let now = clock.now();
      let mut count = 0usize;

      for (line, row) in rows.iter().enumerate() {
        report.rows_read += 1;
        match ingest_row(row, day, settings, now) {
          Ok((zone, record)) => {
            days
              .entry(day)
              .or_insert_with(BTreeMap::new)
              .entry(zone)
              .or_insert_with(Vec::new)
              .push(record);
            count += 1;
          }
          Err(err) => {
            warn!(day = %day, line = line + 1, row = ?row, "dropping row: {err}");
            report.record_drop(&err);
          }
        }
      }

      report.indexed += count;
      info!(day = %day, count, "total classes read");
    }

    let index = Self {
      days,
      window: settings.window,
    };
    (index, report)
  }

  pub fn window(&self) -> TimeDelta { self.window }

  /// All records filed under `day` and `zone`, in row order.
  pub fn classes(&self, day: Day, zone: Zone) -> &[ClassRecord] {
    self
      .days
      .get(&day)
      .and_then(|zones| zones.get(&zone))
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// Days that have at least one record.
  pub fn days(&self) -> impl Iterator<Item = Day> + '_ {
    self.days.keys().copied()
  }

  /// Zones with at least one record on `day`.
  pub fn zones(&self, day: Day) -> impl Iterator<Item = Zone> + '_ {
    self.days.get(&day).into_iter().flat_map(|z| z.keys().copied())
  }

  pub fn len(&self) -> usize {
    self.days.values().flat_map(|z| z.values()).map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  /// Classes in `zone` starting within the lookahead window from the
  /// clock's current time. Reads the clock on every call.
  pub fn upcoming(&self, zone: Zone, clock: &dyn Clock) -> Vec<&ClassRecord> {
    self.upcoming_at(zone, clock.now())
  }

  /// Classes in `zone` with `now <= start <= now + window`, taken from
  /// today's bucket. Empty when there is nothing to report.
  pub fn upcoming_at(&self, zone: Zone, now: DateTime<Tz>) -> Vec<&ClassRecord> {
    let today = Day::current(now.date_naive());
    let until = now + self.window;
    self
      .classes(today, zone)
      .iter()
      .filter(|c| c.start >= now && c.start <= until)
      .collect()
  }
}

/// Validate one row and turn it into a record filed under `day`.
pub fn ingest_row(
  row: &RawRow,
  day: Day,
  settings: &IngestSettings,
  now: DateTime<Tz>,
) -> Result<(Zone, ClassRecord), RowError> {
  let subject = row.get(SUBJECT_COLUMN).ok_or(RowError::MissingSubject)?;

  let location = row.get(LOCATION_COLUMN).ok_or(RowError::MissingLocation)?;
  let location = strip_site_prefix(location, &settings.site_prefix);

  let zone = settings.rules.resolve(&location)?;

  let time = row
    .get(START_TIME_COLUMN)
    .ok_or(RowError::MissingStartTime)?;
  let start = parse_time_on(time, day, now)?;

  let record = ClassRecord {
    start,
    subject: canonical_subject(subject),
    time: time.to_string(),
    location,
  };
  Ok((zone, record))
}
