//! Parsing of spreadsheet clock times (`2:15 PM`) into campus instants, and
//! the matching 12-hour rendering used in announcements.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta};
use chrono_tz::Tz;
use regex::Regex;

use crate::{clock::Clock, day::Day, error::TimeError};

// Hour 1-12 (optional leading zero), two-digit minute, optional space, AM/PM.
static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"(?i)^(0?[1-9]|1[0-2]):([0-5][0-9])\s?([AP])M$").unwrap()
});

/// Parse `H:MM AM|PM` into a 24-hour wall-clock time.
pub fn parse_clock_time(text: &str) -> Result<NaiveTime, TimeError> {
  let invalid = || TimeError::InvalidTimeFormat(text.to_string());
  let caps = CLOCK_TIME.captures(text.trim()).ok_or_else(invalid)?;

  let hour: u32 = caps[1].parse().map_err(|_| invalid())?;
  let minute: u32 = caps[2].parse().map_err(|_| invalid())?;
  let pm = caps[3].eq_ignore_ascii_case("P");

  let hour = match (hour, pm) {
    (12, false) => 0,
    (12, true) => 12,
    (h, true) => h + 12,
    (h, false) => h,
  };
  NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

/// Resolve `time_text` on `weekday` of the current teaching week.
///
/// The week is derived from the clock on every call. Fails if the weekday
/// is not Monday..Friday or the time is not `H:MM AM|PM`.
pub fn parse_time(
  time_text: &str,
  weekday: &str,
  clock: &dyn Clock,
) -> Result<DateTime<Tz>, TimeError> {
  let day: Day = weekday
    .trim()
    .parse()
    .map_err(|_| TimeError::InvalidWeekday(weekday.to_string()))?;
  parse_time_on(time_text, day, clock.now())
}

/// As [`parse_time`], with the day already validated and `now` supplied.
pub fn parse_time_on(
  time_text: &str,
  day: Day,
  now: DateTime<Tz>,
) -> Result<DateTime<Tz>, TimeError> {
  let time = parse_clock_time(time_text)?;
  let date = day.date_in_week_of(now.date_naive());
  localize(now.timezone(), date, time)
}

/// Attach `tz` to a wall-clock date and time. Ambiguous times (DST fall-back)
/// take the earlier instant.
pub fn localize(
  tz: Tz,
  date: NaiveDate,
  time: NaiveTime,
) -> Result<DateTime<Tz>, TimeError> {
  date
    .and_time(time)
    .and_local_timezone(tz)
    .earliest()
    .ok_or_else(|| TimeError::NonexistentLocalTime {
      date: date.to_string(),
      time: time.format("%H:%M").to_string(),
    })
}

/// Render an instant as `H:MM AM/PM`, the same shape the parser accepts.
pub fn format_clock_time(at: &DateTime<Tz>) -> String {
  at.format("%-I:%M %p").to_string()
}

/// `"<now> - <now + window>"`, both as `H:MM AM/PM`.
pub fn time_range(now: &DateTime<Tz>, window: TimeDelta) -> String {
  format!(
    "{} - {}",
    format_clock_time(now),
    format_clock_time(&(*now + window))
  )
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Timelike};

  use super::*;
  use crate::clock::{CAMPUS_TZ, FixedClock};

  fn hm(text: &str) -> (u32, u32) {
    let t = parse_clock_time(text).unwrap();
    (t.hour(), t.minute())
  }

  fn monday_morning() -> FixedClock {
    FixedClock(CAMPUS_TZ.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap())
  }

  #[test]
  fn twelve_hour_conversion() {
    assert_eq!(hm("12:00 AM"), (0, 0));
    assert_eq!(hm("12:00 PM"), (12, 0));
    assert_eq!(hm("1:00 PM"), (13, 0));
    assert_eq!(hm("11:59 PM"), (23, 59));
    assert_eq!(hm("9:30 AM"), (9, 30));
    assert_eq!(hm("12:45 AM"), (0, 45));
  }

  #[test]
  fn accepts_format_variants() {
    assert_eq!(hm("09:05 AM"), (9, 5));
    assert_eq!(hm("2:15PM"), (14, 15));
    assert_eq!(hm("2:15 pm"), (14, 15));
    assert_eq!(hm("2:15 Pm"), (14, 15));
    assert_eq!(hm("  2:15 PM "), (14, 15));
  }

  #[test]
  fn rejects_malformed_times() {
    for bad in [
      "13:00 PM", "0:30 AM", "12:60 PM", "2:15", "14:15", "2:5 PM", "2.15 PM",
      "2:15  PM", "", "noon",
    ] {
      assert_eq!(
        parse_clock_time(bad),
        Err(TimeError::InvalidTimeFormat(bad.to_string())),
        "{bad:?} should be rejected"
      );
    }
  }

  #[test]
  fn anchors_to_requested_weekday() {
    let at = parse_time("2:15 PM", "Wednesday", &monday_morning()).unwrap();
    assert_eq!(
      at,
      CAMPUS_TZ.with_ymd_and_hms(2026, 10, 14, 14, 15, 0).unwrap()
    );
    assert_eq!(at.second(), 0);
  }

  #[test]
  fn earlier_weekday_stays_in_current_week() {
    let thursday =
      FixedClock(CAMPUS_TZ.with_ymd_and_hms(2026, 10, 15, 16, 0, 0).unwrap());
    let at = parse_time("8:00 AM", "Monday", &thursday).unwrap();
    assert_eq!(at, CAMPUS_TZ.with_ymd_and_hms(2026, 10, 12, 8, 0, 0).unwrap());
  }

  #[test]
  fn rejects_unknown_weekday() {
    assert_eq!(
      parse_time("2:15 PM", "Saturday", &monday_morning()),
      Err(TimeError::InvalidWeekday("Saturday".into()))
    );
    assert_eq!(
      parse_time("2:15 PM", "Funday", &monday_morning()),
      Err(TimeError::InvalidWeekday("Funday".into()))
    );
  }

  #[test]
  fn weekend_invocation_targets_upcoming_week() {
    let saturday =
      FixedClock(CAMPUS_TZ.with_ymd_and_hms(2026, 10, 17, 11, 0, 0).unwrap());
    let sunday =
      FixedClock(CAMPUS_TZ.with_ymd_and_hms(2026, 10, 18, 23, 30, 0).unwrap());
    let expected = CAMPUS_TZ.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap();
    assert_eq!(parse_time("10:00 AM", "Monday", &saturday).unwrap(), expected);
    assert_eq!(parse_time("10:00 AM", "Monday", &sunday).unwrap(), expected);
  }

  #[test]
  fn uses_campus_offset_not_utc() {
    // Melbourne is on daylight time (UTC+11) in mid October.
    let at = parse_time("9:00 AM", "Monday", &monday_morning()).unwrap();
    assert_eq!(
      at.with_timezone(&chrono::Utc),
      chrono::Utc.with_ymd_and_hms(2026, 10, 11, 22, 0, 0).unwrap()
    );
  }

  #[test]
  fn daylight_saving_gap_is_an_error() {
    // Egypt springs forward at midnight on the last Friday of April.
    let cairo = chrono_tz::Africa::Cairo;
    let clock =
      FixedClock(cairo.with_ymd_and_hms(2024, 4, 22, 10, 0, 0).unwrap());
    assert!(matches!(
      parse_time("12:30 AM", "Friday", &clock),
      Err(TimeError::NonexistentLocalTime { .. })
    ));
  }

  #[test]
  fn formats_twelve_hour_times() {
    let at = CAMPUS_TZ.with_ymd_and_hms(2026, 10, 12, 14, 5, 0).unwrap();
    assert_eq!(format_clock_time(&at), "2:05 PM");
    let midnight = CAMPUS_TZ.with_ymd_and_hms(2026, 10, 12, 0, 30, 0).unwrap();
    assert_eq!(format_clock_time(&midnight), "12:30 AM");
    assert_eq!(
      parse_clock_time(&format_clock_time(&at)).unwrap(),
      at.time()
    );
  }

  #[test]
  fn range_spans_window() {
    let now = CAMPUS_TZ.with_ymd_and_hms(2026, 10, 12, 11, 35, 0).unwrap();
    assert_eq!(
      time_range(&now, TimeDelta::minutes(30)),
      "11:35 AM - 12:05 PM"
    );
  }
}
