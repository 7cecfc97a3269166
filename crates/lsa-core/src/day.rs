//! The five teaching days of a week.

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A teaching day. Sheets in the schedule workbook are named after these.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Display,
  AsRefStr,
  EnumIter,
  EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Day {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
}

impl Day {
  /// Offset from Monday, `0..=4`.
  pub fn index(self) -> usize { self as usize }

  pub fn name(self) -> &'static str {
    match self {
      Day::Monday => "Monday",
      Day::Tuesday => "Tuesday",
      Day::Wednesday => "Wednesday",
      Day::Thursday => "Thursday",
      Day::Friday => "Friday",
    }
  }

  pub fn all() -> impl Iterator<Item = Day> { Day::iter() }

  /// `None` for Saturday and Sunday.
  pub fn from_weekday(weekday: Weekday) -> Option<Day> {
    match weekday {
      Weekday::Mon => Some(Day::Monday),
      Weekday::Tue => Some(Day::Tuesday),
      Weekday::Wed => Some(Day::Wednesday),
      Weekday::Thu => Some(Day::Thursday),
      Weekday::Fri => Some(Day::Friday),
      Weekday::Sat | Weekday::Sun => None,
    }
  }

  /// The teaching day that "today" refers to.
  ///
  /// Weekends count as the Monday of the upcoming week, so a weekend start
  /// loads the whole next week and queries look at Monday.
  pub fn current(today: NaiveDate) -> Day {
    Day::from_weekday(today.weekday()).unwrap_or(Day::Monday)
  }

  /// Calendar date of this day within the teaching week containing `today`.
  ///
  /// Monday to Friday resolve within the same Monday-based week; Saturday
  /// and Sunday resolve into the following week.
  pub fn date_in_week_of(self, today: NaiveDate) -> NaiveDate {
    let from_monday = i64::from(today.weekday().num_days_from_monday());
    let monday = if from_monday >= 5 {
      today + TimeDelta::days(7 - from_monday)
    } else {
      today - TimeDelta::days(from_monday)
    };
    monday + TimeDelta::days(self.index() as i64)
  }
}
