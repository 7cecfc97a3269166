//! Announcement text for one zone's upcoming classes.

use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::{record::ClassRecord, time::time_range, zone::Zone};

/// Forces an empty paragraph in Teams markdown, which collapses blank lines.
const BLANK: &str = "\u{3164}";

/// How the footer describes the default `0 5,35 8-20 * * Mon-Fri` schedule.
pub const DEFAULT_CADENCE: &str = "every 5th and 35th minute of the hour";

/// Full message body plus the one-line summary shown in notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
  pub text:    String,
  pub summary: String,
}

/// Build the announcement for `classes` in `zone` starting after `now`.
///
/// The footer says messages are sent `cadence` and shows `refreshed_at`, the
/// time the schedule was loaded.
pub fn compose(
  zone: Zone,
  classes: &[&ClassRecord],
  now: &DateTime<Tz>,
  window: TimeDelta,
  cadence: &str,
  refreshed_at: &DateTime<Tz>,
) -> Announcement {
  let plural = if classes.len() > 1 { "es" } else { "" };
  let zone_name = zone.display_name();
  let range = time_range(now, window);

  let mut text = format!(
    "## Upcoming BSL Class{plural}\n\n**Zone**: {zone_name}\n\n**Time**: \
     {range}\n\n{BLANK}\n\n"
  );
  for class in classes {
    text.push_str(&format!(
      "**{}** - {} - {}\n\n",
      class.time, class.location, class.subject
    ));
  }
  text.push_str(&format!(
    "{BLANK}\n\n*Messages are sent {cadence}, and announces classes \
     happening in the next {} minutes. No message will be sent if no classes \
     are scheduled.*\n\n*Excel data last updated: {}*",
    window.num_minutes(),
    format_timestamp(refreshed_at)
  ));

  let summary = format!(
    "{} {zone_name} BSL class{plural} {range}\n\n",
    classes.len()
  );

  Announcement { text, summary }
}

/// `16/10/2026, 1:05:00 PM`
pub fn format_timestamp(at: &DateTime<Tz>) -> String {
  at.format("%-d/%-m/%Y, %-I:%M:%S %p").to_string()
}
