//! Cell rendering and header-keyed row extraction.

use std::collections::HashSet;

use calamine::Data;
use lsa_core::RawRow;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Render a cell as the text a person sees in the sheet. `None` for empty
/// and error cells, so they read as absent columns.
pub(crate) fn render_cell(cell: &Data) -> Option<String> {
  let text = match cell {
    Data::Empty | Data::Error(_) => return None,
    Data::String(s) => s.trim().to_string(),
    Data::Int(i) => i.to_string(),
    Data::Float(f) => f.to_string(),
    Data::Bool(b) => b.to_string(),
    Data::DateTime(dt) => excel_time_text(dt.as_f64()),
    Data::DateTimeIso(s) => iso_time_text(s).unwrap_or_else(|| s.clone()),
    Data::DurationIso(s) => s.clone(),
  };
  (!text.is_empty()).then_some(text)
}

/// Format the time-of-day part of an Excel serial date as `H:MM AM/PM`.
///
/// Seconds are dropped the way Excel displays them, so `23:59:40` stays on
/// the same day. Rounding to the second first absorbs float noise such as
/// `14:20` being stored as `14:19:59.99..`.
pub(crate) fn excel_time_text(serial: f64) -> String {
  let seconds = (serial.rem_euclid(1.0) * SECONDS_PER_DAY).round() as u32;
  let minutes = seconds.min(86_399) / 60;
  twelve_hour(minutes / 60, minutes % 60)
}

/// `HH:MM[:SS]`, optionally after a `YYYY-MM-DDT` date part.
fn iso_time_text(s: &str) -> Option<String> {
  let time = s.rsplit('T').next()?;
  let mut parts = time.split(':');
  let hour: u32 = parts.next()?.parse().ok()?;
  let minute: u32 = parts.next()?.parse().ok()?;
  (hour < 24 && minute < 60).then(|| twelve_hour(hour, minute))
}

fn twelve_hour(hour: u32, minute: u32) -> String {
  let meridiem = if hour < 12 { "AM" } else { "PM" };
  let hour = match hour % 12 {
    0 => 12,
    h => h,
  };
  format!("{hour}:{minute:02} {meridiem}")
}

/// Turn sheet rows into records keyed by the first non-empty row's text.
///
/// Blank rows are skipped; cells under a blank header are ignored.
pub(crate) fn table_rows<'a, I>(rows: I) -> Vec<RawRow>
where
  I: IntoIterator<Item = &'a [Data]>,
{
  let mut rows = rows
    .into_iter()
    .filter(|cells| cells.iter().any(|c| render_cell(c).is_some()));

  let Some(header) = rows.next() else {
    return Vec::new();
  };
  let header = unique_headers(header.iter().map(render_cell));

  rows
    .map(|cells| {
      header
        .iter()
        .zip(cells)
        .filter_map(|(name, cell)| Some((name.clone()?, render_cell(cell)?)))
        .collect::<RawRow>()
    })
    .collect()
}

/// Rename repeated header texts to `Name_1`, `Name_2`, ... so the first
/// column with a given header keeps its plain name.
fn unique_headers<I>(names: I) -> Vec<Option<String>>
where
  I: IntoIterator<Item = Option<String>>,
{
  let mut seen = HashSet::new();
  names
    .into_iter()
    .map(|name| {
      let name = name?;
      let mut unique = name.clone();
      let mut n = 0;
      while !seen.insert(unique.clone()) {
        n += 1;
        unique = format!("{name}_{n}");
      }
      Some(unique)
    })
    .collect()
}
