//! Whole-workbook loading.

use std::{
  collections::HashMap,
  io::{Read, Seek},
  path::Path,
};

use calamine::{Reader, Sheets, open_workbook_auto};
use lsa_core::{Day, RawRow, SheetSource};
use tracing::{debug, info, warn};

use crate::{
  cell::table_rows,
  error::{Error, Result},
};

/// The weekday sheets of a timetable workbook, read eagerly into memory.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
  sheets: HashMap<Day, Vec<RawRow>>,
}

impl Workbook {
  /// Open the workbook at `path` and read every weekday sheet it contains.
  ///
  /// Fails only when the file itself cannot be opened. A weekday sheet that
  /// cannot be read is logged and treated as absent.
  pub fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let mut book = open_workbook_auto(path).map_err(|e| {
      Error::ResourceUnavailable {
        path:   path.to_path_buf(),
        reason: e.to_string(),
      }
    })?;
    info!(path = %path.display(), "opened spreadsheet");
    Ok(Self::read_all(&mut book))
  }

  fn read_all<RS: Read + Seek>(book: &mut Sheets<RS>) -> Self {
    let names = book.sheet_names();
    let mut sheets = HashMap::new();

    for day in Day::all() {
      let Some(name) = find_sheet(&names, day) else {
        debug!(day = %day, "workbook has no sheet for day");
        continue;
      };
      match read_sheet(book, name) {
        Ok(rows) => {
          debug!(day = %day, sheet = name, rows = rows.len(), "read sheet");
          sheets.insert(day, rows);
        }
        Err(err) => warn!(day = %day, "skipping sheet: {err}"),
      }
    }

    Self { sheets }
  }

  /// Build a workbook from already-tabulated sheets.
  pub fn from_sheets(sheets: HashMap<Day, Vec<RawRow>>) -> Self {
    Self { sheets }
  }

  /// Weekdays that have a sheet, in week order.
  pub fn days(&self) -> Vec<Day> {
    Day::all().filter(|d| self.sheets.contains_key(d)).collect()
  }
}

impl SheetSource for Workbook {
  fn sheet(&self, day: Day) -> Option<Vec<RawRow>> {
    self.sheets.get(&day).cloned()
  }
}

fn read_sheet<RS: Read + Seek>(
  book: &mut Sheets<RS>,
  name: &str,
) -> Result<Vec<RawRow>> {
  let range = book.worksheet_range(name).map_err(|e| Error::Sheet {
    sheet:  name.to_string(),
    reason: e.to_string(),
  })?;
  Ok(table_rows(range.rows()))
}

/// Sheet named after `day`: an exact match first, then ignoring case and
/// surrounding whitespace.
fn find_sheet(names: &[String], day: Day) -> Option<&str> {
  names
    .iter()
    .find(|n| n.as_str() == day.name())
    .or_else(|| {
      names
        .iter()
        .find(|n| n.trim().eq_ignore_ascii_case(day.name()))
    })
    .map(String::as_str)
}
