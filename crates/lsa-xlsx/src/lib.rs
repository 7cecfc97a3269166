//! Spreadsheet source for the LSA schedule.
//!
//! Opens the weekly timetable workbook once, reads each weekday sheet into
//! [`lsa_core::RawRow`]s keyed by the header row, and serves them through
//! [`lsa_core::SheetSource`]. Supports every format `calamine` reads
//! (xlsx, xlsm, xlsb, xls, ods).

mod cell;
mod workbook;

pub mod error;

pub use error::{Error, Result};
pub use workbook::Workbook;
