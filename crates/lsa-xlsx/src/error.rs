//! Error type for `lsa-xlsx`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The workbook could not be opened at all. Fatal to startup.
  #[error("cannot open spreadsheet {path:?}: {reason}")]
  ResourceUnavailable { path: PathBuf, reason: String },

  #[error("cannot read sheet {sheet:?}: {reason}")]
  Sheet { sheet: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
