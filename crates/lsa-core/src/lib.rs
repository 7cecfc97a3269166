//! Schedule ingestion and time-windowed query engine for the LSA bot.
//!
//! Turns weekday sheets of raw spreadsheet rows into an immutable
//! [`ScheduleIndex`] keyed by weekday and campus [`Zone`], and answers "which
//! classes in this zone start within the lookahead window". Pure synchronous;
//! no file, HTTP or runtime dependencies.

pub mod clock;
pub mod day;
pub mod error;
pub mod message;
pub mod record;
pub mod schedule;
pub mod time;
pub mod zone;

pub use clock::{Clock, FixedClock, SystemClock};
pub use day::Day;
pub use error::{Error, Result, RowError, TimeError, ZoneUnresolved};
pub use record::{ClassRecord, RawRow};
pub use schedule::{
  IngestReport, IngestSettings, MemorySource, ScheduleIndex, SheetSource,
};
pub use zone::{Zone, ZoneRule, ZoneRules};
