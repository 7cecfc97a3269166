//! Source of "now" in the campus timezone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// The campus timezone used when nothing else is configured.
pub const CAMPUS_TZ: Tz = chrono_tz::Australia::Melbourne;

/// Supplies the current instant, already converted into the campus timezone.
///
/// Every time computation in this crate reads the clock at the point of use;
/// nothing caches "today" or "this week".
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Tz>;

  fn timezone(&self) -> Tz { self.now().timezone() }
}

/// The host's wall clock, viewed from a fixed timezone regardless of the
/// host's own locale.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
  tz: Tz,
}

impl SystemClock {
  pub fn new(tz: Tz) -> Self { Self { tz } }
}

impl Default for SystemClock {
  fn default() -> Self { Self::new(CAMPUS_TZ) }
}

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Tz> { Utc::now().with_timezone(&self.tz) }

  fn timezone(&self) -> Tz { self.tz }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Tz> { self.0 }
}
