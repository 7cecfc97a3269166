//! Cron-driven trigger for notification passes.

use std::future::Future;

use chrono::DateTime;
use chrono_tz::Tz;
use cron::Schedule;
use lsa_core::Clock;
use tracing::{debug, info, warn};

/// The first tick of `schedule` strictly after `after`.
pub fn next_tick(schedule: &Schedule, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
  schedule.after(after).next()
}

/// Call `on_tick` at every tick of `schedule` until `shutdown` resolves.
///
/// Ticks are computed in the clock's timezone. `on_tick` must not block; it
/// is expected to hand work off to spawned tasks.
pub async fn run<F, S>(schedule: &Schedule, clock: &dyn Clock, mut on_tick: F, shutdown: S)
where
  F: FnMut(),
  S: Future<Output = ()>,
{
  tokio::pin!(shutdown);
  let mut last: Option<DateTime<Tz>> = None;

  loop {
    let now = clock.now();
    // Never fire the same tick twice if the wall clock lags the timer.
    let from = last.map_or(now, |l| l.max(now));
    let Some(next) = next_tick(schedule, &from) else {
      warn!("schedule has no upcoming ticks; stopping");
      return;
    };
    let wait = (next - now).to_std().unwrap_or_default();
    debug!(next = %next, "waiting for next tick");

    tokio::select! {
      _ = tokio::time::sleep(wait) => {
        last = Some(next);
        on_tick();
      }
      _ = &mut shutdown => {
        info!("shutting down");
        return;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use chrono::TimeZone;
  use lsa_core::{FixedClock, clock::CAMPUS_TZ};
  use tokio::sync::oneshot;

  use super::*;

  fn at(d: u32, h: u32, m: u32) -> DateTime<Tz> {
    CAMPUS_TZ.with_ymd_and_hms(2026, 10, d, h, m, 0).unwrap()
  }

  fn default_schedule() -> Schedule {
    Schedule::from_str("0 5,35 8-20 * * Mon-Fri").unwrap()
  }

  #[test]
  fn ticks_at_five_and_thirty_five_past() {
    let s = default_schedule();
    assert_eq!(next_tick(&s, &at(12, 8, 0)), Some(at(12, 8, 5)));
    assert_eq!(next_tick(&s, &at(12, 8, 5)), Some(at(12, 8, 35)));
    assert_eq!(next_tick(&s, &at(12, 14, 40)), Some(at(12, 15, 5)));
  }

  #[test]
  fn no_ticks_outside_teaching_hours() {
    let s = default_schedule();
    // After the last tick on Monday evening, the next is Tuesday 08:05.
    assert_eq!(next_tick(&s, &at(12, 20, 35)), Some(at(13, 8, 5)));
    // Friday evening skips the weekend.
    assert_eq!(next_tick(&s, &at(16, 20, 40)), Some(at(19, 8, 5)));
    // Saturday morning.
    assert_eq!(next_tick(&s, &at(17, 9, 0)), Some(at(19, 8, 5)));
  }

  #[tokio::test(start_paused = true)]
  async fn fires_once_per_tick_until_shutdown() {
    let schedule = default_schedule();
    let clock = FixedClock(at(12, 8, 0));
    let (tx, rx) = oneshot::channel::<()>();
    let mut tx = Some(tx);
    let mut ticks = 0;

    run(
      &schedule,
      &clock,
      || {
        ticks += 1;
        if ticks == 2
          && let Some(tx) = tx.take()
        {
          tx.send(()).ok();
        }
      },
      async {
        rx.await.ok();
      },
    )
    .await;

    assert_eq!(ticks, 2);
  }
}
