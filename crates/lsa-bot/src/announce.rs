//! The notification pass: query every zone, announce what is coming up.

use std::{collections::BTreeMap, sync::Arc};

use chrono::DateTime;
use chrono_tz::Tz;
use lsa_core::{
  Clock, Error, ScheduleIndex, Zone,
  message::{DEFAULT_CADENCE, compose},
  time::time_range,
};
use lsa_teams::Notifier;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Zone → outbound destination (webhook URL).
#[derive(Debug, Clone, Default)]
pub struct Channels {
  destinations: BTreeMap<Zone, String>,
}

impl Channels {
  pub fn insert(&mut self, zone: Zone, destination: impl Into<String>) {
    self.destinations.insert(zone, destination.into());
  }

  pub fn destination(&self, zone: Zone) -> Result<&str, Error> {
    self
      .destinations
      .get(&zone)
      .map(String::as_str)
      .ok_or(Error::MissingDestination(zone))
  }

  pub fn is_empty(&self) -> bool { self.destinations.is_empty() }

  pub fn zones(&self) -> impl Iterator<Item = Zone> + '_ {
    self.destinations.keys().copied()
  }
}

/// Everything a notification pass reads. Built once at startup.
pub struct Announcer<N: Notifier> {
  index:        Arc<ScheduleIndex>,
  notifier:     Arc<N>,
  channels:     Arc<Channels>,
  clock:        Arc<dyn Clock>,
  /// When the spreadsheet was loaded; shown in every message footer.
  refreshed_at: DateTime<Tz>,
  /// How often passes run, as worded in the footer.
  cadence:      String,
}

impl<N: Notifier> Announcer<N> {
  pub fn new(
    index: Arc<ScheduleIndex>,
    notifier: Arc<N>,
    channels: Arc<Channels>,
    clock: Arc<dyn Clock>,
    refreshed_at: DateTime<Tz>,
  ) -> Self {
    Self {
      index,
      notifier,
      channels,
      clock,
      refreshed_at,
      cadence: DEFAULT_CADENCE.to_string(),
    }
  }

  /// Replace the footer's description of the trigger schedule.
  pub fn with_cadence(mut self, cadence: impl Into<String>) -> Self {
    self.cadence = cadence.into();
    self
  }

  /// Run one pass over [`Zone::NOTIFIABLE`], in order.
  ///
  /// Zones without a destination are skipped for this pass. Each message is
  /// delivered on its own task; the returned handles may be awaited or simply
  /// dropped. A failed delivery is logged and affects no other zone.
  pub fn run_pass(&self) -> Vec<JoinHandle<()>> {
    let mut deliveries = Vec::new();

    for zone in Zone::NOTIFIABLE {
      let destination = match self.channels.destination(zone) {
        Ok(d) => d.to_string(),
        Err(err) => {
          warn!(zone = %zone, "{err}; make sure the link is configured");
          continue;
        }
      };

      let now = self.clock.now();
      let classes = self.index.upcoming_at(zone, now);
      if classes.is_empty() {
        continue;
      }

      let window = self.index.window();
      info!(
        zone = %zone,
        count = classes.len(),
        "announcing classes coming up from {}",
        time_range(&now, window)
      );
      let message = compose(
        zone,
        &classes,
        &now,
        window,
        &self.cadence,
        &self.refreshed_at,
      );

      let notifier = Arc::clone(&self.notifier);
      deliveries.push(tokio::spawn(async move {
        if let Err(err) = notifier
          .send(&destination, &message.text, &message.summary)
          .await
        {
          error!(zone = %zone, "failed to deliver announcement: {err}");
        }
      }));
    }

    deliveries
  }
}
