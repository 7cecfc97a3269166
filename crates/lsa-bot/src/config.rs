//! Bot configuration: TOML file, `LSA_*` environment, CLI overrides.

use std::{
  collections::BTreeMap,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use anyhow::{Context as _, anyhow, bail};
use chrono::TimeDelta;
use chrono_tz::Tz;
use config::{ConfigBuilder, builder::DefaultState};
use cron::Schedule;
use lsa_core::{
  IngestSettings, Zone, ZoneRules, message::DEFAULT_CADENCE,
  record::DEFAULT_SITE_PREFIX,
};
use serde::Deserialize;
use tracing::warn;

use crate::announce::Channels;

// ─── Raw configuration ───────────────────────────────────────────────────────

/// Configuration as read from `lsa-bot.toml` and `LSA_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
  /// Timetable workbook to load at startup.
  pub excel_file:           Option<PathBuf>,
  #[serde(default = "default_timezone")]
  pub timezone:             String,
  /// Seconds-first cron expression evaluated in `timezone`.
  #[serde(default = "default_schedule")]
  pub schedule:             String,
  /// Footer wording for `schedule`, e.g. "every 10 minutes". Derived when
  /// unset.
  pub cadence:              Option<String>,
  #[serde(default = "default_window_minutes")]
  pub window_minutes:       i64,
  /// Zone identifier → webhook URL.
  #[serde(default)]
  pub channels:             BTreeMap<String, String>,
  /// Ordered zone rules replacing the built-in table when non-empty.
  #[serde(default)]
  pub zones:                Vec<ZoneRuleConfig>,
  #[serde(default = "default_site_prefix")]
  pub site_prefix:          String,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZoneRuleConfig {
  pub zone:    String,
  pub markers: Vec<String>,
}

fn default_timezone() -> String { "Australia/Melbourne".into() }
fn default_schedule() -> String { "0 5,35 8-20 * * Mon-Fri".into() }
fn default_window_minutes() -> i64 { 30 }
fn default_site_prefix() -> String { DEFAULT_SITE_PREFIX.into() }
fn default_request_timeout_secs() -> u64 { 30 }

/// Longest lookahead accepted. Queries only look at today's classes.
const MAX_WINDOW_MINUTES: i64 = 24 * 60;

// ─── Resolved settings ───────────────────────────────────────────────────────

/// Validated configuration, ready to wire up the bot.
#[derive(Debug, Clone)]
pub struct Settings {
  pub excel_file:      PathBuf,
  pub timezone:        Tz,
  pub schedule:        Schedule,
  pub cadence:         String,
  pub ingest:          IngestSettings,
  pub channels:        Channels,
  pub request_timeout: Duration,
}

impl BotConfig {
  /// Load from `path` (optional) and the environment; `excel_file` from the
  /// command line wins over both.
  pub fn load(path: &Path, excel_file: Option<PathBuf>) -> anyhow::Result<Self> {
    let builder = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("LSA")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      );
    Self::from_builder(builder, excel_file)
  }

  pub fn from_builder(
    builder: ConfigBuilder<DefaultState>,
    excel_file: Option<PathBuf>,
  ) -> anyhow::Result<Self> {
    builder
      .set_override_option(
        "excel_file",
        excel_file.map(|p| p.to_string_lossy().into_owned()),
      )?
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise BotConfig")
  }

  /// Fill gaps from the bare variables used by `.env` deployments:
  /// `EXCEL_FILE_NAME` and one variable per zone (`HASS_ARTS`, `STEM`, ...).
  pub fn with_legacy_env<F>(mut self, lookup: F) -> Self
  where
    F: Fn(&str) -> Option<String>,
  {
    if self.excel_file.is_none() {
      self.excel_file = lookup("EXCEL_FILE_NAME").map(PathBuf::from);
    }
    for zone in Zone::NOTIFIABLE {
      let configured = self
        .channels
        .keys()
        .any(|k| k.eq_ignore_ascii_case(zone.id()));
      if configured {
        continue;
      }
      if let Some(url) = lookup(&zone.env_key()).filter(|u| !u.trim().is_empty())
      {
        self.channels.insert(zone.id().to_string(), url);
      }
    }
    self
  }

  /// Validate and convert into [`Settings`].
  pub fn resolve(self) -> anyhow::Result<Settings> {
    let excel_file = self.excel_file.ok_or_else(|| {
      anyhow!("no spreadsheet configured (set excel_file, LSA_EXCEL_FILE or EXCEL_FILE_NAME)")
    })?;

    let timezone: Tz = self
      .timezone
      .parse()
      .map_err(|e| anyhow!("invalid timezone {:?}: {e}", self.timezone))?;

    let schedule = Schedule::from_str(&self.schedule)
      .with_context(|| format!("invalid cron schedule {:?}", self.schedule))?;

    if !(1..=MAX_WINDOW_MINUTES).contains(&self.window_minutes) {
      bail!(
        "window_minutes must be between 1 and {MAX_WINDOW_MINUTES}, got {}",
        self.window_minutes
      );
    }
    let Some(window) = TimeDelta::try_minutes(self.window_minutes) else {
      bail!("window_minutes out of range: {}", self.window_minutes);
    };

    let cadence = match self.cadence {
      Some(cadence) => cadence,
      None if self.schedule.trim() == default_schedule() => {
        DEFAULT_CADENCE.to_string()
      }
      None => format!("on the schedule `{}`", self.schedule.trim()),
    };

    let rules = if self.zones.is_empty() {
      ZoneRules::default()
    } else {
      ZoneRules::from_pairs(self.zones.into_iter().map(|r| (r.zone, r.markers)))
        .context("invalid zone rules")?
    };

    let mut channels = Channels::default();
    for (key, url) in self.channels {
      let zone: Zone = key.parse().context("invalid channels entry")?;
      if !zone.is_notifiable() {
        warn!(zone = %zone, "ignoring destination for catch-all zone");
        continue;
      }
      if url.trim().is_empty() {
        continue;
      }
      channels.insert(zone, url);
    }

    Ok(Settings {
      excel_file,
      timezone,
      schedule,
      cadence,
      ingest: IngestSettings {
        rules,
        site_prefix: self.site_prefix,
        window,
      },
      channels,
      request_timeout: Duration::from_secs(self.request_timeout_secs),
    })
  }
}
