//! lsa-bot binary.
//!
//! Reads `lsa-bot.toml` (or the path given with `--config`), `LSA_*` and
//! legacy `.env` variables, loads the timetable workbook, and announces
//! upcoming classes on the configured cron schedule.
//!
//! ```
//! lsa-bot --excel-file week.xlsx
//! lsa-bot --config /etc/lsa-bot.toml --once
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use lsa_bot::{announce::Announcer, config::BotConfig, trigger};
use lsa_core::{Clock, ScheduleIndex, SystemClock};
use lsa_teams::TeamsClient;
use lsa_xlsx::Workbook;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Posts upcoming BSL classes to Teams")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "lsa-bot.toml")]
  config: PathBuf,

  /// Timetable workbook; overrides the configuration file.
  #[arg(short, long)]
  excel_file: Option<PathBuf>,

  /// Run a single notification pass now and exit.
  #[arg(long)]
  once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // A missing .env is fine.
  dotenvy::dotenv().ok();

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  info!("Starting LSA bot");

  let settings = BotConfig::load(&cli.config, cli.excel_file)?
    .with_legacy_env(|key| std::env::var(key).ok())
    .resolve()?;

  if settings.channels.is_empty() {
    tracing::warn!("no zone destinations configured; nothing will be sent");
  } else {
    let zones: Vec<_> = settings.channels.zones().map(|z| z.id()).collect();
    info!(?zones, "configured destinations");
  }

  let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(settings.timezone));

  let workbook = Workbook::open(&settings.excel_file).with_context(|| {
    format!("failed to load timetable {}", settings.excel_file.display())
  })?;
  let refreshed_at = clock.now();

  let (index, report) =
    ScheduleIndex::build(&workbook, &settings.ingest, &*clock);
  info!(
    days = ?report.days_loaded,
    missing_days = ?report.days_missing,
    rows = report.rows_read,
    indexed = report.indexed,
    dropped = report.dropped(),
    "built schedule index"
  );

  let notifier = TeamsClient::new(settings.request_timeout)
    .context("failed to build HTTP client")?;

  let announcer = Announcer::new(
    Arc::new(index),
    Arc::new(notifier),
    Arc::new(settings.channels),
    Arc::clone(&clock),
    refreshed_at,
  )
  .with_cadence(settings.cadence);
  info!("LSA bot is ready");

  if cli.once {
    for delivery in announcer.run_pass() {
      delivery.await.context("delivery task panicked")?;
    }
    return Ok(());
  }

  trigger::run(
    &settings.schedule,
    &*clock,
    || {
      // Deliveries run detached; the next tick does not wait for them.
      drop(announcer.run_pass());
    },
    async {
      tokio::signal::ctrl_c().await.ok();
    },
  )
  .await;

  Ok(())
}
