//! Calendar arithmetic and event ordering for the lecturechat calendar.
//!
//! The core is [`month`] (month paging, days in a month) and [`event`]
//! (start-date ordering). The remaining modules turn backend event
//! payloads into per-day agendas and month grids, and drive the
//! `lecturecal` command line.

pub mod agenda;
pub mod cli;
pub mod commands;
pub mod config;
pub mod datetime;
pub mod event;
pub mod grid;
pub mod labels;
pub mod month;
pub mod render;
pub mod wire;

use std::ffi::OsString;

use clap::Parser;
use tracing::{
  debug,
  info
};

pub use event::{
  Event,
  EventId,
  compare_events_by_start_date,
  sort_events_by_start
};
pub use month::{
  CalendarMonth,
  date_of_the_next_month,
  date_of_the_previous_month,
  number_of_days_in_month
};

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting lecturecal"
  );

  let mut cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .overrides
      .into_iter()
      .map(|set| (set.key, set.value))
  )?;
  debug!(
    timezone = %cfg.timezone,
    week_start = %cfg.calendar.week_start,
    files = ?cfg.loaded_files,
    "resolved config"
  );

  let renderer =
    render::Renderer::new(&cfg);
  let today =
    datetime::today_in(&cfg.time_zone());

  commands::dispatch(
    std::io::stdout().lock(),
    &cfg,
    &renderer,
    &cli.command,
    today
  )?;

  info!("done");
  Ok(())
}
