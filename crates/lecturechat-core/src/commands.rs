use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::agenda::EventsByDay;
use crate::cli::Command;
use crate::config::Config;
use crate::datetime::{month_window, parse_day_expr, parse_month_expr};
use crate::event::Event;
use crate::grid::MonthGrid;
use crate::labels::month_title;
use crate::render::Renderer;
use crate::wire::load_events;

/// Runs one subcommand, writing its output to `out`. `today` anchors the
/// relative month and day expressions.
#[tracing::instrument(skip(out, cfg, renderer))]
pub fn dispatch<W: Write>(
    mut out: W,
    cfg: &Config,
    renderer: &Renderer,
    command: &Command,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let tz = cfg.time_zone();
    debug!(timezone = %tz, %today, "dispatching command");

    match command {
        Command::Month { month, events } => {
            let month = parse_month_expr(month, today)?;
            let agenda = match events {
                Some(path) => EventsByDay::from_events(read_events(path, &tz)?),
                None => EventsByDay::default(),
            };
            let grid = MonthGrid::new(month, cfg.week_start());
            renderer.write_month(&mut out, &grid, &agenda, Some(today))
        }
        Command::Next { month } => {
            let next = parse_month_expr(month, today)?
                .checked_next()
                .ok_or_else(|| anyhow!("no month after {month}"))?;
            writeln!(out, "{next}\t{}", month_title(next))?;
            Ok(())
        }
        Command::Prev { month } => {
            let previous = parse_month_expr(month, today)?
                .checked_previous()
                .ok_or_else(|| anyhow!("no month before {month}"))?;
            writeln!(out, "{previous}\t{}", month_title(previous))?;
            Ok(())
        }
        Command::Days { month } => {
            let month = parse_month_expr(month, today)?;
            writeln!(out, "{}", month.days())?;
            Ok(())
        }
        Command::Agenda { day, events } => {
            let day = parse_day_expr(day, today)?;
            let agenda = EventsByDay::from_events(read_events(events, &tz)?);
            info!(%day, count = agenda.events_on(day).len(), "agenda for day");
            renderer.write_agenda(&mut out, day, today, agenda.events_on(day))
        }
        Command::Window { month } => {
            let month = parse_month_expr(month, today)?;
            let window = month_window(month, &tz)?;
            writeln!(out, "beginning-date={}", window.beginning_millis())?;
            writeln!(out, "ending-date={}", window.ending_millis())?;
            Ok(())
        }
    }
}

fn read_events(path: &Path, tz: &Tz) -> anyhow::Result<Vec<Event>> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read events from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read events file {}", path.display()))?
    };

    load_events(&raw, tz).with_context(|| format!("invalid events in {}", path.display()))
}
