use std::io::{self, IsTerminal, Write};

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::agenda::EventsByDay;
use crate::config::Config;
use crate::event::Event;
use crate::grid::MonthGrid;
use crate::labels::{month_title, short_format, weekday_labels};

const CELL_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            color: cfg.color && io::stdout().is_terminal(),
        }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    /// Writes the grid with a `*` after each day that has events. `today`
    /// is highlighted when colour is on.
    #[tracing::instrument(skip_all, fields(month = %grid.month))]
    pub fn write_month<W: Write>(
        &self,
        mut out: W,
        grid: &MonthGrid,
        agenda: &EventsByDay,
        today: Option<NaiveDate>,
    ) -> anyhow::Result<()> {
        let title = month_title(grid.month);
        let total_width = CELL_WIDTH * 7;
        let pad = total_width.saturating_sub(UnicodeWidthStr::width(title.as_str())) / 2;
        writeln!(out, "{}{}", " ".repeat(pad), title)?;

        for label in weekday_labels(grid.week_start) {
            let short: String = label.chars().take(2).collect();
            write!(out, "{short:>3} ")?;
        }
        writeln!(out)?;

        for (row_idx, row) in grid.weeks.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let Some(day) = cell else {
                    write!(out, "{}", " ".repeat(CELL_WIDTH))?;
                    continue;
                };
                let date = grid.cell_date(row_idx, col_idx);
                let has_events = date.is_some_and(|d| agenda.has_events(d));
                let marker = if has_events { '*' } else { ' ' };
                let mut text = format!("{day:>3}");
                if has_events {
                    text = self.paint(&text, "33");
                }
                if today.is_some() && date == today {
                    text = self.paint(&text, "7");
                }
                write!(out, "{text}{marker}")?;
            }
            writeln!(out)?;
        }

        let count = agenda.within(grid.month).len();
        writeln!(
            out,
            "{count} event{} this month",
            if count == 1 { "" } else { "s" }
        )?;
        Ok(())
    }

    #[tracing::instrument(skip(self, out, events))]
    pub fn write_agenda<W: Write>(
        &self,
        mut out: W,
        day: NaiveDate,
        today: NaiveDate,
        events: &[Event],
    ) -> anyhow::Result<()> {
        if day == today {
            writeln!(out, "Your events today")?;
        } else {
            writeln!(out, "Your events on {}", short_format(day))?;
        }

        if events.is_empty() {
            writeln!(out, "No events yet.")?;
            return Ok(());
        }

        let rows: Vec<[String; 4]> = events
            .iter()
            .map(|event| {
                let end = if event.end().date() == day {
                    event.end().format("%H:%M")
                } else {
                    event.end().format("%Y-%m-%d %H:%M")
                };
                [
                    event.id().to_string(),
                    event.start().format("%H:%M").to_string(),
                    end.to_string(),
                    event.title().to_string(),
                ]
            })
            .collect();

        self.write_agenda_rows(&mut out, &rows)
    }

    /// Aligned columns under a dashed rule. Cells are measured before the ID
    /// column is painted, so escape codes never count toward widths.
    fn write_agenda_rows<W: Write>(&self, mut out: W, rows: &[[String; 4]]) -> anyhow::Result<()> {
        let mut widths = AGENDA_HEADERS.map(|header| header.width());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.width());
            }
        }

        let header = AGENDA_HEADERS.map(str::to_string);
        writeln!(out, "{}", aligned(&header, &widths, |cell| cell.to_string()))?;
        writeln!(out, "{}", widths.map(|w| "-".repeat(w)).join(" "))?;
        for row in rows {
            let line = aligned(row, &widths, |cell| self.paint(cell, "33"));
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

const AGENDA_HEADERS: [&str; 4] = ["ID", "Start", "End", "Title"];

/// Joins one table line, padding every cell but the last to its column
/// width. `first` styles the leading cell after it has been measured.
fn aligned(cells: &[String; 4], widths: &[usize; 4], first: impl Fn(&str) -> String) -> String {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        let text = if idx == 0 { first(cell) } else { cell.clone() };
        line.push_str(&text);
        if idx + 1 < cells.len() {
            let pad = width.saturating_sub(cell.width());
            line.push_str(&" ".repeat(pad + 1));
        }
    }
    line
}
