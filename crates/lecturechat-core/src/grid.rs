//! Day-of-week layout of a month.

use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};

use crate::month::CalendarMonth;

/// One week row; `None` cells pad the first and last weeks.
pub type WeekRow = [Option<u32>; 7];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  pub month:          CalendarMonth,
  pub week_start:     Weekday,
  pub leading_blanks: u32,
  pub weeks:          Vec<WeekRow>
}

impl MonthGrid {
  #[must_use]
  pub fn new(
    month: CalendarMonth,
    week_start: Weekday
  ) -> Self {
    let leading_blanks =
      days_after_week_start(
        month.first_day().weekday(),
        week_start
      );
    let days = month.days();

    let mut weeks = Vec::new();
    let mut row: WeekRow = [None; 7];
    let mut col = leading_blanks as usize;

    for day in 1..=days {
      row[col] = Some(day);
      col += 1;
      if col == 7 {
        weeks.push(row);
        row = [None; 7];
        col = 0;
      }
    }
    if col > 0 {
      weeks.push(row);
    }

    tracing::trace!(
      month = %month,
      leading_blanks,
      rows = weeks.len(),
      "built month grid"
    );

    Self {
      month,
      week_start,
      leading_blanks,
      weeks
    }
  }

  /// The weekday shown in each column.
  #[must_use]
  pub fn columns(&self) -> [Weekday; 7] {
    week_columns(self.week_start)
  }

  #[must_use]
  pub fn cell_date(
    &self,
    row: usize,
    col: usize
  ) -> Option<NaiveDate> {
    let day = (*self
      .weeks
      .get(row)?
      .get(col)?)?;
    NaiveDate::from_ymd_opt(
      self.month.year(),
      self.month.month(),
      day
    )
  }
}

/// Weekdays in display order, starting at `week_start`.
#[must_use]
pub fn week_columns(
  week_start: Weekday
) -> [Weekday; 7] {
  let mut day = week_start;
  std::array::from_fn(|_| {
    let current = day;
    day = day.succ();
    current
  })
}

/// Days between `week_start` and `day` going forward, `0..=6`.
#[must_use]
pub fn days_after_week_start(
  day: Weekday,
  week_start: Weekday
) -> u32 {
  let day_idx =
    day.num_days_from_monday();
  let start_idx =
    week_start.num_days_from_monday();
  (7 + day_idx - start_idx) % 7
}

#[cfg(test)]
mod tests {
  use chrono::Weekday;

  use super::{
    MonthGrid,
    days_after_week_start
  };
  use crate::month::CalendarMonth;

  fn month(
    year: i32,
    month0: u32
  ) -> CalendarMonth {
    CalendarMonth::new(year, month0)
      .expect("valid month")
  }

  #[test]
  fn september_2020_sunday_start() {
    let grid = MonthGrid::new(
      month(2020, 8),
      Weekday::Sun
    );
    assert_eq!(grid.leading_blanks, 2);
    assert_eq!(grid.weeks.len(), 5);
    assert_eq!(
      grid.weeks[0],
      [
        None,
        None,
        Some(1),
        Some(2),
        Some(3),
        Some(4),
        Some(5)
      ]
    );
    assert_eq!(
      grid.weeks[4],
      [
        Some(27),
        Some(28),
        Some(29),
        Some(30),
        None,
        None,
        None
      ]
    );
  }

  #[test]
  fn september_2020_monday_start() {
    let grid = MonthGrid::new(
      month(2020, 8),
      Weekday::Mon
    );
    assert_eq!(grid.leading_blanks, 1);
    assert_eq!(grid.weeks.len(), 5);
    assert_eq!(
      grid.columns()[0],
      Weekday::Mon
    );
    assert_eq!(
      grid.columns()[6],
      Weekday::Sun
    );
  }

  #[test]
  fn february_2015_fits_four_rows() {
    // Starts on a Sunday with 28 days.
    let grid = MonthGrid::new(
      month(2015, 1),
      Weekday::Sun
    );
    assert_eq!(grid.leading_blanks, 0);
    assert_eq!(grid.weeks.len(), 4);
    assert_eq!(
      grid.weeks[3][6],
      Some(28)
    );
  }

  #[test]
  fn cell_dates_resolve() {
    let grid = MonthGrid::new(
      month(2020, 8),
      Weekday::Sun
    );
    assert_eq!(grid.cell_date(0, 0), None);
    assert_eq!(
      grid
        .cell_date(0, 2)
        .map(|d| d.to_string()),
      Some("2020-09-01".to_string())
    );
    assert_eq!(grid.cell_date(9, 0), None);
  }

  #[test]
  fn week_start_offsets() {
    assert_eq!(
      days_after_week_start(
        Weekday::Sun,
        Weekday::Mon
      ),
      6
    );
    assert_eq!(
      days_after_week_start(
        Weekday::Sun,
        Weekday::Sun
      ),
      0
    );
  }
}
