//! Month paging and days-in-month arithmetic.
//!
//! Months are zero-based throughout this module: January is `0` and
//! December is `11`, matching `chrono::Datelike::month0`.

use std::fmt;

use chrono::{
  Datelike,
  NaiveDate
};

/// A calendar month identified by year and zero-based month index.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash
)]
pub struct CalendarMonth {
  year:   i32,
  month0: u32
}

impl CalendarMonth {
  /// Builds a month from a year and a zero-based month index.
  ///
  /// Returns `None` when `month0` is outside `0..=11` or the month lies
  /// outside the range `chrono` can represent.
  #[must_use]
  pub fn new(
    year: i32,
    month0: u32
  ) -> Option<Self> {
    if month0 > 11 {
      return None;
    }
    NaiveDate::from_ymd_opt(
      year,
      month0 + 1,
      1
    )?;
    Some(Self { year, month0 })
  }

  /// The month containing `date`. Day and time components are ignored.
  #[must_use]
  pub fn of<D: Datelike>(
    date: &D
  ) -> Self {
    Self {
      year:   date.year(),
      month0: date.month0()
    }
  }

  #[must_use]
  pub fn year(self) -> i32 {
    self.year
  }

  #[must_use]
  pub fn month0(self) -> u32 {
    self.month0
  }

  /// One-based month number, `1..=12`.
  #[must_use]
  pub fn month(self) -> u32 {
    self.month0 + 1
  }

  /// The earliest month `chrono` can represent.
  #[must_use]
  pub fn first_representable() -> Self {
    Self::of(&NaiveDate::MIN)
  }

  /// The latest month `chrono` can represent.
  #[must_use]
  pub fn last_representable() -> Self {
    Self::of(&NaiveDate::MAX)
  }

  /// The following month, staying put at the last representable one.
  #[must_use]
  pub fn next(self) -> Self {
    self
      .checked_next()
      .unwrap_or(self)
  }

  /// The preceding month, staying put at the first representable one.
  #[must_use]
  pub fn previous(self) -> Self {
    self
      .checked_previous()
      .unwrap_or(self)
  }

  #[must_use]
  pub fn checked_next(
    self
  ) -> Option<Self> {
    if self.month0 == 11 {
      Self::new(
        self.year.checked_add(1)?,
        0
      )
    } else {
      Self::new(
        self.year,
        self.month0 + 1
      )
    }
  }

  #[must_use]
  pub fn checked_previous(
    self
  ) -> Option<Self> {
    if self.month0 == 0 {
      Self::new(
        self.year.checked_sub(1)?,
        11
      )
    } else {
      Self::new(
        self.year,
        self.month0 - 1
      )
    }
  }

  /// Moves `months` months forward (or backward when negative), clamped
  /// to the range `chrono` can represent.
  #[must_use]
  pub fn shift(
    self,
    months: i32
  ) -> Self {
    self
      .checked_shift(months)
      .unwrap_or_else(|| {
        if months < 0 {
          Self::first_representable()
        } else {
          Self::last_representable()
        }
      })
  }

  /// Like [`shift`](Self::shift), but `None` when the result falls
  /// outside the range `chrono` can represent.
  #[must_use]
  pub fn checked_shift(
    self,
    months: i32
  ) -> Option<Self> {
    let total = i64::from(self.year)
      * 12
      + i64::from(self.month0)
      + i64::from(months);
    let year = i32::try_from(
      total.div_euclid(12)
    )
    .ok()?;
    let month0 = u32::try_from(
      total.rem_euclid(12)
    )
    .ok()?;

    Self::new(year, month0)
  }

  /// First day of the month.
  #[must_use]
  pub fn first_day(self) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      self.year,
      self.month(),
      1
    )
    .unwrap_or(
      if self.year < 0 {
        NaiveDate::MIN
      } else {
        NaiveDate::MAX
      }
    )
  }

  /// Number of days in the month, `28..=31`.
  ///
  /// Takes "day zero" of the following month, i.e. the day before its
  /// first day, and reads its day-of-month.
  #[must_use]
  pub fn days(self) -> u32 {
    self
      .checked_next()
      .and_then(|next| {
        next.first_day().pred_opt()
      })
      .map(|day_zero| day_zero.day())
      // December of the last representable year.
      .unwrap_or(31)
  }

  /// Last day of the month.
  #[must_use]
  pub fn last_day(self) -> NaiveDate {
    NaiveDate::from_ymd_opt(
      self.year,
      self.month(),
      self.days()
    )
    .unwrap_or_else(|| {
      self.first_day()
    })
  }

  #[must_use]
  pub fn contains<D: Datelike>(
    self,
    date: &D
  ) -> bool {
    Self::of(date) == self
  }

  /// Every day of the month in order.
  pub fn iter_days(
    self
  ) -> impl Iterator<Item = NaiveDate>
  {
    let first = self.first_day();
    first
      .iter_days()
      .take(self.days() as usize)
  }
}

impl fmt::Display for CalendarMonth {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{:04}-{:02}",
      self.year,
      self.month()
    )
  }
}

/// First day of the month after `date`'s month.
///
/// December rolls over to January of the following year.
#[must_use]
pub fn date_of_the_next_month<
  D: Datelike
>(
  date: &D
) -> NaiveDate {
  CalendarMonth::of(date)
    .next()
    .first_day()
}

/// First day of the month before `date`'s month.
///
/// January rolls back to December of the previous year.
#[must_use]
pub fn date_of_the_previous_month<
  D: Datelike
>(
  date: &D
) -> NaiveDate {
  CalendarMonth::of(date)
    .previous()
    .first_day()
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn number_of_days_in_month<
  D: Datelike
>(
  date: &D
) -> u32 {
  CalendarMonth::of(date).days()
}
