use chrono::{
  NaiveDate,
  NaiveDateTime,
  Weekday
};

use crate::grid::week_columns;
use crate::month::CalendarMonth;

const MONTHS: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

/// `"September 2020"`.
#[must_use]
pub fn month_title(
  month: CalendarMonth
) -> String {
  format!(
    "{} {}",
    MONTHS[month.month0() as usize],
    month.year()
  )
}

#[must_use]
pub fn weekday_name(
  day: Weekday
) -> &'static str {
  match day {
    | Weekday::Mon => "Monday",
    | Weekday::Tue => "Tuesday",
    | Weekday::Wed => "Wednesday",
    | Weekday::Thu => "Thursday",
    | Weekday::Fri => "Friday",
    | Weekday::Sat => "Saturday",
    | Weekday::Sun => "Sunday"
  }
}

/// Column headers of a month grid in display order.
#[must_use]
pub fn weekday_labels(
  week_start: Weekday
) -> [&'static str; 7] {
  week_columns(week_start)
    .map(weekday_name)
}

/// `"Thursday, September 10, 2020"`.
#[must_use]
pub fn short_format(
  date: NaiveDate
) -> String {
  date
    .format("%A, %B %-d, %Y")
    .to_string()
}

/// `"Thursday, September 10, 2020, 14:30"`.
#[must_use]
pub fn long_format(
  timestamp: NaiveDateTime
) -> String {
  timestamp
    .format("%A, %B %-d, %Y, %H:%M")
    .to_string()
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    Weekday
  };

  use super::{
    long_format,
    month_title,
    short_format,
    weekday_labels
  };
  use crate::month::CalendarMonth;

  #[test]
  fn titles_use_english_month_names() {
    let month =
      CalendarMonth::new(2020, 8)
        .expect("valid month");
    assert_eq!(
      month_title(month),
      "September 2020"
    );
  }

  #[test]
  fn labels_follow_week_start() {
    assert_eq!(
      weekday_labels(Weekday::Sun)[0],
      "Sunday"
    );
    assert_eq!(
      weekday_labels(Weekday::Mon),
      [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday"
      ]
    );
  }

  #[test]
  fn formats_dates() {
    let day = NaiveDate::from_ymd_opt(
      2020, 9, 10
    )
    .expect("valid date");
    assert_eq!(
      short_format(day),
      "Thursday, September 10, 2020"
    );
    let at = day
      .and_hms_opt(14, 30, 0)
      .expect("valid time");
    assert_eq!(
      long_format(at),
      "Thursday, September 10, 2020, 14:30"
    );
  }
}
