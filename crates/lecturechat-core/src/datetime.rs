use anyhow::{
  Context,
  anyhow
};
use chrono::{
  DateTime,
  Days,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  Offset,
  TimeZone,
  Utc
};
use chrono_tz::Tz;

use crate::month::CalendarMonth;

/// Half-open `[beginning, ending)` interval covering one month in a time
/// zone. The backend takes both ends as epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
  pub beginning: DateTime<Utc>,
  pub ending:    DateTime<Utc>
}

impl MonthWindow {
  #[must_use]
  pub fn beginning_millis(&self) -> i64 {
    self.beginning.timestamp_millis()
  }

  #[must_use]
  pub fn ending_millis(&self) -> i64 {
    self.ending.timestamp_millis()
  }

  #[must_use]
  pub fn contains(
    &self,
    instant: DateTime<Utc>
  ) -> bool {
    self.beginning <= instant
      && instant < self.ending
  }
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "parsed timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn today_in(tz: &Tz) -> NaiveDate {
  Utc::now()
    .with_timezone(tz)
    .date_naive()
}

/// Local calendar timestamp of an epoch-millisecond instant in `tz`.
#[must_use]
pub fn local_from_millis(
  millis: i64,
  tz: &Tz
) -> Option<NaiveDateTime> {
  DateTime::<Utc>::from_timestamp_millis(
    millis
  )
  .map(|instant| {
    instant
      .with_timezone(tz)
      .naive_local()
  })
}

pub fn to_utc_from_local(
  local_naive: NaiveDateTime,
  tz: &Tz,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  match tz.from_local_datetime(
    &local_naive
  ) {
    | LocalResult::Single(local_dt) => {
      Ok(local_dt.with_timezone(&Utc))
    }
    | LocalResult::Ambiguous(
      first,
      second
    ) => {
      tracing::warn!(
        context,
        first = %first,
        second = %second,
        "ambiguous local datetime; using earliest"
      );
      let chosen = if first <= second {
        first
      } else {
        second
      };
      Ok(chosen.with_timezone(&Utc))
    }
    | LocalResult::None => {
      Err(anyhow!(
        "local datetime {local_naive} \
         does not exist in timezone \
         {tz}: {context}"
      ))
    }
  }
}

/// The instants bounding `month` in `tz`, from the first moment of the
/// month up to the first moment of the next one.
#[tracing::instrument(skip(tz), fields(month = %month))]
pub fn month_window(
  month: CalendarMonth,
  tz: &Tz
) -> anyhow::Result<MonthWindow> {
  let beginning = first_instant_of_day(
    month.first_day(),
    tz,
    "month-beginning"
  )?;
  let ending = first_instant_of_day(
    month.next().first_day(),
    tz,
    "month-ending"
  )?;

  Ok(MonthWindow { beginning, ending })
}

/// Earliest instant whose local date in `tz` is `date`.
///
/// Usually local midnight. When a clock change skips midnight, the day
/// starts where the gap ends, which is midnight read with the offset in
/// force before the jump.
pub fn first_instant_of_day(
  date: NaiveDate,
  tz: &Tz,
  context: &str
) -> anyhow::Result<DateTime<Utc>> {
  let midnight =
    date.and_time(NaiveTime::MIN);
  if tz
    .from_local_datetime(&midnight)
    .earliest()
    .is_some()
  {
    return to_utc_from_local(
      midnight, tz, context
    );
  }

  let offset_before = date
    .checked_sub_days(Days::new(1))
    .and_then(|eve| {
      tz.from_local_datetime(
        &eve.and_time(NaiveTime::MIN)
      )
      .earliest()
    })
    .map(|eve| eve.offset().fix())
    .ok_or_else(|| {
      anyhow!(
        "no offset before {date} in \
         timezone {tz}: {context}"
      )
    })?;
  let instant = offset_before
    .from_local_datetime(&midnight)
    .single()
    .map(|start| {
      start.with_timezone(&Utc)
    })
    .ok_or_else(|| {
      anyhow!(
        "midnight of {date} is out of \
         range: {context}"
      )
    })?;

  if instant
    .with_timezone(tz)
    .date_naive()
    != date
  {
    return Err(anyhow!(
      "no local time on {date} exists \
       in timezone {tz}: {context}"
    ));
  }

  tracing::debug!(
    context,
    %date,
    local = %instant.with_timezone(tz),
    "midnight skipped; day starts after the gap"
  );
  Ok(instant)
}

#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_month_expr(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<CalendarMonth> {
  let token = input.trim();
  let lower =
    token.to_ascii_lowercase();
  let current =
    CalendarMonth::of(&today);

  match lower.as_str() {
    | "" | "this" | "current" => {
      return Ok(current);
    }
    | "next" => {
      return current
        .checked_next()
        .ok_or_else(|| {
          anyhow!(
            "month out of range: {input}"
          )
        });
    }
    | "prev" | "previous" | "last" => {
      return current
        .checked_previous()
        .ok_or_else(|| {
          anyhow!(
            "month out of range: {input}"
          )
        });
    }
    | _ => {}
  }

  if let Some(month) =
    parse_month_name(&lower)
  {
    return CalendarMonth::new(
      current.year(),
      month - 1
    )
    .ok_or_else(|| {
      anyhow!(
        "month out of range: {input}"
      )
    });
  }

  if let Some(rest) = token
    .strip_prefix('+')
    .or_else(|| {
      token
        .strip_prefix('-')
        .map(|_| token)
    })
  {
    let offset: i32 =
      rest.parse().with_context(|| {
        format!(
          "invalid month offset: \
           {input}"
        )
      })?;
    return current
      .checked_shift(offset)
      .ok_or_else(|| {
        anyhow!(
          "month offset out of range: \
           {input}"
        )
      });
  }

  if let Some((year, month)) =
    token.split_once('-')
    && year.len() == 4
  {
    let year: i32 =
      year.parse().with_context(|| {
        format!("invalid year: {input}")
      })?;
    let month: u32 =
      month.parse().with_context(
        || {
          format!(
            "invalid month: {input}"
          )
        }
      )?;
    if !(1..=12).contains(&month) {
      return Err(anyhow!(
        "month must be 1-12: {input}"
      ));
    }
    return CalendarMonth::new(
      year,
      month - 1
    )
    .ok_or_else(|| {
      anyhow!(
        "month out of range: {input}"
      )
    });
  }

  Err(anyhow!(
    "unrecognized month expression: \
     {input}"
  ))
  .with_context(|| {
    "supported formats: \
     this/next/prev, month names (e.g. \
     september or sep), +N/-N month \
     offsets, YYYY-MM"
  })
}

#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_day_expr(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();

  match token
    .to_ascii_lowercase()
    .as_str()
  {
    | "" | "today" => return Ok(today),
    | "tomorrow" => {
      return today
        .checked_add_days(Days::new(1))
        .ok_or_else(|| {
          anyhow!(
            "failed to advance to \
             next day"
          )
        });
    }
    | "yesterday" => {
      return today
        .checked_sub_days(Days::new(1))
        .ok_or_else(|| {
          anyhow!(
            "failed to step back to \
             previous day"
          )
        });
    }
    | _ => {}
  }

  NaiveDate::parse_from_str(
    token, "%Y-%m-%d"
  )
  .with_context(|| {
    format!(
      "unrecognized day expression: \
       {input} (expected today, \
       tomorrow, yesterday or \
       YYYY-MM-DD)"
    )
  })
}

fn parse_month_name(
  token: &str
) -> Option<u32> {
  match token.trim() {
    | "january" | "jan" => Some(1),
    | "february" | "feb" => Some(2),
    | "march" | "mar" => Some(3),
    | "april" | "apr" => Some(4),
    | "may" => Some(5),
    | "june" | "jun" => Some(6),
    | "july" | "jul" => Some(7),
    | "august" | "aug" => Some(8),
    | "september" | "sep" | "sept" => {
      Some(9)
    }
    | "october" | "oct" => Some(10),
    | "november" | "nov" => Some(11),
    | "december" | "dec" => Some(12),
    | _ => None
  }
}
