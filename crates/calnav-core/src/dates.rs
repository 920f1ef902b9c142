//! Period arithmetic for the four calendar
//! views.
//!
//! Every function answers in local,
//! timezone-free `NaiveDateTime`s. A
//! `None` result means the period falls
//! outside the range chrono can represent.

use chrono::{
  Datelike,
  Months,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeDelta
};

use crate::view::View;

/// First year of the century containing
/// `year`; centuries run 2001-2100.
pub fn century_start_year(
  year: i32
) -> i32 {
  year + ((1 - year) % 100)
}

/// First year of the decade containing
/// `year`; decades run 2021-2030.
pub fn decade_start_year(
  year: i32
) -> i32 {
  year + ((1 - year) % 10)
}

fn start_of_year(
  year: i32
) -> Option<NaiveDateTime> {
  first_of_month(year, 1)
}

fn first_of_month(
  year: i32,
  month: u32
) -> Option<NaiveDateTime> {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .map(|date| {
    date.and_time(NaiveTime::MIN)
  })
}

/// Number of days in `month` of `year`,
/// taken as the day-of-month of the day
/// before the first of the following
/// month.
pub fn days_in_month(
  year: i32,
  month: u32
) -> Option<u32> {
  if !(1..=12).contains(&month) {
    return None;
  }
  let (next_year, next_month) =
    if month == 12 {
      (year.checked_add(1)?, 1)
    } else {
      (year, month + 1)
    };
  NaiveDate::from_ymd_opt(
    next_year, next_month, 1
  )?
  .pred_opt()
  .map(|last| last.day())
}

/// Start of the period of `view` that
/// contains `date`.
pub fn begin(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  let year = date.year();
  match view {
    | View::Century => {
      start_of_year(century_start_year(
        year
      ))
    }
    | View::Decade => {
      start_of_year(decade_start_year(
        year
      ))
    }
    | View::Year => start_of_year(year),
    | View::Month => {
      first_of_month(year, date.month())
    }
  }
}

/// Moves a period start by `steps` whole
/// periods of `view`.
fn shift(
  view: View,
  start: NaiveDateTime,
  steps: i32
) -> Option<NaiveDateTime> {
  let months = match view {
    | View::Century => {
      i64::from(steps) * 1200
    }
    | View::Decade => {
      i64::from(steps) * 120
    }
    | View::Year => {
      i64::from(steps) * 12
    }
    | View::Month => i64::from(steps)
  };
  let magnitude = Months::new(
    u32::try_from(months.unsigned_abs())
      .ok()?
  );
  if months < 0 {
    start.checked_sub_months(magnitude)
  } else {
    start.checked_add_months(magnitude)
  }
}

/// Periods skipped by the double-step
/// buttons: a century of decades, a
/// decade of years, a year of months.
fn double_step(
  view: View
) -> Option<i32> {
  match view {
    | View::Century => None,
    | View::Decade => Some(10),
    | View::Year => Some(10),
    | View::Month => Some(12)
  }
}

fn end_from_begin(
  view: View,
  start: NaiveDateTime
) -> Option<NaiveDateTime> {
  shift(view, start, 1)?
    .checked_sub_signed(
      TimeDelta::milliseconds(1)
    )
}

/// Last millisecond of the period of
/// `view` that contains `date`.
pub fn end(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  end_from_begin(view, begin(view, date)?)
}

pub fn range(
  view: View,
  date: NaiveDateTime
) -> Option<(NaiveDateTime, NaiveDateTime)>
{
  let start = begin(view, date)?;
  Some((
    start,
    end_from_begin(view, start)?
  ))
}

pub fn begin_previous(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  shift(view, begin(view, date)?, -1)
}

/// `None` for [`View::Century`].
pub fn begin_previous2(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  let steps = double_step(view)?;
  shift(view, begin(view, date)?, -steps)
}

pub fn begin_next(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  shift(view, begin(view, date)?, 1)
}

/// `None` for [`View::Century`].
pub fn begin_next2(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  let steps = double_step(view)?;
  shift(view, begin(view, date)?, steps)
}

pub fn end_previous(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  end_from_begin(
    view,
    begin_previous(view, date)?
  )
}

/// `None` for [`View::Century`].
pub fn end_previous2(
  view: View,
  date: NaiveDateTime
) -> Option<NaiveDateTime> {
  end_from_begin(
    view,
    begin_previous2(view, date)?
  )
}
