use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDate
};
use serde::{
  Deserialize,
  Serialize
};

use crate::dates::days_in_month;

pub const DEFAULT_FIRST_YEAR: i32 = 1923;
pub const DEFAULT_YEAR_COUNT: u32 = 100;

/// One column of the year / month / day
/// picker.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PickerField {
  Year,
  Month,
  Day
}

impl PickerField {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Year => "year",
      | Self::Month => "month",
      | Self::Day => "day"
    }
  }
}

impl fmt::Display for PickerField {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for PickerField {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "year" => Ok(Self::Year),
      | "month" => Ok(Self::Month),
      | "day" => Ok(Self::Day),
      | other => {
        Err(anyhow!(
          "invalid picker field: {other}"
        ))
      }
    }
  }
}

fn pad2(value: u32) -> String {
  format!("{value:02}")
}

/// `"01"..="NN"` for every day of the
/// month; empty when year or month do not
/// parse.
pub fn day_labels(
  year: &str,
  month: &str
) -> Vec<String> {
  let parsed = year
    .trim()
    .parse::<i32>()
    .ok()
    .zip(month.trim().parse::<u32>().ok());
  let Some(count) =
    parsed.and_then(|(year, month)| {
      days_in_month(year, month)
    })
  else {
    return Vec::new();
  };
  (1..=count).map(pad2).collect()
}

pub fn month_labels() -> Vec<String> {
  (1..=12).map(pad2).collect()
}

pub fn year_labels(
  first_year: i32,
  count: u32
) -> Vec<String> {
  (0..count)
    .filter_map(|offset| {
      i32::try_from(offset)
        .ok()
        .and_then(|offset| {
          first_year.checked_add(offset)
        })
    })
    .map(|year| year.to_string())
    .collect()
}

/// Pending value of the picker dialog.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct PickerSelection {
  pub year:  String,
  pub month: String,
  pub day:   String
}

impl Default for PickerSelection {
  fn default() -> Self {
    Self {
      year:  "1989".to_string(),
      month: "08".to_string(),
      day:   "12".to_string()
    }
  }
}

impl PickerSelection {
  pub fn from_date(
    date: NaiveDate
  ) -> Self {
    Self {
      year:  date.year().to_string(),
      month: pad2(date.month()),
      day:   pad2(date.day())
    }
  }

  pub fn get(
    &self,
    field: PickerField
  ) -> &str {
    match field {
      | PickerField::Year => &self.year,
      | PickerField::Month => &self.month,
      | PickerField::Day => &self.day
    }
  }

  /// Copy of `self` with one column set;
  /// this is what a picker widget hands
  /// to [`Self::on_field_change`].
  pub fn with(
    &self,
    field: PickerField,
    value: impl Into<String>
  ) -> Self {
    let mut next = self.clone();
    let value = value.into();
    match field {
      | PickerField::Year => {
        next.year = value
      }
      | PickerField::Month => {
        next.month = value
      }
      | PickerField::Day => next.day = value
    }
    next
  }

  pub fn day_labels(&self) -> Vec<String> {
    day_labels(&self.year, &self.month)
  }

  /// Accepts `new` after `changed` moved.
  /// A day change is taken verbatim; a
  /// year or month change keeps the day
  /// when it still exists and otherwise
  /// clamps it to the month's last day.
  pub fn on_field_change(
    new: Self,
    changed: PickerField
  ) -> Self {
    if changed == PickerField::Day {
      return new;
    }

    let days = new.day_labels();
    if days.contains(&new.day) {
      return new;
    }

    match days.last() {
      | Some(last) => {
        tracing::debug!(
          year = %new.year,
          month = %new.month,
          from = %new.day,
          to = %last,
          "clamped picker day"
        );
        Self {
          day: last.clone(),
          ..new
        }
      }
      | None => new
    }
  }

  pub fn to_date(
    &self
  ) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
      self.year.trim().parse().ok()?,
      self.month.trim().parse().ok()?,
      self.day.trim().parse().ok()?
    )
  }
}

impl fmt::Display for PickerSelection {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(
      f,
      "{}-{}-{}",
      self.year, self.month, self.day
    )
  }
}
