use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{
  Deserialize,
  Serialize
};

/// Zoom level of the calendar, coarse
/// to fine.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(
  feature = "cli",
  derive(clap::ValueEnum)
)]
pub enum View {
  Century,
  Decade,
  Year,
  Month
}

impl View {
  pub fn all() -> [Self; 4] {
    [
      Self::Century,
      Self::Decade,
      Self::Year,
      Self::Month
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Century => "century",
      | Self::Decade => "decade",
      | Self::Year => "year",
      | Self::Month => "month"
    }
  }

  pub fn from_key(
    key: &str
  ) -> Option<Self> {
    match key {
      | "century" => Some(Self::Century),
      | "decade" => Some(Self::Decade),
      | "year" => Some(Self::Year),
      | "month" => Some(Self::Month),
      | _ => None
    }
  }

  /// Century has no "jump two periods"
  /// buttons.
  pub fn has_double_step(self) -> bool {
    self != Self::Century
  }
}

impl fmt::Display for View {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for View {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    Self::from_key(s.trim()).ok_or_else(
      || anyhow!("invalid view: {s}")
    )
  }
}

pub fn default_views() -> Vec<View> {
  View::all().to_vec()
}

/// Parses a comma separated list such as
/// `decade,year,month`.
pub fn parse_views(
  raw: &str
) -> anyhow::Result<Vec<View>> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|part| !part.is_empty())
    .map(str::parse::<View>)
    .collect()
}

pub fn drill_up_available(
  views: &[View],
  view: View
) -> bool {
  views
    .iter()
    .position(|candidate| {
      *candidate == view
    })
    .is_some_and(|idx| idx > 0)
}

/// The next coarser view in `views`, if
/// the current one is not already the
/// first.
pub fn drill_up_target(
  views: &[View],
  view: View
) -> Option<View> {
  let idx = views
    .iter()
    .position(|candidate| {
      *candidate == view
    })?;
  idx
    .checked_sub(1)
    .and_then(|prev| views.get(prev))
    .copied()
}
