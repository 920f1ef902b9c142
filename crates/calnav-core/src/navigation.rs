use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{
  Datelike,
  NaiveDateTime
};
use serde::{
  Deserialize,
  Serialize
};
use tracing::debug;

use crate::dates;
use crate::view::View;

/// Which arrow button was pressed; passed
/// back to the parent together with the
/// new active start date.
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
pub enum Action {
  Prev,
  Prev2,
  Next,
  Next2
}

impl Action {
  pub fn all() -> [Self; 4] {
    [
      Self::Prev2,
      Self::Prev,
      Self::Next,
      Self::Next2
    ]
  }

  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Prev => "prev",
      | Self::Prev2 => "prev2",
      | Self::Next => "next",
      | Self::Next2 => "next2"
    }
  }

  pub fn is_double(self) -> bool {
    matches!(
      self,
      Self::Prev2 | Self::Next2
    )
  }
}

impl fmt::Display for Action {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(self.as_key())
  }
}

impl FromStr for Action {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s.trim() {
      | "prev" => Ok(Self::Prev),
      | "prev2" => Ok(Self::Prev2),
      | "next" => Ok(Self::Next),
      | "next2" => Ok(Self::Next2),
      | other => {
        Err(anyhow!(
          "invalid action: {other}"
        ))
      }
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct Bounds {
  pub min_date: Option<NaiveDateTime>,
  pub max_date: Option<NaiveDateTime>
}

/// Target dates and enablement of the
/// four arrow buttons for one view and
/// active start date.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct Navigation {
  pub view:             View,
  pub previous:         Option<NaiveDateTime>,
  pub previous2:        Option<NaiveDateTime>,
  pub next:             Option<NaiveDateTime>,
  pub next2:            Option<NaiveDateTime>,
  pub prev_disabled:    bool,
  pub prev2_disabled:   bool,
  pub next_disabled:    bool,
  pub next2_disabled:   bool
}

/// A previous period is unreachable when
/// it starts before year 0, or when the
/// floor is at or past its last instant.
fn previous_period_blocked(
  start: Option<NaiveDateTime>,
  end: Option<NaiveDateTime>,
  min_date: Option<NaiveDateTime>
) -> bool {
  let Some(start) = start else {
    return true;
  };
  if start.year() < 0 {
    return true;
  }
  match (min_date, end) {
    | (Some(min), Some(end)) => {
      min >= end
    }
    | (Some(_), None) => true,
    | (None, _) => false
  }
}

fn next_period_blocked(
  start: Option<NaiveDateTime>,
  max_date: Option<NaiveDateTime>
) -> bool {
  match (start, max_date) {
    | (None, _) => true,
    | (Some(start), Some(max)) => {
      max < start
    }
    | (Some(_), None) => false
  }
}

impl Navigation {
  pub fn compute(
    view: View,
    active_start_date: NaiveDateTime,
    bounds: &Bounds
  ) -> Self {
    let show_double =
      view.has_double_step();

    let previous = dates::begin_previous(
      view,
      active_start_date
    );
    let previous2 = show_double
      .then(|| {
        dates::begin_previous2(
          view,
          active_start_date
        )
      })
      .flatten();
    let next = dates::begin_next(
      view,
      active_start_date
    );
    let next2 = show_double
      .then(|| {
        dates::begin_next2(
          view,
          active_start_date
        )
      })
      .flatten();

    let prev_disabled =
      previous_period_blocked(
        previous,
        dates::end_previous(
          view,
          active_start_date
        ),
        bounds.min_date
      );
    let prev2_disabled = show_double
      && previous_period_blocked(
        previous2,
        dates::end_previous2(
          view,
          active_start_date
        ),
        bounds.min_date
      );
    let next_disabled =
      next_period_blocked(
        next,
        bounds.max_date
      );
    let next2_disabled = show_double
      && next_period_blocked(
        next2,
        bounds.max_date
      );

    debug!(
      %view,
      %active_start_date,
      ?previous,
      ?next,
      prev_disabled,
      prev2_disabled,
      next_disabled,
      next2_disabled,
      "computed navigation"
    );

    Self {
      view,
      previous,
      previous2,
      next,
      next2,
      prev_disabled,
      prev2_disabled,
      next_disabled,
      next2_disabled
    }
  }

  /// Whether the button for `action` is
  /// rendered at all.
  pub fn is_shown(
    &self,
    action: Action
  ) -> bool {
    !action.is_double()
      || self.view.has_double_step()
  }

  pub fn is_disabled(
    &self,
    action: Action
  ) -> bool {
    match action {
      | Action::Prev => self.prev_disabled,
      | Action::Prev2 => {
        self.prev2_disabled
      }
      | Action::Next => self.next_disabled,
      | Action::Next2 => {
        self.next2_disabled
      }
    }
  }

  pub fn candidate(
    &self,
    action: Action
  ) -> Option<NaiveDateTime> {
    match action {
      | Action::Prev => self.previous,
      | Action::Prev2 => self.previous2,
      | Action::Next => self.next,
      | Action::Next2 => self.next2
    }
  }

  /// The date a click on `action` would
  /// navigate to; `None` when the button
  /// is hidden or disabled.
  pub fn target(
    &self,
    action: Action
  ) -> Option<NaiveDateTime> {
    if !self.is_shown(action)
      || self.is_disabled(action)
    {
      return None;
    }
    self.candidate(action)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    NaiveTime,
    TimeDelta
  };

  use super::*;

  fn at(
    year: i32,
    month: u32,
    day: u32
  ) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(
      year, month, day
    )
    .expect("valid date")
    .and_time(NaiveTime::MIN)
  }

  #[test]
  fn unbounded_enables_everything() {
    let nav = Navigation::compute(
      View::Month,
      at(2024, 8, 1),
      &Bounds::default()
    );
    for action in Action::all() {
      assert!(nav.is_shown(action));
      assert!(!nav.is_disabled(action));
    }
    assert_eq!(
      nav.target(Action::Prev2),
      Some(at(2023, 8, 1))
    );
  }

  #[test]
  fn min_date_on_previous_period_end() {
    let asd = at(2024, 8, 1);
    // Midnight of the last day is still
    // before the period's final instant.
    let nav = Navigation::compute(
      View::Month,
      asd,
      &Bounds {
        min_date: Some(at(2024, 7, 31)),
        max_date: None
      }
    );
    assert!(!nav.prev_disabled);

    let nav = Navigation::compute(
      View::Month,
      asd,
      &Bounds {
        min_date: Some(at(2024, 8, 1)),
        max_date: None
      }
    );
    assert!(nav.prev_disabled);
    assert!(nav.prev2_disabled);
    assert_eq!(
      nav.target(Action::Prev),
      None
    );
  }

  #[test]
  fn prev_disabled_matches_end_of_previous_period()
  {
    let asd = at(2024, 1, 1);
    for view in [
      View::Decade,
      View::Year,
      View::Month
    ] {
      let end = dates::end_previous(
        view, asd
      )
      .expect("in range");
      for min in [
        at(1990, 1, 1),
        end,
        at(2023, 12, 31),
        at(2024, 1, 1),
        at(2030, 1, 1)
      ] {
        let nav = Navigation::compute(
          view,
          asd,
          &Bounds {
            min_date: Some(min),
            max_date: None
          }
        );
        assert_eq!(
          nav.prev_disabled,
          min >= end,
          "view {view}, min {min}"
        );
      }
    }
  }

  #[test]
  fn prev2_disabled_matches_end_of_second_previous_period()
  {
    let asd = at(2024, 1, 1);
    for view in [
      View::Decade,
      View::Year,
      View::Month
    ] {
      let begin = dates::begin_previous2(
        view, asd
      )
      .expect("in range");
      let end = dates::end_previous2(
        view, asd
      )
      .expect("in range");
      for min in [
        at(1800, 1, 1),
        begin,
        end - TimeDelta::milliseconds(1),
        end,
        at(2024, 1, 1)
      ] {
        let nav = Navigation::compute(
          view,
          asd,
          &Bounds {
            min_date: Some(min),
            max_date: None
          }
        );
        assert_eq!(
          nav.prev2_disabled,
          min >= end,
          "view {view}, min {min}"
        );
      }
    }
  }

  #[test]
  fn next2_enabled_up_to_its_start() {
    let asd = at(2024, 1, 1);
    for view in [
      View::Decade,
      View::Year,
      View::Month
    ] {
      let start = dates::begin_next2(
        view, asd
      )
      .expect("in range");

      let at_start = Navigation::compute(
        view,
        asd,
        &Bounds {
          min_date: None,
          max_date: Some(start)
        }
      );
      assert!(
        !at_start.next2_disabled,
        "view {view}"
      );
      assert_eq!(
        at_start.target(Action::Next2),
        Some(start)
      );

      let before = Navigation::compute(
        view,
        asd,
        &Bounds {
          min_date: None,
          max_date: Some(
            start
              - TimeDelta::milliseconds(1)
          )
        }
      );
      assert!(
        before.next2_disabled,
        "view {view}"
      );
      assert!(!before.next_disabled);
    }
  }

  #[test]
  fn negative_year_always_disables_prev() {
    let nav = Navigation::compute(
      View::Year,
      at(0, 1, 1),
      &Bounds::default()
    );
    assert!(nav.prev_disabled);
    assert!(nav.prev2_disabled);
    assert!(!nav.next_disabled);

    let nav = Navigation::compute(
      View::Century,
      at(50, 1, 1),
      &Bounds::default()
    );
    assert!(nav.prev_disabled);
  }

  #[test]
  fn max_date_blocks_next() {
    let asd = at(2024, 8, 1);
    let nav = Navigation::compute(
      View::Month,
      asd,
      &Bounds {
        min_date: None,
        max_date: Some(at(2024, 8, 31))
      }
    );
    assert!(nav.next_disabled);
    assert!(nav.next2_disabled);

    let nav = Navigation::compute(
      View::Month,
      asd,
      &Bounds {
        min_date: None,
        max_date: Some(at(2024, 9, 1))
      }
    );
    assert!(!nav.next_disabled);
    assert!(nav.next2_disabled);
    assert_eq!(
      nav.target(Action::Next),
      Some(at(2024, 9, 1))
    );
  }

  #[test]
  fn century_hides_double_buttons() {
    let nav = Navigation::compute(
      View::Century,
      at(2001, 1, 1),
      &Bounds {
        min_date: Some(at(2500, 1, 1)),
        max_date: Some(at(1500, 1, 1))
      }
    );
    assert!(!nav.is_shown(Action::Prev2));
    assert!(!nav.is_shown(Action::Next2));
    assert!(!nav.prev2_disabled);
    assert!(!nav.next2_disabled);
    assert_eq!(nav.previous2, None);
    assert_eq!(nav.next2, None);
    assert!(nav.prev_disabled);
    assert!(nav.next_disabled);
  }

  #[test]
  fn parses_action_tags() {
    for action in Action::all() {
      assert_eq!(
        action
          .as_key()
          .parse::<Action>()
          .expect("known tag"),
        action
      );
    }
    assert!("back".parse::<Action>().is_err());
  }
}
