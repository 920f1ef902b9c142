//! State behind the navigation bar: the
//! props a parent calendar passes in, the
//! derived button layout, and the picker
//! dialog opened from the label.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info
};

use crate::dialog::DialogState;
use crate::label::{
  DateFormatter,
  LocaleFormatter,
  NavigationLabel,
  render_label
};
use crate::navigation::{
  Action,
  Bounds,
  Navigation
};
use crate::picker::{
  DEFAULT_FIRST_YEAR,
  DEFAULT_YEAR_COUNT,
  PickerSelection
};
use crate::view::{
  View,
  default_views,
  drill_up_available
};

/// Callbacks into the calendar that owns
/// the active start date.
pub trait NavigationHandler {
  fn set_active_start_date(
    &mut self,
    date: NaiveDateTime,
    action: Action
  );

  fn drill_up(&mut self);
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AriaLive {
  Off,
  #[default]
  Polite,
  Assertive
}

impl AriaLive {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Off => "off",
      | Self::Polite => "polite",
      | Self::Assertive => "assertive"
    }
  }
}

/// Text of the four arrow buttons. `None`
/// removes the button.
#[derive(
  Debug, Clone, PartialEq, Eq,
)]
pub struct ArrowLabels {
  pub prev:  Option<String>,
  pub prev2: Option<String>,
  pub next:  Option<String>,
  pub next2: Option<String>
}

impl Default for ArrowLabels {
  fn default() -> Self {
    Self {
      prev:  Some("‹".to_string()),
      prev2: Some("«".to_string()),
      next:  Some("›".to_string()),
      next2: Some("»".to_string())
    }
  }
}

impl ArrowLabels {
  pub fn get(
    &self,
    action: Action
  ) -> Option<&str> {
    match action {
      | Action::Prev => self.prev.as_deref(),
      | Action::Prev2 => {
        self.prev2.as_deref()
      }
      | Action::Next => self.next.as_deref(),
      | Action::Next2 => {
        self.next2.as_deref()
      }
    }
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct AriaLabels {
  pub prev:       String,
  pub prev2:      String,
  pub next:       String,
  pub next2:      String,
  pub navigation: String,
  pub live:       Option<AriaLive>
}

impl AriaLabels {
  pub fn get(
    &self,
    action: Action
  ) -> &str {
    match action {
      | Action::Prev => &self.prev,
      | Action::Prev2 => &self.prev2,
      | Action::Next => &self.next,
      | Action::Next2 => &self.next2
    }
  }
}

pub struct HeaderProps {
  pub active_start_date: NaiveDateTime,
  pub view:              View,
  pub views:             Vec<View>,
  pub bounds:            Bounds,
  pub locale:            Option<String>,
  pub show_double_view:  bool,
  pub labels:            ArrowLabels,
  pub aria:              AriaLabels,
  pub formatter:         Box<dyn DateFormatter>,
  pub navigation_label:
    Option<Box<dyn NavigationLabel>>,
  pub picker_initial:    PickerSelection,
  pub picker_first_year: i32,
  pub picker_year_count: u32
}

impl HeaderProps {
  pub fn new(
    active_start_date: NaiveDateTime,
    view: View
  ) -> Self {
    Self {
      active_start_date,
      view,
      views: default_views(),
      bounds: Bounds::default(),
      locale: None,
      show_double_view: false,
      labels: ArrowLabels::default(),
      aria: AriaLabels::default(),
      formatter: Box::new(LocaleFormatter),
      navigation_label: None,
      picker_initial:
        PickerSelection::default(),
      picker_first_year: DEFAULT_FIRST_YEAR,
      picker_year_count: DEFAULT_YEAR_COUNT
    }
  }
}

impl fmt::Debug for HeaderProps {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.debug_struct("HeaderProps")
      .field(
        "active_start_date",
        &self.active_start_date
      )
      .field("view", &self.view)
      .field("views", &self.views)
      .field("bounds", &self.bounds)
      .field("locale", &self.locale)
      .field(
        "show_double_view",
        &self.show_double_view
      )
      .field("labels", &self.labels)
      .field(
        "navigation_label",
        &self.navigation_label.is_some()
      )
      .finish_non_exhaustive()
  }
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct ArrowButton {
  pub action:     Action,
  pub text:       String,
  pub aria_label: String,
  pub disabled:   bool,
  pub target:     Option<NaiveDateTime>
}

#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct LabelButton {
  pub from:       String,
  pub to:         Option<String>,
  pub aria_label: String,
  pub aria_live:  Option<AriaLive>,
  pub disabled:   bool
}

/// Everything needed to draw the bar, in
/// on-screen order.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct HeaderLayout {
  pub view:              View,
  pub active_start_date: NaiveDateTime,
  pub leading:           Vec<ArrowButton>,
  pub label:             LabelButton,
  pub trailing:          Vec<ArrowButton>,
  pub dialog_open:       bool
}

impl HeaderLayout {
  pub fn buttons(
    &self
  ) -> impl Iterator<Item = &ArrowButton>
  {
    self
      .leading
      .iter()
      .chain(self.trailing.iter())
  }

  pub fn button(
    &self,
    action: Action
  ) -> Option<&ArrowButton> {
    self
      .buttons()
      .find(|btn| btn.action == action)
  }
}

#[derive(Debug)]
pub struct Header {
  props:      HeaderProps,
  navigation: Navigation,
  dialog:     DialogState
}

impl Header {
  pub fn new(props: HeaderProps) -> Self {
    let navigation = Navigation::compute(
      props.view,
      props.active_start_date,
      &props.bounds
    );
    Self {
      props,
      navigation,
      dialog: DialogState::default()
    }
  }

  pub fn props(&self) -> &HeaderProps {
    &self.props
  }

  pub fn navigation(&self) -> &Navigation {
    &self.navigation
  }

  pub fn dialog(&self) -> &DialogState {
    &self.dialog
  }

  pub fn dialog_mut(
    &mut self
  ) -> &mut DialogState {
    &mut self.dialog
  }

  fn recompute(&mut self) {
    self.navigation = Navigation::compute(
      self.props.view,
      self.props.active_start_date,
      &self.props.bounds
    );
  }

  /// The parent moved the calendar; the
  /// header follows.
  pub fn set_active_start_date(
    &mut self,
    date: NaiveDateTime
  ) {
    self.props.active_start_date = date;
    self.recompute();
  }

  pub fn set_view(&mut self, view: View) {
    self.props.view = view;
    self.recompute();
  }

  pub fn drill_up_available(&self) -> bool {
    drill_up_available(
      &self.props.views,
      self.props.view
    )
  }

  fn label_for(
    &self,
    date: NaiveDateTime
  ) -> String {
    render_label(
      self.props.view,
      date,
      self.props.locale.as_deref(),
      self.props.formatter.as_ref(),
      self.props.navigation_label.as_deref()
    )
  }

  fn arrow(
    &self,
    action: Action
  ) -> Option<ArrowButton> {
    if !self.navigation.is_shown(action) {
      return None;
    }
    let text =
      self.props.labels.get(action)?;
    Some(ArrowButton {
      action,
      text: text.to_string(),
      aria_label: self
        .props
        .aria
        .get(action)
        .to_string(),
      disabled: self
        .navigation
        .is_disabled(action),
      target: self
        .navigation
        .candidate(action)
    })
  }

  pub fn layout(&self) -> HeaderLayout {
    let to = if self.props.show_double_view
    {
      self
        .navigation
        .next
        .map(|next| self.label_for(next))
    } else {
      None
    };

    HeaderLayout {
      view:              self.props.view,
      active_start_date: self
        .props
        .active_start_date,
      leading:           [
        Action::Prev2,
        Action::Prev
      ]
      .into_iter()
      .filter_map(|action| {
        self.arrow(action)
      })
      .collect(),
      label:             LabelButton {
        from: self.label_for(
          self.props.active_start_date
        ),
        to,
        aria_label: self
          .props
          .aria
          .navigation
          .clone(),
        aria_live: self.props.aria.live,
        disabled: !self
          .drill_up_available()
      },
      trailing:          [
        Action::Next,
        Action::Next2
      ]
      .into_iter()
      .filter_map(|action| {
        self.arrow(action)
      })
      .collect(),
      dialog_open:       self
        .dialog
        .is_open()
    }
  }

  /// Presses an arrow button. Fires the
  /// handler only for a rendered, enabled
  /// button and reports whether it did.
  pub fn click(
    &self,
    action: Action,
    handler: &mut dyn NavigationHandler
  ) -> bool {
    if self.props.labels.get(action).is_none()
    {
      debug!(%action, "button hidden");
      return false;
    }
    match self.navigation.target(action) {
      | Some(target) => {
        info!(
          %action,
          %target,
          "navigating"
        );
        handler.set_active_start_date(
          target, action
        );
        true
      }
      | None => {
        debug!(%action, "button disabled");
        false
      }
    }
  }

  /// Presses the label: opens the picker
  /// dialog when the label is enabled.
  pub fn click_label(&mut self) -> bool {
    if !self.drill_up_available() {
      return false;
    }
    self
      .dialog
      .open(self.props.picker_initial.clone());
    true
  }

  pub fn drill_up(
    &self,
    handler: &mut dyn NavigationHandler
  ) -> bool {
    if !self.drill_up_available() {
      return false;
    }
    handler.drill_up();
    true
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    NaiveDate,
    NaiveTime
  };

  use super::*;
  use crate::label::LabelContext;
  use crate::picker::PickerField;

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

  #[derive(Default)]
  struct Recorder {
    moves:     Vec<(NaiveDateTime, Action)>,
    drill_ups: usize
  }

  impl NavigationHandler for Recorder {
    fn set_active_start_date(
      &mut self,
      date: NaiveDateTime,
      action: Action
    ) {
      self.moves.push((date, action));
    }

    fn drill_up(&mut self) {
      self.drill_ups += 1;
    }
  }

  #[test]
  fn layout_orders_buttons() {
    let mut props =
      HeaderProps::new(at(2024, 8, 1), View::Month);
    props.locale = Some("en-US".to_string());
    let header = Header::new(props);
    let layout = header.layout();

    let leading: Vec<_> = layout
      .leading
      .iter()
      .map(|btn| btn.text.as_str())
      .collect();
    let trailing: Vec<_> = layout
      .trailing
      .iter()
      .map(|btn| btn.text.as_str())
      .collect();
    assert_eq!(leading, ["«", "‹"]);
    assert_eq!(trailing, ["›", "»"]);
    assert_eq!(layout.label.from, "August 2024");
    assert_eq!(layout.label.to, None);
    assert!(!layout.label.disabled);
  }

  #[test]
  fn century_layout_has_single_arrows() {
    let header = Header::new(
      HeaderProps::new(
        at(2001, 1, 1),
        View::Century
      )
    );
    let layout = header.layout();
    assert_eq!(layout.leading.len(), 1);
    assert_eq!(layout.trailing.len(), 1);
    assert!(layout.label.disabled);
    assert_eq!(
      layout.label.from,
      "2001 – 2100"
    );
  }

  #[test]
  fn hidden_label_removes_button() {
    let mut props =
      HeaderProps::new(at(2024, 8, 1), View::Year);
    props.labels.prev2 = None;
    let header = Header::new(props);
    assert!(
      header
        .layout()
        .button(Action::Prev2)
        .is_none()
    );
    let mut recorder = Recorder::default();
    assert!(
      !header.click(Action::Prev2, &mut recorder)
    );
    assert!(recorder.moves.is_empty());
  }

  #[test]
  fn click_respects_bounds() {
    let mut props =
      HeaderProps::new(at(2024, 8, 1), View::Month);
    props.bounds = Bounds {
      min_date: Some(at(2024, 8, 1)),
      max_date: Some(at(2024, 12, 31))
    };
    let header = Header::new(props);
    let mut recorder = Recorder::default();

    assert!(
      !header.click(Action::Prev, &mut recorder)
    );
    assert!(
      header.click(Action::Next, &mut recorder)
    );
    assert!(
      !header.click(Action::Next2, &mut recorder)
    );
    assert_eq!(
      recorder.moves,
      vec![(at(2024, 9, 1), Action::Next)]
    );
  }

  #[test]
  fn double_view_labels_next_period() {
    let mut props =
      HeaderProps::new(at(2024, 12, 1), View::Month);
    props.locale = Some("en-US".to_string());
    props.show_double_view = true;
    let header = Header::new(props);
    assert_eq!(
      header.layout().label.to.as_deref(),
      Some("January 2025")
    );
  }

  #[test]
  fn override_replaces_label() {
    let mut props =
      HeaderProps::new(at(2024, 8, 1), View::Decade);
    props.navigation_label =
      Some(Box::new(|ctx: &LabelContext| {
        format!("<{}>", ctx.label)
      }));
    let header = Header::new(props);
    assert_eq!(
      header.layout().label.from,
      "<2021 – 2030>"
    );
  }

  #[test]
  fn label_opens_dialog_and_ok_discards() {
    let mut header = Header::new(
      HeaderProps::new(at(2024, 8, 1), View::Month)
    );
    assert!(header.click_label());
    assert!(header.layout().dialog_open);

    header
      .dialog_mut()
      .set_field(PickerField::Month, "02");
    assert_eq!(
      header
        .dialog()
        .selection()
        .map(|sel| sel.day.as_str()),
      Some("12")
    );

    header.dialog_mut().confirm();
    assert!(!header.layout().dialog_open);
    assert_eq!(
      header.props().active_start_date,
      at(2024, 8, 1)
    );
  }

  #[test]
  fn drill_up_calls_handler_when_available() {
    let mut recorder = Recorder::default();
    let mut header = Header::new(
      HeaderProps::new(at(2024, 8, 1), View::Month)
    );
    assert!(header.drill_up(&mut recorder));

    header.set_view(View::Century);
    assert!(!header.drill_up(&mut recorder));
    assert!(!header.click_label());
    assert_eq!(recorder.drill_ups, 1);
  }

  #[test]
  fn follows_parent_updates() {
    let mut header = Header::new(
      HeaderProps::new(at(2024, 8, 1), View::Year)
    );
    header.set_active_start_date(at(2030, 1, 1));
    assert_eq!(
      header.navigation().next,
      Some(at(2031, 1, 1))
    );
  }
}
