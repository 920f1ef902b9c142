use crate::picker::{
  PickerField,
  PickerSelection
};

/// Open/closed state of the picker
/// dialog. The pending selection lives
/// only while the dialog is open.
#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub enum DialogState {
  #[default]
  Closed,
  Open {
    selection: PickerSelection
  }
}

impl DialogState {
  pub fn is_open(&self) -> bool {
    matches!(self, Self::Open { .. })
  }

  pub fn selection(
    &self
  ) -> Option<&PickerSelection> {
    match self {
      | Self::Open { selection } => {
        Some(selection)
      }
      | Self::Closed => None
    }
  }

  pub fn open(
    &mut self,
    initial: PickerSelection
  ) {
    if self.is_open() {
      return;
    }
    tracing::debug!(
      initial = %initial,
      "opening picker dialog"
    );
    *self = Self::Open {
      selection: initial
    };
  }

  /// Feeds one column change through the
  /// day clamp. Ignored while closed.
  pub fn change(
    &mut self,
    new: PickerSelection,
    field: PickerField
  ) {
    if let Self::Open { selection } =
      self
    {
      *selection =
        PickerSelection::on_field_change(
          new, field
        );
    }
  }

  pub fn set_field(
    &mut self,
    field: PickerField,
    value: &str
  ) {
    if let Some(current) =
      self.selection()
    {
      let new = current.with(field, value);
      self.change(new, field);
    }
  }

  /// Dismisses the dialog, dropping the
  /// pending selection.
  pub fn close(&mut self) {
    if let Self::Open { selection } =
      std::mem::take(self)
    {
      tracing::debug!(
        discarded = %selection,
        "closed picker dialog"
      );
    }
  }

  /// The OK button. Closes like
  /// [`Self::close`]; the selection is
  /// not written back to the calendar.
  pub fn confirm(&mut self) {
    self.close();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lifecycle_discards_selection() {
    let mut dialog =
      DialogState::default();
    assert!(!dialog.is_open());

    dialog.open(PickerSelection::default());
    dialog.set_field(
      PickerField::Day,
      "31"
    );
    dialog.set_field(
      PickerField::Month,
      "09"
    );
    assert_eq!(
      dialog
        .selection()
        .map(|sel| sel.to_string()),
      Some("1989-09-30".to_string())
    );

    dialog.confirm();
    assert_eq!(
      dialog,
      DialogState::Closed
    );
    assert_eq!(dialog.selection(), None);
  }

  #[test]
  fn changes_while_closed_are_ignored() {
    let mut dialog =
      DialogState::default();
    dialog.change(
      PickerSelection::default(),
      PickerField::Year
    );
    assert_eq!(
      dialog,
      DialogState::Closed
    );
  }

  #[test]
  fn reopening_keeps_pending_value() {
    let mut dialog =
      DialogState::default();
    dialog.open(PickerSelection::default());
    dialog.set_field(
      PickerField::Year,
      "2000"
    );
    dialog.open(PickerSelection::default());
    assert_eq!(
      dialog
        .selection()
        .map(|sel| sel.year.as_str()),
      Some("2000")
    );
  }
}
