use std::rc::Rc;

use calnav_core::config::Config;
use calnav_core::header::{
  ArrowButton,
  LabelButton
};
use calnav_core::label::{
  LabelContext,
  NavigationLabel
};
use calnav_core::{
  Action,
  Bounds,
  DialogState,
  Header,
  NavigationHandler,
  PickerField,
  PickerSelection,
  View
};
use chrono::NaiveDateTime;
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_state
};

use super::PickerDialog;

const CLASS_PREFIX: &str =
  "calnav-navigation";

#[derive(Properties, PartialEq)]
pub struct NavigationHeaderProps {
  pub config:            Rc<Config>,
  pub active_start_date: NaiveDateTime,
  pub view:              View,
  #[prop_or_default]
  pub min_date:          Option<NaiveDateTime>,
  #[prop_or_default]
  pub max_date:          Option<NaiveDateTime>,
  pub on_set_active_start_date:
    Callback<(NaiveDateTime, Action)>,
  pub on_drill_up:       Callback<()>,
  #[prop_or_default]
  pub navigation_label:
    Option<Callback<LabelContext, String>>
}

/// Forwards header events to the owning
/// component's callbacks.
struct CallbackHandler {
  on_set_active_start_date:
    Callback<(NaiveDateTime, Action)>,
  on_drill_up: Callback<()>
}

impl NavigationHandler for CallbackHandler {
  fn set_active_start_date(
    &mut self,
    date: NaiveDateTime,
    action: Action
  ) {
    self
      .on_set_active_start_date
      .emit((date, action));
  }

  fn drill_up(&mut self) {
    self.on_drill_up.emit(());
  }
}

fn build_header(
  props: &NavigationHeaderProps
) -> Header {
  let mut header_props =
    props.config.header_props(
      props.active_start_date,
      props.view
    );
  header_props.bounds = Bounds {
    min_date: props.min_date,
    max_date: props.max_date
  };
  if let Some(label) =
    props.navigation_label.clone()
  {
    let label: Box<dyn NavigationLabel> =
      Box::new(move |ctx: &LabelContext| {
        label.emit(ctx.clone())
      });
    header_props.navigation_label =
      Some(label);
  }
  Header::new(header_props)
}

fn arrow_button(
  header: &Rc<Header>,
  button: &ArrowButton,
  props: &NavigationHeaderProps
) -> Html {
  let action = button.action;
  let onclick = {
    let header = header.clone();
    let on_set_active_start_date = props
      .on_set_active_start_date
      .clone();
    let on_drill_up =
      props.on_drill_up.clone();
    Callback::from(move |_: MouseEvent| {
      let mut handler = CallbackHandler {
        on_set_active_start_date:
          on_set_active_start_date
            .clone(),
        on_drill_up: on_drill_up.clone()
      };
      header.click(action, &mut handler);
    })
  };

  html! {
      <button
          type="button"
          class={format!("{CLASS_PREFIX}__arrow {CLASS_PREFIX}__{action}-button")}
          aria-label={button.aria_label.clone()}
          disabled={button.disabled}
          {onclick}
      >
          { button.text.clone() }
      </button>
  }
}

/// `(class, text)` for each span inside
/// the label button. A double view gets
/// from, divider and to spans.
fn label_spans(
  label: &LabelButton
) -> Vec<(String, String)> {
  let text_class =
    format!("{CLASS_PREFIX}__label__labelText");
  match &label.to {
    | Some(to) => {
      vec![
        (
          format!(
            "{text_class} \
             {text_class}--from"
          ),
          label.from.clone()
        ),
        (
          format!(
            "{CLASS_PREFIX}__label__divider"
          ),
          " – ".to_string()
        ),
        (
          format!(
            "{text_class} {text_class}--to"
          ),
          to.clone()
        )
      ]
    }
    | None => {
      vec![(text_class, label.from.clone())]
    }
  }
}

#[function_component(NavigationHeader)]
pub fn navigation_header(
  props: &NavigationHeaderProps
) -> Html {
  let dialog =
    use_state(DialogState::default);
  let header = Rc::new(build_header(props));
  let layout = header.layout();

  let on_label_click = {
    let dialog = dialog.clone();
    let enabled =
      header.drill_up_available();
    let initial = header
      .props()
      .picker_initial
      .clone();
    Callback::from(move |_: MouseEvent| {
      if !enabled {
        return;
      }
      let mut next = (*dialog).clone();
      next.open(initial.clone());
      dialog.set(next);
    })
  };

  let on_picker_change = {
    let dialog = dialog.clone();
    Callback::from(
      move |(selection, field): (
        PickerSelection,
        PickerField
      )| {
        let mut next = (*dialog).clone();
        next.change(selection, field);
        dialog.set(next);
      }
    )
  };

  let on_picker_confirm = {
    let dialog = dialog.clone();
    Callback::from(move |()| {
      let mut next = (*dialog).clone();
      next.confirm();
      dialog.set(next);
    })
  };

  let on_picker_close = {
    let dialog = dialog.clone();
    Callback::from(move |()| {
      let mut next = (*dialog).clone();
      next.close();
      dialog.set(next);
    })
  };

  let aria_live = layout
    .label
    .aria_live
    .map(|live| live.as_key().to_string());

  html! {
      <div class={CLASS_PREFIX}>
          { for layout.leading.iter().map(|button| arrow_button(&header, button, props)) }
          <button
              type="button"
              class={format!("{CLASS_PREFIX}__label")}
              aria-label={layout.label.aria_label.clone()}
              aria-live={aria_live}
              disabled={layout.label.disabled}
              onclick={on_label_click}
          >
              { for label_spans(&layout.label).into_iter().map(|(class, text)| html! {
                  <span class={class}>{ text }</span>
              }) }
          </button>
          { for layout.trailing.iter().map(|button| arrow_button(&header, button, props)) }
          {
              if let Some(selection) = dialog.selection() {
                  html! {
                      <PickerDialog
                          selection={selection.clone()}
                          first_year={header.props().picker_first_year}
                          year_count={header.props().picker_year_count}
                          on_change={on_picker_change}
                          on_confirm={on_picker_confirm}
                          on_close={on_picker_close}
                      />
                  }
              } else {
                  html! {}
              }
          }
      </div>
  }
}
