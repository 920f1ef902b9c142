use calnav_core::picker::{
  month_labels,
  year_labels
};
use calnav_core::{
  PickerField,
  PickerSelection
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PickerDialogProps {
  pub selection:  PickerSelection,
  pub first_year: i32,
  pub year_count: u32,
  pub on_change:
    Callback<(PickerSelection, PickerField)>,
  pub on_confirm: Callback<()>,
  pub on_close:   Callback<()>
}

fn column(
  props: &PickerDialogProps,
  field: PickerField,
  title: &str,
  options: Vec<String>
) -> Html {
  let current = props.selection.clone();
  let on_change = props.on_change.clone();
  let selected =
    props.selection.get(field).to_string();
  let onchange = Callback::from(
    move |e: web_sys::Event| {
      if let Some(input) = e
        .target_dyn_into::<
          web_sys::HtmlSelectElement
        >()
      {
        on_change.emit((
          current.with(field, input.value()),
          field
        ));
      } else {
        tracing::warn!(
          %field,
          "picker change event had \
           non-select target"
        );
      }
    }
  );

  html! {
      <div class="field">
          <label>{ title.to_string() }</label>
          <select class={format!("calnav-picker__{field}")} {onchange}>
              { for options.into_iter().map(|option| {
                  let is_selected = option == selected;
                  html! {
                      <option value={option.clone()} selected={is_selected}>{ option }</option>
                  }
              }) }
          </select>
      </div>
  }
}

#[function_component(PickerDialog)]
pub fn picker_dialog(
  props: &PickerDialogProps
) -> Html {
  let on_backdrop = {
    let on_close = props.on_close.clone();
    Callback::from(move |_: MouseEvent| {
      on_close.emit(());
    })
  };
  let on_ok = {
    let on_confirm =
      props.on_confirm.clone();
    Callback::from(move |_: MouseEvent| {
      on_confirm.emit(());
    })
  };

  html! {
      <div class="modal-backdrop" onclick={on_backdrop}>
          <div class="modal modal-sm calnav-picker" onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}>
              <div class="header">{ "Choose a date" }</div>
              <div class="content calnav-picker__columns">
                  { column(props, PickerField::Year, "Year", year_labels(props.first_year, props.year_count)) }
                  { column(props, PickerField::Month, "Month", month_labels()) }
                  { column(props, PickerField::Day, "Day", props.selection.day_labels()) }
              </div>
              <div class="footer">
                  <button type="button" class="btn" onclick={on_ok}>{ "OK" }</button>
              </div>
          </div>
      </div>
  }
}
