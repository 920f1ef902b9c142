mod navigation_header;
mod picker_dialog;

pub use navigation_header::NavigationHeader;
pub use picker_dialog::PickerDialog;

use calnav_core::View;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ViewSwitchProps {
  pub views:     Vec<View>,
  pub active:    View,
  pub on_select: Callback<View>
}

#[function_component(ViewSwitch)]
pub fn view_switch(
  props: &ViewSwitchProps
) -> Html {
  html! {
      <div class="calnav-view-switch">
          { for props.views.iter().map(|view| {
              let view = *view;
              let on_select = props.on_select.clone();
              let class = if view == props.active { "btn active" } else { "btn" };
              html! {
                  <button type="button" class={class} onclick={move |_| on_select.emit(view)}>
                      { view.to_string() }
                  </button>
              }
          }) }
      </div>
  }
}
