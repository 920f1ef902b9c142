use std::rc::Rc;

use calnav_core::config::Config;
use calnav_core::datetime::{
  midnight,
  today_in_timezone
};
use calnav_core::view::drill_up_target;
use calnav_core::{
  Action,
  View,
  dates
};
use chrono::NaiveDateTime;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_memo,
  use_state
};

use crate::components::{
  NavigationHeader,
  ViewSwitch
};

const CALNAV_CONFIG_TOML: &str =
  include_str!("../assets/calnav.toml");

fn load_calnav_config() -> Config {
  match Config::from_toml_str(
    CALNAV_CONFIG_TOML,
    "assets/calnav.toml"
  ) {
    | Ok(cfg) => cfg,
    | Err(error) => {
      tracing::error!(
        error = %format!("{error:#}"),
        "failed to parse calnav config; \
         using defaults"
      );
      Config::default()
    }
  }
}

/// Start of the period of `view` holding
/// `date`, or `date` itself when it falls
/// outside the supported range.
fn period_start(
  view: View,
  date: NaiveDateTime
) -> NaiveDateTime {
  dates::begin(view, date).unwrap_or(date)
}

#[function_component(App)]
pub fn app() -> Html {
  let config =
    use_memo((), |_| load_calnav_config());
  let config: Rc<Config> = config.clone();

  let initial_view = config
    .views
    .last()
    .copied()
    .unwrap_or(View::Month);
  let view = use_state(|| initial_view);
  let active_start_date = {
    let timezone = config.timezone();
    use_state(move || {
      period_start(
        initial_view,
        midnight(today_in_timezone(
          timezone
        ))
      )
    })
  };

  let on_set_active_start_date = {
    let active_start_date =
      active_start_date.clone();
    let view = view.clone();
    Callback::from(
      move |(date, action): (
        NaiveDateTime,
        Action
      )| {
        let from = *active_start_date;
        let current = *view;
        tracing::debug!(
          %from,
          to = %date,
          view = %current,
          %action,
          "calendar moved"
        );
        active_start_date.set(date);
      }
    )
  };

  let on_drill_up = {
    let active_start_date =
      active_start_date.clone();
    let view = view.clone();
    let views = config.views.clone();
    Callback::from(move |()| {
      let current = *view;
      let Some(target) =
        drill_up_target(&views, current)
      else {
        tracing::debug!(
          view = %current,
          "no coarser view"
        );
        return;
      };
      active_start_date.set(period_start(
        target,
        *active_start_date
      ));
      view.set(target);
    })
  };

  let on_select_view = {
    let active_start_date =
      active_start_date.clone();
    let view = view.clone();
    Callback::from(move |next: View| {
      let current = *view;
      tracing::debug!(
        from = %current,
        to = %next,
        "view switched"
      );
      active_start_date.set(period_start(
        next,
        *active_start_date
      ));
      view.set(next);
    })
  };

  html! {
      <div class="calnav">
          <ViewSwitch
              views={config.views.clone()}
              active={*view}
              on_select={on_select_view}
          />
          <NavigationHeader
              config={config.clone()}
              active_start_date={*active_start_date}
              view={*view}
              on_set_active_start_date={on_set_active_start_date}
              on_drill_up={on_drill_up}
          />
      </div>
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn bundled_config_parses() {
    let cfg = Config::from_toml_str(
      CALNAV_CONFIG_TOML,
      "assets/calnav.toml"
    )
    .expect("bundled config");
    assert_eq!(
      cfg.views,
      View::all().to_vec()
    );
    assert_eq!(
      cfg.picker_initial().to_string(),
      "1989-08-12"
    );
  }

  #[test]
  fn period_start_snaps_to_view() {
    let date = NaiveDate::from_ymd_opt(
      2024, 8, 17
    )
    .expect("valid date");
    assert_eq!(
      period_start(
        View::Decade,
        midnight(date)
      ),
      midnight(
        NaiveDate::from_ymd_opt(2021, 1, 1)
          .expect("valid date")
      )
    );
  }
}
