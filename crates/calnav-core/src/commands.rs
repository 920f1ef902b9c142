use anyhow::{Context, anyhow};
use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};

use crate::cli::{Command, NavArgs, PickArgs};
use crate::config::Config;
use crate::dates;
use crate::datetime::{midnight, parse_date_arg, today_in_timezone};
use crate::header::{Header, NavigationHandler};
use crate::navigation::{Action, Bounds};
use crate::picker::{PickerSelection, day_labels};
use crate::render::Renderer;
use crate::view::{View, drill_up_target, parse_views};

#[instrument(skip(cfg, renderer, command))]
pub fn dispatch(cfg: &Config, renderer: &mut Renderer, command: Command) -> anyhow::Result<()> {
    debug!(?command, "dispatching command");

    match command {
        Command::Show(nav) => cmd_show(cfg, renderer, &nav),
        Command::Go { action, nav } => cmd_go(cfg, renderer, action, &nav),
        Command::Up { view, views } => cmd_up(cfg, renderer, view, views.as_deref()),
        Command::Pick(args) => cmd_pick(cfg, renderer, args),
        Command::Days { year, month } => cmd_days(renderer, year, month),
    }
}

fn parse_optional_date(raw: Option<&str>, what: &str) -> anyhow::Result<Option<NaiveDateTime>> {
    raw.map(|value| parse_date_arg(value).with_context(|| format!("invalid {what}")))
        .transpose()
}

/// Builds the header the way a parent calendar would: the active start date
/// is always the start of the period containing the requested date.
fn build_header(cfg: &Config, nav: &NavArgs) -> anyhow::Result<Header> {
    let date = match parse_optional_date(nav.date.as_deref(), "--date")? {
        Some(date) => date,
        None => midnight(today_in_timezone(cfg.timezone())),
    };
    let active_start_date = dates::begin(nav.view, date)
        .ok_or_else(|| anyhow!("{date} is outside the supported calendar range"))?;

    let mut props = cfg.header_props(active_start_date, nav.view);
    props.bounds = Bounds {
        min_date: parse_optional_date(nav.min_date.as_deref(), "--min-date")?,
        max_date: parse_optional_date(nav.max_date.as_deref(), "--max-date")?,
    };
    if nav.double {
        props.show_double_view = true;
    }
    if let Some(locale) = &nav.locale {
        props.locale = Some(locale.clone());
    }
    Ok(Header::new(props))
}

fn cmd_show(cfg: &Config, renderer: &mut Renderer, nav: &NavArgs) -> anyhow::Result<()> {
    let header = build_header(cfg, nav)?;
    renderer.print_header(&header.layout())
}

/// Stands in for the parent calendar: records where a button click sent it.
#[derive(Debug, Default)]
struct CliCalendar {
    moved_to: Option<(NaiveDateTime, Action)>,
    drilled_up: bool,
}

impl NavigationHandler for CliCalendar {
    fn set_active_start_date(&mut self, date: NaiveDateTime, action: Action) {
        self.moved_to = Some((date, action));
    }

    fn drill_up(&mut self) {
        self.drilled_up = true;
    }
}

fn cmd_go(
    cfg: &Config,
    renderer: &mut Renderer,
    action: Action,
    nav: &NavArgs,
) -> anyhow::Result<()> {
    let mut header = build_header(cfg, nav)?;
    let mut calendar = CliCalendar::default();

    if !header.click(action, &mut calendar) {
        return Err(anyhow!(
            "the {action} button is {} for the {} view",
            if header.navigation().is_shown(action) {
                "disabled"
            } else {
                "not available"
            },
            nav.view
        ));
    }

    let Some((date, _)) = calendar.moved_to else {
        return Err(anyhow!("navigation produced no target"));
    };
    info!(%action, %date, "moved active start date");
    header.set_active_start_date(date);
    renderer.print_header(&header.layout())
}

fn cmd_up(
    cfg: &Config,
    renderer: &mut Renderer,
    view: View,
    views: Option<&str>,
) -> anyhow::Result<()> {
    let views = match views {
        Some(raw) => parse_views(raw)?,
        None => cfg.views.clone(),
    };
    let mut props = cfg.header_props(midnight(today_in_timezone(cfg.timezone())), view);
    props.views = views;
    let header = Header::new(props);

    let target = drill_up(&header)?;
    renderer.print_drill_up(view, target)
}

/// Presses drill-up on `header` and returns the coarser view it leads to.
fn drill_up(header: &Header) -> anyhow::Result<View> {
    let view = header.props().view;
    let mut calendar = CliCalendar::default();
    if !header.drill_up(&mut calendar) {
        return Err(anyhow!("cannot drill up from the {view} view"));
    }
    let target = drill_up_target(&header.props().views, view)
        .ok_or_else(|| anyhow!("no view above {view}"))?;
    debug!(drilled_up = calendar.drilled_up, %target, "drill up");
    Ok(target)
}

fn cmd_pick(cfg: &Config, renderer: &mut Renderer, args: PickArgs) -> anyhow::Result<()> {
    let mut selection = cfg.picker_initial();
    if let Some(year) = args.year {
        selection.year = year;
    }
    if let Some(month) = args.month {
        selection.month = month;
    }
    if let Some(day) = args.day {
        selection.day = day;
    }

    if !renderer.is_json() {
        renderer.print_selection(None, &selection)?;
    }

    for change in &args.changes {
        let proposed = selection.with(change.field, change.value.as_str());
        selection = PickerSelection::on_field_change(proposed, change.field);
        if !renderer.is_json() {
            renderer.print_selection(Some((change.field, change.value.as_str())), &selection)?;
        }
    }

    if renderer.is_json() {
        renderer.print_selection(None, &selection)?;
    }
    debug!(selection = %selection, "picker finished");
    Ok(())
}

fn cmd_days(renderer: &mut Renderer, year: i32, month: u32) -> anyhow::Result<()> {
    let days = day_labels(&year.to_string(), &month.to_string());
    if days.is_empty() {
        return Err(anyhow!("invalid month: {month}"));
    }
    renderer.print_days(&days)
}
