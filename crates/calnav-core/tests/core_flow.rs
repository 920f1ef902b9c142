use std::fs;

use calnav_core::config::Config;
use calnav_core::datetime::parse_date_arg;
use calnav_core::{Action, Bounds, Header, NavigationHandler, PickerField, View};
use chrono::NaiveDateTime;
use tempfile::tempdir;

#[derive(Default)]
struct Calendar {
    active: Option<NaiveDateTime>,
    history: Vec<Action>,
}

impl NavigationHandler for Calendar {
    fn set_active_start_date(&mut self, date: NaiveDateTime, action: Action) {
        self.active = Some(date);
        self.history.push(action);
    }

    fn drill_up(&mut self) {}
}

#[test]
fn config_file_drives_header_and_navigation() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("calnav.toml");
    fs::write(
        &path,
        r#"
locale = "en-US"
views = ["decade", "year", "month"]

[labels]
prev2 = ""

[picker]
initial = "2021-01-31"
"#,
    )
    .expect("write config");

    let cfg = Config::load(Some(&path)).expect("load config");
    assert_eq!(cfg.loaded_files, vec![path.clone()]);

    let start = parse_date_arg("2024-03-01").expect("date");
    let mut props = cfg.header_props(start, View::Month);
    props.bounds = Bounds {
        min_date: Some(parse_date_arg("2024-01-15").expect("min")),
        max_date: None,
    };
    let mut header = Header::new(props);

    let layout = header.layout();
    assert!(layout.button(Action::Prev2).is_none());
    assert_eq!(layout.label.from, "March 2024");

    // Walk back until the floor stops us.
    let mut calendar = Calendar::default();
    while header.click(Action::Prev, &mut calendar) {
        let date = calendar.active.expect("moved");
        header.set_active_start_date(date);
    }
    assert_eq!(calendar.history, vec![Action::Prev, Action::Prev]);
    assert_eq!(header.layout().label.from, "January 2024");

    // The picker starts from the configured value and clamps on month change.
    assert!(header.click_label());
    header.dialog_mut().set_field(PickerField::Month, "02");
    assert_eq!(
        header.dialog().selection().map(|sel| sel.to_string()),
        Some("2021-02-28".to_string())
    );
    header.dialog_mut().close();
    assert!(!header.dialog().is_open());
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let err = Config::load(Some(&temp.path().join("absent.toml"))).expect_err("missing file");
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn invalid_view_in_config_fails_to_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("calnav.toml");
    fs::write(&path, "views = [\"month\", \"fortnight\"]\n").expect("write config");
    assert!(Config::load(Some(&path)).is_err());
}
