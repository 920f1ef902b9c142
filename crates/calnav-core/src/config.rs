use std::fs;
use std::path::{
  Path,
  PathBuf
};

use anyhow::{
  Context,
  anyhow
};
use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  debug,
  info,
  warn
};

use crate::datetime::{
  DEFAULT_TIMEZONE,
  parse_date_arg,
  parse_timezone
};
use crate::header::{
  ArrowLabels,
  AriaLabels,
  AriaLive,
  HeaderProps
};
use crate::picker::{
  DEFAULT_FIRST_YEAR,
  DEFAULT_YEAR_COUNT,
  PickerSelection
};
use crate::view::{
  View,
  default_views,
  parse_views
};

pub const CONFIG_FILE: &str =
  "calnav.toml";
pub const CONFIG_ENV_VAR: &str =
  "CALNAV_CONFIG";

fn default_timezone() -> String {
  DEFAULT_TIMEZONE.to_string()
}

fn default_true() -> bool {
  true
}

fn default_picker_initial() -> String {
  PickerSelection::default().to_string()
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct LabelsSection {
  pub prev:  String,
  pub prev2: String,
  pub next:  String,
  pub next2: String
}

impl Default for LabelsSection {
  fn default() -> Self {
    Self {
      prev:  "‹".to_string(),
      prev2: "«".to_string(),
      next:  "›".to_string(),
      next2: "»".to_string()
    }
  }
}

#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct AriaSection {
  pub prev:       String,
  pub prev2:      String,
  pub next:       String,
  pub next2:      String,
  pub navigation: String,
  pub live:       Option<AriaLive>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
#[serde(default)]
pub struct PickerSection {
  pub first_year: i32,
  pub year_count: u32,
  pub initial:    String
}

impl Default for PickerSection {
  fn default() -> Self {
    Self {
      first_year: DEFAULT_FIRST_YEAR,
      year_count: DEFAULT_YEAR_COUNT,
      initial:    default_picker_initial()
    }
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct Config {
  #[serde(default)]
  pub locale:           Option<String>,
  #[serde(default = "default_timezone")]
  pub timezone:         String,
  #[serde(default = "default_views")]
  pub views:            Vec<View>,
  #[serde(default)]
  pub show_double_view: bool,
  #[serde(default = "default_true")]
  pub color:            bool,
  #[serde(default)]
  pub labels:           LabelsSection,
  #[serde(default)]
  pub aria:             AriaSection,
  #[serde(default)]
  pub picker:           PickerSection,
  #[serde(skip)]
  pub loaded_files:     Vec<PathBuf>
}

impl Default for Config {
  fn default() -> Self {
    Self {
      locale:           None,
      timezone:         default_timezone(),
      views:            default_views(),
      show_double_view: false,
      color:            true,
      labels:           LabelsSection::default(),
      aria:             AriaSection::default(),
      picker:           PickerSection::default(),
      loaded_files:     vec![]
    }
  }
}

fn label_or_hidden(
  raw: &str
) -> Option<String> {
  (!raw.is_empty())
    .then(|| raw.to_string())
}

impl Config {
  /// Parses and sanitises a TOML
  /// document; `source` only labels log
  /// and error messages.
  pub fn from_toml_str(
    raw: &str,
    source: &str
  ) -> anyhow::Result<Self> {
    let mut cfg =
      toml::from_str::<Self>(raw)
        .with_context(|| {
          format!(
            "failed parsing {source}"
          )
        })?;
    cfg.sanitize();
    debug!(
      source,
      views = ?cfg.views,
      locale = ?cfg.locale,
      "parsed config"
    );
    Ok(cfg)
  }

  #[tracing::instrument(skip(
    config_override
  ))]
  pub fn load(
    config_override: Option<&Path>
  ) -> anyhow::Result<Self> {
    let Some(path) =
      resolve_config_path(config_override)
    else {
      warn!(
        "no config file found; using \
         defaults"
      );
      return Ok(Self::default());
    };

    if !path.exists() {
      if config_override.is_some() {
        return Err(anyhow!(
          "config file {} does not \
           exist",
          path.display()
        ));
      }
      info!(file = %path.display(), "config file not found; using defaults");
      return Ok(Self::default());
    }

    info!(file = %path.display(), "loading config");
    let text = fs::read_to_string(&path)
      .with_context(|| {
        format!(
          "failed to read {}",
          path.display()
        )
      })?;
    let mut cfg = Self::from_toml_str(
      &text,
      &path.display().to_string()
    )?;
    cfg.loaded_files.push(path);
    Ok(cfg)
  }

  /// Applies `key=value` overrides such as
  /// `labels.prev=<` or `locale=fr-FR`.
  #[tracing::instrument(skip(
    self, overrides
  ))]
  pub fn apply_overrides<I>(
    &mut self,
    overrides: I
  ) -> anyhow::Result<()>
  where
    I: IntoIterator<
      Item = (String, String)
    >
  {
    for (k, v) in overrides {
      let key = k
        .strip_prefix("rc.")
        .unwrap_or(&k)
        .to_string();
      debug!(key = %key, value = %v, "applying override");
      self.set(&key, v)?;
    }
    self.sanitize();
    Ok(())
  }

  fn set(
    &mut self,
    key: &str,
    value: String
  ) -> anyhow::Result<()> {
    match key {
      | "locale" => {
        self.locale = Some(value)
      }
      | "timezone" => {
        self.timezone = value
      }
      | "views" => {
        self.views = parse_views(&value)?
      }
      | "show_double_view" => {
        self.show_double_view =
          parse_bool(&value)
      }
      | "color" => {
        self.color = parse_bool(&value)
      }
      | "labels.prev" => {
        self.labels.prev = value
      }
      | "labels.prev2" => {
        self.labels.prev2 = value
      }
      | "labels.next" => {
        self.labels.next = value
      }
      | "labels.next2" => {
        self.labels.next2 = value
      }
      | "aria.prev" => {
        self.aria.prev = value
      }
      | "aria.prev2" => {
        self.aria.prev2 = value
      }
      | "aria.next" => {
        self.aria.next = value
      }
      | "aria.next2" => {
        self.aria.next2 = value
      }
      | "aria.navigation" => {
        self.aria.navigation = value
      }
      | "aria.live" => {
        self.aria.live = Some(
          parse_aria_live(&value)?
        )
      }
      | "picker.first_year" => {
        self.picker.first_year = value
          .trim()
          .parse()
          .with_context(|| {
            format!(
              "invalid \
               picker.first_year: \
               {value}"
            )
          })?
      }
      | "picker.year_count" => {
        self.picker.year_count = value
          .trim()
          .parse()
          .with_context(|| {
            format!(
              "invalid \
               picker.year_count: \
               {value}"
            )
          })?
      }
      | "picker.initial" => {
        self.picker.initial = value
      }
      | other => {
        return Err(anyhow!(
          "unknown config key: {other}"
        ));
      }
    }
    Ok(())
  }

  fn sanitize(&mut self) {
    if self
      .locale
      .as_deref()
      .is_some_and(|raw| {
        raw.trim().is_empty()
      })
    {
      self.locale = None;
    }

    if self.views.is_empty() {
      warn!("empty views list; using defaults");
      self.views = default_views();
    }

    if parse_timezone(
      &self.timezone,
      "config"
    )
    .is_none()
    {
      warn!(
        timezone = %self.timezone,
        "falling back to UTC"
      );
      self.timezone = default_timezone();
    }

    if self.picker.year_count == 0 {
      self.picker.year_count =
        DEFAULT_YEAR_COUNT;
    }

    if parse_date_arg(&self.picker.initial)
      .is_err()
    {
      warn!(
        initial = %self.picker.initial,
        "invalid picker.initial; using \
         default"
      );
      self.picker.initial =
        default_picker_initial();
    }
  }

  pub fn timezone(&self) -> Tz {
    parse_timezone(
      &self.timezone,
      "config"
    )
    .unwrap_or(chrono_tz::UTC)
  }

  pub fn picker_initial(
    &self
  ) -> PickerSelection {
    parse_date_arg(&self.picker.initial)
      .map(|date| {
        PickerSelection::from_date(
          date.date()
        )
      })
      .unwrap_or_default()
  }

  pub fn arrow_labels(
    &self
  ) -> ArrowLabels {
    ArrowLabels {
      prev:  label_or_hidden(
        &self.labels.prev
      ),
      prev2: label_or_hidden(
        &self.labels.prev2
      ),
      next:  label_or_hidden(
        &self.labels.next
      ),
      next2: label_or_hidden(
        &self.labels.next2
      )
    }
  }

  pub fn aria_labels(&self) -> AriaLabels {
    AriaLabels {
      prev:       self.aria.prev.clone(),
      prev2:      self.aria.prev2.clone(),
      next:       self.aria.next.clone(),
      next2:      self.aria.next2.clone(),
      navigation: self
        .aria
        .navigation
        .clone(),
      live:       self.aria.live
    }
  }

  /// Header props for `view` at
  /// `active_start_date`, with every
  /// configurable prop filled in.
  pub fn header_props(
    &self,
    active_start_date: NaiveDateTime,
    view: View
  ) -> HeaderProps {
    let mut props = HeaderProps::new(
      active_start_date,
      view
    );
    props.views = self.views.clone();
    props.locale = self.locale.clone();
    props.show_double_view =
      self.show_double_view;
    props.labels = self.arrow_labels();
    props.aria = self.aria_labels();
    props.picker_initial =
      self.picker_initial();
    props.picker_first_year =
      self.picker.first_year;
    props.picker_year_count =
      self.picker.year_count;
    props
  }
}

fn resolve_config_path(
  override_path: Option<&Path>
) -> Option<PathBuf> {
  if let Some(path) = override_path {
    return Some(path.to_path_buf());
  }

  if let Ok(raw) =
    std::env::var(CONFIG_ENV_VAR)
  {
    let trimmed = raw.trim();
    if trimmed == "/dev/null" {
      return None;
    }
    if !trimmed.is_empty() {
      return Some(PathBuf::from(
        trimmed
      ));
    }
  }

  default_config_path()
}

#[cfg(feature = "cli")]
fn default_config_path()
-> Option<PathBuf> {
  dirs::config_dir().map(|dir| {
    dir.join("calnav").join(CONFIG_FILE)
  })
}

#[cfg(not(feature = "cli"))]
fn default_config_path()
-> Option<PathBuf> {
  None
}

fn parse_aria_live(
  raw: &str
) -> anyhow::Result<AriaLive> {
  match raw
    .trim()
    .to_ascii_lowercase()
    .as_str()
  {
    | "off" => Ok(AriaLive::Off),
    | "polite" => Ok(AriaLive::Polite),
    | "assertive" => {
      Ok(AriaLive::Assertive)
    }
    | other => {
      Err(anyhow!(
        "invalid aria.live: {other}"
      ))
    }
  }
}

fn parse_bool(s: &str) -> bool {
  matches!(
    s.trim()
      .to_ascii_lowercase()
      .as_str(),
    "1" | "y" | "yes" | "on" | "true"
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_document_uses_defaults() {
    let cfg =
      Config::from_toml_str("", "test")
        .expect("parse");
    assert_eq!(cfg.views, default_views());
    assert_eq!(cfg.timezone, "UTC");
    assert!(cfg.color);
    assert_eq!(
      cfg.arrow_labels(),
      ArrowLabels::default()
    );
    assert_eq!(
      cfg.picker_initial(),
      PickerSelection::default()
    );
  }

  #[test]
  fn empty_label_hides_button() {
    let cfg = Config::from_toml_str(
      r#"
[labels]
prev = "<"
prev2 = ""
next = ">"
next2 = ""
"#,
      "test"
    )
    .expect("parse");
    let labels = cfg.arrow_labels();
    assert_eq!(labels.prev.as_deref(), Some("<"));
    assert_eq!(labels.prev2, None);
    assert_eq!(labels.next2, None);
  }

  #[test]
  fn unknown_view_is_rejected() {
    let err = Config::from_toml_str(
      r#"views = ["year", "week"]"#,
      "test"
    )
    .expect_err("unknown view");
    assert!(
      format!("{err:#}").contains("week")
    );
  }

  #[test]
  fn sanitizes_bad_values() {
    let cfg = Config::from_toml_str(
      r#"
locale = "  "
timezone = "Nowhere/Special"
views = []

[picker]
year_count = 0
initial = "yesterday"
"#,
      "test"
    )
    .expect("parse");
    assert_eq!(cfg.locale, None);
    assert_eq!(cfg.timezone, "UTC");
    assert_eq!(cfg.views, default_views());
    assert_eq!(
      cfg.picker.year_count,
      DEFAULT_YEAR_COUNT
    );
    assert_eq!(
      cfg.picker.initial,
      "1989-08-12"
    );
  }

  #[test]
  fn overrides_dotted_keys() {
    let mut cfg = Config::default();
    cfg
      .apply_overrides([
        (
          "rc.labels.prev".to_string(),
          "<".to_string()
        ),
        (
          "views".to_string(),
          "year,month".to_string()
        ),
        (
          "aria.live".to_string(),
          "assertive".to_string()
        ),
        (
          "show_double_view".to_string(),
          "yes".to_string()
        )
      ])
      .expect("apply overrides");
    assert_eq!(cfg.labels.prev, "<");
    assert_eq!(
      cfg.views,
      vec![View::Year, View::Month]
    );
    assert_eq!(
      cfg.aria.live,
      Some(AriaLive::Assertive)
    );
    assert!(cfg.show_double_view);

    assert!(
      cfg
        .apply_overrides([(
          "labels.middle".to_string(),
          "x".to_string()
        )])
        .is_err()
    );
  }
}
