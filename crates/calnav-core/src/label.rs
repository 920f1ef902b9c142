use chrono::{
  Datelike,
  Locale,
  NaiveDateTime
};
use serde::Serialize;

use crate::dates;
use crate::datetime::{
  DEFAULT_LOCALE,
  normalize_locale,
  user_locale
};
use crate::view::View;

/// Formatting hooks for the label text.
/// `locale` is a BCP 47 tag such as
/// `en-US`, or `None` for the default.
pub trait DateFormatter {
  fn format_year(
    &self,
    locale: Option<&str>,
    date: NaiveDateTime
  ) -> String;

  fn format_month_year(
    &self,
    locale: Option<&str>,
    date: NaiveDateTime
  ) -> String;
}

/// Default formatter backed by chrono's
/// locale tables.
#[derive(
  Debug, Clone, Copy, Default,
)]
pub struct LocaleFormatter;

/// Region picked for a bare language tag
/// whose usual country code differs from
/// the language code.
const DEFAULT_REGIONS: &[(&str, &str)] = &[
  ("ar", "SA"),
  ("be", "BY"),
  ("bn", "BD"),
  ("ca", "ES"),
  ("cs", "CZ"),
  ("da", "DK"),
  ("el", "GR"),
  ("en", "US"),
  ("et", "EE"),
  ("eu", "ES"),
  ("fa", "IR"),
  ("ga", "IE"),
  ("gl", "ES"),
  ("he", "IL"),
  ("hi", "IN"),
  ("hy", "AM"),
  ("ja", "JP"),
  ("ka", "GE"),
  ("kk", "KZ"),
  ("ko", "KR"),
  ("ms", "MY"),
  ("nb", "NO"),
  ("sl", "SI"),
  ("sq", "AL"),
  ("sr", "RS"),
  ("sv", "SE"),
  ("ta", "IN"),
  ("uk", "UA"),
  ("ur", "PK"),
  ("vi", "VN"),
  ("zh", "CN")
];

fn language_of(
  locale: Option<&str>
) -> Option<String> {
  let name =
    locale.and_then(normalize_locale)?;
  let language = name
    .split('_')
    .next()
    .unwrap_or_default()
    .to_string();
  Some(language)
}

/// Maps a tag onto chrono's tables. A
/// bare language tries `fr_FR` style
/// first, then the language's usual
/// region, then POSIX.
fn chrono_locale(
  locale: Option<&str>
) -> Locale {
  let Some(name) =
    locale.and_then(normalize_locale)
  else {
    return Locale::POSIX;
  };
  if let Ok(found) =
    Locale::try_from(name.as_str())
  {
    return found;
  }

  let language = name
    .split('_')
    .next()
    .unwrap_or_default();
  let same_region = format!(
    "{language}_{}",
    language.to_ascii_uppercase()
  );
  let usual_region = DEFAULT_REGIONS
    .iter()
    .find(|(lang, _)| *lang == language)
    .map(|(lang, region)| {
      format!("{lang}_{region}")
    });

  [Some(same_region), usual_region]
    .into_iter()
    .flatten()
    .find_map(|candidate| {
      Locale::try_from(candidate.as_str())
        .ok()
    })
    .unwrap_or_else(|| {
      tracing::debug!(
        %name,
        "no month names for locale"
      );
      Locale::POSIX
    })
}

fn localized_month(
  locale: Option<&str>,
  date: NaiveDateTime
) -> String {
  date
    .date()
    .format_localized(
      "%B",
      chrono_locale(locale)
    )
    .to_string()
}

impl DateFormatter for LocaleFormatter {
  fn format_year(
    &self,
    _locale: Option<&str>,
    date: NaiveDateTime
  ) -> String {
    date.year().to_string()
  }

  /// Month then year, except for the
  /// languages that write the year first.
  fn format_month_year(
    &self,
    locale: Option<&str>,
    date: NaiveDateTime
  ) -> String {
    let year = date.year();
    let language = language_of(locale);
    match language.as_deref() {
      | Some("ja" | "zh") => {
        format!("{year}年{}月", date.month())
      }
      | Some("ko") => {
        format!("{year}년 {}월", date.month())
      }
      | Some("hu") => {
        format!(
          "{year}. {}",
          localized_month(locale, date)
        )
      }
      | _ => {
        format!(
          "{} {year}",
          localized_month(locale, date)
        )
      }
    }
  }
}

/// Everything a label override gets to
/// look at.
#[derive(
  Debug, Clone, PartialEq, Serialize,
)]
pub struct LabelContext {
  pub date:   NaiveDateTime,
  pub label:  String,
  pub locale: String,
  pub view:   View
}

/// Replaces the rendered label text
/// entirely.
pub trait NavigationLabel {
  fn label(
    &self,
    ctx: &LabelContext
  ) -> String;
}

impl<F> NavigationLabel for F
where
  F: Fn(&LabelContext) -> String
{
  fn label(
    &self,
    ctx: &LabelContext
  ) -> String {
    self(ctx)
  }
}

const RANGE_SEPARATOR: &str = " – ";

fn format_year_range(
  locale: Option<&str>,
  formatter: &dyn DateFormatter,
  range: Option<(
    NaiveDateTime,
    NaiveDateTime
  )>
) -> String {
  match range {
    | Some((start, end)) => {
      format!(
        "{}{RANGE_SEPARATOR}{}",
        formatter
          .format_year(locale, start),
        formatter.format_year(locale, end)
      )
    }
    | None => String::new()
  }
}

/// Label text for the period of `view`
/// that starts at `date`, before any
/// override is applied.
pub fn format_label(
  view: View,
  date: NaiveDateTime,
  locale: Option<&str>,
  formatter: &dyn DateFormatter
) -> String {
  match view {
    | View::Century => {
      format_year_range(
        locale,
        formatter,
        dates::range(View::Century, date)
      )
    }
    | View::Decade => {
      format_year_range(
        locale,
        formatter,
        dates::range(View::Decade, date)
      )
    }
    | View::Year => {
      formatter.format_year(locale, date)
    }
    | View::Month => {
      formatter
        .format_month_year(locale, date)
    }
  }
}

/// Locale handed to label overrides: the
/// configured one, else the user's, else
/// `en-US`.
pub fn effective_locale(
  locale: Option<&str>
) -> String {
  locale
    .map(str::to_string)
    .or_else(user_locale)
    .unwrap_or_else(|| {
      DEFAULT_LOCALE.to_string()
    })
}

pub fn render_label(
  view: View,
  date: NaiveDateTime,
  locale: Option<&str>,
  formatter: &dyn DateFormatter,
  navigation_label: Option<
    &dyn NavigationLabel
  >
) -> String {
  let label = format_label(
    view, date, locale, formatter
  );
  match navigation_label {
    | Some(custom) => {
      custom.label(&LabelContext {
        date,
        label,
        locale: effective_locale(locale),
        view
      })
    }
    | None => label
  }
}
