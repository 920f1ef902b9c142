use anyhow::Context;
use chrono::{
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  Utc
};
use chrono_tz::Tz;

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOCALE: &str = "en-US";

pub fn midnight(
  date: NaiveDate
) -> NaiveDateTime {
  date.and_time(NaiveTime::MIN)
}

/// Accepts `YYYY-MM-DD` or a full
/// `YYYY-MM-DDTHH:MM:SS` timestamp.
pub fn parse_date_arg(
  raw: &str
) -> anyhow::Result<NaiveDateTime> {
  let trimmed = raw.trim();
  if let Ok(date) =
    NaiveDate::parse_from_str(
      trimmed, "%Y-%m-%d"
    )
  {
    return Ok(midnight(date));
  }

  NaiveDateTime::parse_from_str(
    trimmed,
    "%Y-%m-%dT%H:%M:%S"
  )
  .with_context(|| {
    format!(
      "invalid date `{trimmed}`; \
       expected YYYY-MM-DD"
    )
  })
}

pub fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => Some(tz),
    | Err(error) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %error,
        "invalid timezone id"
      );
      None
    }
  }
}

pub fn today_in_timezone(
  timezone: Tz
) -> NaiveDate {
  Utc::now()
    .with_timezone(&timezone)
    .date_naive()
}

/// Turns `en-US`, `en_US.UTF-8` or
/// `de_DE@euro` into the `en_US` form
/// chrono's locale tables use.
pub fn normalize_locale(
  raw: &str
) -> Option<String> {
  let base = raw
    .split(['.', '@'])
    .next()
    .unwrap_or_default()
    .trim();
  if base.is_empty()
    || base == "C"
    || base == "POSIX"
  {
    return None;
  }

  let mut parts = base.split(['-', '_']);
  let language = parts
    .next()
    .filter(|lang| {
      lang
        .chars()
        .all(|c| c.is_ascii_alphabetic())
    })?
    .to_ascii_lowercase();
  match parts.next() {
    | Some(region)
      if !region.is_empty() =>
    {
      Some(format!(
        "{language}_{}",
        region.to_ascii_uppercase()
      ))
    }
    | _ => Some(language)
  }
}

/// Locale of the running user, from the
/// usual POSIX variables, in BCP 47 form.
pub fn user_locale() -> Option<String> {
  ["LC_ALL", "LC_TIME", "LANG"]
    .iter()
    .filter_map(|var| {
      std::env::var(var).ok()
    })
    .find_map(|raw| {
      normalize_locale(&raw)
    })
    .map(|locale| {
      locale.replace('_', "-")
    })
}

#[cfg(test)]
mod tests {
  use chrono::Timelike;

  use super::*;

  #[test]
  fn parses_plain_date_as_midnight() {
    let parsed =
      parse_date_arg("2024-08-12")
        .expect("parse date");
    assert_eq!(
      parsed.date(),
      NaiveDate::from_ymd_opt(
        2024, 8, 12
      )
      .expect("valid date")
    );
    assert_eq!(parsed.hour(), 0);
  }

  #[test]
  fn parses_timestamp() {
    let parsed = parse_date_arg(
      "2024-08-12T13:45:00"
    )
    .expect("parse timestamp");
    assert_eq!(parsed.hour(), 13);
    assert!(
      parse_date_arg("12/08/2024")
        .is_err()
    );
  }

  #[test]
  fn normalizes_locale_spellings() {
    assert_eq!(
      normalize_locale("en-US")
        .as_deref(),
      Some("en_US")
    );
    assert_eq!(
      normalize_locale("de_DE.UTF-8")
        .as_deref(),
      Some("de_DE")
    );
    assert_eq!(
      normalize_locale("fr").as_deref(),
      Some("fr")
    );
    assert_eq!(normalize_locale("C"), None);
  }

  #[test]
  fn rejects_unknown_timezone() {
    assert!(
      parse_timezone("Mars/Olympus", "test")
        .is_none()
    );
    assert_eq!(
      parse_timezone("UTC", "test"),
      Some(chrono_tz::UTC)
    );
  }
}
