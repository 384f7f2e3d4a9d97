use chrono::NaiveDate;

use crate::{Error, Result};

/// Publish date used when an episode page carries no date at all.
pub fn fallback_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2000, 1, 1).expect("2000-01-01 is a valid date")
}

/// Parses a `day/month/year` date as written on the site.
///
/// `/`, `·` and `:` are all accepted as separators. Only the first three
/// tokens are read, and only the leading digits of each, so a trailing
/// time such as `10:00` is ignored.
pub fn parse_spanish_date(text: &str) -> Result<NaiveDate> {
  let invalid = || Error::InvalidDate(text.to_owned());

  let mut parts = text.split(['/', '·', ':']);
  let mut next_number = || -> Result<i64> {
    parts.next().and_then(leading_number).ok_or_else(invalid)
  };

  let day = next_number()?;
  let month = next_number()?;
  let year = next_number()?;

  let (Ok(year), Ok(month), Ok(day)) =
    (i32::try_from(year), u32::try_from(month), u32::try_from(day))
  else {
    return Err(invalid());
  };

  NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

// Reads an optionally signed run of digits at the start of `token`,
// ignoring whatever follows it.
fn leading_number(token: &str) -> Option<i64> {
  let token = token.trim_start();
  let sign_len = usize::from(token.starts_with(['-', '+']));
  let end = token[sign_len..]
    .find(|c: char| !c.is_ascii_digit())
    .map_or(token.len(), |i| i + sign_len);

  token[..end].parse().ok()
}

#[cfg(test)]
mod test {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn test_day_comes_first() {
    assert_eq!(parse_spanish_date("05/03/2021").unwrap(), ymd(2021, 3, 5));
    assert_eq!(parse_spanish_date("31/12/1999").unwrap(), ymd(1999, 12, 31));
  }

  #[test]
  fn test_mixed_separators() {
    assert_eq!(parse_spanish_date("5·3·2021").unwrap(), ymd(2021, 3, 5));
    assert_eq!(parse_spanish_date("05:03:2021").unwrap(), ymd(2021, 3, 5));
    // whatever follows the year is not read
    assert_eq!(
      parse_spanish_date("05/03/2021:10:00").unwrap(),
      ymd(2021, 3, 5)
    );
  }

  #[test]
  fn test_trailing_text_after_digits() {
    assert_eq!(
      parse_spanish_date("05/03/2021 10:00").unwrap(),
      ymd(2021, 3, 5)
    );
    assert_eq!(parse_spanish_date(" 5 /3h/2021").unwrap(), ymd(2021, 3, 5));
    assert_eq!(leading_number("2021 10"), Some(2021));
    assert_eq!(leading_number("-"), None);
    assert_eq!(leading_number("x12"), None);
  }

  #[test]
  fn test_rejects_malformed() {
    assert!(parse_spanish_date("").is_err());
    assert!(parse_spanish_date("05/03").is_err());
    assert!(parse_spanish_date("ayer").is_err());
    assert!(parse_spanish_date("aa/bb/cc").is_err());
    assert!(parse_spanish_date("31/02/2021").is_err());
    assert!(parse_spanish_date("-1/02/2021").is_err());
  }

  #[test]
  fn test_fallback() {
    assert_eq!(fallback_date(), ymd(2000, 1, 1));
  }
}
