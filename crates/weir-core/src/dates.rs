//! Legacy date normalisation.
//!
//! The legacy register stores dates as `DD/MM/YYYY` strings, sometimes with a
//! time-of-day suffix, and records "no value" as the literal string `"null"`
//! (distinct from a genuinely blank field — both map to absent here). That
//! sentinel never leaks past this module: everything downstream works in
//! `Option<NaiveDate>`.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// The literal the legacy register writes where no date was recorded.
const NO_VALUE: &str = "null";

/// Parse a raw legacy date field.
///
/// - `Ok(None)` — the field is blank or holds the "no value" sentinel.
/// - `Ok(Some(date))` — a valid `DD/MM/YYYY` value; a trailing time-of-day
///   suffix is discarded.
/// - `Err` — anything else, so callers that log mapping errors can tell a
///   malformed value from a deliberately absent one.
pub fn parse(raw: &str) -> Result<Option<NaiveDate>> {
  let raw = raw.trim();
  if raw.is_empty() || raw == NO_VALUE {
    return Ok(None);
  }
  // Discard any time-of-day suffix ("01/04/2016 16:24:38").
  let date_part = raw.split_whitespace().next().unwrap_or(raw);
  match NaiveDate::parse_from_str(date_part, "%d/%m/%Y") {
    Ok(date) => Ok(Some(date)),
    Err(_) => Err(Error::InvalidDate { value: raw.to_string() }),
  }
}

/// [`parse`] with the fact-builder policy applied: malformed values are
/// treated the same as absent ones.
pub fn parse_lenient(raw: &str) -> Option<NaiveDate> {
  parse(raw).ok().flatten()
}

/// Chronological minimum over raw fields, ignoring absent and malformed
/// values. `None` when nothing parses.
pub fn earliest<'a, I>(raws: I) -> Option<NaiveDate>
where
  I: IntoIterator<Item = &'a str>,
{
  raws.into_iter().filter_map(parse_lenient).min()
}

/// Chronological maximum over raw fields; mirror of [`earliest`].
pub fn latest<'a, I>(raws: I) -> Option<NaiveDate>
where
  I: IntoIterator<Item = &'a str>,
{
  raws.into_iter().filter_map(parse_lenient).max()
}
