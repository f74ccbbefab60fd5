//! Framing strategies: how records are found inside a raw statement.
//!
//! Each strategy only knows where records start and end and hands out raw
//! fields; the importers in [`crate::importers`] give those fields meaning.

pub mod blocks;
pub mod delimited;
pub mod fixed;
pub mod keyed;
pub mod keyvalue;
pub mod markup;

use crate::error::{ConvertError, Location, Result};
use crate::normalize::normalize_amount;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::BufRead;

/// Reads lines one at a time, counting them and stripping line terminators.
pub struct LineReader<R> {
    inner: R,
    line_no: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        LineReader { inner, line_no: 0 }
    }

    /// Returns the next line with its 1-based number, or `None` at end of input.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
        line.truncate(trimmed);
        Ok(Some((self.line_no, line)))
    }

    /// Number of the last line returned.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

/// Maps literal source-language captions to canonical field names.
#[derive(Debug, Clone, Copy)]
pub struct Captions(pub &'static [(&'static str, &'static str)]);

impl Captions {
    /// Looks up the canonical name of a caption, ignoring surrounding whitespace.
    pub fn translate(&self, caption: &str) -> Option<&'static str> {
        let caption = caption.trim();
        self.0
            .iter()
            .find(|(raw, _)| *raw == caption)
            .map(|(_, canonical)| *canonical)
    }
}

/// Parses a date with a chrono format string, reporting the location on failure.
pub(crate) fn parse_date(location: Location, text: &str, format: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, format)
        .map_err(|_| ConvertError::invalid_field(location, "date", text))
}

/// Parses an amount that must be present.
pub(crate) fn parse_amount(location: Location, text: &str) -> Result<Decimal> {
    parse_optional_amount(location, text)?
        .ok_or_else(|| ConvertError::invalid_field(location, "amount", text))
}

/// Parses an amount that may be blank.
pub(crate) fn parse_optional_amount(location: Location, text: &str) -> Result<Option<Decimal>> {
    normalize_amount(text).map_err(|_| ConvertError::invalid_field(location, "amount", text))
}

/// Builds a date from numeric parts, rejecting impossible days and months.
pub(crate) fn ymd(location: Location, year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ConvertError::invalid_field(location, "date", format!("{}-{:02}-{:02}", year, month, day))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_line_reader_strips_terminators() {
        let mut lines = LineReader::new(Cursor::new("a\r\nb\n\nc"));
        assert_eq!(lines.next_line().unwrap(), Some((1, "a".to_string())));
        assert_eq!(lines.next_line().unwrap(), Some((2, "b".to_string())));
        assert_eq!(lines.next_line().unwrap(), Some((3, String::new())));
        assert_eq!(lines.next_line().unwrap(), Some((4, "c".to_string())));
        assert_eq!(lines.next_line().unwrap(), None);
        assert_eq!(lines.line_no(), 4);
    }

    #[test]
    fn test_captions_translate() {
        let captions = Captions(&[("Datum", "date"), ("Částka", "amount")]);
        assert_eq!(captions.translate(" Částka "), Some("amount"));
        assert_eq!(captions.translate("Poznámka"), None);
    }

    #[test]
    fn test_parse_date_rejects_impossible_day() {
        let err = parse_date(Location::Line(7), "32.01.2012", "%d.%m.%Y").unwrap_err();
        assert_eq!(err.to_string(), "invalid date \"32.01.2012\" on line 7");
        assert!(ymd(Location::Line(1), 2012, 2, 30).is_err());
    }

    #[test]
    fn test_parse_amount_requires_value() {
        assert!(parse_amount(Location::Line(2), " ").is_err());
        assert_eq!(parse_optional_amount(Location::Line(2), "").unwrap(), None);
    }
}
