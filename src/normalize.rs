//! Text and number cleanup shared by every importer.

use rust_decimal::Decimal;
use std::str::FromStr;

const QUOTES: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{201E}', '\u{2018}', '\u{2019}', '\u{201A}'];

/// Strips quote characters, collapses whitespace runs to a single space and trims.
///
/// ```
/// use bank2qif::normalize::normalize_field;
///
/// assert_eq!(normalize_field("  \"Nájem\"\t za\n březen "), "Nájem za březen");
/// ```
pub fn normalize_field(text: &str) -> String {
    text.replace(QUOTES, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a localized amount such as `-1 234,56`.
///
/// Returns `Ok(None)` when nothing remains after cleanup, so that a blank
/// fee column is distinguishable from a fee of zero.
pub fn normalize_amount(text: &str) -> Result<Option<Decimal>, rust_decimal::Error> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != ' ' && *c != '\u{00A0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return Ok(None);
    }
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    Decimal::from_str(cleaned).map(Some)
}

/// Turns an empty string into `None`.
pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
