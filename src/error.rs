//! Error types for statement conversion.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Where in the source an error was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// 1-based line of the decoded input
    Line(usize),

    /// 1-based row of an embedded markup table
    Row(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(n) => write!(f, "line {}", n),
            Location::Row(n) => write!(f, "table row {}", n),
        }
    }
}

/// Broad classes of failure, used by callers to decide how to report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input does not have the structure the selected format requires
    Framing,

    /// A field of a transaction row could not be parsed
    FieldParse,

    /// The caller asked for something that does not exist
    Configuration,

    /// Reading input or writing output failed
    Io,
}

/// Errors that can occur while converting a statement.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Failed to read the input or write the output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV tokenizing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Markup document could not be tokenized
    #[error("markup parsing error: {0}")]
    Markup(#[from] quick_xml::Error),

    /// A fixed-width line carries the wrong record type tag
    #[error("Bad record type on line {line}: expected {expected}, found {found:?}")]
    BadRecordType {
        line: usize,
        expected: &'static str,
        found: String,
    },

    /// A structural marker the format depends on never appeared
    #[error("statement is missing {marker}")]
    MissingMarker { marker: &'static str },

    /// A required field holds text that does not parse
    #[error("invalid {field} {value:?} on {location}")]
    InvalidField {
        location: Location,
        field: &'static str,
        value: String,
    },

    /// A row is shorter than the column the format reads
    #[error("missing column {column} on {location}")]
    MissingColumn { location: Location, column: usize },

    /// A keyed row could not be mapped onto its record
    #[error("invalid record on {location}: {message}")]
    InvalidRecord { location: Location, message: String },

    /// A transaction reached the writer without a resolvable amount
    #[error("transaction dated {date} has neither an amount nor split items")]
    MissingAmount { date: NaiveDate },

    /// No importer is registered under the requested name
    #[error("unknown statement format {name:?}, expected one of: {known}")]
    UnknownFormat { name: String, known: String },

    /// The requested character encoding label is not recognized
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),

    /// Two importers were registered under one name
    #[error("statement format {0:?} is registered twice")]
    DuplicateFormat(&'static str),
}

impl ConvertError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Io(_) => ErrorKind::Io,
            ConvertError::BadRecordType { .. } | ConvertError::MissingMarker { .. } => {
                ErrorKind::Framing
            }
            ConvertError::Csv(_)
            | ConvertError::Markup(_)
            | ConvertError::InvalidField { .. }
            | ConvertError::MissingColumn { .. }
            | ConvertError::InvalidRecord { .. }
            | ConvertError::MissingAmount { .. } => ErrorKind::FieldParse,
            ConvertError::UnknownFormat { .. }
            | ConvertError::UnknownEncoding(_)
            | ConvertError::DuplicateFormat(_) => ErrorKind::Configuration,
        }
    }

    pub(crate) fn invalid_field(
        location: Location,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        ConvertError::InvalidField {
            location,
            field,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_record_type_names_line() {
        let err = ConvertError::BadRecordType {
            line: 1,
            expected: "074",
            found: "075".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Bad record type on line 1: expected 074, found \"075\""
        );
        assert_eq!(err.kind(), ErrorKind::Framing);
    }

    #[test]
    fn test_invalid_field_location() {
        let err = ConvertError::invalid_field(Location::Row(4), "amount", "abc");
        assert_eq!(err.to_string(), "invalid amount \"abc\" on table row 4");
        assert_eq!(err.kind(), ErrorKind::FieldParse);
    }

    #[test]
    fn test_unknown_format_is_configuration() {
        let err = ConvertError::UnknownFormat {
            name: "foo".to_string(),
            known: "fio, kb".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
