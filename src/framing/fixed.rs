//! Fixed-width lines tagged with a record type.

use super::LineReader;
use crate::error::{ConvertError, Location, Result};
use log::debug;
use std::io::BufRead;
use std::ops::Range;
use std::str::FromStr;

/// A fixed-width line, addressed by character offset.
#[derive(Debug, Clone)]
pub struct FixedRecord {
    line: usize,
    chars: Vec<char>,
}

impl FixedRecord {
    fn new(line: usize, text: &str) -> Self {
        FixedRecord {
            line,
            chars: text.chars().collect(),
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn location(&self) -> Location {
        Location::Line(self.line)
    }

    /// The characters in `range`; the part past the end of the line is empty.
    pub fn field(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Parses a numeric field, reporting `name` and the line on failure.
    pub fn number<T: FromStr>(&self, name: &'static str, range: Range<usize>) -> Result<T> {
        let text = self.field(range);
        text.trim()
            .parse()
            .map_err(|_| ConvertError::invalid_field(self.location(), name, text))
    }
}

/// Iterates over the body lines of a fixed-width statement.
///
/// The first line must start with `header_tag` and every later line with
/// `record_tag`; anything else aborts with [`ConvertError::BadRecordType`].
pub struct FixedWidthLines<R> {
    lines: LineReader<R>,
    header_tag: &'static str,
    record_tag: &'static str,
    header: Option<FixedRecord>,
    done: bool,
}

impl<R: BufRead> FixedWidthLines<R> {
    pub fn new(input: R, header_tag: &'static str, record_tag: &'static str) -> Self {
        FixedWidthLines {
            lines: LineReader::new(input),
            header_tag,
            record_tag,
            header: None,
            done: false,
        }
    }

    /// The account line, once it has been read.
    pub fn header(&self) -> Option<&FixedRecord> {
        self.header.as_ref()
    }

    fn tagged(line: usize, text: &str, tag: &'static str) -> Result<FixedRecord> {
        let record = FixedRecord::new(line, text);
        let found = record.field(0..tag.chars().count());
        if found != tag {
            return Err(ConvertError::BadRecordType {
                line,
                expected: tag,
                found,
            });
        }
        Ok(record)
    }

    fn next_record(&mut self) -> Result<Option<FixedRecord>> {
        if self.header.is_none() {
            let (line, text) = self.lines.next_line()?.unwrap_or((1, String::new()));
            let header = Self::tagged(line, &text, self.header_tag)?;
            debug!("Account record found on line {}", line);
            self.header = Some(header);
        }

        match self.lines.next_line()? {
            Some((line, text)) => Self::tagged(line, &text, self.record_tag).map(Some),
            None => Ok(None),
        }
    }
}

impl<R: BufRead> Iterator for FixedWidthLines<R> {
    type Item = Result<FixedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_record().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
