//! Header-sniffed, delimiter-separated rows.

use super::{parse_amount, parse_date, Captions};
use crate::error::{ConvertError, Location, Result};
use crate::normalize::normalize_field;
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Terminator};
use log::{debug, trace};
use rust_decimal::Decimal;
use std::io::{BufRead, Chain};

/// Where the record rows begin.
#[derive(Debug, Clone, Copy)]
pub enum Start {
    /// The very first row is a record.
    Immediately,

    /// Records follow the first row whose first cell equals one of these captions.
    AfterHeader(&'static [&'static str]),

    /// Records follow the first row whose first cell is a known caption.
    AfterCaptions(Captions),
}

impl Start {
    fn matches(&self, first_cell: &str) -> bool {
        match self {
            Start::Immediately => true,
            Start::AfterHeader(headers) => headers.iter().any(|h| *h == first_cell),
            Start::AfterCaptions(captions) => captions.translate(first_cell).is_some(),
        }
    }
}

/// One delimited record together with the line it started on.
#[derive(Debug, Clone)]
pub struct Row {
    line: usize,
    cells: StringRecord,
}

impl Row {
    /// 1-based line number of the row's first line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn location(&self) -> Location {
        Location::Line(self.line)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn record(&self) -> &StringRecord {
        &self.cells
    }

    /// Raw cell text.
    pub fn cell(&self, column: usize) -> Result<&str> {
        self.cells.get(column).ok_or(ConvertError::MissingColumn {
            location: self.location(),
            column,
        })
    }

    /// Cell text passed through [`normalize_field`].
    pub fn field(&self, column: usize) -> Result<String> {
        self.cell(column).map(normalize_field)
    }

    pub fn date(&self, column: usize, format: &str) -> Result<NaiveDate> {
        parse_date(self.location(), self.cell(column)?, format)
    }

    pub fn amount(&self, column: usize) -> Result<Decimal> {
        parse_amount(self.location(), self.cell(column)?)
    }
}

/// Iterates over the record rows of a delimited statement.
///
/// Rows before the header are skipped. After it, every row is a record until
/// a blank line or one with fewer than `min_cells` cells; nothing after that
/// row is read.
///
/// One `csv` reader runs over the whole input, so quoting follows the usual
/// CSV rules: only a cell that opens with `"` may span lines.
pub struct DelimitedRows<R> {
    reader: csv::Reader<Chain<R, &'static [u8]>>,
    start: Start,
    min_cells: usize,
    header: Option<StringRecord>,
    done: bool,
}

impl<R: BufRead> DelimitedRows<R> {
    /// Creates a `;`-delimited reader.
    pub fn new(input: R, start: Start) -> Self {
        // every record ends in '\n', even the last one, so line numbers can be
        // recovered from the reader position
        let reader = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .terminator(Terminator::Any(b'\n'))
            .from_reader(input.chain(&b"\n"[..]));
        DelimitedRows {
            reader,
            start,
            min_cells: 1,
            header: None,
            done: false,
        }
    }

    /// Sets how many cells a row needs to still count as a record.
    pub fn min_cells(mut self, min_cells: usize) -> Self {
        self.min_cells = min_cells;
        self
    }

    /// The matched header row, once it has been read.
    pub fn header(&self) -> Option<&StringRecord> {
        self.header.as_ref()
    }

    /// Reads one record, also telling whether blank lines were skipped before it.
    fn read_row(&mut self) -> Result<Option<(Row, bool)>> {
        let expected = self.reader.position().line() as usize;
        let mut record = StringRecord::new();
        if !self.reader.read_record(&mut record)? {
            return Ok(None);
        }

        let newlines: usize = record.iter().map(|cell| cell.matches('\n').count()).sum();
        let line = (self.reader.position().line() as usize).saturating_sub(1 + newlines);

        // CRLF line ends leave a '\r' behind
        let cells: StringRecord = record.iter().map(|cell| cell.trim_end_matches('\r')).collect();
        let cells = if cells.len() == 1 && cells[0].trim().is_empty() {
            StringRecord::new()
        } else {
            cells
        };
        Ok(Some((Row { line, cells }, line > expected)))
    }

    fn next_record(&mut self) -> Result<Option<Row>> {
        if self.header.is_none() {
            if let Start::Immediately = self.start {
                self.header = Some(StringRecord::new());
            }
        }

        while self.header.is_none() {
            let row = match self.read_row()? {
                Some((row, _)) => row,
                None => {
                    return Err(ConvertError::MissingMarker {
                        marker: "the transaction table header",
                    })
                }
            };
            let first = row.cells.get(0).unwrap_or("").trim();
            if !row.is_empty() && self.start.matches(first) {
                debug!("Header matched on line {}", row.line);
                self.header = Some(row.cells);
            } else {
                trace!("Line {}: skipping preamble row", row.line);
            }
        }

        match self.read_row()? {
            Some((row, false)) if row.len() >= self.min_cells => Ok(Some(row)),
            Some((row, _)) => {
                debug!("Line {}: end of transaction rows", row.line);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl<R: BufRead> Iterator for DelimitedRows<R> {
    type Item = Result<Row>;

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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADERS: &[&str] = &["#Datum", "#Dátum"];

    fn rows(input: &str, start: Start) -> Vec<Row> {
        DelimitedRows::new(Cursor::new(input.to_string()), start)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_records_start_after_header() {
        let input = "Výpis;x\n\n#Dátum;Částka\n01;10\n02;20\n";
        let rows = rows(input, Start::AfterHeader(HEADERS));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cell(0).unwrap(), "01");
        assert_eq!(rows[0].line(), 4);
        assert_eq!(rows[1].cell(1).unwrap(), "20");
    }

    #[test]
    fn test_blank_row_ends_records() {
        let input = "#Datum;Castka\n01;10\n\n02;20\n";
        let rows = rows(input, Start::AfterHeader(HEADERS));
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_whitespace_row_counts_as_blank() {
        let input = "#Datum\n01;10\n   \n02;20\n";
        assert_eq!(rows(input, Start::AfterHeader(HEADERS)).len(), 1);
    }

    #[test]
    fn test_min_cells_threshold() {
        let input = "01;10\n02;20\nZostatok\n03;30\n";
        let mut reader = DelimitedRows::new(Cursor::new(input), Start::Immediately).min_cells(2);
        assert_eq!(reader.next().unwrap().unwrap().cell(0).unwrap(), "01");
        assert_eq!(reader.next().unwrap().unwrap().cell(0).unwrap(), "02");
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_quoted_cell_spans_lines() {
        let input = "#Datum\n01;\"first\nsecond\";x\n02;y\n";
        let rows = rows(input, Start::AfterHeader(HEADERS));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cell(1).unwrap(), "first\nsecond");
        assert_eq!(rows[0].field(1).unwrap(), "first second");
        assert_eq!(rows[1].line(), 4);
    }

    #[test]
    fn test_stray_quote_stays_in_its_cell() {
        let input = "#Datum\n01;O\"Neil;x\n02;y\n03;z\n";
        let rows = rows(input, Start::AfterHeader(HEADERS));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].cell(1).unwrap(), "O\"Neil");
        assert_eq!(rows[2].line(), 4);
    }

    #[test]
    fn test_crlf_line_ends() {
        let input = "#Datum;Suma\r\n01;10\r\n02;20\r\n\r\n03;30\r\n";
        let mut reader = DelimitedRows::new(Cursor::new(input), Start::AfterHeader(HEADERS));
        let first = reader.next().unwrap().unwrap();
        assert_eq!(first.cell(1).unwrap(), "10");
        assert_eq!(first.line(), 2);
        assert_eq!(reader.next().unwrap().unwrap().line(), 3);
        assert!(reader.next().is_none());
        assert_eq!(reader.header().unwrap().get(1), Some("Suma"));
    }

    #[test]
    fn test_last_row_without_newline() {
        let rows = rows("#Datum\n01;10\n02;20", Start::AfterHeader(HEADERS));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].line(), 3);
        assert_eq!(rows[1].cell(1).unwrap(), "20");
    }

    #[test]
    fn test_missing_header_is_framing_error() {
        let mut reader = DelimitedRows::new(Cursor::new("a;b\nc;d\n"), Start::AfterHeader(HEADERS));
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(err, ConvertError::MissingMarker { .. }));
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_column_reports_line() {
        let rows = rows("#Datum\n01;10\n", Start::AfterHeader(HEADERS));
        let err = rows[0].cell(5).unwrap_err();
        assert_eq!(err.to_string(), "missing column 5 on line 2");
    }

    #[test]
    fn test_header_is_kept() {
        let mut reader = DelimitedRows::new(Cursor::new("#Datum;Suma\n01;10\n"), Start::AfterHeader(HEADERS));
        reader.next();
        assert_eq!(reader.header().unwrap().get(1), Some("Suma"));
    }
}
