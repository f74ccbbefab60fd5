//! Plain text records separated by delimiter lines.
//!
//! ```text
//! <bank letterhead>
//! ======================================================================================
//! <statement metadata>
//! ======================================================================================
//! <column captions>
//! --------------------------------------------------------------------------------------
//! <record>
//! --------------------------------------------------------------------------------------
//! <record>
//! ======================================================================================
//! <footer>
//! ```

use super::LineReader;
use crate::error::{ConvertError, Location, Result};
use log::{debug, trace};
use std::io::BufRead;

/// Width of the delimiter lines.
pub const DELIMITER_WIDTH: usize = 86;

/// The lines of one record, with their line numbers.
///
/// Blank lines at either end are dropped; blank lines inside the record are
/// kept so line positions keep their meaning.
#[derive(Debug, Clone, Default)]
pub struct TextBlock {
    pub lines: Vec<(usize, String)>,
}

impl TextBlock {
    /// Location of the record's first line.
    pub fn location(&self) -> Location {
        Location::Line(self.lines.first().map(|(n, _)| *n).unwrap_or(0))
    }

    fn trim(&mut self) {
        let is_blank = |entry: &(usize, String)| entry.1.trim().is_empty();
        while self.lines.last().map_or(false, is_blank) {
            self.lines.pop();
        }
        let leading = self.lines.iter().take_while(|&entry| is_blank(entry)).count();
        self.lines.drain(..leading);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Preamble,
    Records,
    Done,
}

/// Splits a delimiter-framed statement into its preamble and record blocks.
pub struct DelimiterBlocks<R> {
    lines: LineReader<R>,
    preamble_delimiter: char,
    record_delimiter: char,
    preamble: Vec<(usize, String)>,
    state: State,
}

fn is_delimiter(line: &str, ch: char) -> bool {
    let line = line.trim();
    line.chars().count() >= DELIMITER_WIDTH && line.chars().all(|c| c == ch)
}

impl<R: BufRead> DelimiterBlocks<R> {
    /// Creates a reader with `=` around the preamble and `-` between records.
    pub fn new(input: R) -> Self {
        DelimiterBlocks {
            lines: LineReader::new(input),
            preamble_delimiter: '=',
            record_delimiter: '-',
            preamble: Vec::new(),
            state: State::Preamble,
        }
    }

    /// Lines between the two preamble delimiters, read on first use.
    pub fn preamble(&mut self) -> Result<&[(usize, String)]> {
        if self.state == State::Preamble {
            self.read_preamble()?;
        }
        Ok(&self.preamble)
    }

    fn read_preamble(&mut self) -> Result<()> {
        let missing = ConvertError::MissingMarker {
            marker: "the statement header delimiter",
        };

        loop {
            match self.lines.next_line()? {
                Some((_, text)) if is_delimiter(&text, self.preamble_delimiter) => break,
                Some((line, _)) => trace!("Line {}: skipping letterhead", line),
                None => return Err(missing),
            }
        }
        loop {
            match self.lines.next_line()? {
                Some((_, text)) if is_delimiter(&text, self.preamble_delimiter) => break,
                Some(entry) => self.preamble.push(entry),
                None => return Err(missing),
            }
        }

        self.state = State::Done;
        while let Some((line, text)) = self.lines.next_line()? {
            if is_delimiter(&text, self.record_delimiter) {
                debug!("Records start after line {}", line);
                self.state = State::Records;
                break;
            }
            if is_delimiter(&text, self.preamble_delimiter) {
                break;
            }
        }
        Ok(())
    }

    fn next_block(&mut self) -> Result<Option<TextBlock>> {
        if self.state == State::Preamble {
            self.read_preamble()?;
        }

        while self.state == State::Records {
            let mut block = TextBlock::default();
            loop {
                match self.lines.next_line()? {
                    Some((_, text)) if is_delimiter(&text, self.record_delimiter) => break,
                    Some((line, text)) if is_delimiter(&text, self.preamble_delimiter) => {
                        debug!("Records end on line {}", line);
                        self.state = State::Done;
                        break;
                    }
                    Some(entry) => block.lines.push(entry),
                    None => {
                        self.state = State::Done;
                        break;
                    }
                }
            }
            block.trim();
            if !block.lines.is_empty() {
                return Ok(Some(block));
            }
        }
        Ok(None)
    }
}

impl<R: BufRead> Iterator for DelimiterBlocks<R> {
    type Item = Result<TextBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.next_block().transpose();
        if let Some(Err(_)) = next {
            self.state = State::Done;
        }
        next
    }
}
