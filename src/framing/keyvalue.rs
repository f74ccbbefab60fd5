//! Blank-line separated blocks of `key: value` lines.

use super::{Captions, LineReader};
use crate::error::{ConvertError, Location, Result};
use log::{debug, trace};
use std::collections::HashMap;
use std::io::BufRead;

/// One record: values keyed by canonical field name.
#[derive(Debug, Clone, Default)]
pub struct Block {
    line: usize,
    fields: HashMap<&'static str, String>,
}

impl Block {
    /// 1-based line of the block's first line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn location(&self) -> Location {
        Location::Line(self.line)
    }

    /// Value of a canonical field, empty when the block does not carry it.
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Splits a `key: value` line. Indented lines and colons inside text such as
/// `12:30` do not start a field.
fn field(text: &str) -> Option<(&str, &str)> {
    let (key, value) = text.split_once(':')?;
    let starts_field = !key.trim().is_empty()
        && !key.starts_with(char::is_whitespace)
        && (value.is_empty() || value.starts_with(char::is_whitespace));
    if starts_field {
        Some((key, value))
    } else {
        None
    }
}

/// Iterates over key/value blocks following a header line.
///
/// A field line starts with its key, followed by a colon and then a space or
/// the end of the line. Keys go through `captions`; fields whose key has no
/// translation are ignored. Any other line continues the previous value.
/// Blocks without any known key (page footers and the like) are skipped.
pub struct KeyValueBlocks<R> {
    lines: LineReader<R>,
    headers: &'static [&'static str],
    captions: Captions,
    started: bool,
    done: bool,
}

impl<R: BufRead> KeyValueBlocks<R> {
    pub fn new(input: R, headers: &'static [&'static str], captions: Captions) -> Self {
        KeyValueBlocks {
            lines: LineReader::new(input),
            headers,
            captions,
            started: false,
            done: false,
        }
    }

    fn skip_to_header(&mut self) -> Result<()> {
        while let Some((line, text)) = self.lines.next_line()? {
            if self.headers.iter().any(|h| *h == text.trim()) {
                debug!("Transaction list starts after line {}", line);
                self.started = true;
                return Ok(());
            }
            trace!("Line {}: skipping preamble", line);
        }
        Err(ConvertError::MissingMarker {
            marker: "the transaction list header",
        })
    }

    fn read_block(&mut self) -> Result<Option<Block>> {
        let mut block = Block::default();
        let mut last_key: Option<&'static str> = None;

        while let Some((line, text)) = self.lines.next_line()? {
            if text.trim().is_empty() {
                if block.line == 0 {
                    continue;
                }
                break;
            }
            if block.line == 0 {
                block.line = line;
            }

            match field(&text) {
                Some((key, value)) => match self.captions.translate(key) {
                    Some(name) => {
                        block.fields.insert(name, value.trim().to_string());
                        last_key = Some(name);
                    }
                    None => {
                        debug!("Line {}: ignoring unknown field {:?}", line, key);
                        last_key = None;
                    }
                },
                None => match last_key {
                    Some(name) => {
                        let value = block.fields.entry(name).or_default();
                        value.push(' ');
                        value.push_str(text.trim());
                    }
                    None => debug!("Line {}: ignoring stray line {:?}", line, text.trim()),
                },
            }
        }

        if block.line == 0 {
            Ok(None)
        } else {
            Ok(Some(block))
        }
    }

    fn next_block(&mut self) -> Result<Option<Block>> {
        if !self.started {
            self.skip_to_header()?;
        }
        loop {
            match self.read_block()? {
                Some(block) if block.is_empty() => {
                    debug!("Line {}: skipping block without known fields", block.line)
                }
                other => return Ok(other),
            }
        }
    }
}

impl<R: BufRead> Iterator for KeyValueBlocks<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let next = self.next_block().transpose();
        if !matches!(next, Some(Ok(_))) {
            self.done = true;
        }
        next
    }
}
