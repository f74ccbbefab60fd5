//! Delimited rows decoded by translated header captions.

use super::delimited::{DelimitedRows, Start};
use super::Captions;
use crate::error::{ConvertError, Location, Result};
use csv::StringRecord;
use log::debug;
use serde::de::DeserializeOwned;
use std::io::BufRead;
use std::marker::PhantomData;

/// A deserialized row with the line it came from.
#[derive(Debug, Clone)]
pub struct Keyed<T> {
    pub line: usize,
    pub record: T,
}

impl<T> Keyed<T> {
    pub fn location(&self) -> Location {
        Location::Line(self.line)
    }
}

/// Iterates over the rows below a translated header line.
///
/// The header is the first row whose first cell is a known caption. Each
/// header cell is replaced by its canonical name and the following rows are
/// deserialized into `T` by those names, so the column order of the source
/// does not matter. Columns without a translation keep their raw caption.
pub struct KeyedRows<R, T> {
    rows: DelimitedRows<R>,
    captions: Captions,
    keys: Option<StringRecord>,
    _record: PhantomData<T>,
}

impl<R: BufRead, T: DeserializeOwned> KeyedRows<R, T> {
    pub fn new(input: R, captions: Captions) -> Self {
        KeyedRows {
            rows: DelimitedRows::new(input, Start::AfterCaptions(captions)),
            captions,
            keys: None,
            _record: PhantomData,
        }
    }

    fn decode(&mut self, line: usize, raw: &StringRecord) -> Result<Keyed<T>> {
        let (rows, captions) = (&self.rows, self.captions);
        let keys = self.keys.get_or_insert_with(|| {
            let keys = translate(captions, rows.header().unwrap_or(&StringRecord::new()));
            debug!("Translated header: {:?}", keys);
            keys
        });

        let mut padded = raw.clone();
        while padded.len() < keys.len() {
            padded.push_field("");
        }

        padded
            .deserialize::<T>(Some(&*keys))
            .map(|record| Keyed { line, record })
            .map_err(|e| ConvertError::InvalidRecord {
                location: Location::Line(line),
                message: e.to_string(),
            })
    }
}

fn translate(captions: Captions, header: &StringRecord) -> StringRecord {
    header
        .iter()
        .map(|caption| captions.translate(caption).unwrap_or_else(|| caption.trim()))
        .collect()
}

impl<R: BufRead, T: DeserializeOwned> Iterator for KeyedRows<R, T> {
    type Item = Result<Keyed<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = match self.rows.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        Some(self.decode(row.line(), row.record()))
    }
}
