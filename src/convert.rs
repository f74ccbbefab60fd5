//! End-to-end conversion: bytes in one bank's format to QIF.

use crate::encoding::DecodingReader;
use crate::error::Result;
use crate::qif::{write_qif, AccountType};
use crate::registry::Registry;
use encoding_rs::Encoding;
use log::info;
use std::io::{BufReader, Read, Write};

/// What to convert and how.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Registered format name, e.g. `mbank`.
    pub format: String,

    /// Overrides the encoding the format is normally exported in.
    pub encoding: Option<&'static Encoding>,

    pub account_type: AccountType,
}

impl ConvertOptions {
    pub fn new(format: impl Into<String>) -> Self {
        ConvertOptions {
            format: format.into(),
            encoding: None,
            account_type: AccountType::default(),
        }
    }
}

/// Converts one statement and returns the number of transactions written.
///
/// The format is resolved before anything is read, so an unknown name never
/// consumes input. Output written before a failure is left in `output`.
pub fn convert<R: Read, W: Write>(
    registry: &Registry,
    options: &ConvertOptions,
    input: R,
    output: W,
) -> Result<usize> {
    let importer = registry.get(&options.format)?;
    let encoding = options.encoding.unwrap_or_else(|| importer.encoding());
    info!(
        "Converting {} statement from {}",
        importer.name(),
        encoding.name()
    );

    let decoded = BufReader::new(DecodingReader::new(input, encoding));
    let transactions = importer.import(Box::new(decoded));
    let written = write_qif(output, options.account_type, transactions)?;

    info!("Wrote {} transactions", written);
    Ok(written)
}
