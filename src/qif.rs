//! QIF output.
//!
//! ```text
//! !Type:Bank
//! D3/5/2012
//! T-1500.00
//! MNájem březen
//! P123456789/0800
//! ^
//! ```

use crate::decimal::Decimal2;
use crate::error::{ConvertError, Result};
use crate::transaction::Transaction;
use log::debug;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// QIF account type written in the `!Type:` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountType {
    #[default]
    Bank,
    Cash,
    CreditCard,
}

impl AccountType {
    fn header_name(self) -> &'static str {
        match self {
            AccountType::Bank => "Bank",
            AccountType::Cash => "Cash",
            AccountType::CreditCard => "CCard",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_name())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bank" => Ok(AccountType::Bank),
            "cash" => Ok(AccountType::Cash),
            "ccard" => Ok(AccountType::CreditCard),
            other => Err(format!(
                "unknown account type {:?}, expected bank, cash or ccard",
                other
            )),
        }
    }
}

/// Writes transactions as QIF records.
///
/// The `!Type:` header is written before the first record, or by
/// [`QifWriter::finish`] when there were none.
pub struct QifWriter<W: Write> {
    writer: W,
    account_type: AccountType,
    header_written: bool,
    written: usize,
}

impl<W: Write> QifWriter<W> {
    pub fn new(writer: W, account_type: AccountType) -> Self {
        QifWriter {
            writer,
            account_type,
            header_written: false,
            written: 0,
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if !self.header_written {
            writeln!(self.writer, "!Type:{}", self.account_type)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Writes one transaction block.
    pub fn write(&mut self, transaction: &Transaction) -> Result<()> {
        let total = transaction.total().ok_or(ConvertError::MissingAmount {
            date: transaction.date,
        })?;

        self.write_header()?;
        let w = &mut self.writer;
        writeln!(w, "D{}", transaction.date.format("%-m/%-d/%Y"))?;
        writeln!(w, "T{}", Decimal2::new(total))?;
        if let Some(ident) = &transaction.ident {
            writeln!(w, "#{}", single_line(ident))?;
        }
        if let Some(message) = &transaction.message {
            writeln!(w, "M{}", single_line(message))?;
        }
        if let Some(destination) = &transaction.destination {
            writeln!(w, "P{}", single_line(destination))?;
        }
        if transaction.has_distinct_splits() {
            for split in &transaction.splits {
                writeln!(w, "E{}", single_line(&split.memo))?;
                writeln!(w, "${}", Decimal2::new(split.amount))?;
            }
        }
        writeln!(w, "^")?;

        self.written += 1;
        Ok(())
    }

    /// Number of transaction blocks written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Writes the header if no record did, flushes and returns the inner writer.
    pub fn finish(mut self) -> Result<W> {
        self.write_header()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn single_line(text: &str) -> String {
    text.replace(&['\r', '\n'][..], " ")
}

/// Writes every transaction to `writer`, stopping at the first error.
///
/// Returns the number of transaction blocks written.
pub fn write_qif<W, I>(writer: W, account_type: AccountType, transactions: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Result<Transaction>>,
{
    let mut qif = QifWriter::new(writer, account_type);
    for transaction in transactions {
        qif.write(&transaction?)?;
    }
    let written = qif.written();
    qif.finish()?;
    debug!("Wrote {} QIF records", written);
    Ok(written)
}
