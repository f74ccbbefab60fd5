//! Zuno bank CSV export.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::delimited::{DelimitedRows, Row, Start};
use crate::transaction::Transaction;
use encoding_rs::{Encoding, UTF_8};
use std::io::BufRead;

const HEADERS: &[&str] = &["Dátum transakcie:"];

pub struct Zuno;

impl Importer for Zuno {
    fn name(&self) -> &'static str {
        "zuno"
    }

    fn encoding(&self) -> &'static Encoding {
        UTF_8
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            DelimitedRows::new(input, Start::AfterHeader(HEADERS))
                .min_cells(2)
                .map(|row| row.and_then(|row| parse_row(&row))),
        )
    }
}

fn parse_row(row: &Row) -> Result<Transaction> {
    let date = row.date(0, "%d.%m.%Y")?;
    let amount = row.amount(6)?;

    let account_number = row.field(3)?;
    let bank_code = row.field(4)?;
    let destination = if account_number.is_empty() {
        String::new()
    } else {
        format!("{}/{}", account_number, bank_code).trim().to_string()
    };

    Ok(Transaction::new(date, amount)
        .destination(destination)
        .message(row.field(5)?))
}
