//! Fio banka GPC export.
//!
//! GPC is a fixed-width format: one `074` account line followed by `075`
//! transaction lines. Offsets below are character offsets into the line.

use super::{transactions, Importer, Transactions};
use crate::error::{ConvertError, Result};
use crate::framing::fixed::{FixedRecord, FixedWidthLines};
use crate::framing::ymd;
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, WINDOWS_1250};
use rust_decimal::Decimal;
use std::io::BufRead;

const ACCOUNT_TAG: &str = "074";
const TRANSACTION_TAG: &str = "075";

pub struct Fio;

impl Importer for Fio {
    fn name(&self) -> &'static str {
        "fio"
    }

    fn encoding(&self) -> &'static Encoding {
        WINDOWS_1250
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            FixedWidthLines::new(input, ACCOUNT_TAG, TRANSACTION_TAG)
                .map(|record| record.and_then(|record| parse_record(&record))),
        )
    }
}

fn parse_record(record: &FixedRecord) -> Result<Transaction> {
    // 1 debit, 2 credit, 4 debit reversal, 5 credit reversal
    let kind: u8 = record.number("transaction type", 60..61)?;
    let cents: i64 = record.number("amount", 48..60)?;
    let amount = match kind {
        1 | 5 => -Decimal::new(cents, 2),
        2 | 4 => Decimal::new(cents, 2),
        _ => {
            return Err(ConvertError::invalid_field(
                record.location(),
                "transaction type",
                record.field(60..61),
            ))
        }
    };

    let day: u32 = record.number("date", 122..124)?;
    let month: u32 = record.number("date", 124..126)?;
    let year: i32 = record.number("date", 126..128)?;
    let date = ymd(record.location(), 2000 + year, month, day)?;

    let account = record.field(19..35).trim_start_matches('0').to_string();
    let bank_code: String = record
        .field(71..81)
        .trim_start_matches('0')
        .chars()
        .take(4)
        .collect();
    let destination = if account.trim().is_empty() {
        String::new()
    } else {
        format!("{}/{}", account.trim(), bank_code.trim())
    };

    Ok(Transaction::new(date, amount)
        .destination(destination)
        .message(normalize_field(&record.field(97..117)))
        .ident(record.field(35..48).trim()))
}
