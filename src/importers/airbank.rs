//! Air Bank CSV export.
//!
//! Columns are located by their captions rather than by position.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::keyed::{Keyed, KeyedRows};
use crate::framing::{parse_amount, parse_date, Captions};
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;
use std::io::BufRead;

const CAPTIONS: Captions = Captions(&[
    ("Datum provedení", "date"),
    ("Částka v měně účtu", "amount"),
    ("Typ úhrady", "trans_type"),
    ("Zpráva pro příjemce", "message"),
    ("Popis pro plátce", "payer_description"),
    ("Číslo účtu protistrany", "from/to"),
    ("Název protistrany", "recipient"),
]);

#[derive(Debug, Deserialize)]
struct Record {
    date: String,
    amount: String,
    #[serde(default)]
    trans_type: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    payer_description: String,
    #[serde(default, rename = "from/to")]
    from_to: String,
    #[serde(default)]
    recipient: String,
}

pub struct AirBank;

impl Importer for AirBank {
    fn name(&self) -> &'static str {
        "airbank"
    }

    fn encoding(&self) -> &'static Encoding {
        UTF_8
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            KeyedRows::<_, Record>::new(input, CAPTIONS)
                .map(|row| row.and_then(|row| parse_record(&row))),
        )
    }
}

fn parse_record(row: &Keyed<Record>) -> Result<Transaction> {
    let record = &row.record;
    let date = parse_date(row.location(), &record.date, "%d.%m.%Y")?;
    let amount = parse_amount(row.location(), &record.amount)?;

    // card payments leave the message column empty and name the merchant in
    // the payer description
    let mut text = normalize_field(&record.message);
    if text.is_empty() {
        text = normalize_field(&record.payer_description);
    }
    let message = normalize_field(&format!("{} {}", record.trans_type, text));

    let destination = [&record.recipient, &record.from_to]
        .iter()
        .map(|part| normalize_field(part))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Transaction::new(date, amount)
        .message(message)
        .destination(destination))
}
