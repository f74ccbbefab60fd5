//! Tatra banka text statement: one `key: value` block per transaction.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::keyvalue::{Block, KeyValueBlocks};
use crate::framing::{parse_amount, parse_date, Captions};
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, UTF_8};
use std::io::BufRead;

const HEADERS: &[&str] = &["Zoznam transakcií"];

const CAPTIONS: Captions = Captions(&[
    ("Dátum", "date"),
    ("Suma", "amount"),
    ("Typ transakcie", "trans_type"),
    ("Popis", "message"),
    ("Protiúčet", "from/to"),
    ("Príjemca", "recipient"),
]);

/// Placeholder recipient of card payments.
const CARD_PAYMENTS: &str = "Platby kartou";

pub struct Tatra;

impl Importer for Tatra {
    fn name(&self) -> &'static str {
        "tatra"
    }

    fn encoding(&self) -> &'static Encoding {
        UTF_8
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            KeyValueBlocks::new(input, HEADERS, CAPTIONS)
                .map(|block| block.and_then(|block| parse_block(&block))),
        )
    }
}

fn parse_block(block: &Block) -> Result<Transaction> {
    let date = parse_date(block.location(), block.get("date"), "%d.%m.%Y")?;
    let amount = parse_amount(block.location(), block.get("amount"))?;

    let mut recipient = normalize_field(block.get("recipient"));
    if recipient == CARD_PAYMENTS {
        recipient.clear();
    }
    let destination = normalize_field(&format!("{} {}", recipient, block.get("from/to")));
    let message = normalize_field(&format!(
        "{} {}",
        block.get("trans_type"),
        block.get("message")
    ));

    Ok(Transaction::new(date, amount)
        .destination(destination)
        .message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    const STATEMENT: &str = "Tatra banka, a.s.\n\
Výpis z účtu SK31 1100 0000 0026 1234 5678\n\
\n\
Zoznam transakcií\n\
\n\
Dátum: 05.03.2012\n\
Typ transakcie: Platba kartou\n\
Príjemca: Platby kartou\n\
Popis: TESCO BRATISLAVA\n\
  pokladňa 4\n\
Suma: -23,40\n\
\n\
Dátum: 06.03.2012\n\
Typ transakcie: Prevod\n\
Príjemca: Ján Kováč\n\
Protiúčet: 2612345678/1100\n\
Suma: 1 500,00\n\
\n\
Strana 1/1\n";

    #[test]
    fn test_statement() {
        let txs: Vec<Transaction> = Tatra
            .import(Box::new(Cursor::new(STATEMENT)))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(txs.len(), 2);

        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2012, 3, 5).unwrap());
        assert_eq!(txs[0].amount, Some(Decimal::from_str("-23.40").unwrap()));
        assert_eq!(txs[0].destination, None);
        assert_eq!(
            txs[0].message.as_deref(),
            Some("Platba kartou TESCO BRATISLAVA pokladňa 4")
        );

        assert_eq!(txs[1].amount, Some(Decimal::from_str("1500").unwrap()));
        assert_eq!(txs[1].destination.as_deref(), Some("Ján Kováč 2612345678/1100"));
        assert_eq!(txs[1].message.as_deref(), Some("Prevod"));
    }

    #[test]
    fn test_balance_line_does_not_touch_amount() {
        let input = "Zoznam transakcií\nDátum: 05.03.2012\nSuma: -1,00\nZostatok: 500,00\n";
        let txs: Vec<Transaction> = Tatra
            .import(Box::new(Cursor::new(input)))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].amount, Some(Decimal::from_str("-1").unwrap()));
    }

    #[test]
    fn test_block_without_date_is_fatal() {
        let input = "Zoznam transakcií\nSuma: 1,00\n";
        let err = Tatra
            .import(Box::new(Cursor::new(input)))
            .next()
            .unwrap()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidField { field: "date", .. }));
    }

    #[test]
    fn test_missing_header() {
        let mut txs = Tatra.import(Box::new(Cursor::new("Dátum: 05.03.2012\nSuma: 1\n")));
        assert!(matches!(
            txs.next().unwrap().unwrap_err(),
            ConvertError::MissingMarker { .. }
        ));
        assert!(txs.next().is_none());
    }
}
