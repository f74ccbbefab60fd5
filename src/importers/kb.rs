//! Komerční banka CSV export.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::delimited::{DelimitedRows, Row, Start};
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, WINDOWS_1250};
use std::io::BufRead;

const HEADERS: &[&str] = &["Datum splatnosti"];

pub struct Kb;

impl Importer for Kb {
    fn name(&self) -> &'static str {
        "kb"
    }

    fn encoding(&self) -> &'static Encoding {
        WINDOWS_1250
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            DelimitedRows::new(input, Start::AfterHeader(HEADERS))
                .map(|row| row.and_then(|row| parse_row(&row))),
        )
    }
}

fn parse_row(row: &Row) -> Result<Transaction> {
    let date = row.date(0, "%d.%m.%Y")?;
    let amount = row.amount(4)?;

    let message = normalize_field(&format!(
        "{} {} {}",
        row.field(12)?,
        row.field(15)?,
        row.field(16)?
    ));
    Ok(Transaction::new(date, amount).message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    fn row(date: &str, amount: &str, kind: &str, note: &str, target: &str) -> String {
        let mut cells = vec![String::new(); 17];
        cells[0] = date.to_string();
        cells[4] = amount.to_string();
        cells[12] = kind.to_string();
        cells[15] = note.to_string();
        cells[16] = target.to_string();
        cells.join(";")
    }

    #[test]
    fn test_statement() {
        let input = format!(
            "Název účtu;Běžný účet\nDatum splatnosti;Datum odepsání;Protiúčet;Název;Částka\n{}\n{}\n\n{}\n",
            row("01.03.2012", "-450,00", "Platba", "\"Nájem\"", "Byt  3"),
            row("2.3.2012", "12 000,00", "Mzda", "", ""),
            row("03.03.2012", "1,00", "after blank", "", ""),
        );
        let txs: Vec<Transaction> = Kb
            .import(Box::new(Cursor::new(input)))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2012, 3, 1).unwrap());
        assert_eq!(txs[0].amount, Some(Decimal::from_str("-450").unwrap()));
        assert_eq!(txs[0].message.as_deref(), Some("Platba Nájem Byt 3"));
        assert_eq!(txs[1].date, NaiveDate::from_ymd_opt(2012, 3, 2).unwrap());
        assert_eq!(txs[1].message.as_deref(), Some("Mzda"));
    }

    #[test]
    fn test_short_row_is_missing_column() {
        let input = "Datum splatnosti\n01.03.2012;a;b;c;-1,00\n";
        let err = Kb
            .import(Box::new(Cursor::new(input)))
            .next()
            .unwrap()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing column 12 on line 2");
    }
}
