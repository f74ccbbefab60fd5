//! UniCredit Bank CSV export.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::delimited::{DelimitedRows, Row, Start};
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, UTF_8};
use std::io::BufRead;
use std::ops::RangeInclusive;

const HEADERS: &[&str] = &["Účet"];

/// Transaction type label of card payments.
const CARD_PAYMENT: &str = "PLATBA PLATEBNÍ KARTOU";

/// The "transaction details" columns, starting with the type label.
const DETAILS: RangeInclusive<usize> = 13..=18;

pub struct UniCredit;

impl Importer for UniCredit {
    fn name(&self) -> &'static str {
        "unicredit"
    }

    fn encoding(&self) -> &'static Encoding {
        UTF_8
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            DelimitedRows::new(input, Start::AfterHeader(HEADERS))
                .map(|row| row.and_then(|row| parse_row(&row))),
        )
    }
}

fn parse_row(row: &Row) -> Result<Transaction> {
    let amount = row.amount(1)?;
    let date = row.date(3, "%Y-%m-%d")?;

    let bank_code = row.cell(5)?.trim();
    let bank_name = normalize_field(&format!("{} {}", row.field(6)?, row.field(7)?));
    let account_number = row.field(8)?;
    let account_name = row.field(9)?;

    let mut destination = if account_number.is_empty() {
        None
    } else {
        Some(normalize_field(&format!(
            "{}: {}/{} {}",
            bank_name, account_number, bank_code, account_name
        )))
    };

    if destination.is_none() && row.cell(*DETAILS.start())?.trim() == CARD_PAYMENT {
        // the merchant is in the last filled-in detail column
        for column in DETAILS.rev() {
            let detail = row.field(column)?;
            if !detail.is_empty() {
                destination = Some(detail);
                break;
            }
        }
    }

    let details = DETAILS
        .map(|column| row.cell(column))
        .collect::<Result<Vec<_>>>()?;
    let message = normalize_field(&details.join(" "));

    Ok(Transaction::new(date, amount)
        .message(message)
        .destination(destination.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    fn row(amount: &str, date: &str, account: &str, details: [&str; 6]) -> String {
        let mut cells = vec![String::new(); 19];
        cells[0] = "1234567890/2700".to_string();
        cells[1] = amount.to_string();
        cells[2] = "CZK".to_string();
        cells[3] = date.to_string();
        if !account.is_empty() {
            cells[5] = "0800".to_string();
            cells[6] = "Česká".to_string();
            cells[7] = "spořitelna".to_string();
            cells[8] = account.to_string();
            cells[9] = "Jan Novák".to_string();
        }
        for (i, detail) in details.iter().enumerate() {
            cells[13 + i] = detail.to_string();
        }
        cells.join(";")
    }

    fn import(rows: &[String]) -> Vec<Transaction> {
        let input = format!("Pohyby na účtu\nÚčet;Částka;Měna;Datum zaúčtování\n{}\n", rows.join("\n"));
        UniCredit
            .import(Box::new(Cursor::new(input)))
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_transfer_destination() {
        let txs = import(&[row(
            "-1 500,00",
            "2012-03-05",
            "123456789",
            ["PLATBA", "nájem", "", "", "", ""],
        )]);
        assert_eq!(txs[0].amount, Some(Decimal::from_str("-1500").unwrap()));
        assert_eq!(
            txs[0].destination.as_deref(),
            Some("Česká spořitelna: 123456789/0800 Jan Novák")
        );
        assert_eq!(txs[0].message.as_deref(), Some("PLATBA nájem"));
    }

    #[test]
    fn test_card_payment_destination_from_last_detail() {
        let txs = import(&[row(
            "-250,00",
            "2012-03-06",
            "",
            [CARD_PAYMENT, "karta 1234", "TESCO", "  PRAHA 5 ", "", ""],
        )]);
        assert_eq!(txs[0].destination.as_deref(), Some("PRAHA 5"));
        assert_eq!(
            txs[0].message.as_deref(),
            Some("PLATBA PLATEBNÍ KARTOU karta 1234 TESCO PRAHA 5")
        );
    }

    #[test]
    fn test_card_payment_uses_highest_column() {
        let txs = import(&[row(
            "-1,00",
            "2012-03-06",
            "",
            [CARD_PAYMENT, "", "", "", "", "BILLA"],
        )]);
        assert_eq!(txs[0].destination.as_deref(), Some("BILLA"));
    }

    #[test]
    fn test_other_types_have_no_fallback() {
        let txs = import(&[row(
            "-1,00",
            "2012-03-06",
            "",
            ["VÝBĚR", "ATM", "", "", "", ""],
        )]);
        assert_eq!(txs[0].destination, None);
    }
}
