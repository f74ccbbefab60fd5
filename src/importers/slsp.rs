//! Slovenská sporiteľňa CSV export. The file has no header row.

use super::{transactions, Importer, Transactions};
use crate::error::Result;
use crate::framing::delimited::{DelimitedRows, Row, Start};
use crate::transaction::Transaction;
use encoding_rs::{Encoding, WINDOWS_1250};
use std::io::BufRead;

pub struct Slsp;

impl Importer for Slsp {
    fn name(&self) -> &'static str {
        "slsp"
    }

    fn encoding(&self) -> &'static Encoding {
        WINDOWS_1250
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            DelimitedRows::new(input, Start::Immediately)
                .min_cells(2)
                .map(|row| row.and_then(|row| parse_row(&row))),
        )
    }
}

fn parse_row(row: &Row) -> Result<Transaction> {
    let date = row.date(0, "%d.%m.%Y")?;
    let amount = row.amount(7)?;

    let prefix = row.field(3)?;
    let account_number = row.field(4)?;
    let bank_code = row.field(5)?;
    let mut destination = String::new();
    if !account_number.is_empty() {
        destination = format!("{}/{}", account_number, bank_code).trim().to_string();
        if !prefix.is_empty() {
            destination = format!("{}-{}", prefix, destination);
        }
    }

    let account_name = row.field(6)?;
    let name = row.field(11)?;
    let information = row.field(16)?;
    let extended = format!("{} {}", row.field(18)?, row.field(22)?);

    let mut message = format!("{} {} {}", name, information, extended)
        .trim()
        .to_string();
    if !account_name.is_empty() {
        message.push_str(", ");
        message.push_str(&account_name);
    }

    Ok(Transaction::new(date, amount)
        .destination(destination)
        .message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn row(date: &str, prefix: &str, account: &str, account_name: &str, amount: &str) -> String {
        let mut cells = vec![String::new(); 23];
        cells[0] = date.to_string();
        cells[3] = prefix.to_string();
        cells[4] = account.to_string();
        cells[5] = "0900".to_string();
        cells[6] = account_name.to_string();
        cells[7] = amount.to_string();
        cells[11] = "Platba".to_string();
        cells[16] = "faktúra 12".to_string();
        cells[18] = "VS".to_string();
        cells[22] = "123".to_string();
        cells.join(";")
    }

    #[test]
    fn test_statement() {
        let input = format!(
            "{}\n{}\n;\n{}\n",
            row("10.01.2012", "19", "123456", "Peter Novák", "-20,00"),
            row("11.01.2012", "", "", "", "5,00"),
            row("12.01.2012", "", "", "", "6,00"),
        );
        let txs: Vec<Transaction> = Slsp
            .import(Box::new(Cursor::new(input)))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].date, NaiveDate::from_ymd_opt(2012, 1, 10).unwrap());
        assert_eq!(txs[0].destination.as_deref(), Some("19-123456/0900"));
        assert_eq!(
            txs[0].message.as_deref(),
            Some("Platba faktúra 12 VS 123, Peter Novák")
        );
        assert_eq!(txs[1].destination, None);
        assert_eq!(txs[1].message.as_deref(), Some("Platba faktúra 12 VS 123"));
    }
}
