//! mBank CSV export, Czech and Slovak variants.

use super::{transactions, Importer, Transactions};
use crate::error::{ConvertError, Location, Result};
use crate::framing::delimited::{DelimitedRows, Row, Start};
use crate::framing::ymd;
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use chrono::NaiveDate;
use encoding_rs::{Encoding, WINDOWS_1250};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;

const HEADERS: &[&str] = &["#Datum uskutečnění transakce", "#Dátum uskutočnenia transakcie"];

/// Card payments carry the real execution date at the end of the description.
static EXECUTION_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)\s+DATUM PROVEDEN. TRANSAKCE: ([0-9]{4})-([0-9]{2})-([0-9]{2})").unwrap()
});

pub struct MBank;

impl Importer for MBank {
    fn name(&self) -> &'static str {
        "mbank"
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

/// Splits `<description> DATUM PROVEDENÍ TRANSAKCE: YYYY-MM-DD` into its parts.
fn execution_date(location: Location, description: &str) -> Result<Option<(String, NaiveDate)>> {
    let caps = match EXECUTION_DATE.captures(description) {
        Some(caps) => caps,
        None => return Ok(None),
    };
    let part = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|_| ConvertError::invalid_field(location, "date", &caps[0]))
    };
    let date = ymd(location, part(2)? as i32, part(3)?, part(4)?)?;
    Ok(Some((caps[1].to_string(), date)))
}

fn parse_row(row: &Row) -> Result<Transaction> {
    let mut date = row.date(1, "%d-%m-%Y")?;
    let amount = row.amount(9)?;

    let trans_type = row.field(2)?;
    let mut description = row.field(3)?;
    let counterparty = row.field(4)?;
    let account = row.field(5)?;

    if let Some((text, executed)) = execution_date(row.location(), &description)? {
        description = text;
        date = executed;
    }

    let message = normalize_field(&format!(
        "{} {} {} {}",
        trans_type, description, counterparty, account
    ));
    Ok(Transaction::new(date, amount).message(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Cursor;
    use std::str::FromStr;

    const STATEMENT: &str = "mBank S.A., organizační složka;\n\
Klient:;Jan Novák;\n\
\n\
#Datum uskutečnění transakce;#Datum zaúčtování transakce;#Popis transakce;#Zpráva pro příjemce;#Plátce/Příjemce;#Číslo účtu plátce/příjemce;#KS;#VS;#SS;#Částka transakce;#Účetní zůstatek po transakci;\n\
05-03-2012;06-03-2012;PLATBA KARTOU;\"TESCO PRAHA  DATUM PROVEDENÍ TRANSAKCE: 2012-03-03\";\"\";\"\";\"0000\";\"\";\"\";-1 234,50;10 000,00;\n\
07-03-2012;07-03-2012;PŘÍCHOZÍ PLATBA Z MBANK;\"výplata\";\"ACME s.r.o.\";\"670100-2201234567/6210\";\"\";\"\";\"\";25 000,00;35 000,00;\n\
\n\
;;;;;;;;#Konečný zůstatek:;35 000,00;\n";

    fn import(input: &str) -> Vec<Result<Transaction>> {
        MBank.import(Box::new(Cursor::new(input.to_string()))).collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_statement() {
        let txs: Vec<Transaction> = import(STATEMENT).into_iter().map(|t| t.unwrap()).collect();
        assert_eq!(txs.len(), 2);

        assert_eq!(txs[0].date, date(2012, 3, 3));
        assert_eq!(txs[0].amount, Some(Decimal::from_str("-1234.50").unwrap()));
        assert_eq!(txs[0].message.as_deref(), Some("PLATBA KARTOU TESCO PRAHA"));

        assert_eq!(txs[1].date, date(2012, 3, 7));
        assert_eq!(
            txs[1].message.as_deref(),
            Some("PŘÍCHOZÍ PLATBA Z MBANK výplata ACME s.r.o. 670100-2201234567/6210")
        );
        assert_eq!(txs[1].destination, None);
    }

    #[test]
    fn test_slovak_header() {
        let input = "#Dátum uskutočnenia transakcie;#Dátum zaúčtovania transakcie;#Popis;#Správa;#Platiteľ;#Účet;;;;#Suma;\n\
01-02-2012;01-02-2012;VKLAD;;;;;;;100,00;\n";
        let txs = import(input);
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].as_ref().unwrap().message.as_deref(), Some("VKLAD"));
    }

    #[test]
    fn test_invalid_execution_date_is_fatal() {
        let input = "#Datum uskutečnění transakce\n\
05-03-2012;06-03-2012;PLATBA KARTOU;X DATUM PROVEDENÍ TRANSAKCE: 2012-02-30;;;;;;-1,00;\n";
        let err = import(input).remove(0).unwrap_err();
        assert_eq!(err.to_string(), "invalid date \"2012-02-30\" on line 2");
    }

    #[test]
    fn test_bad_amount_stops_import() {
        let input = "#Datum uskutečnění transakce\n\
05-03-2012;05-03-2012;A;;;;;;;x;\n\
06-03-2012;06-03-2012;B;;;;;;;1,00;\n";
        let txs = import(input);
        assert_eq!(txs.len(), 1);
        assert!(txs[0].is_err());
    }
}
