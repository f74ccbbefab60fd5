//! Česká spořitelna HTML statement.

use super::{transactions, Importer, Transactions};
use crate::error::{ConvertError, Location, Result};
use crate::framing::markup::{parse_document, table_rows, TableRow};
use crate::framing::{parse_amount, parse_date};
use crate::normalize::normalize_field;
use crate::transaction::Transaction;
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{BufRead, Read};

/// The transaction table is the third table of the page.
const TABLE_INDEX: usize = 2;
/// Title and caption rows.
const HEAD_ROWS: usize = 2;
/// Summary row.
const TAIL_ROWS: usize = 1;

const DATE: usize = 0;
const DETAIL: usize = 1;
const COUNTERPARTY: usize = 2;
const NOTE: usize = 3;
const AMOUNT: usize = 4;

/// Booking date and fee appended to the detail column, e.g. `(05.03.2012, poplatek 0,00)`.
static DETAIL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}[^)]*\)\s*$").unwrap());

pub struct Sporitelna;

impl Importer for Sporitelna {
    fn name(&self) -> &'static str {
        "sporitelna"
    }

    fn encoding(&self) -> &'static Encoding {
        UTF_8
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        transactions(
            std::iter::once_with(move || load_rows(input))
                .flat_map(|rows| match rows {
                    Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
                    Err(e) => vec![Err(e)],
                })
                .map(|row| row.and_then(|row| parse_row(&row))),
        )
    }
}

fn load_rows(mut input: Box<dyn BufRead + '_>) -> Result<Vec<TableRow>> {
    let mut html = String::new();
    input.read_to_string(&mut html)?;
    let document = parse_document(&html)?;
    table_rows(&document, TABLE_INDEX, HEAD_ROWS, TAIL_ROWS)
}

fn parse_row(row: &TableRow) -> Result<Transaction> {
    let location = Location::Row(row.number);
    let cell = |column: usize| {
        row.cells
            .get(column)
            .map(|text| normalize_field(text))
            .ok_or_else(|| ConvertError::MissingColumn { location, column })
    };

    let date = parse_date(location, &cell(DATE)?, "%d.%m.%Y")?;
    let amount = parse_amount(location, &cell(AMOUNT)?)?;

    let detail = cell(DETAIL)?;
    let detail = DETAIL_SUFFIX.replace(&detail, "");
    let message = normalize_field(&format!("{} {}", detail, cell(NOTE)?));

    Ok(Transaction::new(date, amount)
        .destination(cell(COUNTERPARTY)?)
        .message(message))
}
