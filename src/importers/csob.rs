//! ČSOB plain text statement.
//!
//! Records carry only day and month; the year comes from the statement period
//! in the preamble. A record looks like this:
//!
//! ```text
//! 05.03.   -1 500,00   -6,90
//! Jan Novák 123456789/0800
//! -2,00
//! Nájem březen
//! ```
//!
//! The first line holds the date, the amount and an optional fee, the second
//! the counterparty, the third an optional additional fee and the rest the
//! message. Positions count blank lines, so an empty second line means there
//! is no counterparty.

use super::{transactions, Importer, Transactions};
use crate::error::{ConvertError, Location, Result};
use crate::framing::blocks::{DelimiterBlocks, TextBlock};
use crate::framing::{parse_amount, parse_date, parse_optional_amount, ymd};
use crate::normalize::normalize_field;
use crate::transaction::{SplitItem, Transaction};
use chrono::{Datelike, NaiveDate};
use encoding_rs::{Encoding, ISO_8859_2};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::BufRead;

static PERIOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*Období:\s*([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4})\s*-\s*([0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4})")
        .unwrap()
});

static FIRST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*([0-9]{1,2})\.([0-9]{1,2})\.?\s+(-?[0-9 ]*[0-9],[0-9]{2})(?:\s+(-?[0-9 ]*[0-9],[0-9]{2}))?\s*$",
    )
    .unwrap()
});

static FEE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(-?[0-9 ]*[0-9],[0-9]{2})\s*$").unwrap());

const PRINCIPAL_MEMO: &str = "Platba";
const FEE_MEMO: &str = "Poplatek";
const PROCESSING_FEE_MEMO: &str = "Poplatek za zpracování";

/// The statement period, used to give day/month dates their year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    fn find(preamble: &[(usize, String)]) -> Result<Period> {
        for (line, text) in preamble {
            if let Some(caps) = PERIOD.captures(text) {
                let location = Location::Line(*line);
                let period = Period {
                    start: parse_date(location, &caps[1], "%d.%m.%Y")?,
                    end: parse_date(location, &caps[2], "%d.%m.%Y")?,
                };
                debug!("Statement period {} - {}", period.start, period.end);
                return Ok(period);
            }
        }
        Err(ConvertError::MissingMarker {
            marker: "the statement period",
        })
    }

    /// Dates before the start of the period belong to the year the period ends in.
    fn resolve(&self, location: Location, day: u32, month: u32) -> Result<NaiveDate> {
        if (month, day) < (self.start.month(), self.start.day()) {
            ymd(location, self.end.year(), month, day)
        } else {
            ymd(location, self.start.year(), month, day)
        }
    }
}

pub struct Csob;

impl Importer for Csob {
    fn name(&self) -> &'static str {
        "csob"
    }

    fn encoding(&self) -> &'static Encoding {
        ISO_8859_2
    }

    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a> {
        let mut blocks = DelimiterBlocks::new(input);
        let period = match blocks.preamble().and_then(Period::find) {
            Ok(period) => period,
            Err(e) => return transactions(std::iter::once(Err(e))),
        };
        transactions(blocks.map(move |block| block.and_then(|block| parse_block(&period, &block))))
    }
}

fn parse_block(period: &Period, block: &TextBlock) -> Result<Transaction> {
    let (line, first) = &block.lines[0];
    let location = Location::Line(*line);
    let caps = FIRST_LINE.captures(first).ok_or_else(|| ConvertError::InvalidRecord {
        location,
        message: format!("expected date and amount, found {:?}", first.trim()),
    })?;

    let number = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|_| ConvertError::invalid_field(location, "date", &caps[0]))
    };
    let date = period.resolve(location, number(1)?, number(2)?)?;
    let amount = parse_amount(location, &caps[3])?;
    let fee = match caps.get(4) {
        Some(fee) => parse_optional_amount(location, fee.as_str())?,
        None => None,
    };

    let destination = block
        .lines
        .get(1)
        .map(|(_, text)| normalize_field(text))
        .unwrap_or_default();

    let mut rest = block.lines.iter().skip(2).peekable();
    let mut processing_fee = None;
    if let Some((line, text)) = rest.peek() {
        if FEE_LINE.is_match(text) {
            processing_fee = parse_optional_amount(Location::Line(*line), text)?;
            rest.next();
        }
    }
    let message = normalize_field(
        &rest
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join(" "),
    );

    let transaction = if fee.is_none() && processing_fee.is_none() {
        Transaction::new(date, amount)
    } else {
        let memo = if message.is_empty() {
            PRINCIPAL_MEMO.to_string()
        } else {
            message.clone()
        };
        let mut splits = vec![SplitItem { amount, memo }];
        if let Some(fee) = fee {
            splits.push(SplitItem {
                amount: fee,
                memo: FEE_MEMO.to_string(),
            });
        }
        if let Some(fee) = processing_fee {
            splits.push(SplitItem {
                amount: fee,
                memo: PROCESSING_FEE_MEMO.to_string(),
            });
        }
        Transaction::with_splits(date, splits)
    };

    Ok(transaction.destination(destination).message(message))
}
