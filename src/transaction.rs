//! The normalized transaction every importer produces.

use crate::normalize::non_empty;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One financial movement on the statement.
///
/// An importer fills in either `amount` or `splits`, never both.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Booking (or, where the bank reports one, execution) date
    pub date: NaiveDate,

    /// Signed amount in account currency; `None` for split transactions
    pub amount: Option<Decimal>,

    /// Counterparty account or name
    pub destination: Option<String>,

    /// Normalized memo text
    pub message: Option<String>,

    /// Bank-side transaction identifier
    pub ident: Option<String>,

    /// Memo-tagged parts of the total, in statement order
    pub splits: Vec<SplitItem>,
}

/// A memo-tagged part of a transaction's total, e.g. a bank fee.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitItem {
    pub amount: Decimal,
    pub memo: String,
}

impl Transaction {
    /// Creates a single-amount transaction.
    pub fn new(date: NaiveDate, amount: Decimal) -> Self {
        Transaction {
            date,
            amount: Some(amount),
            destination: None,
            message: None,
            ident: None,
            splits: Vec::new(),
        }
    }

    /// Creates a transaction whose total is carried by split items.
    pub fn with_splits(date: NaiveDate, splits: Vec<SplitItem>) -> Self {
        Transaction {
            date,
            amount: None,
            destination: None,
            message: None,
            ident: None,
            splits,
        }
    }

    /// Sets the destination; empty text leaves it absent.
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = non_empty(destination.into());
        self
    }

    /// Sets the message; empty text leaves it absent.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = non_empty(message.into());
        self
    }

    /// Sets the identifier; empty text leaves it absent.
    pub fn ident(mut self, ident: impl Into<String>) -> Self {
        self.ident = non_empty(ident.into());
        self
    }

    /// Appends a split item.
    pub fn push_split(&mut self, amount: Decimal, memo: impl Into<String>) {
        self.splits.push(SplitItem {
            amount,
            memo: memo.into(),
        });
    }

    /// The effective total: the unrounded sum of the splits when there are
    /// any, else the plain amount.
    pub fn total(&self) -> Option<Decimal> {
        if self.splits.is_empty() {
            self.amount
        } else {
            Some(self.splits.iter().map(|s| s.amount).sum())
        }
    }

    /// Returns `true` if the splits must be written out individually.
    pub fn has_distinct_splits(&self) -> bool {
        self.splits.len() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2012, 3, 5).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_plain_total() {
        let tx = Transaction::new(date(), dec("-12.50"));
        assert_eq!(tx.total(), Some(dec("-12.50")));
        assert!(!tx.has_distinct_splits());
    }

    #[test]
    fn test_split_total_is_unrounded_sum() {
        let mut tx = Transaction::with_splits(date(), Vec::new());
        tx.push_split(dec("-100.004"), "Platba");
        tx.push_split(dec("-0.004"), "Poplatek");
        assert_eq!(tx.total(), Some(dec("-100.008")));
        assert!(tx.has_distinct_splits());
    }

    #[test]
    fn test_single_split_is_not_distinct() {
        let tx = Transaction::with_splits(
            date(),
            vec![SplitItem {
                amount: dec("5"),
                memo: "x".to_string(),
            }],
        );
        assert_eq!(tx.total(), Some(dec("5")));
        assert!(!tx.has_distinct_splits());
    }

    #[test]
    fn test_missing_amount_has_no_total() {
        let tx = Transaction::with_splits(date(), Vec::new());
        assert_eq!(tx.total(), None);
    }

    #[test]
    fn test_empty_text_is_absent() {
        let tx = Transaction::new(date(), dec("1"))
            .message("")
            .destination("123/0800")
            .ident("");
        assert_eq!(tx.message, None);
        assert_eq!(tx.ident, None);
        assert_eq!(tx.destination.as_deref(), Some("123/0800"));
    }
}
