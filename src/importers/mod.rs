//! Statement importers, one per bank export format.
//!
//! Every importer turns a decoded text stream into a lazy sequence of
//! [`Transaction`]s. Nothing is read until the sequence is pulled, and the
//! sequence ends after the first error.

pub mod airbank;
pub mod csob;
pub mod fio;
pub mod kb;
pub mod mbank;
pub mod slsp;
pub mod sporitelna;
pub mod tatra;
pub mod unicredit;
pub mod zuno;

use crate::error::Result;
use crate::transaction::Transaction;
use encoding_rs::Encoding;
use std::io::BufRead;

/// Lazy, single-pass sequence of imported transactions.
pub type Transactions<'a> = Box<dyn Iterator<Item = Result<Transaction>> + 'a>;

/// A source format: its name, its character encoding and how to read it.
pub trait Importer: Send + Sync {
    /// Name the format is selected by.
    fn name(&self) -> &'static str;

    /// Character encoding the bank exports this format in.
    fn encoding(&self) -> &'static Encoding;

    /// Wraps already decoded input into a transaction sequence.
    fn import<'a>(&self, input: Box<dyn BufRead + 'a>) -> Transactions<'a>;
}

/// Ends an iterator of results after its first error.
pub(crate) struct StopOnError<I> {
    inner: I,
    failed: bool,
}

impl<I> StopOnError<I> {
    pub(crate) fn new(inner: I) -> Self {
        StopOnError {
            inner,
            failed: false,
        }
    }
}

impl<T, I: Iterator<Item = Result<T>>> Iterator for StopOnError<I> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.inner.next();
        if let Some(Err(_)) = next {
            self.failed = true;
        }
        next
    }
}

/// Boxes a result iterator into [`Transactions`], fusing it on error.
pub(crate) fn transactions<'a, I>(inner: I) -> Transactions<'a>
where
    I: Iterator<Item = Result<Transaction>> + 'a,
{
    Box::new(StopOnError::new(inner))
}
