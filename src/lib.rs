//! # bank2qif
//!
//! Converts bank statement exports into QIF, the flat ledger format most
//! personal finance tools can import.
//!
//! ## Design Principles
//!
//! - **One importer per format**: each bank layout is a unit struct
//!   implementing [`Importer`], selected by name through a [`Registry`]
//! - **Streaming processing**: importers yield transactions lazily and stop
//!   at the first malformed record
//! - **Exact arithmetic**: amounts are `rust_decimal` values, rounded to two
//!   places only when written out
//! - **Order preserving**: output blocks follow statement order
//!
//! ## Example
//!
//! ```no_run
//! use bank2qif::{convert, ConvertOptions, Registry};
//! use std::fs::File;
//!
//! let input = File::open("statement.csv").unwrap();
//! let written = convert(
//!     &Registry::builtin(),
//!     &ConvertOptions::new("mbank"),
//!     input,
//!     std::io::stdout(),
//! )
//! .unwrap();
//! eprintln!("{} transactions", written);
//! ```

pub mod convert;
pub mod decimal;
pub mod encoding;
pub mod error;
pub mod framing;
pub mod importers;
pub mod normalize;
pub mod qif;
pub mod registry;
pub mod transaction;

pub use convert::{convert, ConvertOptions};
pub use decimal::Decimal2;
pub use error::{ConvertError, ErrorKind, Location, Result};
pub use importers::{Importer, Transactions};
pub use qif::{write_qif, AccountType, QifWriter};
pub use registry::Registry;
pub use transaction::{SplitItem, Transaction};
