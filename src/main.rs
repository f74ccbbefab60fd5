//! bank2qif CLI
//!
//! Reads a bank statement export and writes it out as QIF.
//!
//! # Usage
//!
//! ```bash
//! bank2qif -t fio -i vypis.gpc -o vypis.qif
//! bank2qif -t kb < vypis.csv > vypis.qif
//! bank2qif --list
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use bank2qif::encoding::for_label;
use bank2qif::{convert, AccountType, ConvertOptions, Registry, Result};
use clap::Parser;
use log::warn;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(name = "bank2qif", version, about = "Convert bank statements to QIF")]
struct Cli {
    /// Statement file to read (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// QIF file to write (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Statement format
    #[arg(short = 't', long = "type", default_value = "mbank")]
    format: String,

    /// Input encoding label, overriding the format's usual one (e.g. cp1250, utf-8)
    #[arg(long)]
    encoding: Option<String>,

    /// QIF account type: bank, cash or ccard
    #[arg(long, default_value = "bank")]
    account_type: AccountType,

    /// Print the supported formats and exit
    #[arg(long)]
    list: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let registry = Registry::builtin();

    if cli.list {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for name in registry.names() {
            writeln!(handle, "{}", name)?;
        }
        return Ok(());
    }

    let options = ConvertOptions {
        format: cli.format,
        encoding: cli.encoding.as_deref().map(for_label).transpose()?,
        account_type: cli.account_type,
    };
    // fail on a bad format name before touching the output file
    registry.get(&options.format)?;

    let input: Box<dyn Read> = match &cli.input {
        Some(path) => Box::new(File::open(path)?),
        None => Box::new(io::stdin()),
    };

    match &cli.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let result = convert(&registry, &options, input, &mut writer)
                .and_then(|written| writer.flush().map(|_| written).map_err(Into::into));
            if result.is_err() {
                // created by this run, so remove the partial output
                drop(writer);
                if let Err(e) = fs::remove_file(path) {
                    warn!("Could not remove {}: {}", path.display(), e);
                }
            }
            result.map(|_| ())
        }
        None => {
            let stdout = io::stdout();
            convert(&registry, &options, input, stdout.lock()).map(|_| ())
        }
    }
}
