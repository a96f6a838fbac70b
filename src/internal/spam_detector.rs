//! Command-line spam classifier.
//!
//! `spam_detector <database path> <message path> <threshold>` prints `SPAM` or
//! `NOT_SPAM`; any invalid argument or input prints `Invalid input` to stderr and exits
//! with a failure code.

use std::{path::PathBuf, process::ExitCode};

use chainmap::{
    logger::initialize_logger,
    spam::{self, INVALID_INPUT, USAGE},
};
use clap::{Parser, error::ErrorKind};
use log::error;

/// Arguments of the spam classifier
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated `phrase,score` list
    database: PathBuf,

    /// Message to classify
    message: PathBuf,

    /// Positive score at which the message is spam
    #[arg(allow_hyphen_values = true)]
    threshold: String,
}

fn main() -> ExitCode {
    initialize_logger();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Help and version output are not failures.
            return if err.print().is_ok() { ExitCode::SUCCESS } else { ExitCode::FAILURE };
        }
        Err(err) => {
            error!("{err}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match spam::run(&args.database, &args.message, &args.threshold) {
        Ok(verdict) => {
            println!("{verdict}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            eprintln!("{INVALID_INPUT}");
            ExitCode::FAILURE
        }
    }
}
