//! gocomplain CLI entry point.

use clap::error::ErrorKind;
use clap::Parser;
use gocomplain::cli::{
    self, Cli, EXIT_EXCEPTION, EXIT_EXTRA_ARGUMENT, EXIT_GOOD, EXIT_INVALID_ARGUMENT,
    EXIT_INVALID_OPTION, EXIT_MISSING_ARGUMENT, EXIT_MISSING_OPTION,
};
use gocomplain::report;
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};

fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_GOOD,
        ErrorKind::UnknownArgument | ErrorKind::InvalidValue | ErrorKind::ValueValidation => {
            EXIT_INVALID_OPTION
        }
        ErrorKind::InvalidSubcommand => EXIT_INVALID_ARGUMENT,
        ErrorKind::MissingRequiredArgument => EXIT_MISSING_OPTION,
        ErrorKind::TooFewValues => EXIT_MISSING_ARGUMENT,
        ErrorKind::TooManyValues | ErrorKind::WrongNumberOfValues => EXIT_EXTRA_ARGUMENT,
        _ => EXIT_INVALID_OPTION,
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(exit_code(e.kind()));
        }
    };

    let verbose = cli.verbose;
    panic::set_hook(Box::new(move |info| {
        if verbose {
            eprintln!("{}", info);
            eprintln!("{}", Backtrace::force_capture());
        }
    }));

    let exit_code = match panic::catch_unwind(AssertUnwindSafe(|| cli::run(&cli))) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("{}", report::error(&format!("{:#}", e)));
            EXIT_EXCEPTION
        }
        Err(payload) => {
            if !verbose {
                let msg = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unexpected panic".to_string());
                eprintln!("{}", report::error(&msg));
            }
            EXIT_EXCEPTION
        }
    };

    std::process::exit(exit_code);
}
