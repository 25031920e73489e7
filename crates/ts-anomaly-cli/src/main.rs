//! ts-anomaly command-line interface
//!
//! This binary loads a CSV time series, flags points far from their rolling
//! mean, and writes the annotated series as CSV.

use std::process::ExitCode;

use clap::Parser;
use ts_anomaly_cli::args::Args;
use ts_anomaly_cli::error::EXIT_INVALID_ARGUMENT;
use ts_anomaly_cli::{init_logging, run};

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version also arrive here, on stdout
            let _ = err.print();
            return if err.use_stderr() {
                exit_code(EXIT_INVALID_ARGUMENT)
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            exit_code(err.exit_code())
        }
    }
}
