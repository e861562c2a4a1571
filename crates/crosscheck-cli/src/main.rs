//! ta-crosscheck command-line interface
//!
//! Exits with 0 when every test passed, 1 when any failed and 2 on input
//! errors.

use std::process::ExitCode;

use clap::Parser;
use ta_crosscheck_cli::args::Args;
use ta_crosscheck_cli::CliError;

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let args = Args::parse();
    match ta_crosscheck_cli::run(&args) {
        Ok(status) => exit_code(status.exit_code()),
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(CliError::exit_code(&e))
        }
    }
}
