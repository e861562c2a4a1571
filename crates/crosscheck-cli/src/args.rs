//! CLI argument parsing module.
//!
//! The command surface of `ta-crosscheck`, defined with clap and converted
//! into the harness's [`RunOptions`].
//!
//! # Examples
//!
//! ```bash
//! # Run the embedded suite against the bundled price file
//! ta-crosscheck
//!
//! # Only bollinger, rounding to 4 decimals, with a full value table
//! ta-crosscheck --name bollinger -d 4 -v
//!
//! # Skip no warm-up at all and widen the candidate's bands
//! ta-crosscheck -m -1 --ck "devs=2.5" --rk "nbdevup=2.5, nbdevdn=2.5"
//!
//! # Show what the suite contains
//! ta-crosscheck --list-names
//! ```

use std::path::PathBuf;

use clap::Parser;
use ta_crosscheck_core::logging::{LogConfig, LogTarget, Verbosity};
use ta_crosscheck_core::params::ParamOverrides;
use ta_crosscheck_core::reconcile::MinperiodMode;
use ta_crosscheck_core::resolve::Overrides;
use ta_crosscheck_core::runner::RunOptions;

use crate::error::{CliError, Result};

/// Price file used when `--data` is not given.
pub const DEFAULT_DATA: &str = "data/2006-day-001.txt";

/// ta-crosscheck: cross-check indicator implementations against a reference
#[derive(Parser, Debug, Clone)]
#[command(name = "ta-crosscheck")]
#[command(author, version, about = "Cross-check indicator implementations against a reference library")]
#[command(long_about = "ta-crosscheck runs every test of a suite: it computes each indicator \
    with the library under test and with the reference library over the same price \
    history, and reports whether the outputs agree after rounding and warm-up trimming. \
    The exit status is 0 when every test passed, 1 when any failed and 2 on input errors.")]
pub struct Args {
    /// Price file: a header row, then date,open,high,low,close,volume,openinterest rows
    #[arg(long, default_value = DEFAULT_DATA)]
    pub data: PathBuf,

    /// JSON suite to run instead of the embedded default suite
    #[arg(long)]
    pub suite: Option<PathBuf>,

    /// Run only the test with this name
    #[arg(long)]
    pub name: Option<String>,

    /// Print the names of all tests and exit
    #[arg(long)]
    pub list_names: bool,

    /// Decimal places to round both sides to (negative disables rounding)
    #[arg(short, long, allow_negative_numbers = true)]
    pub decimals: Option<i32>,

    /// Warm-up skipping: -1 none, 0 global minperiod, 1 per-output minperiods
    #[arg(
        short,
        long,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-1..=1)
    )]
    pub minperiod: Option<i64>,

    /// Candidate parameters merged over each test's own (key=value, ...)
    #[arg(long = "candidate-kwargs", visible_alias = "ck", default_value = "")]
    pub candidate_kwargs: String,

    /// Candidate parameters replacing each test's own (key=value, ...)
    #[arg(long = "candidate-overargs", visible_alias = "cok", default_value = "")]
    pub candidate_overargs: String,

    /// Reference parameters merged over each test's own (key=value, ...)
    #[arg(long = "reference-kwargs", visible_alias = "rk", default_value = "")]
    pub reference_kwargs: String,

    /// Reference parameters replacing each test's own (key=value, ...)
    #[arg(long = "reference-overargs", visible_alias = "rok", default_value = "")]
    pub reference_overargs: String,

    /// Log to standard error instead of standard output
    #[arg(long)]
    pub stderr: bool,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log per-test headers and full value tables
    #[arg(short, long)]
    pub verbose: bool,
}

fn overrides(flag: &str, update: &str, replace: &str) -> Result<ParamOverrides> {
    ParamOverrides::from_strs(update, replace).map_err(|e| match e {
        ta_crosscheck_core::Error::ParamSyntax { input, reason } => CliError::InvalidArgument {
            argument: flag.to_string(),
            reason: format!("cannot parse '{input}': {reason}"),
            suggestion: Some(
                "Use comma-separated key=value pairs, e.g. \"period=20, devs=2.0\"".to_string(),
            ),
        },
        other => other.into(),
    })
}

impl Args {
    /// Log destination and verbosity.
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            target: if self.stderr { LogTarget::Stderr } else { LogTarget::Stdout },
            verbosity: Verbosity::from_flags(self.quiet, self.verbose),
        }
    }

    /// Validates the arguments and builds the run options.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArgument` if an override string is malformed.
    pub fn run_options(&self) -> Result<RunOptions> {
        let overrides = Overrides {
            decimals: self.decimals,
            minperiod: self.minperiod.map(MinperiodMode::from_flag),
            candidate: overrides(
                "--candidate-kwargs/--candidate-overargs",
                &self.candidate_kwargs,
                &self.candidate_overargs,
            )?,
            reference: overrides(
                "--reference-kwargs/--reference-overargs",
                &self.reference_kwargs,
                &self.reference_overargs,
            )?,
        };

        Ok(RunOptions {
            name: self.name.clone(),
            list_names: self.list_names,
            overrides,
            log: self.log_config(),
        })
    }
}
