//! ta-crosscheck-core: correctness cross-checking for technical analysis libraries
//!
//! This crate runs a technical-indicator library (the *candidate*) against a
//! trusted *reference* implementation of the same indicators over one price
//! table, and decides whether their outputs agree under a configurable
//! rounding and warm-up alignment policy.
//!
//! The crate never computes indicator values itself. Both sides plug in
//! through the [`adapter`] traits.
//!
//! # Overview
//!
//! - [`table::PriceTable`]: the shared, immutable input data
//! - [`adapter`]: the candidate and reference indicator traits and libraries
//! - [`registry::Registry`]: ordered test entries, built in code or from JSON
//! - [`reconcile::reconcile()`]: the output comparison algorithm
//! - [`runner::Runner`]: iterates a registry and records verdicts
//!
//! # Quick Start
//!
//! ```
//! use ta_crosscheck_core::prelude::*;
//!
//! let nan = f64::NAN;
//! let candidate = vec![NamedSeries::new("rsi", vec![nan, nan, 51.234_567])];
//! let reference = vec![NamedSeries::new("RSI", vec![nan, nan, 51.234_568])];
//!
//! let policy = Policy::new(MinperiodMode::Global).with_decimals(5).with_minperiods(2, vec![2]);
//! assert!(reconcile(&candidate, &reference, &policy).passed());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapter;
pub mod error;
pub mod logging;
pub mod params;
pub mod prelude;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod resolve;
pub mod runner;
pub mod series;
pub mod table;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use reconcile::reconcile;
