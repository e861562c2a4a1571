//! ta-crosscheck-indicators: bundled indicator adapters for ta-crosscheck
//!
//! Two independent implementations of the same indicator set, so the harness
//! can be run end to end:
//!
//! - [`candidate`]: streaming O(n) kernels, generic over [`SeriesElement`],
//!   exposed as [`CandidateIndicator`](ta_crosscheck_core::adapter::CandidateIndicator)s.
//! - [`reference`]: windowed textbook formulas under TA-Lib names and
//!   parameter conventions.
//!
//! # Quick Start
//!
//! ```
//! use ta_crosscheck_core::params::Params;
//! use ta_crosscheck_indicators::candidate::candidate_library;
//! use ta_crosscheck_indicators::reference::reference_library;
//!
//! let data: Vec<f64> = (1..=40).map(f64::from).collect();
//! let ours = candidate_library().get("sma").unwrap()
//!     .compute(&[&data], &Params::new().with("period", 10_i64)).unwrap();
//! let theirs = reference_library().get("SMA").unwrap()
//!     .compute(&[&data], &Params::new().with("timeperiod", 10_i64)).unwrap();
//! assert_eq!(ours.minperiod(), theirs.minperiod());
//! ```
//!
//! # Available Indicators
//!
//! | candidate | reference | inputs |
//! |---|---|---|
//! | `sma`, `ema`, `wma` | `SMA`, `EMA`, `WMA` | close |
//! | `rsi` | `RSI` | close |
//! | `atr` | `ATR` | high, low, close |
//! | `bollinger` | `BBANDS` | close |
//! | `macd` | `MACD` | close |

#![deny(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod candidate;
pub mod error;
pub mod reference;
pub mod traits;

// Re-export commonly used types at crate root
pub use candidate::candidate_library;
pub use error::{Error, Result};
pub use reference::reference_library;
pub use traits::SeriesElement;
