//! Commonly used types and traits for convenient importing.
//!
//! ```
//! use ta_crosscheck_core::prelude::*;
//!
//! let registry = Registry::new().with("sma", TestSpec::new().decimals(6));
//! assert_eq!(registry.len(), 1);
//! ```

// Error types
pub use crate::error::{Error, Result};

// Adapters
pub use crate::adapter::{
    CandidateIndicator, CandidateLibrary, FnCandidate, FnReference, ReferenceIndicator,
    ReferenceLibrary,
};

// Data model
pub use crate::params::{parse_kwargs, ParamOverrides, ParamValue, Params};
pub use crate::series::{IndicatorResult, NamedSeries};
pub use crate::table::{PriceRow, PriceTable};

// Registry and running
pub use crate::logging::{LogConfig, LogTarget, SharedBuffer, Verbosity};
pub use crate::reconcile::{reconcile, MinperiodMode, OutputVerdict, Policy, Reconciliation};
pub use crate::registry::{CheckFailure, CustomCheck, Registry, RunOrigin, TestEntry, TestSpec};
pub use crate::resolve::{Comparison, MinperiodsCheck, Overrides};
pub use crate::runner::{Results, RunOptions, RunStatus, Runner};
