//! Adapter traits for the two implementations being compared.
//!
//! The harness never computes indicator values itself. The library under test
//! is exposed through [`CandidateIndicator`], the trusted implementation through
//! [`ReferenceIndicator`], and each side is collected in a name-keyed
//! [`Library`].
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_core::adapter::{FnReference, ReferenceLibrary};
//! use ta_crosscheck_core::series::{IndicatorResult, NamedSeries};
//!
//! let mut refs = ReferenceLibrary::new();
//! refs.register(FnReference::new("IDENT", |inputs, params| {
//!     Ok(IndicatorResult::from_outputs(
//!         vec![NamedSeries::new("ident", inputs[0].to_vec())],
//!         params.clone(),
//!     ))
//! }));
//! assert!(refs.get("IDENT").is_some());
//! assert!(refs.get("ident").is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::params::Params;
use crate::series::IndicatorResult;

/// An indicator from the library under test.
///
/// Besides computing, a candidate declares its default inputs, its output
/// names and the alternative names under which the reference library may know
/// it.
pub trait CandidateIndicator {
    /// Name used for registry lookup.
    fn name(&self) -> &str;

    /// Price-table columns fed to the indicator when a test does not say otherwise.
    fn inputs(&self) -> &[&'static str];

    /// Output names, in production order.
    fn outputs(&self) -> &[&'static str];

    /// Reference-library names to try when the upper-cased test name is not found.
    fn aliases(&self) -> &[&'static str] {
        &[]
    }

    /// Default parameters.
    fn default_params(&self) -> Params;

    /// Computes the outputs for the given input columns.
    ///
    /// Parameters absent from `params` take their defaults. The returned
    /// result carries the fully resolved parameter map.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the input is too short.
    fn compute(&self, inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult>;
}

/// A function from the trusted reference library.
pub trait ReferenceIndicator {
    /// Name used for lookup (reference names are conventionally upper case).
    fn name(&self) -> &str;

    /// Computes the outputs for the given input columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the input is too short.
    fn compute(&self, inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult>;
}

/// Gives a library a key for each of its entries.
pub trait Named {
    /// Lookup key.
    fn key(&self) -> &str;
}

impl Named for dyn CandidateIndicator {
    fn key(&self) -> &str {
        self.name()
    }
}

impl Named for dyn ReferenceIndicator {
    fn key(&self) -> &str {
        self.name()
    }
}

/// A name-keyed collection of indicators. Lookup is case-sensitive.
pub struct Library<I: ?Sized + Named> {
    entries: BTreeMap<String, Box<I>>,
}

/// The library under test.
pub type CandidateLibrary = Library<dyn CandidateIndicator>;

/// The trusted reference library.
pub type ReferenceLibrary = Library<dyn ReferenceIndicator>;

impl<I: ?Sized + Named> Default for Library<I> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<I: ?Sized + Named> Library<I> {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an indicator.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&I> {
        self.entries.get(name).map(|b| &**b)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of registered indicators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CandidateLibrary {
    /// Registers a candidate indicator under its own name, replacing any previous entry.
    pub fn register<C: CandidateIndicator + 'static>(&mut self, indicator: C) -> &mut Self {
        let boxed: Box<dyn CandidateIndicator> = Box::new(indicator);
        self.entries.insert(boxed.key().to_string(), boxed);
        self
    }
}

impl ReferenceLibrary {
    /// Registers a reference indicator under its own name, replacing any previous entry.
    pub fn register<R: ReferenceIndicator + 'static>(&mut self, indicator: R) -> &mut Self {
        let boxed: Box<dyn ReferenceIndicator> = Box::new(indicator);
        self.entries.insert(boxed.key().to_string(), boxed);
        self
    }
}

impl<I: ?Sized + Named> fmt::Debug for Library<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

type ComputeFn = dyn Fn(&[&[f64]], &Params) -> Result<IndicatorResult>;

/// A reference indicator backed by a closure.
pub struct FnReference {
    name: String,
    compute: Box<ComputeFn>,
}

impl FnReference {
    /// Wraps `compute` under `name`.
    pub fn new<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&[&[f64]], &Params) -> Result<IndicatorResult> + 'static,
    {
        Self {
            name: name.into(),
            compute: Box::new(compute),
        }
    }
}

impl ReferenceIndicator for FnReference {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
        (self.compute)(inputs, params)
    }
}

/// A candidate indicator backed by a closure plus declared metadata.
pub struct FnCandidate {
    name: String,
    inputs: &'static [&'static str],
    outputs: &'static [&'static str],
    aliases: &'static [&'static str],
    defaults: Params,
    compute: Box<ComputeFn>,
}

impl FnCandidate {
    /// Wraps `compute` under `name`. Defaults: input `close`, a single output
    /// named `out`, no aliases, no default parameters.
    pub fn new<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&[&[f64]], &Params) -> Result<IndicatorResult> + 'static,
    {
        Self {
            name: name.into(),
            inputs: &["close"],
            outputs: &["out"],
            aliases: &[],
            defaults: Params::new(),
            compute: Box::new(compute),
        }
    }

    /// Declares the default input columns.
    #[must_use]
    pub fn with_inputs(mut self, inputs: &'static [&'static str]) -> Self {
        self.inputs = inputs;
        self
    }

    /// Declares the output names.
    #[must_use]
    pub fn with_outputs(mut self, outputs: &'static [&'static str]) -> Self {
        self.outputs = outputs;
        self
    }

    /// Declares reference-name aliases.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Declares default parameters.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Params) -> Self {
        self.defaults = defaults;
        self
    }
}

impl CandidateIndicator for FnCandidate {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &[&'static str] {
        self.inputs
    }

    fn outputs(&self) -> &[&'static str] {
        self.outputs
    }

    fn aliases(&self) -> &[&'static str] {
        self.aliases
    }

    fn default_params(&self) -> Params {
        self.defaults.clone()
    }

    fn compute(&self, inputs: &[&[f64]], params: &Params) -> Result<IndicatorResult> {
        (self.compute)(inputs, params)
    }
}
