//! Test case registry.
//!
//! A registry is an ordered list of named [`TestEntry`] values. Entries run in
//! registration order, which matters for [`TestEntry::SameAs`]: an alias can
//! only reuse the verdict of a test that has already run.
//!
//! Declarative suites can be loaded from JSON:
//!
//! ```
//! use ta_crosscheck_core::registry::{Registry, TestEntry};
//!
//! let registry = Registry::from_json(r#"{
//!     "tests": [
//!         {"name": "sma", "indicator": {"decimals": 6, "reference_params": {"timeperiod": 30}}},
//!         {"name": "simple_moving_average", "same_as": "sma"}
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(registry.names().collect::<Vec<_>>(), vec!["sma", "simple_moving_average"]);
//! assert!(matches!(registry.get("simple_moving_average"), Some(TestEntry::SameAs(n)) if n == "sma"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::Params;
use crate::reconcile::MinperiodMode;

/// Declarative description of one indicator comparison.
///
/// Every field is optional; an empty spec compares the candidate indicator
/// named like the test against the upper-cased reference with default
/// parameters on both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestSpec {
    /// Price-table columns to feed; defaults to the candidate's declared inputs.
    pub inputs: Option<Vec<String>>,
    /// Candidate parameters.
    pub candidate_params: Params,
    /// Reference parameters.
    pub reference_params: Params,
    /// Candidate output index pairs to swap before comparing.
    pub swapouts: Vec<(usize, usize)>,
    /// Expected candidate per-output minperiods.
    pub minperiods: Vec<usize>,
    /// Warm-up skipping mode.
    pub minperiod: Option<MinperiodMode>,
    /// Decimal places to round to; negative disables rounding.
    pub decimals: Option<i32>,
    /// Candidate indicator name, when it differs from the test name.
    pub candidate: Option<String>,
    /// Reference indicator name, when it is not the upper-cased test name.
    pub reference: Option<String>,
    /// Additional reference names to try.
    pub aliases: Vec<String>,
}

impl TestSpec {
    /// An empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input columns.
    #[must_use]
    pub fn inputs<S: Into<String>>(mut self, inputs: impl IntoIterator<Item = S>) -> Self {
        self.inputs = Some(inputs.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the candidate parameters.
    #[must_use]
    pub fn candidate_params(mut self, params: Params) -> Self {
        self.candidate_params = params;
        self
    }

    /// Sets the reference parameters.
    #[must_use]
    pub fn reference_params(mut self, params: Params) -> Self {
        self.reference_params = params;
        self
    }

    /// Adds an output swap.
    #[must_use]
    pub fn swap(mut self, a: usize, b: usize) -> Self {
        self.swapouts.push((a, b));
        self
    }

    /// Sets the expected per-output minperiods.
    #[must_use]
    pub fn minperiods(mut self, minperiods: Vec<usize>) -> Self {
        self.minperiods = minperiods;
        self
    }

    /// Sets the warm-up skipping mode.
    #[must_use]
    pub fn minperiod(mut self, mode: MinperiodMode) -> Self {
        self.minperiod = Some(mode);
        self
    }

    /// Sets the rounding precision.
    #[must_use]
    pub fn decimals(mut self, decimals: i32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Overrides the candidate indicator name.
    #[must_use]
    pub fn candidate(mut self, name: impl Into<String>) -> Self {
        self.candidate = Some(name.into());
        self
    }

    /// Overrides the reference indicator name.
    #[must_use]
    pub fn reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    /// Adds a fallback reference name.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.aliases.push(name.into());
        self
    }
}

/// Where a run was started from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOrigin {
    /// Started from the command-line entry point.
    EntryPoint,
    /// Started programmatically, e.g. from a test.
    Embedded,
}

/// A failed assertion inside a custom check, with the location it was raised at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    message: String,
    location: &'static Location<'static>,
}

impl CheckFailure {
    /// Creates a failure located at the caller.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: Location::caller(),
        }
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Source location the failure was raised at.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }
}

impl fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

impl std::error::Error for CheckFailure {}

/// Returns early from a custom check with a located [`CheckFailure`] when the
/// condition does not hold.
///
/// ```
/// use ta_crosscheck_core::check;
/// use ta_crosscheck_core::registry::CheckFailure;
///
/// fn positive(x: i32) -> Result<bool, CheckFailure> {
///     check!(x > 0, "expected a positive value, got {x}");
///     Ok(true)
/// }
///
/// assert!(positive(1).is_ok());
/// let err = positive(-1).unwrap_err();
/// assert_eq!(err.message(), "expected a positive value, got -1");
/// ```
#[macro_export]
macro_rules! check {
    ($cond:expr $(,)?) => {
        if !$cond {
            return Err($crate::registry::CheckFailure::new(concat!("check failed: ", stringify!($cond))));
        }
    };
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::registry::CheckFailure::new(format!($($arg)+)));
        }
    };
}

/// A self-contained test that decides its own verdict.
pub trait CustomCheck {
    /// Runs the check.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] when an internal assertion fails; the runner
    /// turns it into a failing verdict.
    fn run(&self, origin: RunOrigin) -> std::result::Result<bool, CheckFailure>;
}

impl<F> CustomCheck for F
where
    F: Fn(RunOrigin) -> std::result::Result<bool, CheckFailure>,
{
    fn run(&self, origin: RunOrigin) -> std::result::Result<bool, CheckFailure> {
        self(origin)
    }
}

/// One registry entry.
pub enum TestEntry {
    /// Reuse the verdict of another, previously run test.
    SameAs(String),
    /// Run a self-contained check.
    Custom(Box<dyn CustomCheck>),
    /// Compare a candidate indicator against its reference.
    Indicator(TestSpec),
}

impl TestEntry {
    /// Wraps a custom check.
    pub fn custom<C: CustomCheck + 'static>(check: C) -> Self {
        Self::Custom(Box::new(check))
    }
}

impl fmt::Debug for TestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SameAs(name) => f.debug_tuple("SameAs").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(<check>)"),
            Self::Indicator(spec) => f.debug_tuple("Indicator").field(spec).finish(),
        }
    }
}

impl From<TestSpec> for TestEntry {
    fn from(spec: TestSpec) -> Self {
        Self::Indicator(spec)
    }
}

/// Ordered name-to-entry mapping.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<(String, TestEntry)>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entry. A name already present is replaced in place, keeping
    /// its original position, and the old entry is returned.
    pub fn register(&mut self, name: impl Into<String>, entry: impl Into<TestEntry>) -> Option<TestEntry> {
        let name = name.into();
        let entry = entry.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, entry));
        }
        self.entries.push((name, entry));
        None
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, entry: impl Into<TestEntry>) -> Self {
        self.register(name, entry);
        self
    }

    /// Looks up an entry by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TestEntry> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TestEntry)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a registry from a JSON suite document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Suite`] for
    /// entries that carry neither or both of `indicator` / `same_as`, or that
    /// repeat a name.
    pub fn from_json(json: &str) -> Result<Self> {
        let suite: SuiteFile = serde_json::from_str(json)?;
        suite.into_registry()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteEntry {
    name: String,
    #[serde(default)]
    indicator: Option<TestSpec>,
    #[serde(default)]
    same_as: Option<String>,
}

/// Top-level shape of a JSON suite.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuiteFile {
    tests: Vec<SuiteEntry>,
}

impl SuiteFile {
    fn into_registry(self) -> Result<Registry> {
        let mut seen = HashSet::new();
        let mut registry = Registry::new();
        for entry in self.tests {
            if !seen.insert(entry.name.clone()) {
                return Err(Error::Suite {
                    reason: format!("duplicate test name '{}'", entry.name),
                });
            }
            let test = match (entry.indicator, entry.same_as) {
                (Some(spec), None) => TestEntry::Indicator(spec),
                (None, Some(other)) => TestEntry::SameAs(other),
                (Some(_), Some(_)) => {
                    return Err(Error::Suite {
                        reason: format!("test '{}' has both 'indicator' and 'same_as'", entry.name),
                    })
                }
                (None, None) => {
                    return Err(Error::Suite {
                        reason: format!("test '{}' needs 'indicator' or 'same_as'", entry.name),
                    })
                }
            };
            registry.register(entry.name, test);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamValue;

    #[test]
    fn test_register_keeps_order_and_replaces_in_place() {
        let mut reg = Registry::new()
            .with("b", TestSpec::new())
            .with("a", TestEntry::SameAs("b".into()));
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["b", "a"]);

        let old = reg.register("b", TestSpec::new().decimals(3));
        assert!(old.is_some());
        assert_eq!(reg.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(matches!(reg.get("b"), Some(TestEntry::Indicator(s)) if s.decimals == Some(3)));
    }

    #[test]
    fn test_spec_builder() {
        let spec = TestSpec::new()
            .inputs(["high", "low", "close"])
            .swap(0, 1)
            .minperiods(vec![19, 19, 19])
            .minperiod(MinperiodMode::PerOutput)
            .candidate("bollinger")
            .reference("BBANDS")
            .alias("BOLL");
        assert_eq!(spec.inputs.as_deref(), Some(&["high".to_string(), "low".to_string(), "close".to_string()][..]));
        assert_eq!(spec.swapouts, vec![(0, 1)]);
        assert_eq!(spec.minperiod, Some(MinperiodMode::PerOutput));
        assert_eq!(spec.aliases, vec!["BOLL".to_string()]);
    }

    #[test]
    fn test_custom_entry_debug() {
        let entry = TestEntry::custom(|_: RunOrigin| -> std::result::Result<bool, CheckFailure> { Ok(true) });
        assert_eq!(format!("{entry:?}"), "Custom(<check>)");
    }

    #[test]
    fn test_check_failure_location() {
        fn failing() -> std::result::Result<bool, CheckFailure> {
            check!(1 + 1 == 3, "math is broken");
            Ok(true)
        }
        let err = failing().unwrap_err();
        assert_eq!(err.message(), "math is broken");
        assert!(err.location().file().ends_with("registry.rs"));
        assert!(err.to_string().starts_with("math is broken at "));
    }

    #[test]
    fn test_check_without_message() {
        fn failing() -> std::result::Result<bool, CheckFailure> {
            check!(false);
            Ok(true)
        }
        assert_eq!(failing().unwrap_err().message(), "check failed: false");
    }

    #[test]
    fn test_suite_full_spec() {
        let reg = Registry::from_json(
            r#"{"tests": [{"name": "bollinger", "indicator": {
                "inputs": ["close"],
                "candidate_params": {"period": 20, "devs": 2.0},
                "swapouts": [[0, 1]],
                "minperiods": [19, 19, 19],
                "minperiod": "global",
                "decimals": 6,
                "aliases": ["BBANDS"]
            }}]}"#,
        )
        .unwrap();
        let Some(TestEntry::Indicator(spec)) = reg.get("bollinger") else {
            panic!("expected indicator entry");
        };
        assert_eq!(spec.swapouts, vec![(0, 1)]);
        assert_eq!(spec.candidate_params.get("devs"), Some(&ParamValue::Float(2.0)));
        assert_eq!(spec.minperiod, Some(MinperiodMode::Global));
        assert_eq!(spec.decimals, Some(6));
    }

    #[test]
    fn test_suite_rejects_ambiguous_entries() {
        let both = r#"{"tests": [{"name": "x", "indicator": {}, "same_as": "y"}]}"#;
        assert!(matches!(Registry::from_json(both), Err(Error::Suite { .. })));

        let neither = r#"{"tests": [{"name": "x"}]}"#;
        assert!(matches!(Registry::from_json(neither), Err(Error::Suite { .. })));

        let dup = r#"{"tests": [{"name": "x", "same_as": "y"}, {"name": "x", "same_as": "z"}]}"#;
        assert!(matches!(Registry::from_json(dup), Err(Error::Suite { .. })));
    }

    #[test]
    fn test_suite_rejects_unknown_fields() {
        let typo = r#"{"tests": [{"name": "x", "indicator": {"decimal": 3}}]}"#;
        assert!(matches!(Registry::from_json(typo), Err(Error::Json(_))));
    }
}
