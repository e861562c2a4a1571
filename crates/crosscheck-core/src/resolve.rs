//! Indicator invocation and resolution.
//!
//! Turns a declarative [`TestSpec`] into two computed [`IndicatorResult`]s and
//! a reconciliation [`Policy`], then runs the comparison. Every failure in
//! here is per-test: the runner logs it and records a failing verdict.

use std::fmt;

use crate::adapter::{CandidateIndicator, CandidateLibrary, ReferenceIndicator, ReferenceLibrary};
use crate::error::{Error, Result};
use crate::params::{ParamOverrides, Params};
use crate::reconcile::{reconcile, MinperiodMode, Policy, Reconciliation};
use crate::registry::TestSpec;
use crate::series::IndicatorResult;
use crate::table::PriceTable;

/// Run-wide settings that take precedence over a test's own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Rounding precision; negative disables rounding.
    pub decimals: Option<i32>,
    /// Warm-up skipping mode.
    pub minperiod: Option<MinperiodMode>,
    /// Candidate-side parameter overrides.
    pub candidate: ParamOverrides,
    /// Reference-side parameter overrides.
    pub reference: ParamOverrides,
}

/// Outcome of checking the candidate's minperiods against the expected ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinperiodsCheck {
    /// The test declares no expected minperiods.
    NotRequested,
    /// The candidate reported exactly the expected minperiods.
    Matched,
    /// The candidate reported different minperiods.
    Mismatched {
        /// Declared by the test.
        expected: Vec<usize>,
        /// Reported by the candidate.
        actual: Vec<usize>,
    },
}

impl MinperiodsCheck {
    fn evaluate(expected: &[usize], actual: &[usize]) -> Self {
        if expected.is_empty() {
            Self::NotRequested
        } else if expected == actual {
            Self::Matched
        } else {
            Self::Mismatched {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            }
        }
    }
}

impl fmt::Display for MinperiodsCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRequested => write!(f, "not requested"),
            Self::Matched => write!(f, "matched"),
            Self::Mismatched { expected, actual } => {
                write!(f, "mismatched (expected {expected:?}, got {actual:?})")
            }
        }
    }
}

/// Everything produced by running one indicator test.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Name of the candidate indicator that ran.
    pub candidate_name: String,
    /// Name of the reference indicator that ran.
    pub reference_name: String,
    /// Input columns fed to both sides.
    pub inputs: Vec<String>,
    /// Output names the candidate declares.
    pub declared_outputs: Vec<String>,
    /// The candidate's default parameters.
    pub default_params: Params,
    /// Candidate result, with swaps applied.
    pub candidate: IndicatorResult,
    /// Reference result.
    pub reference: IndicatorResult,
    /// Policy the outputs were reconciled under.
    pub policy: Policy,
    /// Per-output detail.
    pub reconciliation: Reconciliation,
    /// Expected-minperiods check, reported separately from the verdict.
    pub minperiods_check: MinperiodsCheck,
}

impl Comparison {
    /// The indicator verdict.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.reconciliation.passed()
    }
}

/// Finds the candidate indicator for `test`.
///
/// # Errors
///
/// Returns [`Error::CandidateNotFound`] if the library has no such indicator.
pub fn resolve_candidate<'a>(
    test: &str,
    spec: &TestSpec,
    library: &'a CandidateLibrary,
) -> Result<&'a dyn CandidateIndicator> {
    let name = spec.candidate.as_deref().unwrap_or(test);
    library.get(name).ok_or_else(|| Error::CandidateNotFound {
        name: name.to_string(),
    })
}

/// Reference names to look up for `test`, in order and without repeats.
///
/// The explicit reference name (or the upper-cased test name) comes first,
/// then the test's aliases, then the candidate's declared aliases.
#[must_use]
pub fn reference_names(test: &str, spec: &TestSpec, candidate: &dyn CandidateIndicator) -> Vec<String> {
    let primary = spec
        .reference
        .clone()
        .unwrap_or_else(|| test.to_uppercase());

    let mut names = vec![primary];
    let fallbacks = spec
        .aliases
        .iter()
        .map(String::as_str)
        .chain(candidate.aliases().iter().copied());
    for name in fallbacks {
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Finds the reference indicator for `test`.
///
/// # Errors
///
/// Returns [`Error::ReferenceNotFound`] listing every name tried.
pub fn resolve_reference<'a>(
    test: &str,
    spec: &TestSpec,
    candidate: &dyn CandidateIndicator,
    library: &'a ReferenceLibrary,
) -> Result<&'a dyn ReferenceIndicator> {
    let tried = reference_names(test, spec, candidate);
    let found = tried.iter().find_map(|name| library.get(name));
    found.ok_or_else(|| Error::ReferenceNotFound {
        name: test.to_string(),
        tried,
    })
}

/// Input columns for the test: the declared ones, else the candidate's defaults.
#[must_use]
pub fn resolve_inputs(spec: &TestSpec, candidate: &dyn CandidateIndicator) -> Vec<String> {
    match &spec.inputs {
        Some(inputs) => inputs.clone(),
        None => candidate.inputs().iter().map(|s| (*s).to_string()).collect(),
    }
}

/// Effective rounding: run option, else the test's, else none. Negative disables.
#[must_use]
pub fn resolve_decimals(spec: &TestSpec, overrides: &Overrides) -> Option<u32> {
    overrides
        .decimals
        .or(spec.decimals)
        .and_then(|d| u32::try_from(d).ok())
}

/// Effective warm-up mode: run option, else the test's, else global.
#[must_use]
pub fn resolve_mode(spec: &TestSpec, overrides: &Overrides) -> MinperiodMode {
    overrides.minperiod.or(spec.minperiod).unwrap_or_default()
}

/// Runs one indicator test end to end.
///
/// # Errors
///
/// Any resolution, parameter, compute or swap error; the caller turns it into
/// a failing verdict.
pub fn compare(
    test: &str,
    spec: &TestSpec,
    table: &PriceTable,
    candidates: &CandidateLibrary,
    references: &ReferenceLibrary,
    overrides: &Overrides,
) -> Result<Comparison> {
    let candidate = resolve_candidate(test, spec, candidates)?;
    let inputs = resolve_inputs(spec, candidate);
    let columns = table.columns(&inputs)?;

    let candidate_params = overrides.candidate.resolve(&spec.candidate_params);
    let mut candidate_result = candidate.compute(&columns, &candidate_params)?;
    // Expected minperiods are written in the order the candidate declares them.
    let minperiods_check = MinperiodsCheck::evaluate(&spec.minperiods, candidate_result.minperiods());
    for &(a, b) in &spec.swapouts {
        candidate_result.swap_outputs(a, b)?;
    }

    let reference = resolve_reference(test, spec, candidate, references)?;
    let reference_params = overrides.reference.resolve(&spec.reference_params);
    let reference_result = reference.compute(&columns, &reference_params)?;

    let mut policy = Policy::new(resolve_mode(spec, overrides)).with_minperiods(
        candidate_result.minperiod(),
        candidate_result.minperiods().to_vec(),
    );
    policy.decimals = resolve_decimals(spec, overrides);

    let reconciliation = reconcile(candidate_result.outputs(), reference_result.outputs(), &policy);

    Ok(Comparison {
        candidate_name: candidate.name().to_string(),
        reference_name: reference.name().to_string(),
        inputs,
        declared_outputs: candidate.outputs().iter().map(|s| (*s).to_string()).collect(),
        default_params: candidate.default_params(),
        candidate: candidate_result,
        reference: reference_result,
        policy,
        reconciliation,
        minperiods_check,
    })
}
