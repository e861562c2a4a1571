//! Result reconciliation.
//!
//! Decides whether two independently computed multi-output indicator results
//! are "the same". Outputs are paired positionally (callers apply any declared
//! swaps beforehand) and each pair goes through the same pipeline:
//!
//! 1. **Rounding**: both sides are rounded to `decimals` places, if requested.
//! 2. **Trimming**: the warm-up window chosen by [`MinperiodMode`] is skipped on
//!    both sides with the same offset.
//! 3. **Primary check**: exact elementwise equality. NaN never equals NaN, so
//!    any missing value in the compared window fails this step.
//! 4. **Missing-value fallback**: both sides must flag exactly the same
//!    positions as missing, and every position present on both sides must
//!    still be equal.
//!
//! The indicator passes when every paired output passes.
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_core::reconcile::{reconcile, MinperiodMode, Policy};
//! use ta_crosscheck_core::series::NamedSeries;
//!
//! let nan = f64::NAN;
//! let cand = vec![NamedSeries::new("sma", vec![nan, nan, 2.000_000_1, 3.0])];
//! let refr = vec![NamedSeries::new("SMA", vec![nan, nan, 2.0, 3.0])];
//!
//! let policy = Policy::new(MinperiodMode::Global).with_decimals(5).with_minperiods(2, vec![2]);
//! assert!(reconcile(&cand, &refr, &policy).passed());
//!
//! let strict = Policy::new(MinperiodMode::Global).with_minperiods(2, vec![2]);
//! assert!(!reconcile(&cand, &refr, &strict).passed());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::series::{is_missing, NamedSeries};

/// How much of the warm-up window to skip before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinperiodMode {
    /// Skip the indicator's global minperiod on every output.
    #[default]
    Global,
    /// Skip each output's own minperiod.
    PerOutput,
    /// Skip nothing.
    None,
}

impl MinperiodMode {
    /// Maps the command-line flag: negative is `None`, zero is `Global`,
    /// positive is `PerOutput`.
    #[must_use]
    pub fn from_flag(flag: i64) -> Self {
        match flag {
            f if f < 0 => Self::None,
            0 => Self::Global,
            _ => Self::PerOutput,
        }
    }

    /// The command-line flag for this mode.
    #[must_use]
    pub fn flag(self) -> i64 {
        match self {
            Self::None => -1,
            Self::Global => 0,
            Self::PerOutput => 1,
        }
    }
}

impl fmt::Display for MinperiodMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Global => "global",
            Self::PerOutput => "per-output",
            Self::None => "none",
        };
        write!(f, "{} ({label})", self.flag())
    }
}

/// Rounding and alignment policy for one indicator comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Policy {
    /// Decimal places to round both sides to before comparing.
    pub decimals: Option<u32>,
    /// Warm-up skipping mode.
    pub mode: MinperiodMode,
    /// Global minperiod of the indicator.
    pub global_minperiod: usize,
    /// Minperiod of each output, in output order.
    pub per_output_minperiods: Vec<usize>,
}

impl Policy {
    /// A policy with no rounding and zero minperiods.
    #[must_use]
    pub fn new(mode: MinperiodMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Sets the rounding precision.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Sets the global and per-output minperiods.
    #[must_use]
    pub fn with_minperiods(mut self, global: usize, per_output: Vec<usize>) -> Self {
        self.global_minperiod = global;
        self.per_output_minperiods = per_output;
        self
    }

    /// Positions to skip for output `index`.
    ///
    /// In per-output mode an output without a declared minperiod falls back to
    /// the global one.
    #[must_use]
    pub fn skip_for(&self, index: usize) -> usize {
        match self.mode {
            MinperiodMode::Global => self.global_minperiod,
            MinperiodMode::PerOutput => self
                .per_output_minperiods
                .get(index)
                .copied()
                .unwrap_or(self.global_minperiod),
            MinperiodMode::None => 0,
        }
    }
}

/// How a single output pair was judged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputVerdict {
    /// Every compared position is exactly equal.
    Exact,
    /// Equal once missing positions are matched by flag instead of value.
    MissingAgreement,
    /// The series disagree; `position` is the first offending row.
    Mismatch {
        /// Row index of the first disagreement.
        position: usize,
        /// Candidate value at that row (after rounding).
        candidate: f64,
        /// Reference value at that row (after rounding).
        reference: f64,
    },
    /// The two series have different lengths.
    LengthMismatch {
        /// Candidate length.
        candidate: usize,
        /// Reference length.
        reference: usize,
    },
}

impl OutputVerdict {
    /// Returns true for the passing verdicts.
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Exact | Self::MissingAgreement)
    }
}

impl fmt::Display for OutputVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::MissingAgreement => write!(f, "equal (missing values agree)"),
            Self::Mismatch {
                position,
                candidate,
                reference,
            } => write!(
                f,
                "mismatch at row {position}: candidate {candidate} vs reference {reference}"
            ),
            Self::LengthMismatch {
                candidate,
                reference,
            } => write!(f, "length mismatch: candidate {candidate} vs reference {reference}"),
        }
    }
}

/// Comparison detail for one output pair.
///
/// Keeps the full (rounded, untrimmed) series and their elementwise equality
/// so a verbose report can show every row.
#[derive(Debug, Clone)]
pub struct OutputComparison {
    /// Candidate output name.
    pub name: String,
    /// Reference output name.
    pub reference_name: String,
    /// Candidate values after rounding.
    pub candidate: Vec<f64>,
    /// Reference values after rounding.
    pub reference: Vec<f64>,
    /// Elementwise value equality over the full length.
    pub equal: Vec<bool>,
    /// Positions skipped at the start.
    pub skipped: usize,
    /// Verdict for this output.
    pub verdict: OutputVerdict,
}

/// Per-indicator reconciliation outcome.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// One entry per compared output pair.
    pub outputs: Vec<OutputComparison>,
    /// Outputs present on one side only (count difference), by name.
    pub unpaired: Vec<String>,
}

impl Reconciliation {
    /// True if every paired output passed. Zero outputs pass vacuously.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.outputs.iter().all(|o| o.verdict.passed())
    }

    /// The first failing output, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&OutputComparison> {
        self.outputs.iter().find(|o| !o.verdict.passed())
    }
}

fn judge(candidate: &[f64], reference: &[f64], skip: usize) -> OutputVerdict {
    if candidate.len() != reference.len() {
        return OutputVerdict::LengthMismatch {
            candidate: candidate.len(),
            reference: reference.len(),
        };
    }

    let start = skip.min(candidate.len());
    let window = candidate[start..].iter().zip(&reference[start..]);

    if window.clone().all(|(c, r)| c == r) {
        return OutputVerdict::Exact;
    }

    for (offset, (&c, &r)) in window.enumerate() {
        let agree = match (is_missing(c), is_missing(r)) {
            (true, true) => true,
            (false, false) => c == r,
            _ => false,
        };
        if !agree {
            return OutputVerdict::Mismatch {
                position: start + offset,
                candidate: c,
                reference: r,
            };
        }
    }

    OutputVerdict::MissingAgreement
}

/// Compares candidate outputs to reference outputs under `policy`.
///
/// Outputs are paired by position. When the two sides produce a different
/// number of outputs, only the common prefix is compared and the leftover
/// names are listed in [`Reconciliation::unpaired`].
#[must_use]
pub fn reconcile(
    candidate: &[NamedSeries],
    reference: &[NamedSeries],
    policy: &Policy,
) -> Reconciliation {
    let mut outputs = Vec::with_capacity(candidate.len().min(reference.len()));

    for (index, (cand, refr)) in candidate.iter().zip(reference).enumerate() {
        let (cand, refr) = match policy.decimals {
            Some(d) => (cand.rounded(d), refr.rounded(d)),
            None => (cand.clone(), refr.clone()),
        };

        let skip = policy.skip_for(index);
        let verdict = judge(cand.values(), refr.values(), skip);

        let equal = cand
            .values()
            .iter()
            .zip(refr.values())
            .map(|(c, r)| c == r)
            .collect();

        outputs.push(OutputComparison {
            name: cand.name().to_string(),
            reference_name: refr.name().to_string(),
            candidate: cand.values().to_vec(),
            reference: refr.values().to_vec(),
            equal,
            skipped: skip,
            verdict,
        });
    }

    let paired = outputs.len();
    let unpaired = candidate
        .iter()
        .skip(paired)
        .chain(reference.iter().skip(paired))
        .map(|s| s.name().to_string())
        .collect();

    Reconciliation { outputs, unpaired }
}
