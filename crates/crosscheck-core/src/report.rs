//! Verbose per-test report.
//!
//! The header summarises how a comparison was set up; the table lists every
//! row of every compared output side by side with its equality flag.

use std::fmt::Write as _;

use crate::reconcile::Reconciliation;
use crate::resolve::Comparison;

/// Width of the separator lines.
pub const RULE_WIDTH: usize = 78;

/// A separator line.
#[must_use]
pub fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}

fn list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// Header block describing a finished comparison.
#[must_use]
pub fn header(comparison: &Comparison) -> Vec<String> {
    let decimals = comparison
        .policy
        .decimals
        .map_or_else(|| "none".to_string(), |d| d.to_string());
    let minperiods: Vec<String> = comparison
        .candidate
        .minperiods()
        .iter()
        .map(ToString::to_string)
        .collect();

    vec![
        rule(),
        format!("Result         : {}", comparison.passed()),
        format!("Chk Minperiods : {}", comparison.minperiods_check),
        format!("Decimals       : {decimals}"),
        rule(),
        format!("Indicator      : {}", comparison.candidate_name),
        format!("Reference      : {}", comparison.reference_name),
        format!("Inputs         : {}", list(&comparison.inputs)),
        format!("Outputs        : {}", list(&comparison.declared_outputs)),
        format!("Def Params     : {}", comparison.default_params),
        format!("Params         : {}", comparison.candidate.params()),
        format!("Ref Params     : {}", comparison.reference.params()),
        rule(),
        format!("Period Check   : {}", comparison.policy.mode),
        format!("Minperiods     : {}", list(&minperiods)),
        format!("Minperiod      : {}", comparison.candidate.minperiod()),
        rule(),
    ]
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        value.to_string()
    }
}

/// Full value table: a 1-based `count` column, then `cand_<out>`, `ref_<out>`
/// and `eq_<out>` for each compared output.
#[must_use]
pub fn table(reconciliation: &Reconciliation) -> String {
    let rows = reconciliation
        .outputs
        .iter()
        .map(|o| o.candidate.len().max(o.reference.len()))
        .max()
        .unwrap_or(0);

    let mut columns: Vec<Vec<String>> = vec![std::iter::once("count".to_string())
        .chain((1..=rows).map(|i| i.to_string()))
        .collect()];

    for output in &reconciliation.outputs {
        let pick = |values: &[f64], i: usize| values.get(i).map_or_else(String::new, |v| cell(*v));
        columns.push(
            std::iter::once(format!("cand_{}", output.name))
                .chain((0..rows).map(|i| pick(&output.candidate, i)))
                .collect(),
        );
        columns.push(
            std::iter::once(format!("ref_{}", output.name))
                .chain((0..rows).map(|i| pick(&output.reference, i)))
                .collect(),
        );
        columns.push(
            std::iter::once(format!("eq_{}", output.name))
                .chain((0..rows).map(|i| output.equal.get(i).map_or_else(String::new, ToString::to_string)))
                .collect(),
        );
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|c| c.iter().map(String::len).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for row in 0..=rows {
        let mut line = String::new();
        for (col, width) in columns.iter().zip(&widths) {
            if !line.is_empty() {
                line.push_str("  ");
            }
            let _ = write!(line, "{:>width$}", col[row]);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
