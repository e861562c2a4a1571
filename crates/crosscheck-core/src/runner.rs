//! Registry runner.
//!
//! Iterates a [`Registry`] in order, dispatches each entry by kind, records
//! every verdict in a caller-owned [`Results`] map and logs a report through
//! a run-scoped subscriber.
//!
//! # Example
//!
//! ```
//! use ta_crosscheck_core::adapter::{CandidateLibrary, FnCandidate, FnReference, ReferenceLibrary};
//! use ta_crosscheck_core::logging::{LogConfig, SharedBuffer, Verbosity};
//! use ta_crosscheck_core::params::Params;
//! use ta_crosscheck_core::registry::{Registry, RunOrigin, TestSpec};
//! use ta_crosscheck_core::runner::{Results, RunOptions, RunStatus, Runner};
//! use ta_crosscheck_core::series::{IndicatorResult, NamedSeries};
//! use ta_crosscheck_core::table::PriceTable;
//!
//! fn ident(inputs: &[&[f64]], params: &Params) -> ta_crosscheck_core::Result<IndicatorResult> {
//!     Ok(IndicatorResult::from_outputs(vec![NamedSeries::new("out", inputs[0].to_vec())], params.clone()))
//! }
//!
//! let mut candidates = CandidateLibrary::new();
//! candidates.register(FnCandidate::new("ident", ident));
//! let mut references = ReferenceLibrary::new();
//! references.register(FnReference::new("IDENT", ident));
//!
//! let table = PriceTable::from_closes(&[1.0, 2.0, 3.0]);
//! let registry = Registry::new().with("ident", TestSpec::new());
//!
//! let buffer = SharedBuffer::new();
//! let options = RunOptions::default().with_log(LogConfig::buffered(&buffer, Verbosity::Normal));
//! let mut results = Results::new();
//!
//! let status = Runner::new(&table, &candidates, &references)
//!     .run(&registry, &options, RunOrigin::Embedded, &mut results);
//! assert_eq!(status, RunStatus::Passed);
//! assert_eq!(results.get("ident"), Some(true));
//! assert!(buffer.contents().contains("[+] Global Result: true"));
//! ```

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error, info, warn};

use crate::adapter::{CandidateLibrary, ReferenceLibrary};
use crate::logging::LogConfig;
use crate::registry::{CustomCheck, Registry, RunOrigin, TestEntry, TestSpec};
use crate::report;
use crate::resolve::{compare, MinperiodsCheck, Overrides};
use crate::table::PriceTable;

/// Verdicts by test name.
///
/// Owned by the caller and passed into every run, so `SameAs` entries can see
/// verdicts from earlier runs as well as from earlier entries of this one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results(BTreeMap<String, bool>);

impl Results {
    /// An empty result map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Verdict recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.0.get(name).copied()
    }

    /// Records a verdict, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, passed: bool) {
        self.0.insert(name.into(), passed);
    }

    /// True when every recorded verdict passed. An empty map passes.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.0.values().all(|&v| v)
    }

    /// Names of the failed tests.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter(|(_, v)| !**v).map(|(k, _)| k.as_str())
    }

    /// Number of recorded verdicts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `(name, verdict)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Options for one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run only the entry with this name.
    pub name: Option<String>,
    /// Log the registered names and run nothing.
    pub list_names: bool,
    /// Run-wide rounding, warm-up and parameter overrides.
    pub overrides: Overrides,
    /// Log destination and verbosity.
    pub log: LogConfig,
}

impl RunOptions {
    /// Restricts the run to one test.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Switches to list-names mode.
    #[must_use]
    pub fn listing(mut self) -> Self {
        self.list_names = true;
        self
    }

    /// Sets the run-wide overrides.
    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Sets the log configuration.
    #[must_use]
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    fn selects(&self, name: &str) -> bool {
        self.name.as_deref().map_or(true, |n| n == name)
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Names were listed; nothing ran.
    Listed,
    /// Every recorded verdict passed.
    Passed,
    /// At least one recorded verdict failed.
    Failed,
}

impl RunStatus {
    /// True unless some test failed.
    #[must_use]
    pub fn success(self) -> bool {
        !matches!(self, Self::Failed)
    }

    /// Process exit code: 0 on success, 1 on failure.
    #[must_use]
    pub fn exit_code(self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

fn progress_rule() -> String {
    format!("[+]{}", "-".repeat(report::RULE_WIDTH - 4))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<non-string panic payload>"
    }
}

/// Runs registries against one price table and one pair of libraries.
#[derive(Debug, Clone, Copy)]
pub struct Runner<'a> {
    table: &'a PriceTable,
    candidates: &'a CandidateLibrary,
    references: &'a ReferenceLibrary,
}

impl<'a> Runner<'a> {
    /// Creates a runner.
    #[must_use]
    pub fn new(table: &'a PriceTable, candidates: &'a CandidateLibrary, references: &'a ReferenceLibrary) -> Self {
        Self {
            table,
            candidates,
            references,
        }
    }

    /// Runs every selected entry of `registry`, recording verdicts in `results`.
    ///
    /// The returned status covers every verdict in `results`, including ones
    /// recorded by earlier runs. Embedded runs log to standard error unless
    /// the options name another non-stdout target.
    pub fn run(
        &self,
        registry: &Registry,
        options: &RunOptions,
        origin: RunOrigin,
        results: &mut Results,
    ) -> RunStatus {
        let _guard = options.log.for_origin(origin).install();

        info!("");
        info!("[+] From main        : {}", origin == RunOrigin::EntryPoint);
        if options.list_names {
            info!("{}", registry.names().collect::<Vec<_>>().join(", "));
            return RunStatus::Listed;
        }

        for (name, entry) in registry.iter() {
            if !options.selects(name) {
                continue;
            }
            let passed = self.run_entry(name, entry, options, origin, results);
            results.insert(name, passed);
        }

        let all_good = results.all_passed();
        info!("{}", progress_rule());
        info!("[+] Global Result: {all_good}");
        if all_good {
            RunStatus::Passed
        } else {
            RunStatus::Failed
        }
    }

    fn run_entry(
        &self,
        name: &str,
        entry: &TestEntry,
        options: &RunOptions,
        origin: RunOrigin,
        results: &Results,
    ) -> bool {
        info!("{}", progress_rule());
        info!("[+] Running test for : {name}");
        info!("[+] Testdata is      : {entry:?}");

        match entry {
            TestEntry::SameAs(other) => {
                let verdict = results.get(other).unwrap_or(false);
                info!("[+] Test completed with : {other}");
                info!("[+] Test result         : {verdict}");
                verdict
            }
            TestEntry::Custom(check) => run_custom(&**check, origin),
            TestEntry::Indicator(spec) => self.run_indicator(name, spec, &options.overrides),
        }
    }

    fn run_indicator(&self, name: &str, spec: &TestSpec, overrides: &Overrides) -> bool {
        let comparison = match compare(name, spec, self.table, self.candidates, self.references, overrides) {
            Ok(c) => c,
            Err(e) => {
                error!("[-] {e}");
                return false;
            }
        };

        let reconciliation = &comparison.reconciliation;
        if !reconciliation.unpaired.is_empty() {
            warn!(
                "[-] Outputs without a counterpart (not compared): {}",
                reconciliation.unpaired.join(", ")
            );
        }
        for output in reconciliation.outputs.iter().filter(|o| !o.verdict.passed()) {
            info!("[-] Output {} vs {}: {}", output.name, output.reference_name, output.verdict);
        }
        if let MinperiodsCheck::Mismatched { .. } = comparison.minperiods_check {
            info!("[-] Minperiods check: {}", comparison.minperiods_check);
        }

        let passed = comparison.passed();
        info!("[+] Result: {passed}");

        if tracing::enabled!(tracing::Level::DEBUG) {
            for line in report::header(&comparison) {
                debug!("{line}");
            }
            debug!("{}", report::table(reconciliation).trim_end());
        }
        passed
    }
}

fn run_custom(check: &dyn CustomCheck, origin: RunOrigin) -> bool {
    info!("[+] Calling custom check");
    let verdict = match panic::catch_unwind(AssertUnwindSafe(|| check.run(origin))) {
        Ok(Ok(v)) => v,
        Ok(Err(failure)) => {
            let location = failure.location();
            error!("[-] Assertion message \"{}\"", failure.message());
            error!("[-] File {} / Line {}", location.file(), location.line());
            false
        }
        Err(payload) => {
            error!("[-] Check panicked: \"{}\"", panic_message(payload.as_ref()));
            false
        }
    };
    info!("[+] Test completed with : {verdict}");
    verdict
}
