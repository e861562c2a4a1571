//! Scoped log output for a run.
//!
//! Every report line goes through `tracing`. A run installs its own
//! thread-scoped subscriber and drops it when the run ends, so consecutive
//! runs in one process never stack handlers or duplicate lines.
//!
//! Lines are message-only: no timestamp, level or target.

use std::io;
use std::sync::{Arc, Mutex};

use tracing::level_filters::LevelFilter;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::registry::RunOrigin;

/// How much to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress and verdicts.
    #[default]
    Normal,
    /// Adds the per-test detail header and value tables.
    Verbose,
}

impl Verbosity {
    /// Builds a verbosity from the two mutually exclusive command-line flags.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// In-memory log sink, cheap to clone; clones share the same bytes.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    /// Captured lines.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.0.lock().map_err(|_| io::Error::other("log buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where log lines go.
#[derive(Debug, Clone, Default)]
pub enum LogTarget {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
    /// An in-memory buffer.
    Buffer(SharedBuffer),
}

impl LogTarget {
    fn make_writer(&self) -> BoxMakeWriter {
        match self {
            Self::Stdout => BoxMakeWriter::new(io::stdout),
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::Buffer(buffer) => {
                let buffer = buffer.clone();
                BoxMakeWriter::new(move || buffer.clone())
            }
        }
    }
}

/// Log destination and verbosity for one run.
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Destination.
    pub target: LogTarget,
    /// Level.
    pub verbosity: Verbosity,
}

impl LogConfig {
    /// Logs into `buffer` at `verbosity`.
    #[must_use]
    pub fn buffered(buffer: &SharedBuffer, verbosity: Verbosity) -> Self {
        Self {
            target: LogTarget::Buffer(buffer.clone()),
            verbosity,
        }
    }

    /// The configuration a run started from `origin` logs with.
    ///
    /// Embedded runs never write to standard output: a `Stdout` target is
    /// redirected to `Stderr`. Other targets are kept.
    #[must_use]
    pub fn for_origin(&self, origin: RunOrigin) -> Self {
        match (origin, &self.target) {
            (RunOrigin::Embedded, LogTarget::Stdout) => Self {
                target: LogTarget::Stderr,
                verbosity: self.verbosity,
            },
            _ => self.clone(),
        }
    }

    /// Installs a message-only subscriber for the current thread.
    ///
    /// The subscriber stays active until the returned guard is dropped.
    #[must_use = "the subscriber is removed when the guard is dropped"]
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.target.make_writer())
            .with_max_level(self.verbosity.level())
            .with_ansi(false)
            .without_time()
            .with_level(false)
            .with_target(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }
}
