//! Errors raised while planning or exporting a benchmark.

use thiserror::Error;

/// Failures that prevent a benchmark from being planned or exported.
///
/// Problems inside individual tasks are never reported here; they end up as
/// [`crate::MatchResult`] entries.
#[derive(Debug, Error)]
pub enum BenchError {
    /// No solver was selected.
    #[error("the solver roster is empty")]
    EmptyRoster,
    /// No target graph was supplied.
    #[error("no target graphs to match against")]
    NoTargets,
    /// Two targets share a name, so their records would merge.
    #[error("duplicate target name '{0}'")]
    DuplicateTarget(String),
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] isoclone_common::ConfigError),
    /// Writing the CSV export failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    /// The CSV output was not valid UTF-8 or could not be flushed.
    #[error("failed to finish CSV output: {0}")]
    Io(#[from] std::io::Error),
}
