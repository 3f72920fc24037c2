//! Aggregated benchmark results.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use isoclone_subgraph::SolverKind;

use crate::{BenchError, MatchResult};

/// Result of one task together with what is needed to replay it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRecord {
    /// Position of the task in the plan.
    pub index: usize,
    /// Strategy that ran.
    pub solver: SolverKind,
    /// Normalized result.
    pub result: MatchResult,
    /// Wall-clock time observed by the scheduler.
    pub elapsed: Duration,
    /// Seed handed to the strategy.
    pub seed: u64,
}

/// One flattened line of a report, as written to CSV.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    /// Target name.
    pub target: String,
    /// Stable solver name.
    pub solver: &'static str,
    /// Result label, see [`MatchResult::label`].
    pub result: &'static str,
    /// Mapping for found results, error text for errors, otherwise empty.
    pub detail: String,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
    /// Seed handed to the strategy.
    pub seed: u64,
}

impl ReportRow {
    const HEADER: [&'static str; 6] = ["target", "solver", "result", "detail", "elapsed_ms", "seed"];

    fn to_record(&self) -> [String; 6] {
        [
            self.target.clone(),
            self.solver.to_owned(),
            self.result.to_owned(),
            self.detail.clone(),
            format!("{:.3}", self.elapsed_ms),
            self.seed.to_string(),
        ]
    }
}

/// Records grouped per target, in the order tasks were planned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BenchmarkReport {
    targets: IndexMap<String, Vec<TaskRecord>>,
}

impl BenchmarkReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` under `target`, creating the group on first use.
    pub fn push(&mut self, target: &str, record: TaskRecord) {
        if let Some(records) = self.targets.get_mut(target) {
            records.push(record);
        } else {
            self.targets.insert(target.to_owned(), vec![record]);
        }
    }

    /// Records for `target`, empty if the target is unknown.
    #[must_use]
    pub fn records(&self, target: &str) -> &[TaskRecord] {
        self.targets.get(target).map(Vec::as_slice).unwrap_or_default()
    }

    /// Target names in report order.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }

    /// Every record with its target, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskRecord)> {
        self.targets
            .iter()
            .flat_map(|(name, records)| records.iter().map(move |r| (name.as_str(), r)))
    }

    /// Total number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.values().map(Vec::len).sum()
    }

    /// Returns true if no task has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of records whose result is [`MatchResult::Found`].
    #[must_use]
    pub fn found_count(&self) -> usize {
        self.iter().filter(|(_, r)| r.result.is_found()).count()
    }

    /// Flattened view, one row per record.
    #[must_use]
    pub fn rows(&self) -> Vec<ReportRow> {
        self.iter()
            .map(|(target, r)| ReportRow {
                target: target.to_owned(),
                solver: r.solver.name(),
                result: r.result.label(),
                detail: match &r.result {
                    MatchResult::Found(m) => m.to_string(),
                    MatchResult::Error(msg) => msg.clone(),
                    _ => String::new(),
                },
                elapsed_ms: r.elapsed.as_secs_f64() * 1000.0,
                seed: r.seed,
            })
            .collect()
    }

    /// Writes [`Self::rows`] as CSV to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Csv`] if the file cannot be created or written.
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), BenchError> {
        let mut writer = csv::Writer::from_path(path)?;
        self.write_csv(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Renders [`Self::rows`] as a CSV string.
    ///
    /// # Errors
    ///
    /// Returns a [`BenchError`] if serialization fails.
    pub fn to_csv_string(&self) -> Result<String, BenchError> {
        let mut buffer = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buffer);
            self.write_csv(&mut writer)?;
            writer.flush()?;
        }
        String::from_utf8(buffer)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    fn write_csv<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), BenchError> {
        writer.write_record(ReportRow::HEADER)?;
        for row in self.rows() {
            writer.write_record(row.to_record())?;
        }
        Ok(())
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, records) in &self.targets {
            writeln!(f, "=== {name} ===")?;
            writeln!(f, "{:<20} | {:>11} | {:>6} | Result", "Solver", "Time (ms)", "Seed")?;
            writeln!(f, "{}", "-".repeat(60))?;
            for r in records {
                writeln!(
                    f,
                    "{:<20} | {:>11.3} | {:>6} | {}",
                    r.solver.title(),
                    r.elapsed.as_secs_f64() * 1000.0,
                    r.seed,
                    r.result
                )?;
            }
            writeln!(f)?;
        }
        write!(f, "{} of {} tasks found an embedding", self.found_count(), self.len())
    }
}
