//! Benchmark harness comparing subgraph matching strategies.
//!
//! [`BenchmarkScheduler`] runs every strategy of a roster against every
//! target, bounding each run by a cooperative deadline and an external hard
//! deadline, and collects a [`BenchmarkReport`].

mod error;
mod report;
mod result;
mod scheduler;
mod task;

pub use error::BenchError;
pub use report::{BenchmarkReport, ReportRow, TaskRecord};
pub use result::MatchResult;
pub use scheduler::{BenchmarkScheduler, Executor};
pub use task::BenchmarkTask;
