//! A single (target, solver) unit of work.

use std::time::Duration;

use isoclone_subgraph::{CancelToken, Deadline, Graph, SolverKind};

/// One solver run against one target.
///
/// The task owns its graphs, so a worker thread never shares state with the
/// scheduler or with other tasks.
#[derive(Clone, Debug)]
pub struct BenchmarkTask {
    /// Position in the plan, `0..total`.
    pub index: usize,
    /// Name of the target in the report.
    pub target_name: String,
    /// Strategy to run.
    pub solver: SolverKind,
    /// Private copy of the query.
    pub query: Graph,
    /// Private copy of the target.
    pub target: Graph,
    /// Cooperative budget.
    pub time_limit: Duration,
    /// Seed for randomized strategies.
    pub seed: u64,
}

impl BenchmarkTask {
    /// Deadline for this task, cancellable through `token`.
    #[must_use]
    pub fn deadline(&self, token: CancelToken) -> Deadline {
        Deadline::new(self.time_limit, token)
    }
}
