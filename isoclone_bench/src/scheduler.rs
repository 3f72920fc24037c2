//! Plans and runs benchmark tasks.
//!
//! Tasks are enumerated target-outer, solver-inner. Each task runs on its own
//! worker thread with private copies of its graphs. The scheduler waits for
//! the worker up to the hard deadline (`time_limit + grace`); if the worker has
//! not answered by then its token is cancelled and the task is recorded as a
//! timeout. Solver errors and panics are recorded as well, so the batch always
//! runs to completion.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use isoclone_common::Config;
use isoclone_subgraph::{CancelToken, Deadline, Graph, SearchOutcome, SolverError, SolverKind};
use tracing::{info, warn};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{BenchError, BenchmarkReport, BenchmarkTask, MatchResult, TaskRecord};

/// The function that actually runs a task on the worker thread.
pub type Executor =
    Arc<dyn Fn(&BenchmarkTask, &Deadline) -> Result<SearchOutcome, SolverError> + Send + Sync>;

/// Runs a roster of solvers against a set of targets.
#[derive(Clone)]
pub struct BenchmarkScheduler {
    config: Config,
    roster: Vec<SolverKind>,
    executor: Executor,
}

impl BenchmarkScheduler {
    /// A scheduler running every working strategy under `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let solver_config = config.clone();
        let executor: Executor = Arc::new(move |task: &BenchmarkTask, deadline: &Deadline| {
            task.solver.attempt_match(
                &task.query,
                &task.target,
                deadline,
                &solver_config,
                task.seed,
            )
        });
        Self {
            config,
            roster: SolverKind::ROSTER.to_vec(),
            executor,
        }
    }

    /// Replaces the roster. Order is preserved in the report.
    #[must_use]
    pub fn with_roster(mut self, roster: impl IntoIterator<Item = SolverKind>) -> Self {
        self.roster = roster.into_iter().collect();
        self
    }

    /// Replaces the function run on the worker thread.
    ///
    /// The default dispatches to [`SolverKind::attempt_match`].
    #[must_use]
    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// The configuration tasks are planned with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The solvers run against each target, in order.
    #[must_use]
    pub fn roster(&self) -> &[SolverKind] {
        &self.roster
    }

    /// Enumerates every task up front, target-outer and solver-inner.
    ///
    /// # Errors
    ///
    /// Fails if the roster or target list is empty, if two targets share a
    /// name, or if the configuration is invalid.
    pub fn plan<I, S>(&self, query: &Graph, targets: I) -> Result<Vec<BenchmarkTask>, BenchError>
    where
        I: IntoIterator<Item = (S, Graph)>,
        S: Into<String>,
    {
        self.config.validate()?;
        if self.roster.is_empty() {
            return Err(BenchError::EmptyRoster);
        }

        let mut named: IndexMap<String, Graph> = IndexMap::new();
        for (name, graph) in targets {
            let name = name.into();
            if named.contains_key(&name) {
                return Err(BenchError::DuplicateTarget(name));
            }
            named.insert(name, graph);
        }
        if named.is_empty() {
            return Err(BenchError::NoTargets);
        }

        let tasks = named
            .iter()
            .flat_map(|(name, target)| self.roster.iter().map(move |&solver| (name, target, solver)))
            .enumerate()
            .map(|(index, (name, target, solver))| BenchmarkTask {
                index,
                target_name: name.clone(),
                solver,
                query: query.clone(),
                target: target.clone(),
                time_limit: self.config.time_limit,
                seed: self.task_seed(index),
            })
            .collect();
        Ok(tasks)
    }

    /// Plans and runs the whole benchmark.
    ///
    /// # Errors
    ///
    /// Fails only if planning fails; per-task failures are recorded in the
    /// report.
    pub fn run<I, S>(&self, query: &Graph, targets: I) -> Result<BenchmarkReport, BenchError>
    where
        I: IntoIterator<Item = (S, Graph)>,
        S: Into<String>,
    {
        let tasks = self.plan(query, targets)?;
        Ok(self.run_tasks(tasks))
    }

    /// Runs already planned tasks and aggregates their records in task order.
    #[must_use]
    pub fn run_tasks(&self, tasks: Vec<BenchmarkTask>) -> BenchmarkReport {
        let total = tasks.len();
        let records = self.execute_all(tasks, total);

        let mut report = BenchmarkReport::new();
        for (target, record) in records {
            report.push(&target, record);
        }
        report
    }

    #[cfg(feature = "rayon")]
    fn execute_all(&self, tasks: Vec<BenchmarkTask>, total: usize) -> Vec<(String, TaskRecord)> {
        if self.config.parallel {
            info!("running {total} tasks in parallel");
            return tasks
                .into_par_iter()
                .map(|task| self.execute_logged(task, total))
                .collect();
        }
        self.execute_sequential(tasks, total)
    }

    #[cfg(not(feature = "rayon"))]
    fn execute_all(&self, tasks: Vec<BenchmarkTask>, total: usize) -> Vec<(String, TaskRecord)> {
        if self.config.parallel {
            warn!("parallel execution requested but the `rayon` feature is disabled");
        }
        self.execute_sequential(tasks, total)
    }

    fn execute_sequential(
        &self,
        tasks: Vec<BenchmarkTask>,
        total: usize,
    ) -> Vec<(String, TaskRecord)> {
        let mut current: Option<String> = None;
        tasks
            .into_iter()
            .map(|task| {
                if current.as_deref() != Some(task.target_name.as_str()) {
                    info!(
                        "target '{}' ({} nodes, {} edges)",
                        task.target_name,
                        task.target.node_count(),
                        task.target.edge_count()
                    );
                    current = Some(task.target_name.clone());
                }
                self.execute_logged(task, total)
            })
            .collect()
    }

    fn execute_logged(&self, task: BenchmarkTask, total: usize) -> (String, TaskRecord) {
        let target = task.target_name.clone();
        let record = self.execute(task);
        info!(
            "[{}/{total}] {}: {} ({:.3}s)",
            record.index + 1,
            record.solver,
            record.result,
            record.elapsed.as_secs_f64()
        );
        (target, record)
    }

    /// Runs one task under the hard deadline.
    #[must_use]
    pub fn execute(&self, task: BenchmarkTask) -> TaskRecord {
        let index = task.index;
        let solver = task.solver;
        let seed = task.seed;
        let hard_limit = task.time_limit.saturating_add(self.config.hard_timeout_grace);

        let started = Instant::now();
        let result = run_guarded(task, Arc::clone(&self.executor), hard_limit);
        TaskRecord {
            index,
            solver,
            result,
            elapsed: started.elapsed(),
            seed,
        }
    }

    fn task_seed(&self, index: usize) -> u64 {
        self.config
            .seed
            .map_or_else(rand::random::<u64>, |base| base.wrapping_add(index as u64))
    }
}

/// Runs `executor` on a worker thread and waits at most `hard_limit`.
fn run_guarded(task: BenchmarkTask, executor: Executor, hard_limit: Duration) -> MatchResult {
    let token = CancelToken::new();
    let worker_token = token.clone();
    let (tx, rx) = mpsc::channel();
    let label = format!("{}/{}", task.target_name, task.solver.name());

    let spawned = thread::Builder::new()
        .name(format!("task-{}", task.index))
        .spawn(move || {
            let deadline = task.deadline(worker_token);
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| executor(&task, &deadline)));
            // The scheduler may have stopped listening after a hard timeout.
            let _ = tx.send(attempt);
        });
    if let Err(e) = spawned {
        warn!("{label}: failed to spawn worker: {e}");
        return MatchResult::Error(format!("failed to spawn worker: {e}"));
    }

    match rx.recv_timeout(hard_limit) {
        Ok(Ok(attempt)) => {
            match &attempt {
                Ok(_) | Err(SolverError::Unimplemented(_)) => {}
                Err(e) => warn!("{label}: {e}"),
            }
            MatchResult::from_attempt(attempt)
        }
        Ok(Err(payload)) => {
            let msg = panic_message(payload.as_ref());
            warn!("{label}: solver panicked: {msg}");
            MatchResult::Error(format!("panic: {msg}"))
        }
        Err(RecvTimeoutError::Timeout) => {
            token.cancel();
            warn!("{label}: interrupted after {:.3}s", hard_limit.as_secs_f64());
            MatchResult::Timeout
        }
        Err(RecvTimeoutError::Disconnected) => {
            MatchResult::Error("worker exited without reporting".to_owned())
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_are_readable() {
        let payload = panic::catch_unwind(|| -> u8 { panic!("static message") }).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static message");

        let payload = panic::catch_unwind(|| -> u8 { panic!("formatted {}", 3) }).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "formatted 3");
    }

    #[test]
    fn seeds_follow_task_index() {
        let scheduler = BenchmarkScheduler::new(Config::builder().seed(40).build());
        assert_eq!(scheduler.task_seed(0), 40);
        assert_eq!(scheduler.task_seed(2), 42);
    }
}
