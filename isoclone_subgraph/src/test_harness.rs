//! Fixtures and helpers shared by unit and integration tests.

use std::sync::Once;
use std::time::Duration;

use isoclone_common::Config;

use crate::{Deadline, Graph, SearchOutcome, SolverKind};

static INIT: Once = Once::new();

/// Configures logging for the test runner.
pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Unlabeled chain `0 -> 1 -> ... -> n-1`.
#[must_use]
pub fn chain(n: usize) -> Graph {
    Graph::sequential((0..n).map(|i| format!("n{i}")))
}

/// Directed cycle on `n` nodes.
///
/// # Panics
///
/// Never; the edge list is in range by construction.
#[must_use]
pub fn cycle(n: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    Graph::from_edges((0..n).map(|i| format!("n{i}")), &edges)
        .expect("cycle edges are in range")
}

/// Out-star: node 0 points at every other node.
///
/// # Panics
///
/// Never; the edge list is in range by construction.
#[must_use]
pub fn star(leaves: usize) -> Graph {
    let edges: Vec<(usize, usize)> = (1..=leaves).map(|i| (0, i)).collect();
    Graph::from_edges((0..=leaves).map(|i| format!("n{i}")), &edges)
        .expect("star edges are in range")
}

/// A test configuration with a short budget and a fixed seed.
#[must_use]
pub fn quick_config(time_limit: Duration) -> Config {
    Config::builder()
        .time_limit(time_limit)
        .hard_timeout_grace(Duration::from_millis(500))
        .seed(0x5EED)
        .build()
}

/// Runs `kind` once with a fresh deadline derived from `config`.
///
/// # Panics
///
/// Panics if the strategy reports a [`crate::SolverError`].
#[must_use]
pub fn run(kind: SolverKind, query: &Graph, target: &Graph, config: &Config) -> SearchOutcome {
    let deadline = Deadline::after(config.time_limit);
    kind.attempt_match(query, target, &deadline, config, config.seed.unwrap_or_default())
        .unwrap_or_else(|e| panic!("{kind} failed: {e}"))
}
