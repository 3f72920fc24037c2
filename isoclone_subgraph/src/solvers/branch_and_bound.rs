//! Exact depth-first search with degree and adjacency bounds.
//!
//! This is the reference solver the other strategies are compared against.

use isoclone_common::EdgeSemantics;
use tracing::debug;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, Mapping, consistency};

/// A partial assignment on the explicit search stack.
struct Frame {
    /// `assigned[i]` is the image of query node `i`.
    assigned: Vec<usize>,
    /// Target nodes not used by `assigned`, ascending.
    available: Vec<usize>,
}

/// Explicit-stack depth-first search over partial mappings.
///
/// Query nodes are assigned in index order. Node `u` may take target node `v`
/// only if `degree(v) >= degree(u)` and every already mapped pair agrees with
/// `(u, v)` on the edges between them.
#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound {
    semantics: EdgeSemantics,
}

impl BranchAndBound {
    /// Creates the solver for the given semantics.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics) -> Self {
        Self { semantics }
    }
}

impl Solver for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch-and-bound"
    }

    fn semantics(&self) -> EdgeSemantics {
        self.semantics
    }

    fn search(
        &self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
    ) -> Result<SearchOutcome, SolverError> {
        let query_degrees = query.degrees();
        let target_degrees = target.degrees();

        Ok(depth_first(
            self.semantics,
            query,
            target,
            deadline,
            |u, v| target_degrees[v] >= query_degrees[u],
        ))
    }
}

/// Depth-first search shared by the exact strategies.
///
/// `admissible(u, v)` is a static filter applied before the adjacency check.
/// Candidates are pushed in descending order so the smallest target index is
/// explored first, which makes results deterministic.
pub(crate) fn depth_first(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    deadline: &Deadline,
    admissible: impl Fn(usize, usize) -> bool,
) -> SearchOutcome {
    let n = query.node_count();
    let mut stack = vec![Frame {
        assigned: Vec::with_capacity(n),
        available: (0..target.node_count()).collect(),
    }];
    let mut expanded: u64 = 0;

    while let Some(Frame {
        assigned,
        available,
    }) = stack.pop()
    {
        if deadline.expired() {
            debug!("depth-first search timed out after {expanded} expansions");
            return SearchOutcome::Timeout;
        }
        expanded += 1;

        let u = assigned.len();
        if u == n {
            debug!("depth-first search found a mapping after {expanded} expansions");
            return SearchOutcome::Found(Mapping::from_injective(assigned));
        }

        for &v in available.iter().rev() {
            if !admissible(u, v) {
                continue;
            }
            if !consistency::extends(semantics, query, target, &assigned, u, v) {
                continue;
            }

            let mut next_assigned = assigned.clone();
            next_assigned.push(v);
            let next_available = available.iter().copied().filter(|&x| x != v).collect();
            stack.push(Frame {
                assigned: next_assigned,
                available: next_available,
            });
        }
    }

    debug!("depth-first search exhausted after {expanded} expansions");
    SearchOutcome::NotFound
}
