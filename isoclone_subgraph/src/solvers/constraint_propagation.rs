//! Exact constraint search with forward checking.

use isoclone_common::EdgeSemantics;
use tracing::debug;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, Mapping, consistency};

/// Raised inside the recursion when the deadline expires and caught at the top.
#[derive(Debug)]
struct Interrupted;

/// Recursive backtracking over per-node candidate domains.
///
/// Domains start from degree filtering. Binding a query node removes every
/// value from the domains of later nodes that would clash with it, and a
/// branch is dropped as soon as any later domain runs empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstraintPropagation {
    semantics: EdgeSemantics,
}

impl ConstraintPropagation {
    /// Creates the solver for the given semantics.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics) -> Self {
        Self { semantics }
    }

    /// Initial domains: target nodes of sufficient degree with a compatible
    /// self-loop relation.
    fn initial_domains(&self, query: &Graph, target: &Graph) -> Vec<Vec<usize>> {
        (0..query.node_count())
            .map(|u| {
                (0..target.node_count())
                    .filter(|&v| target.degree(v) >= query.degree(u))
                    .filter(|&v| consistency::loop_admissible(self.semantics, query, target, u, v))
                    .collect()
            })
            .collect()
    }

    fn assign(
        &self,
        search: &mut SearchState<'_>,
        idx: usize,
        domains: &[Vec<usize>],
    ) -> Result<bool, Interrupted> {
        if search.deadline.expired() {
            return Err(Interrupted);
        }
        search.calls += 1;

        let n = search.query.node_count();
        if idx == n {
            return Ok(true);
        }

        for &val in &domains[idx] {
            if search.used[val] {
                continue;
            }
            if !consistency::extends(
                self.semantics,
                search.query,
                search.target,
                &search.assigned,
                idx,
                val,
            ) {
                continue;
            }

            let Some(pruned) = self.forward_check(search, idx, val, domains) else {
                continue;
            };

            search.assigned.push(val);
            search.used[val] = true;
            if self.assign(search, idx + 1, &pruned)? {
                return Ok(true);
            }
            search.used[val] = false;
            search.assigned.pop();
        }
        Ok(false)
    }

    /// Narrows the domains of nodes after `idx` given `idx -> val`.
    /// Returns `None` on a domain wipe-out.
    fn forward_check(
        &self,
        search: &SearchState<'_>,
        idx: usize,
        val: usize,
        domains: &[Vec<usize>],
    ) -> Option<Vec<Vec<usize>>> {
        let mut pruned = domains.to_vec();
        for (later, domain) in pruned.iter_mut().enumerate().skip(idx + 1) {
            domain.retain(|&w| {
                w != val
                    && consistency::pair_admissible(
                        self.semantics,
                        search.query,
                        search.target,
                        (idx, val),
                        (later, w),
                    )
            });
            if domain.is_empty() {
                return None;
            }
        }
        Some(pruned)
    }
}

struct SearchState<'a> {
    query: &'a Graph,
    target: &'a Graph,
    deadline: &'a Deadline,
    assigned: Vec<usize>,
    used: Vec<bool>,
    calls: u64,
}

impl Solver for ConstraintPropagation {
    fn name(&self) -> &'static str {
        "constraint-propagation"
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
        let domains = self.initial_domains(query, target);
        if domains.iter().any(Vec::is_empty) {
            debug!("constraint-propagation: degree filtering emptied a domain");
            return Ok(SearchOutcome::NotFound);
        }

        let mut search = SearchState {
            query,
            target,
            deadline,
            assigned: Vec::with_capacity(query.node_count()),
            used: vec![false; target.node_count()],
            calls: 0,
        };

        let outcome = match self.assign(&mut search, 0, &domains) {
            Ok(true) => SearchOutcome::Found(Mapping::from_injective(search.assigned)),
            Ok(false) => SearchOutcome::NotFound,
            Err(Interrupted) => SearchOutcome::Timeout,
        };
        debug!("constraint-propagation: {} recursive calls", search.calls);
        Ok(outcome)
    }
}
