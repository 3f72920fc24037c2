//! Ullmann's algorithm: admissibility matrix, fixed-point refinement, then
//! backtracking over the surviving candidates.

use isoclone_common::EdgeSemantics;
use tracing::debug;

use super::branch_and_bound::depth_first;
use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, consistency};

/// `rows x cols` boolean matrix, `m[i][j]` meaning query `i` may map to target `j`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Admissibility {
    cols: usize,
    cells: Vec<bool>,
}

impl Admissibility {
    /// Degree and self-loop pruning only.
    #[must_use]
    pub fn initial(semantics: EdgeSemantics, query: &Graph, target: &Graph) -> Self {
        let rows = query.node_count();
        let cols = target.node_count();
        let mut cells = vec![false; rows * cols];
        for i in 0..rows {
            for j in 0..cols {
                cells[i * cols + j] = target.degree(j) >= query.degree(i)
                    && consistency::loop_admissible(semantics, query, target, i, j);
            }
        }
        Self { cols, cells }
    }

    /// Returns true if query `i` may still map to target `j`.
    #[must_use]
    pub fn allows(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.cols + j]
    }

    fn forbid(&mut self, i: usize, j: usize) {
        self.cells[i * self.cols + j] = false;
    }

    /// Number of surviving candidates for query `i`.
    #[must_use]
    pub fn candidates(&self, i: usize) -> usize {
        self.cells[i * self.cols..(i + 1) * self.cols]
            .iter()
            .filter(|&&c| c)
            .count()
    }

    /// Number of query rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.cells.len().checked_div(self.cols).unwrap_or(0)
    }

    /// Returns true if some query node has no candidate left.
    #[must_use]
    pub fn has_empty_row(&self) -> bool {
        (0..self.rows()).any(|i| self.candidates(i) == 0)
    }

    /// Ullmann refinement.
    ///
    /// Removes `(i, j)` whenever some query successor `i2` of `i` has no
    /// candidate among the target successors of `j`, or some query predecessor
    /// has no candidate among the target predecessors, and repeats until a
    /// full sweep removes nothing. Returns the number of sweeps, or `None` if
    /// the deadline expired first.
    pub fn refine(&mut self, query: &Graph, target: &Graph, deadline: &Deadline) -> Option<usize> {
        let mut sweeps = 0;
        loop {
            if deadline.expired() {
                return None;
            }
            sweeps += 1;

            let mut removed = 0;
            for i in 0..query.node_count() {
                for j in 0..target.node_count() {
                    if !self.allows(i, j) {
                        continue;
                    }
                    let successors_ok = query
                        .successors(i)
                        .iter()
                        .filter(|&&i2| i2 != i)
                        .all(|&i2| target.successors(j).iter().any(|&j2| self.allows(i2, j2)));
                    let predecessors_ok = successors_ok
                        && query
                            .predecessors(i)
                            .iter()
                            .filter(|&&i2| i2 != i)
                            .all(|&i2| {
                                target.predecessors(j).iter().any(|&j2| self.allows(i2, j2))
                            });
                    if !predecessors_ok {
                        self.forbid(i, j);
                        removed += 1;
                    }
                }
            }

            debug!("ullmann: sweep {sweeps} removed {removed} candidates");
            if removed == 0 {
                return Some(sweeps);
            }
        }
    }
}

/// Ullmann refinement followed by the branch-and-bound search, restricted to
/// candidates that survived refinement.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ullmann {
    semantics: EdgeSemantics,
}

impl Ullmann {
    /// Creates the solver for the given semantics.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics) -> Self {
        Self { semantics }
    }
}

impl Solver for Ullmann {
    fn name(&self) -> &'static str {
        "ullmann"
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
        let mut matrix = Admissibility::initial(self.semantics, query, target);
        if matrix.refine(query, target, deadline).is_none() {
            return Ok(SearchOutcome::Timeout);
        }
        if matrix.has_empty_row() {
            debug!("ullmann: refinement left a query node without candidates");
            return Ok(SearchOutcome::NotFound);
        }

        Ok(depth_first(
            self.semantics,
            query,
            target,
            deadline,
            |u, v| matrix.allows(u, v),
        ))
    }
}
