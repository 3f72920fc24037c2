//! Continuous relaxation of the permutation search.
//!
//! The query adjacency `A` is zero-padded to the target size and a soft
//! assignment matrix `P` is pushed toward `A * P = P * B` by projected gradient
//! descent on `||A P - P B||^2`. After each step `P` is clipped to `[0, 1]`
//! and its rows and columns are renormalized in turn, which keeps it close to
//! doubly stochastic.
//!
//! False negatives are expected: the residual can stay above the threshold
//! even when an embedding exists, notably when the target has edges the
//! padded query cannot account for.

use isoclone_common::{EdgeSemantics, GradientParams};
use nalgebra::DMatrix;
use tracing::debug;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, Mapping, consistency};

/// Added to row and column sums before dividing.
const NORMALIZATION_EPSILON: f64 = 1e-9;

/// Final state of a relaxation run.
#[derive(Clone, Debug)]
pub struct Relaxation {
    /// Soft assignment, rows are query nodes (padded), columns target nodes.
    pub plan: DMatrix<f64>,
    /// `||A P - P B||` after the last step.
    pub residual: f64,
    /// Descent steps performed.
    pub steps: usize,
    /// Whether the residual fell below the configured threshold.
    pub converged: bool,
}

/// Projected gradient descent on the relaxed matching objective.
#[derive(Clone, Copy, Debug)]
pub struct GradientDescent {
    semantics: EdgeSemantics,
    params: GradientParams,
}

impl GradientDescent {
    /// Creates the solver.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics, params: GradientParams) -> Self {
        Self { semantics, params }
    }

    /// Runs the descent until the residual drops below the threshold, the
    /// step budget is spent or the deadline expires.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::Numerical`] if the plan stops being finite.
    pub fn relax(
        &self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
    ) -> Result<Relaxation, SolverError> {
        let size = target.node_count().max(query.node_count());
        let a = padded_adjacency(query, size);
        let b = padded_adjacency(target, size);
        let a_t = a.transpose();
        let b_t = b.transpose();

        let mut plan = DMatrix::from_element(size, size, 1.0 / size as f64);
        let mut residual = (&a * &plan - &plan * &b).norm();
        let mut steps = 0;

        while steps < self.params.max_steps && !deadline.expired() {
            let term = &a * &plan - &plan * &b;
            let grad = (&a_t * &term - &term * &b_t) * 2.0;
            plan -= grad * self.params.learning_rate;
            plan.apply(|x| *x = x.clamp(0.0, 1.0));

            for mut row in plan.row_iter_mut() {
                let total = row.sum() + NORMALIZATION_EPSILON;
                row /= total;
            }
            for mut column in plan.column_iter_mut() {
                let total = column.sum() + NORMALIZATION_EPSILON;
                column /= total;
            }

            steps += 1;
            residual = (&a * &plan - &plan * &b).norm();
            if !residual.is_finite() {
                return Err(SolverError::Numerical(format!(
                    "residual became {residual} after {steps} steps"
                )));
            }
            if residual < self.params.residual_threshold {
                break;
            }
        }

        debug!("gradient-descent: residual {residual:.4} after {steps} steps");
        Ok(Relaxation {
            converged: residual < self.params.residual_threshold,
            plan,
            residual,
            steps,
        })
    }
}

/// Dense `size x size` copy of the adjacency with zero padding.
fn padded_adjacency(graph: &Graph, size: usize) -> DMatrix<f64> {
    let n = graph.node_count();
    DMatrix::from_fn(size, size, |i, j| {
        if i < n && j < n && graph.has_edge(i, j) {
            1.0
        } else {
            0.0
        }
    })
}

/// Rounds the first `rows` rows of a soft assignment to an injective mapping
/// by repeatedly taking the largest remaining entry. Ties resolve to the
/// lowest row, then the lowest column.
pub(crate) fn round_plan(plan: &DMatrix<f64>, rows: usize) -> Mapping {
    let mut images = vec![usize::MAX; rows];
    let mut column_used = vec![false; plan.ncols()];

    for _ in 0..rows {
        let mut best: Option<(usize, usize, f64)> = None;
        for (i, image) in images.iter().enumerate() {
            if *image != usize::MAX {
                continue;
            }
            for (j, used) in column_used.iter().enumerate() {
                if *used {
                    continue;
                }
                let weight = plan[(i, j)];
                if best.is_none_or(|(_, _, w)| weight > w) {
                    best = Some((i, j, weight));
                }
            }
        }
        let Some((i, j, _)) = best else {
            break;
        };
        images[i] = j;
        column_used[j] = true;
    }

    Mapping::from_injective(images)
}

impl Solver for GradientDescent {
    fn name(&self) -> &'static str {
        "gradient-descent"
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
        let relaxation = self.relax(query, target, deadline)?;
        if !relaxation.converged {
            return Ok(SearchOutcome::NotFound);
        }

        let mapping = round_plan(&relaxation.plan, query.node_count());
        if consistency::is_embedding(self.semantics, query, target, &mapping) {
            Ok(SearchOutcome::Found(mapping))
        } else {
            debug!("gradient-descent: converged plan rounds to invalid mapping {mapping}");
            Ok(SearchOutcome::NotFound)
        }
    }
}
