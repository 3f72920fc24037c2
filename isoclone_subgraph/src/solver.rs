//! The contract every matching strategy implements.

use isoclone_common::EdgeSemantics;
use thiserror::Error;
use tracing::debug;

use crate::{Deadline, Graph, Mapping, consistency};

/// Result of a single solver invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// An embedding was found.
    Found(Mapping),
    /// No embedding was found. For exact strategies this means none exists;
    /// for heuristic strategies it only means the search gave up.
    NotFound,
    /// The cooperative deadline expired before the search finished.
    Timeout,
}

impl SearchOutcome {
    /// Returns true for [`SearchOutcome::Found`].
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The mapping, if one was found.
    #[must_use]
    pub const fn mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Found(m) => Some(m),
            _ => None,
        }
    }
}

/// Unexpected failures inside a solver.
///
/// Timeouts and negative results are outcomes, not errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SolverError {
    /// The strategy is a placeholder with no working implementation.
    #[error("strategy '{0}' is not implemented")]
    Unimplemented(&'static str),
    /// A numerical routine produced non-finite values.
    #[error("numerical failure: {0}")]
    Numerical(String),
    /// Any other internal failure.
    #[error("internal solver error: {0}")]
    Internal(String),
}

/// A subgraph matching strategy.
///
/// Implementors provide [`Solver::search`]; callers use
/// [`Solver::attempt_match`], which applies the shared preconditions first.
pub trait Solver {
    /// Stable short name.
    fn name(&self) -> &'static str;

    /// Semantics this instance checks edges under.
    fn semantics(&self) -> EdgeSemantics;

    /// The strategy itself. May assume `0 < query.node_count() <= target.node_count()`.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] on unexpected failure.
    fn search(
        &self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
    ) -> Result<SearchOutcome, SolverError>;

    /// Tries to embed `query` into `target` within `deadline`.
    ///
    /// A query larger than the target is rejected with `NotFound` before any
    /// search starts. The empty query always embeds.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Solver::search`].
    fn attempt_match(
        &self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
    ) -> Result<SearchOutcome, SolverError> {
        if query.node_count() > target.node_count() {
            debug!(
                "{}: query has {} nodes, target only {}",
                self.name(),
                query.node_count(),
                target.node_count()
            );
            return Ok(SearchOutcome::NotFound);
        }
        if query.is_empty() {
            return Ok(SearchOutcome::Found(Mapping::empty()));
        }

        let outcome = self.search(query, target, deadline)?;
        if let SearchOutcome::Found(mapping) = &outcome {
            debug_assert!(
                consistency::is_embedding(self.semantics(), query, target, mapping),
                "{} returned an invalid mapping {mapping}",
                self.name()
            );
        }
        Ok(outcome)
    }
}
