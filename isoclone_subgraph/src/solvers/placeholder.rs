//! Strategies listed for comparison that have no working implementation.
//!
//! They report [`SolverError::Unimplemented`] so a benchmark shows them as
//! unimplemented instead of as a negative result.

use isoclone_common::EdgeSemantics;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph};

/// Linear-programming relaxation or integer-programming formulation.
#[derive(Clone, Copy, Debug)]
pub struct Placeholder {
    name: &'static str,
    semantics: EdgeSemantics,
}

impl Placeholder {
    /// A placeholder reported under `name`.
    #[must_use]
    pub const fn new(name: &'static str, semantics: EdgeSemantics) -> Self {
        Self { name, semantics }
    }
}

impl Solver for Placeholder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn semantics(&self) -> EdgeSemantics {
        self.semantics
    }

    fn search(
        &self,
        _query: &Graph,
        _target: &Graph,
        _deadline: &Deadline,
    ) -> Result<SearchOutcome, SolverError> {
        Err(SolverError::Unimplemented(self.name))
    }

    /// Reports [`SolverError::Unimplemented`] for every instance, including
    /// those the shared preconditions would reject.
    fn attempt_match(
        &self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
    ) -> Result<SearchOutcome, SolverError> {
        self.search(query, target, deadline)
    }
}
