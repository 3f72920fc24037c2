//! Subgraph matching strategies for structural clone detection.
//!
//! A small query graph is embedded into a larger target graph by one of
//! several interchangeable strategies that share the [`Solver`] contract.
//! [`SolverKind`] is the closed dispatch table the benchmark runs over.

pub mod consistency;
mod deadline;
mod graph;
mod mapping;
mod solver;
pub mod solvers;
pub mod test_harness;

pub use deadline::{CancelToken, Deadline};
pub use graph::{Graph, GraphError};
pub use mapping::Mapping;
pub use solver::{SearchOutcome, Solver, SolverError};
pub use solvers::{SolverKind, UnknownSolver};
