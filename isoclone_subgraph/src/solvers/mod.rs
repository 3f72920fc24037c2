//! The matching strategies and their closed dispatch table.

mod branch_and_bound;
mod constraint_propagation;
mod gradient_descent;
mod placeholder;
mod random_walk;
mod simulated_annealing;
mod ullmann;

use std::fmt;
use std::str::FromStr;

use isoclone_common::Config;
use thiserror::Error;

pub use branch_and_bound::BranchAndBound;
pub use constraint_propagation::ConstraintPropagation;
pub use gradient_descent::{GradientDescent, Relaxation};
pub use placeholder::Placeholder;
pub use random_walk::RandomWalk;
pub use simulated_annealing::SimulatedAnnealing;
pub use ullmann::{Admissibility, Ullmann};

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph};

/// Every strategy known to the benchmark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolverKind {
    /// Exact explicit-stack depth-first search.
    BranchAndBound,
    /// Exact recursive search with forward checking.
    ConstraintPropagation,
    /// Metropolis search over target permutations.
    SimulatedAnnealing,
    /// Continuous relaxation solved by projected gradient descent.
    GradientDescent,
    /// Admissibility refinement followed by depth-first search.
    Ullmann,
    /// Uniform sampling of injective mappings.
    RandomWalk,
    /// Linear-programming relaxation. Not implemented.
    LinearRelaxation,
    /// Integer-programming formulation. Not implemented.
    IntegerProgram,
}

/// Error returned when parsing an unknown solver name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown solver '{0}'")]
pub struct UnknownSolver(pub String);

impl SolverKind {
    /// The working strategies, in report order.
    pub const ROSTER: [Self; 6] = [
        Self::BranchAndBound,
        Self::ConstraintPropagation,
        Self::SimulatedAnnealing,
        Self::GradientDescent,
        Self::Ullmann,
        Self::RandomWalk,
    ];

    /// Every strategy including placeholders.
    pub const ALL: [Self; 8] = [
        Self::GradientDescent,
        Self::LinearRelaxation,
        Self::IntegerProgram,
        Self::BranchAndBound,
        Self::ConstraintPropagation,
        Self::SimulatedAnnealing,
        Self::Ullmann,
        Self::RandomWalk,
    ];

    /// Stable machine name, accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BranchAndBound => "branch-and-bound",
            Self::ConstraintPropagation => "constraint-propagation",
            Self::SimulatedAnnealing => "simulated-annealing",
            Self::GradientDescent => "gradient-descent",
            Self::Ullmann => "ullmann",
            Self::RandomWalk => "random-walk",
            Self::LinearRelaxation => "lp-relaxation",
            Self::IntegerProgram => "milp",
        }
    }

    /// Human readable name for reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::BranchAndBound => "Branch & Bound",
            Self::ConstraintPropagation => "Constraint Prog",
            Self::SimulatedAnnealing => "Simulated Annealing",
            Self::GradientDescent => "Gradient Descent",
            Self::Ullmann => "Ullmann",
            Self::RandomWalk => "Random Walk",
            Self::LinearRelaxation => "LP Relaxation",
            Self::IntegerProgram => "MILP",
        }
    }

    /// Exact strategies: `NotFound` proves no embedding exists.
    #[must_use]
    pub const fn is_exact(self) -> bool {
        matches!(
            self,
            Self::BranchAndBound | Self::ConstraintPropagation | Self::Ullmann
        )
    }

    /// Heuristic strategies: `NotFound` is inconclusive.
    #[must_use]
    pub const fn is_heuristic(self) -> bool {
        matches!(
            self,
            Self::SimulatedAnnealing | Self::GradientDescent | Self::RandomWalk
        )
    }

    /// Strategies without an implementation.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        matches!(self, Self::LinearRelaxation | Self::IntegerProgram)
    }

    /// Whether the strategy consumes the seed.
    #[must_use]
    pub const fn is_randomized(self) -> bool {
        matches!(self, Self::SimulatedAnnealing | Self::RandomWalk)
    }

    /// Runs this strategy once.
    ///
    /// `seed` is only read by randomized strategies.
    ///
    /// # Errors
    ///
    /// Returns the strategy's [`SolverError`], including
    /// [`SolverError::Unimplemented`] for placeholders.
    pub fn attempt_match(
        self,
        query: &Graph,
        target: &Graph,
        deadline: &Deadline,
        config: &Config,
        seed: u64,
    ) -> Result<SearchOutcome, SolverError> {
        let semantics = config.semantics;
        match self {
            Self::BranchAndBound => {
                BranchAndBound::new(semantics).attempt_match(query, target, deadline)
            }
            Self::ConstraintPropagation => {
                ConstraintPropagation::new(semantics).attempt_match(query, target, deadline)
            }
            Self::SimulatedAnnealing => {
                SimulatedAnnealing::new(semantics, config.annealing, seed)
                    .attempt_match(query, target, deadline)
            }
            Self::GradientDescent => GradientDescent::new(semantics, config.gradient)
                .attempt_match(query, target, deadline),
            Self::Ullmann => Ullmann::new(semantics).attempt_match(query, target, deadline),
            Self::RandomWalk => {
                RandomWalk::new(semantics, seed).attempt_match(query, target, deadline)
            }
            Self::LinearRelaxation | Self::IntegerProgram => {
                Placeholder::new(self.name(), semantics).attempt_match(query, target, deadline)
            }
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for SolverKind {
    type Err = UnknownSolver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownSolver(s.to_owned()))
    }
}
