//! Monte Carlo baseline: sample random injective mappings until one fits.
//!
//! This is the performance floor for comparisons. Like the other heuristics,
//! its `NotFound` is not a proof that no embedding exists.

use isoclone_common::EdgeSemantics;
use rand::SeedableRng;
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, Mapping, consistency};

/// Uniform sampling of injective mappings.
#[derive(Clone, Copy, Debug)]
pub struct RandomWalk {
    semantics: EdgeSemantics,
    seed: u64,
}

impl RandomWalk {
    /// Creates the solver with a fixed RNG seed.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics, seed: u64) -> Self {
        Self { semantics, seed }
    }
}

impl Solver for RandomWalk {
    fn name(&self) -> &'static str {
        "random-walk"
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
        let n = query.node_count();
        let m = target.node_count();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut samples: u64 = 0;

        while !deadline.expired() {
            samples += 1;
            let images = index::sample(&mut rng, m, n).into_vec();
            if consistency::violations(self.semantics, query, target, &images) == 0 {
                debug!("random-walk: hit after {samples} samples");
                return Ok(SearchOutcome::Found(Mapping::from_injective(images)));
            }
        }

        debug!("random-walk: no hit in {samples} samples");
        Ok(SearchOutcome::NotFound)
    }
}
