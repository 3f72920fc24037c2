//! Metropolis search over permutations of the target.
//!
//! A `NotFound` from this strategy only means the budget ran out before the
//! cost reached zero. It is not evidence that no embedding exists.

use isoclone_common::{AnnealingParams, EdgeSemantics};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::solver::{SearchOutcome, Solver, SolverError};
use crate::{Deadline, Graph, Mapping, consistency};

/// Simulated annealing.
///
/// The state is a permutation of all target indices whose first `n` entries
/// are the images of the `n` query nodes. The cost is the number of query
/// relations the current images violate. Each iteration swaps two random
/// positions and keeps the swap if the cost did not increase, or otherwise
/// with probability `exp(-delta / temperature)`. The temperature decays
/// multiplicatively after every iteration.
#[derive(Clone, Copy, Debug)]
pub struct SimulatedAnnealing {
    semantics: EdgeSemantics,
    params: AnnealingParams,
    seed: u64,
}

impl SimulatedAnnealing {
    /// Creates the solver with a fixed RNG seed.
    #[must_use]
    pub const fn new(semantics: EdgeSemantics, params: AnnealingParams, seed: u64) -> Self {
        Self {
            semantics,
            params,
            seed,
        }
    }

    fn cost(&self, query: &Graph, target: &Graph, perm: &[usize]) -> usize {
        consistency::violations(self.semantics, query, target, &perm[..query.node_count()])
    }
}

impl Solver for SimulatedAnnealing {
    fn name(&self) -> &'static str {
        "simulated-annealing"
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

        let mut perm: Vec<usize> = (0..m).collect();
        perm.shuffle(&mut rng);

        let mut current = self.cost(query, target, &perm);
        let mut temperature = self.params.initial_temperature;
        let mut iterations: u64 = 0;

        loop {
            if current == 0 {
                debug!("simulated-annealing converged after {iterations} iterations");
                return Ok(SearchOutcome::Found(Mapping::from_injective(
                    perm[..n].to_vec(),
                )));
            }
            // A single target node admits no moves.
            if m < 2 || deadline.expired() {
                debug!(
                    "simulated-annealing gave up after {iterations} iterations at cost {current}"
                );
                return Ok(SearchOutcome::NotFound);
            }
            iterations += 1;

            let i = rng.random_range(0..m);
            let j = loop {
                let j = rng.random_range(0..m);
                if j != i {
                    break j;
                }
            };
            perm.swap(i, j);

            let candidate = self.cost(query, target, &perm);
            let delta = candidate as f64 - current as f64;
            let accept = delta <= 0.0
                || rng.random::<f64>() < (-delta / temperature.max(f64::MIN_POSITIVE)).exp();

            if accept {
                current = candidate;
            } else {
                perm.swap(i, j);
            }

            temperature *= self.params.cooling_rate;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn solver(seed: u64) -> SimulatedAnnealing {
        SimulatedAnnealing::new(EdgeSemantics::Induced, AnnealingParams::default(), seed)
    }

    #[test]
    fn finds_small_chain() {
        let q = Graph::sequential(["a", "b"]);
        let t = Graph::sequential(["a", "b", "c", "d"]);
        let outcome = solver(3)
            .attempt_match(&q, &t, &Deadline::after(Duration::from_secs(5)))
            .unwrap();
        let mapping = outcome.mapping().expect("two-node chain should be found");
        assert!(consistency::is_embedding(EdgeSemantics::Induced, &q, &t, mapping));
    }

    #[test]
    fn same_seed_same_answer() {
        let q = Graph::sequential(["a", "b", "c"]);
        let t = Graph::sequential(["a", "b", "c", "d", "e", "f"]);
        let deadline = Deadline::after(Duration::from_secs(5));
        let first = solver(42).attempt_match(&q, &t, &deadline).unwrap();
        let second = solver(42).attempt_match(&q, &t, &deadline).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn impossible_instance_reports_not_found_at_budget() {
        let q = Graph::from_edges(["a", "b"], &[(0, 1), (1, 0)]).unwrap();
        let t = Graph::sequential(["a", "b", "c"]);
        let outcome = solver(1)
            .attempt_match(&q, &t, &Deadline::after(Duration::from_millis(50)))
            .unwrap();
        assert_eq!(outcome, SearchOutcome::NotFound);
    }
}
