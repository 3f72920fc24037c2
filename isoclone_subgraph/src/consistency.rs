//! Edge consistency checks shared by every strategy.
//!
//! All checks are parameterized by [`EdgeSemantics`], so exact and heuristic
//! solvers agree on what a valid embedding is.

use isoclone_common::EdgeSemantics;
use itertools::iproduct;

use crate::{Graph, Mapping};

/// Returns true if the self-loop relation of `u` is preserved by `v`.
#[must_use]
pub fn loop_admissible(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    u: usize,
    v: usize,
) -> bool {
    semantics.admits(query.has_edge(u, u), target.has_edge(v, v))
}

/// Returns true if the pairs `(u1 -> v1)` and `(u2 -> v2)` agree on the edges
/// between them, in both directions.
#[must_use]
pub fn pair_admissible(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    (u1, v1): (usize, usize),
    (u2, v2): (usize, usize),
) -> bool {
    semantics.admits(query.has_edge(u1, u2), target.has_edge(v1, v2))
        && semantics.admits(query.has_edge(u2, u1), target.has_edge(v2, v1))
}

/// Returns true if mapping query node `u` to target node `v` is consistent
/// with every pair already in `assigned` (where `assigned[i]` is the image of
/// query node `i`).
#[must_use]
pub fn extends(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    assigned: &[usize],
    u: usize,
    v: usize,
) -> bool {
    loop_admissible(semantics, query, target, u, v)
        && assigned
            .iter()
            .enumerate()
            .all(|(u_prev, &v_prev)| pair_admissible(semantics, query, target, (u_prev, v_prev), (u, v)))
}

/// Counts ordered query pairs `(i, j)` (including `i == j`) whose relation is
/// not preserved by `images`.
///
/// Zero means `images` is an embedding of the first `images.len()` query nodes.
#[must_use]
pub fn violations(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    images: &[usize],
) -> usize {
    let n = images.len();
    iproduct!(0..n, 0..n)
        .filter(|&(i, j)| !semantics.admits(query.has_edge(i, j), target.has_edge(images[i], images[j])))
        .count()
}

/// Full validity check for a finished mapping: covers the whole query, stays
/// in range, is injective and preserves edges under `semantics`.
#[must_use]
pub fn is_embedding(
    semantics: EdgeSemantics,
    query: &Graph,
    target: &Graph,
    mapping: &Mapping,
) -> bool {
    mapping.len() == query.node_count()
        && mapping.as_slice().iter().all(|&v| v < target.node_count())
        && mapping.is_injective()
        && violations(semantics, query, target, mapping.as_slice()) == 0
}

/// Returns true if no query node is mapped to a target node of smaller degree.
#[must_use]
pub fn respects_degrees(query: &Graph, target: &Graph, mapping: &Mapping) -> bool {
    mapping
        .iter()
        .all(|(u, v)| target.degree(v) >= query.degree(u))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(n: usize) -> Graph {
        Graph::sequential((0..n).map(|i| format!("s{i}")))
    }

    #[test]
    fn chain_window_is_an_embedding() {
        let q = chain(3);
        let t = chain(5);
        let m = Mapping::new(vec![1, 2, 3]).unwrap();
        assert!(is_embedding(EdgeSemantics::Induced, &q, &t, &m));
        assert!(respects_degrees(&q, &t, &m));
    }

    #[test]
    fn reversed_chain_is_not() {
        let q = chain(3);
        let t = chain(5);
        let m = Mapping::new(vec![2, 1, 0]).unwrap();
        assert!(!is_embedding(EdgeSemantics::Monomorphism, &q, &t, &m));
        assert_eq!(violations(EdgeSemantics::Monomorphism, &q, &t, m.as_slice()), 2);
    }

    #[test]
    fn induced_rejects_extra_target_edges() {
        let q = chain(3);
        let t = Graph::from_edges(["a", "b", "c"], &[(0, 1), (1, 2), (0, 2)]).unwrap();
        let m = Mapping::new(vec![0, 1, 2]).unwrap();
        assert!(is_embedding(EdgeSemantics::Monomorphism, &q, &t, &m));
        assert!(!is_embedding(EdgeSemantics::Induced, &q, &t, &m));
        assert!(!extends(EdgeSemantics::Induced, &q, &t, &[0, 1], 2, 2));
        assert!(extends(EdgeSemantics::Monomorphism, &q, &t, &[0, 1], 2, 2));
    }

    #[test]
    fn self_loops_are_checked() {
        let q = Graph::from_edges(["a"], &[(0, 0)]).unwrap();
        let t = Graph::from_edges(["x", "y"], &[(1, 1)]).unwrap();
        assert!(!loop_admissible(EdgeSemantics::Monomorphism, &q, &t, 0, 0));
        assert!(loop_admissible(EdgeSemantics::Monomorphism, &q, &t, 0, 1));
    }

    #[test]
    fn incomplete_mapping_is_not_an_embedding() {
        let q = chain(3);
        let t = chain(5);
        let m = Mapping::new(vec![0, 1]).unwrap();
        assert!(!is_embedding(EdgeSemantics::Induced, &q, &t, &m));
    }
}
