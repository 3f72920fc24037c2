#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use std::time::Duration;

use isoclone_subgraph::consistency::{is_embedding, respects_degrees};
use isoclone_subgraph::test_harness::{quick_config, run};
use isoclone_subgraph::{Graph, SearchOutcome, SolverKind};
use quickcheck::{Arbitrary, Gen, quickcheck};

const EXACT: [SolverKind; 3] = [
    SolverKind::BranchAndBound,
    SolverKind::ConstraintPropagation,
    SolverKind::Ullmann,
];

const HEURISTIC: [SolverKind; 3] = [
    SolverKind::SimulatedAnnealing,
    SolverKind::GradientDescent,
    SolverKind::RandomWalk,
];

fn edge_list(graph: &Graph) -> Vec<(usize, usize)> {
    (0..graph.node_count())
        .flat_map(|u| graph.successors(u).iter().map(move |&v| (u, v)))
        .collect()
}

fn random_graph(g: &mut Gen, nodes: usize) -> Graph {
    let mut edges = Vec::new();
    for u in 0..nodes {
        for v in 0..nodes {
            let present = if u == v {
                u8::arbitrary(g) % 8 == 0
            } else {
                bool::arbitrary(g)
            };
            if present {
                edges.push((u, v));
            }
        }
    }
    Graph::from_edges((0..nodes).map(|i| format!("n{i}")), &edges).unwrap()
}

#[derive(Clone, Debug)]
struct Instance {
    query: Graph,
    target: Graph,
}

impl Arbitrary for Instance {
    fn arbitrary(g: &mut Gen) -> Self {
        let n = usize::arbitrary(g) % 4 + 1;
        let m = n + usize::arbitrary(g) % 3;
        Self {
            query: random_graph(g, n),
            target: random_graph(g, m),
        }
    }
}

fn valid_if_found(kind: SolverKind, instance: &Instance, outcome: &SearchOutcome) -> bool {
    let config = quick_config(Duration::from_secs(1));
    outcome.mapping().is_none_or(|m| {
        m.is_injective()
            && m.len() == instance.query.node_count()
            && is_embedding(config.semantics, &instance.query, &instance.target, m)
            && respects_degrees(&instance.query, &instance.target, m)
    }) && !(kind.is_heuristic() && *outcome == SearchOutcome::Timeout)
}

quickcheck! {
    fn prop_exact_results_are_valid(instance: Instance) -> bool {
        let config = quick_config(Duration::from_secs(5));
        EXACT.into_iter().all(|kind| {
            let outcome = run(kind, &instance.query, &instance.target, &config);
            outcome != SearchOutcome::Timeout && valid_if_found(kind, &instance, &outcome)
        })
    }

    fn prop_exact_solvers_agree(instance: Instance) -> bool {
        let config = quick_config(Duration::from_secs(5));
        let found: Vec<bool> = EXACT
            .into_iter()
            .map(|kind| run(kind, &instance.query, &instance.target, &config).is_found())
            .collect();
        found.windows(2).all(|w| w[0] == w[1])
    }

    fn prop_heuristic_results_are_valid(instance: Instance) -> bool {
        let config = quick_config(Duration::from_millis(10));
        HEURISTIC.into_iter().all(|kind| {
            let outcome = run(kind, &instance.query, &instance.target, &config);
            valid_if_found(kind, &instance, &outcome)
        })
    }

    fn prop_heuristic_hits_are_confirmed_by_exact_search(instance: Instance) -> bool {
        let short = quick_config(Duration::from_millis(10));
        let long = quick_config(Duration::from_secs(5));
        let exact = run(SolverKind::BranchAndBound, &instance.query, &instance.target, &long);
        HEURISTIC.into_iter().all(|kind| {
            !run(kind, &instance.query, &instance.target, &short).is_found() || exact.is_found()
        })
    }

    fn prop_isolated_node_keeps_embedding(instance: Instance) -> bool {
        let config = quick_config(Duration::from_secs(5));
        let before = run(SolverKind::Ullmann, &instance.query, &instance.target, &config);

        let labels = instance
            .target
            .labels()
            .iter()
            .cloned()
            .chain(std::iter::once("isolated".to_owned()));
        let grown = Graph::from_edges(labels, &edge_list(&instance.target)).unwrap();
        let after = run(SolverKind::Ullmann, &instance.query, &grown, &config);

        !before.is_found() || after.is_found()
    }
}
