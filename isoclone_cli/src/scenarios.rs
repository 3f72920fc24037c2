//! Built-in demonstration instances, run when no targets are given.

use isoclone_subgraph::Graph;

/// One query matched against a list of named targets.
pub struct Run {
    pub title: String,
    pub query: Graph,
    pub targets: Vec<(String, Graph)>,
}

/// Straight-line fragment of `n` statements.
pub fn chain(n: usize) -> Graph {
    Graph::sequential((0..n).map(|i| format!("stmt{i}")))
}

/// The query used when none is given on the command line.
pub fn default_query() -> Graph {
    chain(4)
}

/// Chain-in-chain, oversized query, and identical chains.
pub fn builtin() -> Vec<Run> {
    vec![
        Run {
            title: "A: 3-chain in 5-chain".to_owned(),
            query: chain(3),
            targets: vec![("A/chain-5".to_owned(), chain(5))],
        },
        Run {
            title: "B: 5-node query, 3-node target".to_owned(),
            query: chain(5),
            targets: vec![("B/chain-3".to_owned(), chain(3))],
        },
        Run {
            title: "C: identical 4-chains".to_owned(),
            query: chain(4),
            targets: vec![("C/chain-4".to_owned(), chain(4))],
        },
    ]
}
