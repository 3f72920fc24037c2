//! Immutable labeled directed graphs.
//!
//! A [`Graph`] is an ordered list of opaque node labels plus a square boolean
//! adjacency matrix. The shape invariant is checked once, at construction, so
//! solvers never see malformed input.

use contracts::*;
use thiserror::Error;

/// Errors raised while building a [`Graph`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The adjacency matrix does not have one row per label.
    #[error("adjacency has {rows} rows but {labels} labels were given")]
    LabelMismatch {
        /// Number of labels supplied.
        labels: usize,
        /// Number of adjacency rows supplied.
        rows: usize,
    },
    /// An adjacency row has the wrong length.
    #[error("adjacency row {row} has {len} columns, expected {expected}")]
    NonSquare {
        /// Offending row index.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Required length (the node count).
        expected: usize,
    },
    /// An edge refers to a node that does not exist.
    #[error("edge ({from}, {to}) is out of range for {nodes} nodes")]
    EdgeOutOfRange {
        /// Source index.
        from: usize,
        /// Destination index.
        to: usize,
        /// Number of nodes in the graph.
        nodes: usize,
    },
}

/// An immutable labeled directed graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    labels: Vec<String>,
    /// Row-major `n * n` adjacency.
    adjacency: Vec<bool>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds a graph from labels and a dense adjacency matrix.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::LabelMismatch`] or [`GraphError::NonSquare`] if
    /// `adjacency` is not `labels.len()` by `labels.len()`.
    pub fn new(labels: Vec<String>, adjacency: Vec<Vec<bool>>) -> Result<Self, GraphError> {
        let n = labels.len();
        if adjacency.len() != n {
            return Err(GraphError::LabelMismatch {
                labels: n,
                rows: adjacency.len(),
            });
        }
        if let Some((row, r)) = adjacency.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(GraphError::NonSquare {
                row,
                len: r.len(),
                expected: n,
            });
        }

        let flat: Vec<bool> = adjacency.into_iter().flatten().collect();
        Ok(Self::from_flat(labels, flat))
    }

    /// Builds a graph from labels and an edge list. Duplicate edges collapse.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EdgeOutOfRange`] if an endpoint is not a node.
    pub fn from_edges<L, I>(labels: I, edges: &[(usize, usize)]) -> Result<Self, GraphError>
    where
        L: Into<String>,
        I: IntoIterator<Item = L>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        let mut flat = vec![false; n * n];
        for &(from, to) in edges {
            if from >= n || to >= n {
                return Err(GraphError::EdgeOutOfRange { from, to, nodes: n });
            }
            flat[from * n + to] = true;
        }
        Ok(Self::from_flat(labels, flat))
    }

    /// Builds the sequential chain `0 -> 1 -> ... -> n-1` over the given labels.
    ///
    /// This is the shape produced for a straight-line code fragment, one node
    /// per normalized statement.
    pub fn sequential<L, I>(labels: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = L>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        let mut flat = vec![false; n * n];
        for i in 1..n {
            flat[(i - 1) * n + i] = true;
        }
        Self::from_flat(labels, flat)
    }

    fn from_flat(labels: Vec<String>, adjacency: Vec<bool>) -> Self {
        let n = labels.len();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        for from in 0..n {
            for to in 0..n {
                if adjacency[from * n + to] {
                    successors[from].push(to);
                    predecessors[to].push(from);
                }
            }
        }
        Self {
            labels,
            adjacency,
            successors,
            predecessors,
        }
    }

    /// Number of nodes.
    #[must_use]
    pub const fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the graph has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of directed edges, self-loops included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// All labels in node order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Label of node `i`.
    #[must_use]
    pub fn label(&self, i: usize) -> Option<&str> {
        self.labels.get(i).map(String::as_str)
    }

    /// Returns true if the edge `from -> to` exists.
    #[debug_requires(from < self.node_count() && to < self.node_count())]
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.adjacency[from * self.node_count() + to]
    }

    /// Adjacency row of `from`, one entry per node.
    #[debug_requires(from < self.node_count())]
    #[must_use]
    pub fn row(&self, from: usize) -> &[bool] {
        let n = self.node_count();
        &self.adjacency[from * n..(from + 1) * n]
    }

    /// Nodes reachable by one edge from `i`.
    #[must_use]
    pub fn successors(&self, i: usize) -> &[usize] {
        self.successors.get(i).map_or(&[], Vec::as_slice)
    }

    /// Nodes with an edge into `i`.
    #[must_use]
    pub fn predecessors(&self, i: usize) -> &[usize] {
        self.predecessors.get(i).map_or(&[], Vec::as_slice)
    }

    /// Out-degree of `i`.
    #[must_use]
    pub fn out_degree(&self, i: usize) -> usize {
        self.successors(i).len()
    }

    /// In-degree of `i`.
    #[must_use]
    pub fn in_degree(&self, i: usize) -> usize {
        self.predecessors(i).len()
    }

    /// Total degree `out_degree(i) + in_degree(i)`.
    ///
    /// Used only as a pruning bound: a query node can never map to a target
    /// node of smaller total degree.
    #[must_use]
    pub fn degree(&self, i: usize) -> usize {
        self.out_degree(i) + self.in_degree(i)
    }

    /// Total degree of every node, in node order.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        (0..self.node_count()).map(|i| self.degree(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_row_count_mismatch() {
        let err = Graph::new(vec!["a".into(), "b".into()], vec![vec![false, false]]).unwrap_err();
        assert_eq!(err, GraphError::LabelMismatch { labels: 2, rows: 1 });
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Graph::new(
            vec!["a".into(), "b".into()],
            vec![vec![false, true], vec![false]],
        )
        .unwrap_err();
        assert_eq!(
            err,
            GraphError::NonSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn rejects_out_of_range_edges() {
        let err = Graph::from_edges(["a", "b"], &[(0, 2)]).unwrap_err();
        assert_eq!(
            err,
            GraphError::EdgeOutOfRange {
                from: 0,
                to: 2,
                nodes: 2
            }
        );
    }

    #[test]
    fn degrees_count_both_directions() {
        let g = Graph::from_edges(["a", "b", "c"], &[(0, 1), (1, 2), (2, 1), (1, 1)]).unwrap();
        assert_eq!(g.out_degree(1), 2);
        assert_eq!(g.in_degree(1), 3);
        assert_eq!(g.degree(1), 5);
        assert_eq!(g.degrees(), vec![1, 5, 2]);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.successors(1), &[1, 2]);
        assert_eq!(g.predecessors(1), &[0, 1, 2]);
    }

    #[test]
    fn sequential_is_a_chain() {
        let g = Graph::sequential(["x = NUM;", "call(x);", "return x;"]);
        assert_eq!(g.node_count(), 3);
        assert!(g.has_edge(0, 1));
        assert!(g.has_edge(1, 2));
        assert!(!g.has_edge(0, 2));
        assert!(!g.has_edge(1, 0));
        assert_eq!(g.label(1), Some("call(x);"));
        assert_eq!(g.row(0), &[false, true, false]);
    }

    #[test]
    fn dense_and_edge_list_agree() {
        let dense = Graph::new(
            vec!["a".into(), "b".into()],
            vec![vec![false, true], vec![true, false]],
        )
        .unwrap();
        let sparse = Graph::from_edges(["a", "b"], &[(0, 1), (1, 0), (0, 1)]).unwrap();
        assert_eq!(dense, sparse);
    }
}
