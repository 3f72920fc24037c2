//! JSON graph descriptions.
//!
//! ```json
//! { "name": "optional", "labels": ["a", "b"], "edges": [[0, 1]] }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use isoclone_subgraph::{Graph, GraphError};
use serde::Deserialize;
use thiserror::Error;

/// On-disk form of a graph.
#[derive(Debug, Deserialize)]
pub struct GraphFile {
    /// Display name; the file stem is used when absent.
    #[serde(default)]
    pub name: Option<String>,
    /// One label per node, in node order.
    pub labels: Vec<String>,
    /// Directed edges as `[from, to]` index pairs.
    #[serde(default)]
    pub edges: Vec<(usize, usize)>,
}

/// Failure to turn a file into a [`Graph`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid graph in {}: {source}", path.display())]
    Graph { path: PathBuf, source: GraphError },
}

impl GraphFile {
    /// Validates the description and builds the graph.
    pub fn into_graph(self) -> Result<Graph, GraphError> {
        Graph::from_edges(self.labels, &self.edges)
    }
}

/// Reads a graph file, returning its display name and the graph.
pub fn load(path: &Path) -> Result<(String, Graph), LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: GraphFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let name = parsed.name.clone().unwrap_or_else(|| {
        path.file_stem()
            .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
    });
    let graph = parsed.into_graph().map_err(|source| LoadError::Graph {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((name, graph))
}
