//! All-pairs shortest-path oracle.

use fnv::FnvHashMap;
use rayon::prelude::*;
use tracing::{info, trace};

use super::dijkstra::shortest_paths;
use super::DistanceMatrix;
use crate::error::{Error, Result};
use crate::models::Graph;

/// Shortest-path distances and paths between every pair of nodes of one graph.
///
/// Built once per graph and read-only afterwards; share it between solvers
/// by reference or through an `Arc`.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node};
/// use u_facility::distance::DistanceOracle;
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(1, 45.0, 7.0).unwrap())
///     .node(Node::new(2, 45.0, 8.0).unwrap())
///     .node(Node::new(3, 45.0, 9.0).unwrap())
///     .edge(1, 2, Some(10.0))
///     .edge(2, 3, Some(5.0))
///     .build()
///     .unwrap();
///
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// assert_eq!(oracle.distance(1, 3), Some(15.0));
/// assert_eq!(oracle.path(3, 1), Some(vec![3, 2, 1]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceOracle {
    node_ids: Vec<usize>,
    index: FnvHashMap<usize, usize>,
    matrix: DistanceMatrix,
    fingerprint: u64,
}

impl DistanceOracle {
    /// Runs Dijkstra from every node of `graph`.
    ///
    /// Fails with [`Error::InvalidWeight`] before any computation if an edge
    /// weight is negative or NaN. Sources are processed in parallel; rows are
    /// assembled in source order, so repeated builds are bit-identical.
    pub fn build(graph: &Graph) -> Result<Self> {
        for e in graph.edges() {
            if e.weight.is_nan() || e.weight < 0.0 {
                return Err(Error::InvalidWeight {
                    from: e.from,
                    to: e.to,
                    weight: e.weight,
                });
            }
        }

        info!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            "building distance oracle"
        );
        let rows: Vec<_> = (0..graph.len())
            .into_par_iter()
            .map(|source| {
                trace!(source, "dijkstra");
                shortest_paths(graph, source)
            })
            .collect();
        let matrix = DistanceMatrix::from_rows(rows)
            .ok_or_else(|| Error::solver("shortest-path rows have inconsistent length"))?;
        info!(nodes = graph.len(), "distance oracle ready");

        Ok(Self::from_matrix(graph, matrix))
    }

    pub(crate) fn from_matrix(graph: &Graph, matrix: DistanceMatrix) -> Self {
        let node_ids = graph.node_ids();
        let index = node_ids
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();
        Self {
            node_ids,
            index,
            matrix,
            fingerprint: graph.fingerprint(),
        }
    }

    /// Shortest-path distance between two node ids.
    ///
    /// `None` if either id is unknown; `Some(f64::INFINITY)` if unreachable.
    pub fn distance(&self, from: usize, to: usize) -> Option<f64> {
        let (i, j) = (self.index_of(from)?, self.index_of(to)?);
        Some(self.matrix.get(i, j))
    }

    /// Shortest path between two node ids as a list of node ids.
    ///
    /// `None` if either id is unknown; empty if `to` is unreachable.
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let (i, j) = (self.index_of(from)?, self.index_of(to)?);
        Some(
            self.matrix
                .path(i, j)
                .into_iter()
                .map(|idx| self.node_ids[idx])
                .collect(),
        )
    }

    /// Distance between two node indices.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance_at(&self, from: usize, to: usize) -> f64 {
        self.matrix.get(from, to)
    }

    /// Index of a node id in this oracle (same order as the graph).
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Node ids in index order.
    pub fn node_ids(&self) -> &[usize] {
        &self.node_ids
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    /// The underlying dense matrix (index-addressed).
    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    /// Fingerprint of the graph this oracle was built for.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Fails with [`Error::OracleMismatch`] unless this oracle belongs to `graph`.
    pub fn check_graph(&self, graph: &Graph) -> Result<()> {
        if self.fingerprint != graph.fingerprint() {
            return Err(Error::OracleMismatch {
                expected: graph.fingerprint(),
                found: self.fingerprint,
            });
        }
        Ok(())
    }
}
