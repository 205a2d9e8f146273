//! Weighted geographic graph.

use std::hash::Hasher;

use fnv::{FnvHashMap, FnvHasher};

use super::{Edge, Node};
use crate::error::{Error, Result};

/// Collects nodes and links, then validates them into an immutable [`Graph`].
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node};
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(2, 45.0, 7.0).unwrap())
///     .node(Node::new(1, 45.0, 8.0).unwrap())
///     .edge(1, 2, Some(10.0))
///     .build()
///     .unwrap();
/// assert_eq!(graph.len(), 2);
/// // Nodes are ordered by id: index 0 is node 1.
/// assert_eq!(graph.node(0).id(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    directed: bool,
    nodes: Vec<Node>,
    edges: Vec<(usize, usize, Option<f64>)>,
}

impl GraphBuilder {
    /// Starts an undirected graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a directed graph.
    pub fn directed() -> Self {
        Self {
            directed: true,
            ..Self::default()
        }
    }

    /// Adds a node.
    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds a link between two node ids. A `None` weight is replaced by the
    /// great-circle distance between the endpoints.
    pub fn edge(mut self, from: usize, to: usize, weight: Option<f64>) -> Self {
        self.edges.push((from, to, weight));
        self
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, from: usize, to: usize, weight: Option<f64>) {
        self.edges.push((from, to, weight));
    }

    /// Validates ids and endpoints and builds the graph.
    ///
    /// Explicit weights are stored as given; negative weights are rejected
    /// later by the distance oracle.
    pub fn build(self) -> Result<Graph> {
        let mut nodes = self.nodes;
        nodes.sort_by_key(|n| n.id());
        let mut index = FnvHashMap::default();
        for (idx, node) in nodes.iter().enumerate() {
            if index.insert(node.id(), idx).is_some() {
                return Err(Error::DuplicateNode(node.id()));
            }
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut edges = Vec::with_capacity(self.edges.len());
        for (from, to, weight) in self.edges {
            let &u = index.get(&from).ok_or(Error::UnknownNode(from))?;
            let &v = index.get(&to).ok_or(Error::UnknownNode(to))?;
            let weight = weight.unwrap_or_else(|| nodes[u].distance_to(&nodes[v]));
            adjacency[u].push((v, weight));
            if !self.directed && u != v {
                adjacency[v].push((u, weight));
            }
            edges.push(Edge { from, to, weight });
        }

        let fingerprint = fingerprint(self.directed, &nodes, &edges);
        Ok(Graph {
            directed: self.directed,
            nodes,
            index,
            edges,
            adjacency,
            fingerprint,
        })
    }
}

fn fingerprint(directed: bool, nodes: &[Node], edges: &[Edge]) -> u64 {
    let mut h = FnvHasher::default();
    h.write_u8(directed as u8);
    h.write_u64(nodes.len() as u64);
    for n in nodes {
        h.write_u64(n.id() as u64);
        h.write_u64(n.latitude().to_bits());
        h.write_u64(n.longitude().to_bits());
    }
    h.write_u64(edges.len() as u64);
    for e in edges {
        h.write_u64(e.from as u64);
        h.write_u64(e.to as u64);
        h.write_u64(e.weight.to_bits());
    }
    h.finish()
}

/// An immutable weighted graph whose nodes are ordered by id.
///
/// Solvers address nodes by their index in this order, so "lowest index"
/// and "lowest node id" coincide.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    nodes: Vec<Node>,
    index: FnvHashMap<usize, usize>,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<(usize, f64)>>,
    fingerprint: u64,
}

impl Graph {
    /// Whether links are one-way.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node at the given index.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn node(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    /// Node ids in ascending order.
    pub fn node_ids(&self) -> Vec<usize> {
        self.nodes.iter().map(|n| n.id()).collect()
    }

    /// Index of the node with the given id.
    pub fn index_of(&self, id: usize) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Links as added, with resolved weights.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Outgoing `(neighbor index, weight)` pairs of the node at `idx`.
    pub fn neighbors(&self, idx: usize) -> &[(usize, f64)] {
        &self.adjacency[idx]
    }

    /// Stable identity of this graph's topology, coordinates and weights.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: usize, lat: f64, lon: f64) -> Node {
        Node::new(id, lat, lon).expect("valid")
    }

    #[test]
    fn test_nodes_sorted_by_id() {
        let g = GraphBuilder::new()
            .node(node(30, 0.0, 0.0))
            .node(node(10, 0.0, 1.0))
            .node(node(20, 0.0, 2.0))
            .build()
            .expect("valid");
        assert_eq!(g.node_ids(), vec![10, 20, 30]);
        assert_eq!(g.index_of(20), Some(1));
        assert_eq!(g.index_of(99), None);
    }

    #[test]
    fn test_undirected_adjacency() {
        let g = GraphBuilder::new()
            .node(node(0, 0.0, 0.0))
            .node(node(1, 0.0, 1.0))
            .edge(0, 1, Some(5.0))
            .build()
            .expect("valid");
        assert_eq!(g.neighbors(0), &[(1, 5.0)]);
        assert_eq!(g.neighbors(1), &[(0, 5.0)]);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_directed_adjacency() {
        let g = GraphBuilder::directed()
            .node(node(0, 0.0, 0.0))
            .node(node(1, 0.0, 1.0))
            .edge(0, 1, Some(5.0))
            .build()
            .expect("valid");
        assert!(g.is_directed());
        assert_eq!(g.neighbors(0).len(), 1);
        assert!(g.neighbors(1).is_empty());
    }

    #[test]
    fn test_missing_weight_uses_haversine() {
        let a = node(0, 0.0, 0.0);
        let b = node(1, 1.0, 0.0);
        let expected = a.distance_to(&b);
        let g = GraphBuilder::new()
            .node(a)
            .node(b)
            .edge(0, 1, None)
            .build()
            .expect("valid");
        assert!((g.edges()[0].weight - expected).abs() < 1e-10);
    }

    #[test]
    fn test_duplicate_node() {
        let r = GraphBuilder::new()
            .node(node(1, 0.0, 0.0))
            .node(node(1, 1.0, 0.0))
            .build();
        assert!(matches!(r, Err(Error::DuplicateNode(1))));
    }

    #[test]
    fn test_unknown_endpoint() {
        let r = GraphBuilder::new()
            .node(node(1, 0.0, 0.0))
            .edge(1, 2, Some(1.0))
            .build();
        assert!(matches!(r, Err(Error::UnknownNode(2))));
    }

    #[test]
    fn test_fingerprint_stable_and_sensitive() {
        let build = |w: f64| {
            GraphBuilder::new()
                .node(node(0, 0.0, 0.0))
                .node(node(1, 0.0, 1.0))
                .edge(0, 1, Some(w))
                .build()
                .expect("valid")
        };
        assert_eq!(build(1.0).fingerprint(), build(1.0).fingerprint());
        assert_ne!(build(1.0).fingerprint(), build(2.0).fingerprint());
    }
}
