//! Structural summary of a graph, used to sanity-check datasets before
//! solving.
//!
//! Hop-count statistics (diameter, mean path length, betweenness,
//! closeness) follow edge direction and ignore weights. Clustering is
//! measured on the undirected skeleton. Self-loops and parallel edges
//! count once or not at all: they never shorten a hop path and never close
//! a triangle.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceOracle;
use crate::error::Result;
use crate::models::Graph;

/// Per-node structural measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCentrality {
    pub id: usize,
    pub degree: usize,
    /// Local clustering coefficient.
    pub clustering: f64,
    /// Shortest-path betweenness, normalized by (n-1)(n-2).
    pub betweenness: f64,
    /// Closeness over incoming hop distances, scaled by the reachable
    /// fraction (Wasserman and Faust).
    pub closeness: f64,
}

/// Degree, connectivity, distance and centrality statistics of a graph.
///
/// Degrees count edge endpoints, so a self-loop adds two and directed
/// edges count toward both ends. Components are weakly connected. The
/// distance statistics are only defined when every node reaches every
/// other node.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::analysis::GraphSummary;
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(0, 45.0, 7.0).unwrap())
///     .node(Node::new(1, 45.0, 7.1).unwrap())
///     .node(Node::new(2, 45.0, 7.2).unwrap())
///     .edge(0, 1, Some(1.0))
///     .edge(1, 2, Some(2.0))
///     .build()
///     .unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
///
/// let summary = GraphSummary::compute(&graph, &oracle).unwrap();
/// assert_eq!(summary.max_degree, 2);
/// assert_eq!(summary.components, 1);
/// assert_eq!(summary.diameter, Some(2));
/// assert_eq!(summary.weighted_diameter, Some(3.0));
/// assert_eq!(summary.top_betweenness(1), vec![(1, 1.0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    pub mean_degree: f64,
    /// Degrees sorted in descending order.
    pub degree_sequence: Vec<usize>,
    pub components: usize,
    /// Component sizes in descending order.
    pub component_sizes: Vec<usize>,
    /// Longest shortest path, in hops.
    pub diameter: Option<usize>,
    /// Mean hop count over ordered pairs of distinct nodes.
    pub average_shortest_path: Option<f64>,
    /// Longest shortest-path distance by edge weight.
    pub weighted_diameter: Option<f64>,
    /// Mean weighted shortest-path distance over ordered pairs.
    pub weighted_average_shortest_path: Option<f64>,
    /// Mean local clustering coefficient, nodes of degree < 2 counting 0.
    pub average_clustering: f64,
    /// One entry per node in id order.
    pub centrality: Vec<NodeCentrality>,
}

impl GraphSummary {
    /// Summarizes `graph` using distances from its `oracle`.
    pub fn compute(graph: &Graph, oracle: &DistanceOracle) -> Result<Self> {
        oracle.check_graph(graph)?;
        let n = graph.len();

        let mut degrees = vec![0usize; n];
        let mut components = DisjointSet::new(n);
        for edge in graph.edges() {
            // Ids were validated when the graph was built.
            let (Some(u), Some(v)) = (graph.index_of(edge.from), graph.index_of(edge.to)) else {
                continue;
            };
            degrees[u] += 1;
            degrees[v] += 1;
            components.union(u, v);
        }

        let mut sizes = vec![0usize; n];
        for i in 0..n {
            sizes[components.find(i)] += 1;
        }
        let mut component_sizes: Vec<usize> = sizes.into_iter().filter(|&s| s > 0).collect();
        component_sizes.sort_unstable_by(|a, b| b.cmp(a));

        let mut degree_sequence = degrees.clone();
        degree_sequence.sort_unstable_by(|a, b| b.cmp(a));
        let mean_degree = if n == 0 {
            0.0
        } else {
            degrees.iter().sum::<usize>() as f64 / n as f64
        };

        let hops = HopGraph::new(graph);
        let paths = hops.shortest_paths();
        let closeness = hops.closeness();
        let clustering = hops.clustering();
        let average_clustering = if n == 0 {
            0.0
        } else {
            clustering.iter().sum::<f64>() / n as f64
        };
        let (weighted_diameter, weighted_average_shortest_path) = distance_stats(oracle).unzip();
        let (diameter, average_shortest_path) = paths.hop_stats.unzip();

        let centrality = (0..n)
            .map(|i| NodeCentrality {
                id: graph.node(i).id(),
                degree: degrees[i],
                clustering: clustering[i],
                betweenness: paths.betweenness[i],
                closeness: closeness[i],
            })
            .collect();

        Ok(Self {
            nodes: n,
            edges: graph.edge_count(),
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree,
            degree_sequence,
            components: component_sizes.len(),
            component_sizes,
            diameter,
            average_shortest_path,
            weighted_diameter,
            weighted_average_shortest_path,
            average_clustering,
            centrality,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.components == 1
    }

    /// The `k` most central nodes by betweenness as `(id, score)`, highest
    /// first, ties by ascending id.
    pub fn top_betweenness(&self, k: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> =
            self.centrality.iter().map(|c| (c.id, c.betweenness)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(k);
        ranked
    }
}

/// `(diameter, mean)` over ordered pairs, `None` if some pair is unreachable.
fn distance_stats(oracle: &DistanceOracle) -> Option<(f64, f64)> {
    let n = oracle.len();
    if n == 0 {
        return None;
    }
    let mut diameter: f64 = 0.0;
    let mut total = 0.0;
    for s in 0..n {
        for t in 0..n {
            if s == t {
                continue;
            }
            let d = oracle.distance_at(s, t);
            if !d.is_finite() {
                return None;
            }
            diameter = diameter.max(d);
            total += d;
        }
    }
    let pairs = n * (n - 1);
    let mean = if pairs == 0 { 0.0 } else { total / pairs as f64 };
    Some((diameter, mean))
}

/// Unweighted simple view of a graph: out-, in- and undirected neighbor
/// lists without self-loops or repeats.
struct HopGraph {
    out: Vec<Vec<usize>>,
    inc: Vec<Vec<usize>>,
    undirected: Vec<Vec<usize>>,
}

/// Everything one breadth-first sweep per source yields.
struct PathStats {
    betweenness: Vec<f64>,
    /// `(diameter, mean)` in hops, `None` if some pair is unreachable.
    hop_stats: Option<(usize, f64)>,
}

const UNSEEN: usize = usize::MAX;

impl HopGraph {
    fn new(graph: &Graph) -> Self {
        let n = graph.len();
        let mut out = vec![Vec::new(); n];
        let mut inc = vec![Vec::new(); n];
        let mut undirected = vec![Vec::new(); n];
        for u in 0..n {
            for &(v, _) in graph.neighbors(u) {
                if u != v {
                    out[u].push(v);
                    inc[v].push(u);
                    undirected[u].push(v);
                    undirected[v].push(u);
                }
            }
        }
        for list in out.iter_mut().chain(inc.iter_mut()).chain(undirected.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }
        Self { out, inc, undirected }
    }

    fn len(&self) -> usize {
        self.out.len()
    }

    /// Brandes betweenness plus hop diameter and mean path length.
    fn shortest_paths(&self) -> PathStats {
        let n = self.len();
        let mut betweenness = vec![0.0; n];
        let mut connected = n > 0;
        let mut diameter = 0usize;
        let mut total = 0usize;

        let mut dist = vec![UNSEEN; n];
        let mut sigma = vec![0.0f64; n];
        let mut delta = vec![0.0f64; n];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::with_capacity(n);

        for s in 0..n {
            dist.fill(UNSEEN);
            sigma.fill(0.0);
            delta.fill(0.0);
            preds.iter_mut().for_each(Vec::clear);
            order.clear();

            dist[s] = 0;
            sigma[s] = 1.0;
            queue.push_back(s);
            while let Some(v) = queue.pop_front() {
                order.push(v);
                for &w in &self.out[v] {
                    if dist[w] == UNSEEN {
                        dist[w] = dist[v] + 1;
                        queue.push_back(w);
                    }
                    if dist[w] == dist[v] + 1 {
                        sigma[w] += sigma[v];
                        preds[w].push(v);
                    }
                }
            }

            if order.len() < n {
                connected = false;
            }
            for &t in &order {
                diameter = diameter.max(dist[t]);
                total += dist[t];
            }

            while let Some(w) = order.pop() {
                for &v in &preds[w] {
                    delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
                }
                if w != s {
                    betweenness[w] += delta[w];
                }
            }
        }

        if n > 2 {
            let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
            betweenness.iter_mut().for_each(|b| *b *= scale);
        }

        let hop_stats = connected.then(|| {
            let pairs = n * (n - 1);
            let mean = if pairs == 0 { 0.0 } else { total as f64 / pairs as f64 };
            (diameter, mean)
        });
        PathStats {
            betweenness,
            hop_stats,
        }
    }

    /// Closeness from incoming hop distances.
    fn closeness(&self) -> Vec<f64> {
        let n = self.len();
        let mut dist = vec![UNSEEN; n];
        let mut queue = VecDeque::with_capacity(n);
        (0..n)
            .map(|t| {
                dist.fill(UNSEEN);
                dist[t] = 0;
                queue.push_back(t);
                let (mut reached, mut total) = (0usize, 0usize);
                while let Some(v) = queue.pop_front() {
                    reached += 1;
                    total += dist[v];
                    for &u in &self.inc[v] {
                        if dist[u] == UNSEEN {
                            dist[u] = dist[v] + 1;
                            queue.push_back(u);
                        }
                    }
                }
                if total == 0 || n < 2 {
                    return 0.0;
                }
                let others = (reached - 1) as f64;
                others / total as f64 * (others / (n - 1) as f64)
            })
            .collect()
    }

    /// Local clustering on the undirected skeleton.
    fn clustering(&self) -> Vec<f64> {
        let n = self.len();
        let mut mark = vec![false; n];
        (0..n)
            .map(|v| {
                let nbrs = &self.undirected[v];
                let k = nbrs.len();
                if k < 2 {
                    return 0.0;
                }
                nbrs.iter().for_each(|&u| mark[u] = true);
                // Each triangle through v is seen from both of its other ends.
                let links: usize = nbrs
                    .iter()
                    .map(|&u| self.undirected[u].iter().filter(|&&w| mark[w]).count())
                    .sum();
                nbrs.iter().for_each(|&u| mark[u] = false);
                links as f64 / (k * (k - 1)) as f64
            })
            .collect()
    }
}

/// Union-find with path halving and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut a, mut b) = (self.find(a), self.find(b));
        if a == b {
            return;
        }
        if self.size[a] < self.size[b] {
            std::mem::swap(&mut a, &mut b);
        }
        self.parent[b] = a;
        self.size[a] += self.size[b];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GraphBuilder;
    use crate::models::Node;

    fn builder(n: usize, directed: bool) -> GraphBuilder {
        let mut b = if directed {
            GraphBuilder::directed()
        } else {
            GraphBuilder::new()
        };
        for id in 0..n {
            b.add_node(Node::new(id, 45.0, 7.0 + id as f64 * 0.1).expect("valid"));
        }
        b
    }

    #[test]
    fn test_path_summary() {
        let mut b = builder(4, false);
        for i in 1..4 {
            b.add_edge(i - 1, i, Some(1.0));
        }
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.nodes, 4);
        assert_eq!(s.edges, 3);
        assert_eq!(s.degree_sequence, vec![2, 2, 1, 1]);
        assert_eq!(s.min_degree, 1);
        assert!((s.mean_degree - 1.5).abs() < 1e-10);
        assert!(s.is_connected());
        assert_eq!(s.diameter, Some(3));
        assert_eq!(s.weighted_diameter, Some(3.0));
        // Pair distances 1,2,3,1,2,1 each counted twice over 12 ordered pairs.
        let avg = s.average_shortest_path.expect("connected");
        assert!((avg - 20.0 / 12.0).abs() < 1e-10);
        assert_eq!(s.average_clustering, 0.0);
    }

    #[test]
    fn test_components() {
        let mut b = builder(6, false);
        b.add_edge(0, 1, Some(1.0));
        b.add_edge(1, 2, Some(1.0));
        b.add_edge(3, 4, Some(1.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.components, 3);
        assert_eq!(s.component_sizes, vec![3, 2, 1]);
        assert!(s.diameter.is_none());
        assert!(s.average_shortest_path.is_none());
        assert!(s.weighted_diameter.is_none());
        assert_eq!(s.min_degree, 0);
        // Node 1 bridges 0 and 2: 2 ordered pairs over (6-1)(6-2).
        assert!((s.centrality[1].betweenness - 2.0 / 20.0).abs() < 1e-12);
        // Isolated node 5 reaches nobody.
        assert_eq!(s.centrality[5].closeness, 0.0);
    }

    #[test]
    fn test_self_loop_degree() {
        let mut b = builder(2, false);
        b.add_edge(0, 0, Some(1.0));
        b.add_edge(0, 1, Some(1.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.max_degree, 3);
        assert_eq!(s.degree_sequence, vec![3, 1]);
    }

    #[test]
    fn test_directed_weakly_connected() {
        let mut b = builder(3, true);
        b.add_edge(0, 1, Some(1.0));
        b.add_edge(1, 2, Some(1.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.components, 1);
        // 2 cannot reach 0.
        assert!(s.diameter.is_none());
        assert!(s.weighted_diameter.is_none());
        // Only 0 -> 2 passes through 1.
        assert!((s.centrality[1].betweenness - 0.5).abs() < 1e-12);
        // Incoming: 0 is reached by nobody, 2 by both at hops 1 and 2.
        assert_eq!(s.centrality[0].closeness, 0.0);
        assert!((s.centrality[2].closeness - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_node() {
        let g = builder(1, false).build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.diameter, Some(0));
        assert_eq!(s.average_shortest_path, Some(0.0));
        assert_eq!(s.weighted_diameter, Some(0.0));
        assert_eq!(s.centrality[0].betweenness, 0.0);
        assert_eq!(s.centrality[0].closeness, 0.0);
    }

    #[test]
    fn test_path_centrality() {
        let mut b = builder(3, false);
        b.add_edge(0, 1, Some(5.0));
        b.add_edge(1, 2, Some(5.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert!((s.centrality[1].betweenness - 1.0).abs() < 1e-12);
        assert_eq!(s.centrality[0].betweenness, 0.0);
        assert!((s.centrality[1].closeness - 1.0).abs() < 1e-12);
        assert!((s.centrality[0].closeness - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(s.top_betweenness(10), vec![(1, 1.0), (0, 0.0), (2, 0.0)]);
        assert_eq!(s.top_betweenness(1), vec![(1, 1.0)]);
    }

    #[test]
    fn test_hops_ignore_weights() {
        // Direct heavy edge 0-2 vs a light two-hop detour through 1.
        let mut b = builder(3, false);
        b.add_edge(0, 1, Some(1.0));
        b.add_edge(1, 2, Some(1.0));
        b.add_edge(0, 2, Some(10.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.diameter, Some(1));
        assert_eq!(s.average_shortest_path, Some(1.0));
        assert_eq!(s.weighted_diameter, Some(2.0));
        // A triangle: every node fully clustered, nobody in between.
        assert!((s.average_clustering - 1.0).abs() < 1e-12);
        assert!(s.centrality.iter().all(|c| c.betweenness == 0.0));
    }

    #[test]
    fn test_clustering_mixed() {
        // Triangle 0-1-2 with a pendant 3 on node 0; plus a duplicate edge
        // and a self-loop that must not change anything.
        let mut b = builder(4, false);
        b.add_edge(0, 1, Some(1.0));
        b.add_edge(1, 2, Some(1.0));
        b.add_edge(2, 0, Some(1.0));
        b.add_edge(0, 3, Some(1.0));
        b.add_edge(0, 1, Some(2.0));
        b.add_edge(3, 3, Some(1.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert!((s.centrality[0].clustering - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.centrality[1].clustering - 1.0).abs() < 1e-12);
        assert!((s.centrality[2].clustering - 1.0).abs() < 1e-12);
        assert_eq!(s.centrality[3].clustering, 0.0);
        assert!((s.average_clustering - (1.0 / 3.0 + 2.0) / 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_star_clustering() {
        let mut b = builder(5, false);
        for leaf in 1..5 {
            b.add_edge(0, leaf, Some(1.0));
        }
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let s = GraphSummary::compute(&g, &oracle).expect("valid");
        assert_eq!(s.average_clustering, 0.0);
        // Hub sits on all 12 ordered leaf pairs: 12 / (4 * 3).
        assert!((s.centrality[0].betweenness - 1.0).abs() < 1e-12);
        let top: Vec<usize> = s.top_betweenness(2).into_iter().map(|(id, _)| id).collect();
        assert_eq!(top, vec![0, 1]);
        assert_eq!(s.diameter, Some(2));
    }
}
