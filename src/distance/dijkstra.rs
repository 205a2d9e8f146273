//! Single-source shortest paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::models::Graph;

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: usize,
}

impl Eq for State {}

// Min-heap by cost, then by node index.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Dijkstra from `source` over the graph's adjacency lists.
///
/// Returns the distance to every node (`f64::INFINITY` when unreachable) and
/// the predecessor of every node on its shortest path. Edge weights must be
/// non-negative; the oracle validates this before calling.
pub(crate) fn shortest_paths(graph: &Graph, source: usize) -> (Vec<f64>, Vec<Option<usize>>) {
    let n = graph.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    heap.push(State {
        cost: 0.0,
        node: source,
    });

    while let Some(State { cost, node }) = heap.pop() {
        if cost > dist[node] {
            continue;
        }
        for &(next, w) in graph.neighbors(node) {
            let next_cost = cost + w;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                pred[next] = Some(node);
                heap.push(State {
                    cost: next_cost,
                    node: next,
                });
            }
        }
    }
    (dist, pred)
}
