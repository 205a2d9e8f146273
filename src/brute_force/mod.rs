//! Exhaustive facility placement.
//!
//! # Algorithm
//!
//! Enumerates every set of exactly N' = min(N, |V|) nodes in lexicographic
//! order of node id, evaluates it, and keeps the first set that strictly
//! improves on the best value so far. The earliest-enumerated optimum wins
//! ties, which keeps results reproducible. When every set leaves some node
//! unreachable, the first enumerated set is reported with its `+inf` value.
//!
//! # Complexity
//!
//! C(|V|, N') evaluations of O(|V|·N') each. Only practical for small graphs.
//!
//! In parallel mode the rank range is split into shards that are unranked
//! independently; each shard keeps its own best and a final reduction on
//! `(value, rank)` returns exactly what the sequential scan would.

mod combinations;

pub use combinations::{binomial, next_combination, unrank};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::evaluation::ObjectiveEvaluator;
use crate::models::{Placement, PlacementProblem};
use crate::strategy::PlacementSolver;

const STRATEGY: &str = "brute_force";

/// Candidates per shard in parallel mode.
const SHARD_SIZE: u64 = 4096;

#[derive(Debug, Clone)]
struct Candidate {
    value: f64,
    rank: u64,
    facilities: Vec<usize>,
}

/// Exhaustive search over all facility sets of the budgeted size.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::brute_force::BruteForce;
/// use u_facility::strategy::PlacementSolver;
///
/// let mut builder = GraphBuilder::new();
/// for id in 0..5 {
///     builder.add_node(Node::new(id, 45.0, 7.0 + id as f64).unwrap());
/// }
/// for id in 0..4 {
///     builder.add_edge(id, id + 1, Some(1.0));
/// }
/// let graph = builder.build().unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// let problem = PlacementProblem::new(&graph, &oracle, 1, Objective::Max).unwrap();
///
/// let placement = BruteForce::new().solve(&problem).unwrap();
/// assert_eq!(placement.facilities(), &[2]);
/// assert_eq!(placement.value(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BruteForce {
    #[serde(default = "default_parallel")]
    parallel: bool,
}

fn default_parallel() -> bool {
    true
}

impl Default for BruteForce {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl BruteForce {
    /// Parallel exhaustive search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-threaded exhaustive search.
    pub fn sequential() -> Self {
        Self { parallel: false }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl PlacementSolver for BruteForce {
    fn name(&self) -> &str {
        STRATEGY
    }

    fn solve(&self, problem: &PlacementProblem<'_>) -> Result<Placement> {
        let n = problem.num_nodes();
        let k = problem.effective_budget();
        let total = binomial(n, k).ok_or_else(|| {
            Error::invalid_parameter(format!("C({n}, {k}) candidate sets exceed u64"))
        })?;
        info!(nodes = n, facilities = k, candidates = total, parallel = self.parallel, "brute force start");

        let evaluator = problem.evaluator();
        let best = if self.parallel {
            scan_parallel(&evaluator, n, k, total)
        } else {
            scan_range(&evaluator, n, k, 0, total)
        };

        let placement = match best {
            Some(c) => {
                debug!(rank = c.rank, value = c.value, "brute force best");
                problem.placement_at(&c.facilities, STRATEGY)
            }
            None => {
                // Nothing finite: report the first enumerated set.
                let first: Vec<usize> = (0..k).collect();
                problem.placement_at(&first, STRATEGY)
            }
        };
        info!(value = placement.value(), "brute force done");
        Ok(placement)
    }
}

/// Scans ranks `start..end`, keeping the first strictly better candidate.
fn scan_range(
    evaluator: &ObjectiveEvaluator<'_>,
    n: usize,
    k: usize,
    start: u64,
    end: u64,
) -> Option<Candidate> {
    if start >= end {
        return None;
    }
    let mut combo = unrank(start, n, k);
    let mut best: Option<Candidate> = None;
    let mut best_value = f64::INFINITY;
    let mut rank = start;
    loop {
        let value = evaluator.value_at(&combo);
        if value < best_value {
            best_value = value;
            best = Some(Candidate {
                value,
                rank,
                facilities: combo.clone(),
            });
        }
        rank += 1;
        if rank >= end || !next_combination(&mut combo, n) {
            break;
        }
    }
    best
}

fn scan_parallel(
    evaluator: &ObjectiveEvaluator<'_>,
    n: usize,
    k: usize,
    total: u64,
) -> Option<Candidate> {
    let shards = total.div_ceil(SHARD_SIZE);
    (0..shards)
        .into_par_iter()
        .filter_map(|s| {
            let start = s * SHARD_SIZE;
            let end = (start + SHARD_SIZE).min(total);
            scan_range(evaluator, n, k, start, end)
        })
        .min_by(|a, b| a.value.total_cmp(&b.value).then(a.rank.cmp(&b.rank)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceOracle;
    use crate::models::{Graph, GraphBuilder, Node, Objective};

    fn graph(n: usize, edges: &[(usize, usize, f64)]) -> Graph {
        let mut b = GraphBuilder::new();
        for id in 0..n {
            b.add_node(Node::new(id, 45.0, 7.0 + id as f64 * 0.1).expect("valid"));
        }
        for &(u, v, w) in edges {
            b.add_edge(u, v, Some(w));
        }
        b.build().expect("valid")
    }

    fn complete(n: usize, w: f64) -> Graph {
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                edges.push((u, v, w));
            }
        }
        graph(n, &edges)
    }

    #[test]
    fn test_minimal_network() {
        let g = graph(2, &[(0, 1, 10.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 1, Objective::Average).expect("valid");
        let p = BruteForce::sequential().solve(&problem).expect("solves");
        // Both nodes tie at 5.0; the first enumerated wins.
        assert_eq!(p.facilities(), &[0]);
        assert!((p.value() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_fully_connected_network() {
        let g = complete(5, 10.0);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 2, Objective::Max).expect("valid");
        let p = BruteForce::sequential().solve(&problem).expect("solves");
        assert_eq!(p.facilities(), &[0, 1]);
        assert_eq!(p.value(), 10.0);
    }

    #[test]
    fn test_sparse_network_infeasible() {
        let g = graph(4, &[(0, 1, 10.0), (2, 3, 10.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 1, Objective::Average).expect("valid");
        let p = BruteForce::new().solve(&problem).expect("solves");
        assert!(!p.is_feasible());
        assert!(p.value().is_infinite());
        assert_eq!(p.facilities(), &[0]);
        assert_eq!(p.unserved(), &[2, 3]);
        assert_eq!(p.assignment().len(), 1);
        assert_eq!(p.assignment()[0].node, 1);

        let problem = PlacementProblem::new(&g, &oracle, 2, Objective::Average).expect("valid");
        let p = BruteForce::new().solve(&problem).expect("solves");
        assert_eq!(p.facilities(), &[0, 2]);
        assert!((p.value() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_budget_larger_than_graph() {
        let g = graph(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 10, Objective::Max).expect("valid");
        let p = BruteForce::new().solve(&problem).expect("solves");
        assert_eq!(p.facilities(), &[0, 1, 2]);
        assert_eq!(p.value(), 0.0);
        assert!(p.assignment().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        // Ring of 14 nodes gives C(14, 3) = 364 candidates with many ties.
        let n = 14;
        let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n, 1.0 + (i % 3) as f64)).collect();
        let g = graph(n, &edges);
        let oracle = DistanceOracle::build(&g).expect("valid");
        for objective in [Objective::Max, Objective::Average] {
            let problem = PlacementProblem::new(&g, &oracle, 3, objective).expect("valid");
            let a = BruteForce::sequential().solve(&problem).expect("solves");
            let b = BruteForce::new().solve(&problem).expect("solves");
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_parallel_shard_boundaries() {
        let edges: Vec<_> = (0..29).map(|i| (i, i + 1, 1.0)).collect();
        let g = graph(30, &edges);
        let oracle = DistanceOracle::build(&g).expect("valid");
        // C(30, 4) = 27405 candidates, several shards.
        let problem = PlacementProblem::new(&g, &oracle, 4, Objective::Max).expect("valid");
        let a = BruteForce::sequential().solve(&problem).expect("solves");
        let b = BruteForce::new().solve(&problem).expect("solves");
        assert_eq!(a.facilities(), b.facilities());
        assert_eq!(a.value(), b.value());
    }

    #[test]
    fn test_overflow_rejected() {
        let g = graph(200, &[]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 100, Objective::Max).expect("valid");
        assert!(matches!(
            BruteForce::new().solve(&problem),
            Err(Error::InvalidParameter(_))
        ));
    }
}
