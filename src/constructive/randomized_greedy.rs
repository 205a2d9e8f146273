//! Randomized greedy construction with a restricted candidate list.
//!
//! # Algorithm
//!
//! Facilities are added one at a time. Before each pick every non-facility
//! node is scored by its distance from the nearest facility chosen so far
//! (infinite while none is chosen). Nodes are sorted ascending by score,
//! ties by node id, and the first ⌊α·k⌋ of the k candidates (at least one)
//! form the restricted candidate list. The next facility is drawn uniformly
//! from that list.
//!
//! # Complexity
//!
//! O(N·n log n) for N facilities over n nodes.
//!
//! # Reference
//!
//! Feo, T. A., Resende, M. G. C. (1995). "Greedy Randomized Adaptive Search
//! Procedures", *Journal of Global Optimization* 6, 109-133.

use rand::Rng;

use crate::distance::DistanceOracle;

/// Number of candidates kept in the restricted candidate list.
///
/// # Examples
///
/// ```
/// use u_facility::constructive::rcl_size;
///
/// assert_eq!(rcl_size(0.2, 10), 2);
/// assert_eq!(rcl_size(0.2, 3), 1);
/// assert_eq!(rcl_size(1.0, 7), 7);
/// ```
pub fn rcl_size(alpha: f64, candidates: usize) -> usize {
    let size = (alpha * candidates as f64).floor() as usize;
    size.clamp(1, candidates.max(1))
}

/// Builds `count` facilities as node indices (positions in
/// [`Graph::nodes`](crate::models::Graph::nodes)), in pick order.
///
/// `count` is capped at the number of nodes; `alpha` is expected in (0, 1].
///
/// # Examples
///
/// ```
/// use rand::{rngs::StdRng, SeedableRng};
/// use u_facility::models::{GraphBuilder, Node};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::constructive::randomized_greedy;
///
/// let mut builder = GraphBuilder::new();
/// for id in 0..6 {
///     builder.add_node(Node::new(id, 45.0, 7.0 + id as f64).unwrap());
/// }
/// for id in 0..5 {
///     builder.add_edge(id, id + 1, Some(1.0));
/// }
/// let graph = builder.build().unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let facilities = randomized_greedy(&oracle, 3, 0.5, &mut rng);
/// assert_eq!(facilities.len(), 3);
/// ```
pub fn randomized_greedy<R: Rng>(
    oracle: &DistanceOracle,
    count: usize,
    alpha: f64,
    rng: &mut R,
) -> Vec<usize> {
    let n = oracle.len();
    let count = count.min(n);
    let mut facilities = Vec::with_capacity(count);
    let mut chosen = vec![false; n];
    let mut nearest = vec![f64::INFINITY; n];

    while facilities.len() < count {
        let mut candidates: Vec<usize> = (0..n).filter(|&j| !chosen[j]).collect();
        // Stable: equal scores keep ascending node order.
        candidates.sort_by(|&a, &b| nearest[a].total_cmp(&nearest[b]));

        let size = rcl_size(alpha, candidates.len());
        let pick = candidates[rng.random_range(0..size)];
        chosen[pick] = true;
        facilities.push(pick);

        for (j, d) in nearest.iter_mut().enumerate() {
            *d = d.min(oracle.distance_at(pick, j));
        }
    }

    facilities
}
