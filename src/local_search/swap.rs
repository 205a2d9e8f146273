//! First-improvement swap local search.
//!
//! # Algorithm
//!
//! A move replaces the facility at one position with a node outside the
//! set. Moves are scanned position by position, candidates in ascending
//! node order, and the first one with a negative delta is applied; the
//! scan then restarts from the top. The search stops when a full scan finds
//! no improving move or after `max_moves` applied moves.
//!
//! Deltas come from a per-node table of the nearest and second-nearest
//! facility, so a move costs O(n) instead of a full re-evaluation.
//!
//! - **Average**: exact change of the mean service distance.
//! - **Max**: for every node outside the new set, with `rest` the closest
//!   remaining facility once the old one leaves: if the old facility served
//!   the node (`old <= rest`) add `max(0, max(new, rest) - old)`, otherwise
//!   if `new < rest` add `new - rest`.
//!
//! # Reference
//!
//! Mladenović, N., Labbé, M., Hansen, P. (2003). "Solving the p-Center
//! Problem with Tabu Search and Variable Neighborhood Search", *Networks*
//! 42(1), 48-64.

use tracing::{debug, trace};

use crate::distance::DistanceOracle;
use crate::models::Objective;

/// Nearest and second-nearest facility per node.
#[derive(Debug, Clone)]
struct NearestTable {
    /// `(facility position, distance)` of the closest facility.
    first: Vec<(usize, f64)>,
    second: Vec<f64>,
}

impl NearestTable {
    fn build(oracle: &DistanceOracle, facilities: &[usize]) -> Self {
        let n = oracle.len();
        let mut first = vec![(usize::MAX, f64::INFINITY); n];
        let mut second = vec![f64::INFINITY; n];
        for j in 0..n {
            for (pos, &i) in facilities.iter().enumerate() {
                let d = oracle.distance_at(i, j);
                if d < first[j].1 {
                    second[j] = first[j].1;
                    first[j] = (pos, d);
                } else if d < second[j] {
                    second[j] = d;
                }
            }
        }
        Self { first, second }
    }

    /// Closest distance to `j` once the facility at `pos` is removed.
    fn without(&self, j: usize, pos: usize) -> f64 {
        if self.first[j].0 == pos {
            self.second[j]
        } else {
            self.first[j].1
        }
    }

    fn nearest(&self, j: usize) -> f64 {
        self.first[j].1
    }
}

/// `after - before`, zero when both are the same infinity.
fn change(after: f64, before: f64) -> f64 {
    if after == before {
        0.0
    } else {
        after - before
    }
}

/// Swap local search over a fixed objective.
///
/// Works on node indices (ascending id order), like the solvers' inner loops.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::local_search::SwapSearch;
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
///
/// let mut facilities = vec![0];
/// SwapSearch::new(&oracle, Objective::Average).improve(&mut facilities, 100);
/// assert_eq!(facilities, vec![2]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SwapSearch<'a> {
    oracle: &'a DistanceOracle,
    objective: Objective,
}

impl<'a> SwapSearch<'a> {
    pub fn new(oracle: &'a DistanceOracle, objective: Objective) -> Self {
        Self { oracle, objective }
    }

    /// Objective change of replacing `facilities[pos]` with `candidate`.
    ///
    /// Facilities and candidate are node indices, as in
    /// [`DistanceOracle::distance_at`].
    ///
    /// `candidate` must not already be a facility. Negative means better.
    pub fn delta_at(&self, facilities: &[usize], pos: usize, candidate: usize) -> f64 {
        let table = NearestTable::build(self.oracle, facilities);
        let is_facility = membership(self.oracle.len(), facilities);
        self.delta_with(&table, &is_facility, facilities[pos], pos, candidate)
    }

    fn delta_with(
        &self,
        table: &NearestTable,
        is_facility: &[bool],
        old: usize,
        pos: usize,
        candidate: usize,
    ) -> f64 {
        let n = self.oracle.len();
        match self.objective {
            Objective::Average => {
                let mut total = 0.0;
                for j in 0..n {
                    let after = table.without(j, pos).min(self.oracle.distance_at(candidate, j));
                    total += change(after, table.nearest(j));
                }
                total / n as f64
            }
            Objective::Max => {
                let mut total = 0.0;
                for j in 0..n {
                    if j == candidate || (is_facility[j] && j != old) {
                        continue;
                    }
                    let old_d = self.oracle.distance_at(old, j);
                    let new_d = self.oracle.distance_at(candidate, j);
                    let rest = table.without(j, pos);
                    if old_d <= rest {
                        let worse = change(new_d.max(rest), old_d);
                        if worse > 0.0 {
                            total += worse;
                        }
                    } else if new_d < rest {
                        total += new_d - rest;
                    }
                }
                total
            }
        }
    }

    /// Improves `facilities` in place; returns the number of applied moves.
    pub fn improve(&self, facilities: &mut [usize], max_moves: usize) -> usize {
        let n = self.oracle.len();
        let mut moves = 0;

        'scan: while moves < max_moves {
            let table = NearestTable::build(self.oracle, facilities);
            let is_facility = membership(n, facilities);
            for pos in 0..facilities.len() {
                let old = facilities[pos];
                for candidate in 0..n {
                    if is_facility[candidate] {
                        continue;
                    }
                    let delta = self.delta_with(&table, &is_facility, old, pos, candidate);
                    if delta < 0.0 {
                        trace!(old, candidate, delta, "swap");
                        facilities[pos] = candidate;
                        moves += 1;
                        continue 'scan;
                    }
                }
            }
            break;
        }

        debug!(moves, limit_hit = moves >= max_moves, "local search done");
        moves
    }
}

fn membership(n: usize, facilities: &[usize]) -> Vec<bool> {
    let mut is_facility = vec![false; n];
    for &i in facilities {
        is_facility[i] = true;
    }
    is_facility
}

/// Runs [`SwapSearch::improve`] for one objective.
pub fn swap_improve(
    oracle: &DistanceOracle,
    objective: Objective,
    facilities: &mut [usize],
    max_moves: usize,
) -> usize {
    SwapSearch::new(oracle, objective).improve(facilities, max_moves)
}
