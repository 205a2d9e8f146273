//! Objective evaluator that computes service distances and assignments.

use crate::distance::DistanceOracle;
use crate::error::{Error, Result};
use crate::models::{Objective, Service};

/// Result of evaluating a facility set.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Objective value, `f64::INFINITY` if some node is unserved.
    pub value: f64,
    /// Served non-facility nodes in node id order.
    pub assignment: Vec<Service>,
    /// Node ids no facility reaches.
    pub unserved: Vec<usize>,
}

/// Evaluates facility sets against a distance oracle.
///
/// Each node is served by the facility with the smallest distance
/// *from the facility to the node*; ties go to the lowest facility id.
/// An empty facility set, or any node no facility reaches, yields
/// `f64::INFINITY`. This is the single objective used by every strategy.
///
/// [`evaluate`](Self::evaluate) and [`value`](Self::value) take node ids.
/// The `*_at` variants take node indices (ascending id order, as in
/// [`DistanceOracle::distance_at`]) and are what the solvers call in their
/// inner loops.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::evaluation::ObjectiveEvaluator;
///
/// // 10 - 11 - 12 - 13 with unit weights
/// let mut builder = GraphBuilder::new();
/// for id in 10..14 {
///     builder.add_node(Node::new(id, 45.0, id as f64 * 0.1).unwrap());
/// }
/// for id in 10..13 {
///     builder.add_edge(id, id + 1, Some(1.0));
/// }
/// let graph = builder.build().unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
///
/// let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Max);
/// let eval = evaluator.evaluate(&[11]).unwrap();
/// assert_eq!(eval.value, 2.0);
/// assert!(eval.assignment.iter().all(|s| s.facility == 11));
/// assert!(evaluator.evaluate(&[1]).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectiveEvaluator<'a> {
    oracle: &'a DistanceOracle,
    objective: Objective,
}

impl<'a> ObjectiveEvaluator<'a> {
    /// Creates an evaluator for the given oracle and objective.
    pub fn new(oracle: &'a DistanceOracle, objective: Objective) -> Self {
        Self { oracle, objective }
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Objective value and assignment of a facility set given as node ids.
    ///
    /// Fails with [`Error::UnknownNode`] for an id outside the graph.
    pub fn evaluate(&self, facilities: &[usize]) -> Result<Evaluation> {
        Ok(self.evaluate_at(&self.indices(facilities)?))
    }

    /// Objective value of a facility set given as node ids.
    pub fn value(&self, facilities: &[usize]) -> Result<f64> {
        Ok(self.value_at(&self.indices(facilities)?))
    }

    /// Maps node ids to oracle indices.
    pub fn indices(&self, ids: &[usize]) -> Result<Vec<usize>> {
        ids.iter()
            .map(|&id| self.oracle.index_of(id).ok_or(Error::UnknownNode(id)))
            .collect()
    }

    /// Objective value only, facilities as node indices.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn value_at(&self, facilities: &[usize]) -> f64 {
        let n = self.oracle.len();
        if facilities.is_empty() || n == 0 {
            return f64::INFINITY;
        }
        let mut worst: f64 = 0.0;
        let mut total = 0.0;
        for j in 0..n {
            let d = facilities
                .iter()
                .map(|&i| self.oracle.distance_at(i, j))
                .fold(f64::INFINITY, f64::min);
            if d.is_infinite() {
                return f64::INFINITY;
            }
            worst = worst.max(d);
            total += d;
        }
        self.aggregate(worst, total, n)
    }

    /// Objective value together with the serving assignment, facilities as
    /// node indices. The result reports node ids.
    pub fn evaluate_at(&self, facilities: &[usize]) -> Evaluation {
        let n = self.oracle.len();
        let ids = self.oracle.node_ids();
        let mut is_facility = vec![false; n];
        for &i in facilities {
            is_facility[i] = true;
        }

        let mut assignment = Vec::with_capacity(n.saturating_sub(facilities.len()));
        let mut unserved = Vec::new();
        let mut worst: f64 = 0.0;
        let mut total = 0.0;

        for j in 0..n {
            if is_facility[j] {
                continue;
            }
            match self.nearest_facility_at(facilities, j) {
                Some((i, d)) => {
                    worst = worst.max(d);
                    total += d;
                    assignment.push(Service {
                        node: ids[j],
                        facility: ids[i],
                        distance: d,
                    });
                }
                None => unserved.push(ids[j]),
            }
        }

        let value = if facilities.is_empty() || !unserved.is_empty() {
            f64::INFINITY
        } else {
            self.aggregate(worst, total, n)
        };
        Evaluation {
            value,
            assignment,
            unserved,
        }
    }

    /// Closest facility to node index `j` as `(index, distance)`, lowest
    /// index on ties.
    ///
    /// `None` if no facility reaches `j`.
    pub fn nearest_facility_at(&self, facilities: &[usize], j: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for &i in facilities {
            let d = self.oracle.distance_at(i, j);
            if d.is_infinite() {
                continue;
            }
            let better = match best {
                None => true,
                Some((bi, bd)) => d < bd || (d == bd && i < bi),
            };
            if better {
                best = Some((i, d));
            }
        }
        best
    }

    fn aggregate(&self, worst: f64, total: f64, n: usize) -> f64 {
        match self.objective {
            Objective::Max => worst,
            Objective::Average => total / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Graph, GraphBuilder, Node};

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

    fn path4() -> DistanceOracle {
        let g = graph(4, &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0)]);
        DistanceOracle::build(&g).expect("valid")
    }

    #[test]
    fn test_max_on_path() {
        let oracle = path4();
        let eval = ObjectiveEvaluator::new(&oracle, Objective::Max).evaluate_at(&[1]);
        assert_eq!(eval.value, 2.0);
        let served: Vec<(usize, usize)> =
            eval.assignment.iter().map(|s| (s.node, s.facility)).collect();
        assert_eq!(served, vec![(0, 1), (2, 1), (3, 1)]);
        assert_eq!(eval.assignment[2].distance, 2.0);
        assert!(eval.unserved.is_empty());
    }

    #[test]
    fn test_average_on_path() {
        let oracle = path4();
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Average);
        // (1 + 0 + 1 + 2) / 4
        assert!((evaluator.value_at(&[1]) - 1.0).abs() < 1e-10);
        assert!((evaluator.evaluate_at(&[1]).value - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_value_matches_evaluate() {
        let oracle = path4();
        for objective in [Objective::Max, Objective::Average] {
            let evaluator = ObjectiveEvaluator::new(&oracle, objective);
            for facilities in [vec![0], vec![3], vec![0, 3], vec![1, 2]] {
                let a = evaluator.value_at(&facilities);
                let b = evaluator.evaluate_at(&facilities).value;
                assert!((a - b).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn test_empty_facilities_infinite() {
        let oracle = path4();
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Max);
        assert!(evaluator.value_at(&[]).is_infinite());
        let eval = evaluator.evaluate_at(&[]);
        assert!(eval.value.is_infinite());
        assert_eq!(eval.unserved, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_unreachable_infinite() {
        let g = graph(4, &[(0, 1, 10.0), (2, 3, 10.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Average);
        assert!(evaluator.value_at(&[0]).is_infinite());
        let eval = evaluator.evaluate_at(&[0]);
        assert!(eval.value.is_infinite());
        assert_eq!(eval.unserved, vec![2, 3]);
        assert_eq!(eval.assignment.len(), 1);
        // One facility per component serves everyone.
        assert!((evaluator.value_at(&[0, 2]) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        // 1 sits exactly between 0 and 2.
        let g = graph(3, &[(0, 1, 5.0), (1, 2, 5.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Max);
        for facilities in [[0, 2], [2, 0]] {
            let eval = evaluator.evaluate_at(&facilities);
            assert_eq!(eval.assignment.len(), 1);
            assert_eq!(eval.assignment[0].facility, 0);
        }
    }

    #[test]
    fn test_directed_uses_facility_to_node() {
        let mut b = GraphBuilder::directed();
        b.add_node(Node::new(0, 0.0, 0.0).expect("valid"));
        b.add_node(Node::new(1, 0.0, 1.0).expect("valid"));
        b.add_edge(0, 1, Some(3.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Max);
        assert_eq!(evaluator.value_at(&[0]), 3.0);
        assert!(evaluator.value_at(&[1]).is_infinite());
    }

    #[test]
    fn test_ids_not_starting_at_zero() {
        let mut b = GraphBuilder::new();
        for id in 10..13 {
            b.add_node(Node::new(id, 45.0, id as f64 * 0.1).expect("valid"));
        }
        b.add_edge(10, 11, Some(1.0));
        b.add_edge(11, 12, Some(1.0));
        let g = b.build().expect("valid");
        let oracle = DistanceOracle::build(&g).expect("valid");
        let evaluator = ObjectiveEvaluator::new(&oracle, Objective::Max);

        let eval = evaluator.evaluate(&[11]).expect("known id");
        assert_eq!(eval.value, 1.0);
        let served: Vec<(usize, usize)> =
            eval.assignment.iter().map(|s| (s.node, s.facility)).collect();
        assert_eq!(served, vec![(10, 11), (12, 11)]);
        assert_eq!(evaluator.value(&[10]).expect("known id"), 2.0);
        assert_eq!(eval, evaluator.evaluate_at(&[1]));

        assert!(matches!(evaluator.evaluate(&[1]), Err(Error::UnknownNode(1))));
        assert!(matches!(evaluator.value(&[11, 99]), Err(Error::UnknownNode(99))));
    }
}
