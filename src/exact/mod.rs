//! Exact facility placement through 0/1 integer programming.
//!
//! The assignment program selects facilities `x_i` and service links
//! `y_ij` (facility `i` serves node `j`) and is solved by HiGHS.
//!
//! - **Average** minimizes `(1/|V|) · Σ d(i, j) · y_ij` in one pass.
//! - **Max** first solves the average program to fix the facility set, then
//!   minimizes the worst service distance `z` over that fixed set. This
//!   second pass is exact for the fixed set only, so the overall result
//!   approximates the true k-center optimum.
//!
//! The reported value always comes from the evaluator; engine objectives
//! are kept in [`Placement::engine_objective`].

mod config;
mod model;

pub use config::ExactConfig;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Objective, Placement, PlacementProblem};
use crate::strategy::PlacementSolver;
use model::{assignment_model, bottleneck_model, minimise, CostMatrix, Deadline};

const STRATEGY: &str = "exact";

/// MIP-based solver.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::exact::{Exact, ExactConfig};
/// use u_facility::strategy::PlacementSolver;
///
/// let mut builder = GraphBuilder::new();
/// for id in 0..5 {
///     builder.add_node(Node::new(id, 45.0, 7.0 + id as f64 * 0.1).unwrap());
/// }
/// for id in 0..4 {
///     builder.add_edge(id, id + 1, Some(1.0));
/// }
/// let graph = builder.build().unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// let problem = PlacementProblem::new(&graph, &oracle, 1, Objective::Average).unwrap();
///
/// let placement = Exact::new(ExactConfig::default()).solve(&problem).unwrap();
/// assert_eq!(placement.facilities(), &[2]);
/// assert!((placement.value() - 1.2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Exact {
    config: ExactConfig,
}

impl Exact {
    pub fn new(config: ExactConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExactConfig {
        &self.config
    }
}

impl PlacementSolver for Exact {
    fn name(&self) -> &str {
        STRATEGY
    }

    fn solve(&self, problem: &PlacementProblem<'_>) -> Result<Placement> {
        self.config.validate()?;
        let n = problem.num_nodes();
        let k = problem.effective_budget();
        info!(
            nodes = n,
            facilities = k,
            objective = ?problem.objective(),
            variables = n + n * n,
            "exact start"
        );

        let deadline = Deadline::start(self.config.time_limit);
        let costs = CostMatrix::new(problem.oracle());
        let pass1 = assignment_model(&costs, k, self.config.exclusive_facilities);
        let solved = minimise(pass1.problem, &deadline, "average pass")?;
        let solution = solved.get_solution();
        let facilities: Vec<usize> = pass1
            .facility_cols
            .iter()
            .enumerate()
            .filter(|(_, &c)| solution[c] > 0.5)
            .map(|(i, _)| i)
            .collect();
        if facilities.is_empty() {
            return Err(Error::solver("average pass selected no facilities"));
        }
        let mut engine_objective = vec![solved.objective_value()];
        debug!(?facilities, objective = engine_objective[0], "average pass done");

        if problem.objective() == Objective::Max {
            let solved = minimise(bottleneck_model(&costs, &facilities), &deadline, "max pass")?;
            engine_objective.push(solved.objective_value());
            debug!(objective = engine_objective[1], "max pass done");
        }

        let placement = problem
            .placement_at(&facilities, STRATEGY)
            .with_engine_objective(engine_objective);
        info!(value = placement.value(), "exact done");
        Ok(placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::BruteForce;
    use crate::distance::DistanceOracle;
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

    fn line(n: usize) -> Graph {
        let edges: Vec<_> = (1..n).map(|i| (i - 1, i, 1.0)).collect();
        graph(n, &edges)
    }

    #[test]
    fn test_average_matches_brute_force() {
        let edges = [
            (0, 1, 4.0),
            (1, 2, 1.0),
            (2, 3, 2.5),
            (3, 4, 1.0),
            (4, 5, 3.0),
            (5, 0, 2.0),
            (1, 4, 6.0),
        ];
        let g = graph(6, &edges);
        let oracle = DistanceOracle::build(&g).expect("valid");
        for budget in 1..=3 {
            let problem =
                PlacementProblem::new(&g, &oracle, budget, Objective::Average).expect("valid");
            let exact = Exact::default().solve(&problem).expect("solves");
            let brute = BruteForce::new().solve(&problem).expect("solves");
            assert!((exact.value() - brute.value()).abs() < 1e-9);
            assert!(exact.facilities().len() <= budget);
        }
    }

    #[test]
    fn test_max_two_passes() {
        let g = line(5);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 1, Objective::Max).expect("valid");
        let p = Exact::default().solve(&problem).expect("solves");
        assert_eq!(p.facilities(), &[2]);
        assert_eq!(p.value(), 2.0);
        assert_eq!(p.engine_objective().len(), 2);
        assert!((p.engine_objective()[0] - 1.2).abs() < 1e-6);
        assert!((p.engine_objective()[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_disconnected_penalty() {
        let g = graph(4, &[(0, 1, 1.0), (2, 3, 1.0)]);
        let oracle = DistanceOracle::build(&g).expect("valid");

        let problem = PlacementProblem::new(&g, &oracle, 1, Objective::Average).expect("valid");
        let p = Exact::default().solve(&problem).expect("solves");
        assert!(!p.is_feasible());
        assert_eq!(p.unserved().len(), 2);

        let problem = PlacementProblem::new(&g, &oracle, 2, Objective::Average).expect("valid");
        let p = Exact::default().solve(&problem).expect("solves");
        assert!((p.value() - 0.5).abs() < 1e-9);
        assert_eq!(p.facilities().len(), 2);
    }

    #[test]
    fn test_exclusive_facilities() {
        let g = line(6);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 2, Objective::Average).expect("valid");
        let config = ExactConfig::default().with_exclusive_facilities(true);
        let p = Exact::new(config).solve(&problem).expect("solves");
        let brute = BruteForce::new().solve(&problem).expect("solves");
        assert!((p.value() - brute.value()).abs() < 1e-9);
    }

    #[test]
    fn test_time_limit_passes_through() {
        let g = line(4);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 2, Objective::Max).expect("valid");
        let p = Exact::new(ExactConfig::default().with_time_limit(60.0))
            .solve(&problem)
            .expect("solves");
        assert_eq!(p.value(), 1.0);
        assert_eq!(p.strategy(), "exact");
    }

    #[test]
    fn test_invalid_time_limit() {
        let g = line(3);
        let oracle = DistanceOracle::build(&g).expect("valid");
        let problem = PlacementProblem::new(&g, &oracle, 1, Objective::Max).expect("valid");
        let result = Exact::new(ExactConfig::default().with_time_limit(-1.0)).solve(&problem);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }
}
