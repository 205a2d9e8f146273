//! Solver strategy selection.
//!
//! Every solver implements [`PlacementSolver`]. [`Strategy`] names one of
//! them together with its tuning, so a solve can be configured from JSON:
//!
//! ```json
//! { "strategy": "grasp", "alpha": 0.3, "iterations": 200 }
//! ```

use serde::{Deserialize, Serialize};

use crate::brute_force::BruteForce;
use crate::error::Result;
use crate::exact::{Exact, ExactConfig};
use crate::grasp::{Grasp, GraspConfig};
use crate::models::{Placement, PlacementProblem};

/// A facility placement strategy.
pub trait PlacementSolver {
    /// Strategy name recorded in [`Placement::strategy`].
    fn name(&self) -> &str;

    /// Chooses at most `problem.budget()` facilities.
    fn solve(&self, problem: &PlacementProblem<'_>) -> Result<Placement>;
}

/// Configured solver, tagged by `"strategy"` in serialized form.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
/// use u_facility::distance::DistanceOracle;
/// use u_facility::strategy::{PlacementSolver, Strategy};
///
/// let strategy: Strategy =
///     serde_json::from_str(r#"{"strategy": "brute_force", "parallel": false}"#).unwrap();
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(0, 45.0, 7.0).unwrap())
///     .node(Node::new(1, 45.0, 7.1).unwrap())
///     .node(Node::new(2, 45.0, 7.2).unwrap())
///     .edge(0, 1, Some(1.0))
///     .edge(1, 2, Some(1.0))
///     .build()
///     .unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// let problem = PlacementProblem::new(&graph, &oracle, 1, Objective::Max).unwrap();
///
/// let placement = strategy.solve(&problem).unwrap();
/// assert_eq!(placement.facilities(), &[1]);
/// assert_eq!(placement.strategy(), "brute_force");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    BruteForce(BruteForce),
    Grasp(GraspConfig),
    Exact(ExactConfig),
}

impl Default for Strategy {
    fn default() -> Self {
        Self::Grasp(GraspConfig::default())
    }
}

impl PlacementSolver for Strategy {
    fn name(&self) -> &str {
        match self {
            Self::BruteForce(_) => "brute_force",
            Self::Grasp(_) => "grasp",
            Self::Exact(_) => "exact",
        }
    }

    fn solve(&self, problem: &PlacementProblem<'_>) -> Result<Placement> {
        match self {
            Self::BruteForce(solver) => solver.solve(problem),
            Self::Grasp(config) => Grasp::new(config.clone()).solve(problem),
            Self::Exact(config) => Exact::new(config.clone()).solve(problem),
        }
    }
}

impl From<BruteForce> for Strategy {
    fn from(solver: BruteForce) -> Self {
        Self::BruteForce(solver)
    }
}

impl From<GraspConfig> for Strategy {
    fn from(config: GraspConfig) -> Self {
        Self::Grasp(config)
    }
}

impl From<ExactConfig> for Strategy {
    fn from(config: ExactConfig) -> Self {
        Self::Exact(config)
    }
}
