//! Placement problem instance.

use serde::{Deserialize, Serialize};

use super::{Graph, Placement};
use crate::distance::DistanceOracle;
use crate::error::{Error, Result};
use crate::evaluation::ObjectiveEvaluator;

/// Which service-distance statistic a placement minimizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    /// Maximum distance from any node to its facility (k-center).
    #[default]
    Max,
    /// Mean distance over all nodes, facilities counting zero (p-median).
    Average,
}

/// A graph, its distance oracle, a facility budget and an objective.
///
/// Every solver strategy takes one of these. Construction checks that the
/// oracle was built for this graph.
///
/// # Examples
///
/// ```
/// use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
/// use u_facility::distance::DistanceOracle;
///
/// let graph = GraphBuilder::new()
///     .node(Node::new(0, 45.0, 7.0).unwrap())
///     .node(Node::new(1, 45.0, 8.0).unwrap())
///     .edge(0, 1, None)
///     .build()
///     .unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
///
/// let problem = PlacementProblem::new(&graph, &oracle, 5, Objective::Max).unwrap();
/// assert_eq!(problem.budget(), 5);
/// assert_eq!(problem.effective_budget(), 2);
/// assert!(PlacementProblem::new(&graph, &oracle, 0, Objective::Max).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlacementProblem<'a> {
    graph: &'a Graph,
    oracle: &'a DistanceOracle,
    budget: usize,
    objective: Objective,
}

impl<'a> PlacementProblem<'a> {
    /// Creates a problem instance.
    ///
    /// Fails on an empty graph, a zero budget, or an oracle built for a
    /// different graph.
    pub fn new(
        graph: &'a Graph,
        oracle: &'a DistanceOracle,
        budget: usize,
        objective: Objective,
    ) -> Result<Self> {
        if graph.is_empty() {
            return Err(Error::EmptyGraph);
        }
        if budget == 0 {
            return Err(Error::invalid_parameter("facility budget must be at least 1"));
        }
        oracle.check_graph(graph)?;
        Ok(Self {
            graph,
            oracle,
            budget,
            objective,
        })
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn oracle(&self) -> &'a DistanceOracle {
        self.oracle
    }

    /// Maximum number of facilities requested.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Budget capped at the number of nodes.
    pub fn effective_budget(&self) -> usize {
        self.budget.min(self.graph.len())
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn num_nodes(&self) -> usize {
        self.graph.len()
    }

    /// Evaluator for this problem's oracle and objective.
    pub fn evaluator(&self) -> ObjectiveEvaluator<'a> {
        ObjectiveEvaluator::new(self.oracle, self.objective)
    }

    /// Evaluates a facility set given as node ids into a [`Placement`].
    ///
    /// Fails with [`Error::UnknownNode`] for an id outside the graph.
    pub fn placement(&self, facilities: &[usize], strategy: &str) -> Result<Placement> {
        let indices = self.evaluator().indices(facilities)?;
        Ok(self.placement_at(&indices, strategy))
    }

    /// Same as [`placement`](Self::placement) with node indices.
    pub(crate) fn placement_at(&self, facilities: &[usize], strategy: &str) -> Placement {
        let eval = self.evaluator().evaluate_at(facilities);
        let mut ids: Vec<usize> = facilities.iter().map(|&i| self.graph.node(i).id()).collect();
        ids.sort_unstable();
        ids.dedup();
        Placement::new(
            ids,
            self.objective,
            eval.value,
            eval.assignment,
            eval.unserved,
            strategy,
        )
    }
}
