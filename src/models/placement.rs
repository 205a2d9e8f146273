//! Solver output: chosen facilities and the serving assignment.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Objective;
use crate::distance::DistanceOracle;

/// One served node: which facility serves it and at what distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Served node ID.
    pub node: usize,
    /// Serving facility node ID.
    pub facility: usize,
    /// Shortest-path distance from the facility to the node.
    pub distance: f64,
}

/// A facility placement returned by every solver strategy.
///
/// Facilities are node ids in ascending order. The assignment lists every
/// non-facility node that some facility reaches, in node id order; nodes no
/// facility reaches are listed in `unserved` and make the value infinite.
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
///     .edge(0, 1, Some(4.0))
///     .build()
///     .unwrap();
/// let oracle = DistanceOracle::build(&graph).unwrap();
/// let problem = PlacementProblem::new(&graph, &oracle, 1, Objective::Max).unwrap();
///
/// let placement = problem.placement(&[0], "manual").unwrap();
/// assert_eq!(placement.facilities(), &[0]);
/// assert_eq!(placement.value(), 4.0);
/// assert_eq!(placement.facility_of(1), Some(0));
/// assert_eq!(placement.service_path(&oracle, 1), Some(vec![0, 1]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    facilities: Vec<usize>,
    objective: Objective,
    #[serde(serialize_with = "serialize_value", deserialize_with = "deserialize_value")]
    value: f64,
    assignment: Vec<Service>,
    unserved: Vec<usize>,
    strategy: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    engine_objective: Vec<f64>,
}

impl Placement {
    pub(crate) fn new(
        facilities: Vec<usize>,
        objective: Objective,
        value: f64,
        assignment: Vec<Service>,
        unserved: Vec<usize>,
        strategy: impl Into<String>,
    ) -> Self {
        Self {
            facilities,
            objective,
            value,
            assignment,
            unserved,
            strategy: strategy.into(),
            engine_objective: Vec::new(),
        }
    }

    pub(crate) fn with_engine_objective(mut self, values: Vec<f64>) -> Self {
        self.engine_objective = values;
        self
    }

    /// Chosen facility node ids, ascending.
    pub fn facilities(&self) -> &[usize] {
        &self.facilities
    }

    /// Objective the value was computed for.
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Objective value; `f64::INFINITY` when some node cannot be served.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Returns `true` if every node is served.
    pub fn is_feasible(&self) -> bool {
        self.value.is_finite()
    }

    /// Served non-facility nodes, in node id order.
    pub fn assignment(&self) -> &[Service] {
        &self.assignment
    }

    /// Nodes that no chosen facility reaches.
    pub fn unserved(&self) -> &[usize] {
        &self.unserved
    }

    /// Name of the strategy that produced this placement.
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    /// Objective values reported by the optimization engine, one per pass.
    ///
    /// Empty for strategies that do not use an engine.
    pub fn engine_objective(&self) -> &[f64] {
        &self.engine_objective
    }

    /// Service record of a non-facility node.
    pub fn serving(&self, node: usize) -> Option<&Service> {
        self.assignment
            .binary_search_by_key(&node, |s| s.node)
            .ok()
            .map(|i| &self.assignment[i])
    }

    /// Facility serving `node`; a facility serves itself.
    pub fn facility_of(&self, node: usize) -> Option<usize> {
        if self.facilities.binary_search(&node).is_ok() {
            return Some(node);
        }
        self.serving(node).map(|s| s.facility)
    }

    /// Shortest path from the serving facility to `node`, as node ids.
    pub fn service_path(&self, oracle: &DistanceOracle, node: usize) -> Option<Vec<usize>> {
        let facility = self.facility_of(node)?;
        oracle.path(facility, node)
    }
}

fn serialize_value<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str("Infinity")
    }
}

fn deserialize_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Number(v) => Ok(v),
        Raw::Text(s) if s.eq_ignore_ascii_case("infinity") => Ok(f64::INFINITY),
        Raw::Text(s) => Err(serde::de::Error::custom(format!("invalid objective value {s:?}"))),
    }
}
