//! # u-facility
//!
//! Facility placement on weighted geographic graphs: choose at most N
//! facility nodes so that every node is served by its nearest facility,
//! minimizing the worst (k-center) or mean (p-median) service distance.
//!
//! ## Modules
//!
//! - [`models`] — Graph, nodes, problem instance and placement result
//! - [`distance`] — Haversine distance, all-pairs shortest-path oracle, JSON cache
//! - [`evaluation`] — Objective value and serving assignment of a facility set
//! - [`brute_force`] — Exhaustive search, optionally sharded over rayon
//! - [`constructive`] — Randomized greedy construction (restricted candidate list)
//! - [`local_search`] — First-improvement swap search with delta evaluation
//! - [`grasp`] — GRASP outer loop
//! - [`exact`] — 0/1 integer program solved by HiGHS
//! - [`strategy`] — Solver trait and configuration-driven dispatch
//! - [`analysis`] — Degree, connectivity and distance statistics
//!
//! ## Example
//!
//! ```
//! use u_facility::distance::DistanceOracle;
//! use u_facility::models::{GraphBuilder, Node, Objective, PlacementProblem};
//! use u_facility::strategy::{PlacementSolver, Strategy};
//!
//! let graph = GraphBuilder::new()
//!     .node(Node::new(1, 45.07, 7.69).unwrap())
//!     .node(Node::new(2, 45.46, 9.19).unwrap())
//!     .node(Node::new(3, 44.41, 8.93).unwrap())
//!     .edge(1, 2, None)
//!     .edge(2, 3, None)
//!     .edge(1, 3, None)
//!     .build()
//!     .unwrap();
//! let oracle = DistanceOracle::build(&graph).unwrap();
//! let problem = PlacementProblem::new(&graph, &oracle, 1, Objective::Max).unwrap();
//!
//! let placement = Strategy::default().solve(&problem).unwrap();
//! assert_eq!(placement.facilities().len(), 1);
//! assert!(placement.is_feasible());
//! ```

pub mod analysis;
pub mod brute_force;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod exact;
pub mod grasp;
pub mod local_search;
pub mod logging;
pub mod models;
pub mod strategy;

pub use error::{Error, Result};
