//! Domain model types for facility placement.
//!
//! Provides the graph of geographic sites, the problem instance tying a
//! graph to its distance oracle and budget, and the placement that every
//! solver returns.

mod graph;
mod node;
mod placement;
mod problem;

pub use graph::{Graph, GraphBuilder};
pub use node::{Edge, Node};
pub use placement::{Placement, Service};
pub use problem::{Objective, PlacementProblem};
