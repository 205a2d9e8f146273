//! Graph sites and links.

use serde::{Deserialize, Serialize};

use crate::distance::Coordinate;
use crate::error::Result;

/// A site in the network.
///
/// Nodes are identified by a unique integer id and located by a validated
/// geographic coordinate. The optional label is carried along for reporting.
///
/// # Examples
///
/// ```
/// use u_facility::models::Node;
///
/// let n = Node::new(7, 45.4642, 9.19).unwrap().with_label("Milan");
/// assert_eq!(n.id(), 7);
/// assert_eq!(n.label(), Some("Milan"));
/// assert!(Node::new(8, 100.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    id: usize,
    coordinate: Coordinate,
    label: Option<String>,
}

impl Node {
    /// Creates a node, validating its coordinate.
    pub fn new(id: usize, latitude: f64, longitude: f64) -> Result<Self> {
        Ok(Self {
            id,
            coordinate: Coordinate::new(latitude, longitude)?,
            label: None,
        })
    }

    /// Attaches a human-readable label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Node ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Location of this node.
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn latitude(&self) -> f64 {
        self.coordinate.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinate.longitude()
    }

    /// Label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Great-circle distance in kilometers to another node.
    pub fn distance_to(&self, other: &Node) -> f64 {
        self.coordinate.distance_to(&other.coordinate)
    }
}

/// A resolved link between two nodes (by id) with its weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID.
    pub from: usize,
    /// Target node ID.
    pub to: usize,
    /// Link weight; derived from the endpoint coordinates when not given.
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_node_new() {
        let n = Node::new(3, 41.9, 12.5).expect("valid");
        assert_eq!(n.id(), 3);
        assert_eq!(n.latitude(), 41.9);
        assert_eq!(n.longitude(), 12.5);
        assert!(n.label().is_none());
    }

    #[test]
    fn test_node_invalid_coordinate() {
        assert!(matches!(
            Node::new(0, f64::NAN, 0.0),
            Err(Error::InvalidCoordinate { .. })
        ));
        assert!(Node::new(0, 0.0, -181.0).is_err());
    }

    #[test]
    fn test_node_distance_symmetric() {
        let a = Node::new(0, 52.52, 13.405).expect("valid");
        let b = Node::new(1, 50.11, 8.68).expect("valid");
        assert!((a.distance_to(&b) - b.distance_to(&a)).abs() < 1e-10);
        assert!(a.distance_to(&a).abs() < 1e-10);
    }
}
