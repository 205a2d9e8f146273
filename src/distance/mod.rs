//! Geographic and shortest-path distances.
//!
//! - [`haversine`] / [`Coordinate`] — great-circle distance between sites
//! - [`DistanceOracle`] — all-pairs Dijkstra distances and paths for a graph
//! - [`DistanceMatrix`] — the dense matrix backing the oracle
//! - [`OracleCache`] — one oracle per graph identity, optionally on disk

mod cache;
mod dijkstra;
mod geo;
mod matrix;
mod oracle;
mod persist;

pub use cache::OracleCache;
pub use geo::{haversine, Coordinate, EARTH_RADIUS_KM};
pub use matrix::DistanceMatrix;
pub use oracle::DistanceOracle;
pub use persist::InfinityStyle;
