//! Dense proximity graph over geolocated nodes.
//!
//! Every pair of nodes is joined by two directed edges carrying the same
//! haversine distance. Insertion materialises edges to every existing node and
//! removal excises every edge pointing at the departing node, so the
//! adjacency is always complete. Per-node edge order is only meaningful
//! immediately after a sort; any mutation clears the sorted mark for every
//! node.

mod batch;
mod core;
mod edge;
mod query;

pub use self::{core::GeoGraph, edge::Edge, query::Neighbour};

#[cfg(test)]
pub(crate) use self::core::NodeEntry;
