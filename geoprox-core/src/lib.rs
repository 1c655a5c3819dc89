//! Geoprox core library.
//!
//! Maintains a dense proximity graph over geolocated nodes (articles and
//! places) and answers "nearest of kind within a threshold" queries.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled the graph emits:
//!
//! - `geograph_nodes_added` (counter)
//! - `geograph_nodes_removed` (counter)
//! - `geograph_edges_sorted` (counter)
//! - `geograph_node_count` (gauge)
//!
//! These metric names are stable for downstream crates.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod coordinate;
mod cycle;
mod distance;
mod error;
mod graph;
mod invariants;
mod node;
mod shared;

pub use crate::{
    coordinate::{Axis, Coordinate, CoordinateError},
    cycle::{BatchWindow, CycleReport, DEFAULT_RETENTION},
    distance::{Distance, EARTH_RADIUS_KM, haversine_distance},
    error::{GeoGraphError, GeoGraphErrorCode, Result},
    graph::{Edge, GeoGraph, Neighbour},
    invariants::{GraphInvariant, GraphInvariantChecker, GraphInvariantViolation},
    node::{Node, NodeId, NodeKind, ParseNodeKindError},
    shared::SharedGeoGraph,
};
