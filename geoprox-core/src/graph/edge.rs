//! Directed, distance-weighted relation between two nodes.

use crate::{distance::Distance, node::NodeId};

/// Outgoing edge stored in a node's adjacency list.
///
/// Edges are derived from endpoint coordinates and never mutated in place.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    dest: NodeId,
    distance: Distance,
}

impl Edge {
    pub(crate) const fn new(dest: NodeId, distance: Distance) -> Self {
        Self { dest, distance }
    }

    /// Destination node identifier.
    #[must_use]
    pub const fn dest(&self) -> &NodeId {
        &self.dest
    }

    /// Great-circle distance to the destination.
    #[must_use]
    pub const fn distance(&self) -> Distance {
        self.distance
    }
}

/// Edge list owned by a single node plus its sort mark.
#[derive(Clone, Debug, Default)]
pub(crate) struct Adjacency {
    edges: Vec<Edge>,
    sorted: bool,
}

impl Adjacency {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            edges: Vec::with_capacity(capacity),
            sorted: false,
        }
    }

    pub(crate) fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) const fn is_sorted(&self) -> bool {
        self.sorted
    }

    pub(crate) fn push(&mut self, edge: Edge) {
        self.edges.push(edge);
        self.sorted = false;
    }

    /// Removes the edge pointing at `dest`, preserving the order of the rest.
    pub(crate) fn excise(&mut self, dest: &NodeId) -> Option<Edge> {
        let position = self.edges.iter().position(|edge| edge.dest() == dest)?;
        Some(self.edges.remove(position))
    }

    /// Stable ascending sort by distance; equal distances keep insertion order.
    pub(crate) fn sort(&mut self) {
        if !self.sorted {
            self.edges
                .sort_by(|left, right| left.distance().total_cmp(&right.distance()));
            self.sorted = true;
        }
    }

    pub(crate) fn invalidate(&mut self) {
        self.sorted = false;
    }

    #[cfg(test)]
    pub(crate) fn edges_mut(&mut self) -> &mut Vec<Edge> {
        &mut self.edges
    }

    #[cfg(test)]
    pub(crate) fn mark_sorted(&mut self) {
        self.sorted = true;
    }
}
