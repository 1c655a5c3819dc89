//! Kind- and range-filtered neighbour queries.
//!
//! Every query sorts the source's edge list first, so results always come
//! back in ascending distance order.

use tracing::instrument;

use crate::{
    distance::Distance,
    error::{GeoGraphError, Result},
    node::{Node, NodeId, NodeKind},
};

use super::core::GeoGraph;

/// A neighbour returned by [`GeoGraph::neighbours_of_kind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour<'graph> {
    /// The destination node.
    pub node: &'graph Node,
    /// Distance from the query source.
    pub distance: Distance,
}

impl GeoGraph {
    /// Returns every node of `kind` within `threshold_km` of `src`, nearest
    /// first, together with its distance.
    ///
    /// The threshold is inclusive.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when `src` is absent and
    /// [`GeoGraphError::InvalidThreshold`] when the threshold is negative or
    /// NaN.
    pub fn neighbours_of_kind(
        &mut self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
    ) -> Result<Vec<Neighbour<'_>>> {
        self.prepare_query(src, kind, threshold_km)?;
        let graph: &Self = self;
        let edges = graph.entry(src)?.adjacency.edges();
        Ok(edges
            .iter()
            .filter(|edge| edge.distance().value() <= threshold_km)
            .filter_map(|edge| {
                graph
                    .node(edge.dest())
                    .filter(|node| node.kind() == kind)
                    .map(|node| Neighbour {
                        node,
                        distance: edge.distance(),
                    })
            })
            .collect())
    }

    /// Returns the single nearest node of `kind` within `threshold_km`.
    ///
    /// # Errors
    /// See [`Self::neighbours_of_kind`].
    pub fn nearest_of_kind(
        &mut self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
    ) -> Result<Option<&Node>> {
        Ok(self
            .neighbours_of_kind(src, kind, threshold_km)?
            .into_iter()
            .next()
            .map(|neighbour| neighbour.node))
    }

    /// Returns every node of `kind` within `threshold_km`, nearest first.
    ///
    /// # Errors
    /// See [`Self::neighbours_of_kind`].
    pub fn all_nearest_of_kind(
        &mut self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
    ) -> Result<Vec<&Node>> {
        Ok(self
            .neighbours_of_kind(src, kind, threshold_km)?
            .into_iter()
            .map(|neighbour| neighbour.node)
            .collect())
    }

    /// Returns at most `limit` nodes of `kind` within `threshold_km`, nearest
    /// first.
    ///
    /// # Errors
    /// See [`Self::neighbours_of_kind`].
    pub fn nearest_of_kind_limited(
        &mut self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
        limit: usize,
    ) -> Result<Vec<&Node>> {
        Ok(self
            .neighbours_of_kind(src, kind, threshold_km)?
            .into_iter()
            .take(limit)
            .map(|neighbour| neighbour.node)
            .collect())
    }

    // Kept apart from the filter: the span wrapper cannot hand out borrows
    // of `self`.
    #[instrument(
        name = "geograph.neighbours_of_kind",
        level = "debug",
        err,
        skip(self),
        fields(src = %src, kind = %kind),
    )]
    fn prepare_query(&mut self, src: &NodeId, kind: NodeKind, threshold_km: f64) -> Result<()> {
        validate_threshold(threshold_km)?;
        self.sort_edges(src)
    }
}

fn validate_threshold(threshold_km: f64) -> Result<()> {
    if threshold_km.is_nan() || threshold_km < 0.0 {
        return Err(GeoGraphError::InvalidThreshold {
            value: threshold_km,
        });
    }
    Ok(())
}
