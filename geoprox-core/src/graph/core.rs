//! Storage and mutation for the dense proximity graph.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::{
    distance::{Distance, haversine_distance},
    error::{GeoGraphError, Result},
    invariants::GraphInvariantChecker,
    node::{Node, NodeId, NodeKind},
};

use super::edge::{Adjacency, Edge};

#[derive(Clone, Debug)]
pub(crate) struct NodeEntry {
    pub(crate) node: Node,
    pub(crate) adjacency: Adjacency,
}

/// Dense proximity graph keyed by [`NodeId`].
///
/// Holds an insertion-ordered sequence of nodes and, per node, an outgoing
/// edge list to every other node. Graphs are plain owned values: construct
/// one per context and pass it explicitly.
///
/// # Examples
/// ```
/// use geoprox_core::{GeoGraph, GeoGraphError, Node, NodeKind};
///
/// let mut graph = GeoGraph::new();
/// graph.add_node(Node::try_from_degrees("tokyo", 35.6895, 139.691_71, NodeKind::Article)?)?;
/// graph.add_node(Node::try_from_degrees("osaka", 34.693_74, 135.502_18, NodeKind::Article)?)?;
/// graph.add_node(Node::try_from_degrees("cafe", 35.68, 139.70, NodeKind::Place)?)?;
///
/// let nearest = graph.nearest_of_kind(&"tokyo".into(), NodeKind::Place, 50.0)?;
/// assert_eq!(nearest.map(|node| node.id().as_str()), Some("cafe"));
/// assert_eq!(graph.edge_count(), 6);
/// # Ok::<(), GeoGraphError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct GeoGraph {
    pub(crate) order: Vec<NodeId>,
    pub(crate) entries: HashMap<NodeId, NodeEntry>,
}

impl GeoGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            order: Vec::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Number of nodes currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when the graph holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` when a node with `id` is present.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.entries.contains_key(id)
    }

    /// Looks up a node by identifier.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.entries.get(id).map(|entry| &entry.node)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| &entry.node))
    }

    /// Total number of directed edges, `n * (n - 1)` for a complete graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.entries
            .values()
            .map(|entry| entry.adjacency.edges().len())
            .sum()
    }

    /// Inserts `node`, materialising an edge pair to every existing node.
    ///
    /// Each pair distance is computed once and stored in both directions, so
    /// `A -> B` and `B -> A` always carry the same value. Clears the sorted
    /// mark of every node.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::DuplicateNode`] when the identifier is already
    /// present. The graph is left untouched in that case.
    #[instrument(
        name = "geograph.add_node",
        level = "debug",
        err,
        skip(self, node),
        fields(id = %node.id(), kind = %node.kind()),
    )]
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.contains(node.id()) {
            return Err(GeoGraphError::DuplicateNode {
                id: node.id().clone(),
            });
        }
        self.attach(node);
        Ok(())
    }

    /// Removes the node with `id` and every edge that points at it.
    ///
    /// The relative order of the surviving edges is preserved, but every
    /// node's sorted mark is cleared.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when no such node exists.
    #[instrument(name = "geograph.remove_node", level = "debug", err, skip(self), fields(id = %id))]
    pub fn remove_node(&mut self, id: &NodeId) -> Result<Node> {
        self.detach(id)
            .ok_or_else(|| GeoGraphError::NodeNotFound { id: id.clone() })
    }

    /// Removes every node tagged with `kind`, returning them in insertion
    /// order.
    ///
    /// Targets are collected before any removal so mutation never disturbs
    /// the scan.
    #[instrument(name = "geograph.remove_kind", level = "debug", skip(self), fields(kind = %kind))]
    pub fn remove_nodes_of_kind(&mut self, kind: NodeKind) -> Vec<Node> {
        let targets: Vec<NodeId> = self
            .nodes()
            .filter(|node| node.kind() == kind)
            .map(|node| node.id().clone())
            .collect();
        let removed: Vec<Node> = targets.iter().filter_map(|id| self.detach(id)).collect();
        debug!(removed = removed.len(), remaining = self.len(), "removed nodes of kind");
        removed
    }

    /// Sorts the outgoing edges of `id` by ascending distance.
    ///
    /// The sort is stable, so equal distances keep insertion order. Calling
    /// it on an already sorted list leaves the list unchanged.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when no such node exists.
    pub fn sort_edges(&mut self, id: &NodeId) -> Result<()> {
        let entry = self.entry_mut(id)?;
        if !entry.adjacency.is_sorted() {
            entry.adjacency.sort();
            trace!(id = %id, edges = entry.adjacency.edges().len(), "sorted edges");
            #[cfg(feature = "metrics")]
            metrics::counter!("geograph_edges_sorted").increment(1);
        }
        Ok(())
    }

    /// Returns the current outgoing edges of `id`.
    ///
    /// The order is insertion order unless [`Self::sort_edges`] ran since the
    /// last mutation. Prefer [`Self::sorted_edges`] for neighbour queries.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when no such node exists.
    pub fn edges(&self, id: &NodeId) -> Result<&[Edge]> {
        Ok(self.entry(id)?.adjacency.edges())
    }

    /// Reports whether the edge list of `id` is currently sorted.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when no such node exists.
    pub fn is_sorted(&self, id: &NodeId) -> Result<bool> {
        Ok(self.entry(id)?.adjacency.is_sorted())
    }

    /// Sorts the edges of `id` if needed and returns them.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when no such node exists.
    pub fn sorted_edges(&mut self, id: &NodeId) -> Result<&[Edge]> {
        self.sort_edges(id)?;
        self.edges(id)
    }

    /// Returns the stored distance between two nodes.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when either node is absent.
    pub fn distance_between(&self, from: &NodeId, to: &NodeId) -> Result<Distance> {
        let entry = self.entry(from)?;
        if from == to {
            return Ok(Distance::from_raw(0.0));
        }
        entry
            .adjacency
            .edges()
            .iter()
            .find(|edge| edge.dest() == to)
            .map(Edge::distance)
            .ok_or_else(|| GeoGraphError::NodeNotFound { id: to.clone() })
    }

    /// Returns a checker for the structural invariants of this graph.
    #[must_use]
    pub fn invariants(&self) -> GraphInvariantChecker<'_> {
        GraphInvariantChecker::new(self)
    }

    pub(super) fn entry(&self, id: &NodeId) -> Result<&NodeEntry> {
        self.entries
            .get(id)
            .ok_or_else(|| GeoGraphError::NodeNotFound { id: id.clone() })
    }

    pub(super) fn entry_mut(&mut self, id: &NodeId) -> Result<&mut NodeEntry> {
        self.entries
            .get_mut(id)
            .ok_or_else(|| GeoGraphError::NodeNotFound { id: id.clone() })
    }

    /// Inserts a node whose identifier has already been checked for
    /// uniqueness.
    pub(super) fn attach(&mut self, node: Node) {
        let id = node.id().clone();
        let coordinate = node.coordinate();
        let mut adjacency = Adjacency::with_capacity(self.order.len());

        for existing in &self.order {
            let Some(entry) = self.entries.get_mut(existing) else {
                continue;
            };
            let distance = haversine_distance(entry.node.coordinate(), coordinate);
            entry.adjacency.push(Edge::new(id.clone(), distance));
            adjacency.push(Edge::new(existing.clone(), distance));
        }

        debug!(id = %id, edges = adjacency.edges().len(), "materialised edges");
        self.order.push(id.clone());
        self.entries.insert(id, NodeEntry { node, adjacency });

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("geograph_nodes_added").increment(1);
            metrics::gauge!("geograph_node_count").set(self.order.len() as f64);
        }
    }

    /// Removes a node and every edge pointing at it, or returns `None` when
    /// the node is absent.
    pub(super) fn detach(&mut self, id: &NodeId) -> Option<Node> {
        let entry = self.entries.remove(id)?;
        self.order.retain(|existing| existing != id);

        let mut excised = 0_usize;
        for other in self.entries.values_mut() {
            if other.adjacency.excise(id).is_some() {
                excised += 1;
            }
            other.adjacency.invalidate();
        }
        debug!(id = %id, excised, remaining = self.order.len(), "excised edges");

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("geograph_nodes_removed").increment(1);
            metrics::gauge!("geograph_node_count").set(self.order.len() as f64);
        }
        Some(entry.node)
    }
}
