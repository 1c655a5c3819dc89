//! Thread-safe handle around a [`GeoGraph`].
//!
//! Every mutation batch runs under a single write lock so readers never
//! observe a node that is in the insertion sequence but missing from the
//! adjacency map, or vice versa. Queries sort the stored edge list, so they
//! also take the write lock and hand back owned snapshots.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{instrument, warn};

use crate::{
    error::{GeoGraphError, Result},
    graph::{Edge, GeoGraph},
    node::{Node, NodeId, NodeKind},
};

/// Cloneable, lock-guarded [`GeoGraph`].
///
/// # Examples
/// ```
/// use geoprox_core::{GeoGraphError, Node, NodeKind, SharedGeoGraph};
///
/// let shared = SharedGeoGraph::new();
/// let reader = shared.clone();
/// shared.insert_batch([
///     Node::try_from_degrees("london", 51.508_53, -0.125_74, NodeKind::Article)?,
///     Node::try_from_degrees("museum", 51.5194, -0.1270, NodeKind::Place)?,
/// ])?;
/// let places = reader.all_nearest_of_kind(&"london".into(), NodeKind::Place, 5.0)?;
/// assert_eq!(places.len(), 1);
/// # Ok::<(), GeoGraphError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedGeoGraph {
    inner: Arc<RwLock<GeoGraph>>,
}

impl SharedGeoGraph {
    /// Wraps an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing graph.
    #[must_use]
    pub fn from_graph(graph: GeoGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Runs `f` with shared access to the graph.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::LockPoisoned`] if a writer panicked.
    pub fn with_read<R>(&self, f: impl FnOnce(&GeoGraph) -> R) -> Result<R> {
        let guard = self.read()?;
        Ok(f(&guard))
    }

    /// Runs `f` with exclusive access to the graph as one atomic unit.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::LockPoisoned`] if a writer panicked, or any
    /// error produced by `f`.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut GeoGraph) -> Result<R>) -> Result<R> {
        let mut guard = self.write()?;
        f(&mut guard)
    }

    /// Inserts a batch of nodes under one write lock.
    ///
    /// # Errors
    /// See [`GeoGraph::add_nodes`].
    #[instrument(name = "shared.insert_batch", level = "debug", err, skip_all)]
    pub fn insert_batch(&self, nodes: impl IntoIterator<Item = Node>) -> Result<usize> {
        self.with_write(|graph| graph.add_nodes(nodes))
    }

    /// Removes a batch of nodes under one write lock.
    ///
    /// # Errors
    /// See [`GeoGraph::remove_nodes`].
    #[instrument(name = "shared.remove_batch", level = "debug", err, skip_all)]
    pub fn remove_batch(&self, ids: &[NodeId]) -> Result<Vec<Node>> {
        self.with_write(|graph| graph.remove_nodes(ids))
    }

    /// Removes every node of `kind` under one write lock.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::LockPoisoned`] if a writer panicked.
    pub fn remove_kind(&self, kind: NodeKind) -> Result<Vec<Node>> {
        self.with_write(|graph| Ok(graph.remove_nodes_of_kind(kind)))
    }

    /// Returns an owned snapshot of the sorted edges of `id`.
    ///
    /// # Errors
    /// See [`GeoGraph::sorted_edges`].
    pub fn sorted_edges(&self, id: &NodeId) -> Result<Vec<Edge>> {
        self.with_write(|graph| graph.sorted_edges(id).map(<[Edge]>::to_vec))
    }

    /// Returns owned copies of every node of `kind` within `threshold_km` of
    /// `src`, nearest first.
    ///
    /// # Errors
    /// See [`GeoGraph::neighbours_of_kind`].
    pub fn all_nearest_of_kind(
        &self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
    ) -> Result<Vec<Node>> {
        self.with_write(|graph| {
            Ok(graph
                .all_nearest_of_kind(src, kind, threshold_km)?
                .into_iter()
                .cloned()
                .collect())
        })
    }

    /// Returns an owned copy of the nearest node of `kind` within
    /// `threshold_km` of `src`.
    ///
    /// # Errors
    /// See [`GeoGraph::neighbours_of_kind`].
    pub fn nearest_of_kind(
        &self,
        src: &NodeId,
        kind: NodeKind,
        threshold_km: f64,
    ) -> Result<Option<Node>> {
        self.with_write(|graph| Ok(graph.nearest_of_kind(src, kind, threshold_km)?.cloned()))
    }

    /// Number of nodes currently tracked.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> Result<usize> {
        self.with_read(GeoGraph::len)
    }

    /// Returns `true` when the graph holds no nodes.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> Result<bool> {
        self.with_read(GeoGraph::is_empty)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, GeoGraph>> {
        self.inner.read().map_err(|_| {
            warn!("shared graph lock poisoned");
            GeoGraphError::LockPoisoned
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, GeoGraph>> {
        self.inner.write().map_err(|_| {
            warn!("shared graph lock poisoned");
            GeoGraphError::LockPoisoned
        })
    }
}
