//! All-or-nothing batch mutations.
//!
//! A batch is validated in full before the first edge list is touched, so a
//! rejected batch leaves the graph exactly as it was.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::{
    error::{GeoGraphError, Result},
    node::{Node, NodeId},
};

use super::core::GeoGraph;

impl GeoGraph {
    /// Inserts every node in `nodes`, or none of them.
    ///
    /// Returns the number of inserted nodes.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::DuplicateNode`] when an identifier is already
    /// present or repeats within the batch.
    #[instrument(name = "geograph.add_nodes", level = "debug", err, skip_all)]
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> Result<usize> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        self.ensure_insertable(&nodes)?;

        let inserted = nodes.len();
        self.order.reserve(inserted);
        self.entries.reserve(inserted);
        for node in nodes {
            self.attach(node);
        }
        debug!(inserted, total = self.len(), "inserted batch");
        Ok(inserted)
    }

    /// Removes every node named in `ids`, or none of them.
    ///
    /// Returns the removed nodes in the order requested.
    ///
    /// # Errors
    /// Returns [`GeoGraphError::NodeNotFound`] when an identifier is absent or
    /// repeats within the request.
    #[instrument(name = "geograph.remove_nodes", level = "debug", err, skip_all)]
    pub fn remove_nodes<'a>(
        &mut self,
        ids: impl IntoIterator<Item = &'a NodeId>,
    ) -> Result<Vec<Node>> {
        let ids: Vec<&NodeId> = ids.into_iter().collect();
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            if !self.contains(id) || !seen.insert(id) {
                return Err(GeoGraphError::NodeNotFound { id: id.clone() });
            }
        }

        let removed: Vec<Node> = ids.into_iter().filter_map(|id| self.detach(id)).collect();
        debug!(removed = removed.len(), remaining = self.len(), "removed batch");
        Ok(removed)
    }

    fn ensure_insertable(&self, nodes: &[Node]) -> Result<()> {
        let mut seen = HashSet::with_capacity(nodes.len());
        for node in nodes {
            if self.contains(node.id()) || !seen.insert(node.id()) {
                return Err(GeoGraphError::DuplicateNode {
                    id: node.id().clone(),
                });
            }
        }
        Ok(())
    }
}
