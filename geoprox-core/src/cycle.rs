//! Batch bookkeeping for periodic fetch/evict cycles.
//!
//! A feed that refreshes on a timer inserts one batch per cycle and evicts
//! the batch that has aged out of the retention window. [`BatchWindow`]
//! records which cycle owns each identifier, so eviction removes exactly the
//! nodes the stale batch still owns and nothing else.

use std::{
    collections::{HashMap, VecDeque},
    num::NonZeroUsize,
};

use tracing::{debug, info, instrument};

use crate::{
    error::Result,
    graph::GeoGraph,
    node::{Node, NodeId},
};

/// Number of batches kept live by default: the current batch and the one
/// before it. A batch is evicted two cycles after it arrived.
pub const DEFAULT_RETENTION: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Outcome of a single [`BatchWindow::advance`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// One-based cycle number.
    pub cycle: u64,
    /// Number of nodes inserted this cycle.
    pub inserted: usize,
    /// Number of batch entries whose id was already live and so were not
    /// inserted again.
    pub skipped: usize,
    /// Nodes evicted this cycle, in batch order.
    pub evicted: Vec<Node>,
}

/// Sliding window over the most recent fetch batches.
///
/// An id that arrives while already live keeps its existing node. If the
/// window inserted that node, ownership moves to the newer batch, so an
/// entry the feed keeps returning stays live.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
///
/// use geoprox_core::{BatchWindow, GeoGraph, GeoGraphError, Node, NodeKind};
///
/// let mut graph = GeoGraph::new();
/// let mut window = BatchWindow::new(NonZeroUsize::MIN);
/// window.advance(&mut graph, vec![Node::try_from_degrees("a", 0.0, 0.0, NodeKind::Article)?])?;
/// let report =
///     window.advance(&mut graph, vec![Node::try_from_degrees("b", 1.0, 1.0, NodeKind::Article)?])?;
/// assert_eq!(report.evicted.len(), 1);
/// assert_eq!(graph.len(), 1);
/// # Ok::<(), GeoGraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct BatchWindow {
    retention: NonZeroUsize,
    batches: VecDeque<(u64, Vec<NodeId>)>,
    owners: HashMap<NodeId, u64>,
    cycle: u64,
}

impl Default for BatchWindow {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl BatchWindow {
    /// Creates a window that keeps `retention` batches live.
    #[must_use]
    pub fn new(retention: NonZeroUsize) -> Self {
        Self {
            retention,
            batches: VecDeque::with_capacity(retention.get() + 1),
            owners: HashMap::new(),
            cycle: 0,
        }
    }

    /// Configured retention.
    #[must_use]
    pub const fn retention(&self) -> NonZeroUsize {
        self.retention
    }

    /// Number of completed cycles.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Identifiers of the live batches, oldest first.
    pub fn live_batches(&self) -> impl Iterator<Item = &[NodeId]> {
        self.batches.iter().map(|(_, ids)| ids.as_slice())
    }

    /// Cycle whose batch currently owns `id`, if the window owns it at all.
    #[must_use]
    pub fn owner_of(&self, id: &NodeId) -> Option<u64> {
        self.owners.get(id).copied()
    }

    /// Inserts `batch` and evicts whichever batches fell out of the window.
    ///
    /// Entries whose id is already live are skipped and counted in
    /// [`CycleReport::skipped`]. The rest are inserted all-or-nothing; a
    /// rejected batch leaves both the graph and the window unchanged.
    /// Eviction only removes nodes the stale batch still owns, so ids
    /// removed elsewhere or re-inserted by a later batch survive it.
    ///
    /// # Errors
    /// Propagates [`crate::GeoGraphError::DuplicateNode`] when `batch`
    /// repeats an id that is not yet live.
    #[instrument(
        name = "cycle.advance",
        level = "debug",
        err,
        skip_all,
        fields(cycle = self.cycle + 1, batch = batch.len()),
    )]
    pub fn advance(&mut self, graph: &mut GeoGraph, batch: Vec<Node>) -> Result<CycleReport> {
        let cycle = self.cycle + 1;
        let (fresh, repeated): (Vec<Node>, Vec<Node>) = batch
            .into_iter()
            .partition(|node| !graph.contains(node.id()));
        let mut ids: Vec<NodeId> = fresh.iter().map(|node| node.id().clone()).collect();
        let inserted = graph.add_nodes(fresh)?;

        for id in &ids {
            self.owners.insert(id.clone(), cycle);
        }
        for node in &repeated {
            match self.owners.get_mut(node.id()) {
                Some(owner) if *owner != cycle => {
                    *owner = cycle;
                    ids.push(node.id().clone());
                }
                _ => {}
            }
        }
        if !repeated.is_empty() {
            debug!(skipped = repeated.len(), "skipped ids already live");
        }
        self.batches.push_back((cycle, ids));
        self.cycle = cycle;

        let mut evicted = Vec::new();
        while self.batches.len() > self.retention.get() {
            let Some((stale_cycle, stale)) = self.batches.pop_front() else {
                break;
            };
            evicted.extend(self.evict(graph, stale_cycle, &stale)?);
        }

        info!(
            cycle,
            inserted,
            skipped = repeated.len(),
            evicted = evicted.len(),
            live = graph.len(),
            "completed fetch cycle"
        );
        Ok(CycleReport {
            cycle,
            inserted,
            skipped: repeated.len(),
            evicted,
        })
    }

    fn evict(
        &mut self,
        graph: &mut GeoGraph,
        stale_cycle: u64,
        stale: &[NodeId],
    ) -> Result<Vec<Node>> {
        let mut owned = Vec::with_capacity(stale.len());
        for id in stale {
            if self.owners.get(id) != Some(&stale_cycle) {
                continue;
            }
            self.owners.remove(id);
            if graph.contains(id) {
                owned.push(id);
            }
        }
        graph.remove_nodes(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;

    use rstest::rstest;

    fn article(id: &str, lat: f64) -> Node {
        Node::try_from_degrees(id, lat, lat * -2.0, NodeKind::Article).expect("valid coordinate")
    }

    fn batch(prefix: &str, size: u8) -> Vec<Node> {
        (0..size)
            .map(|i| article(&format!("{prefix}{i}"), f64::from(i) * 10.0))
            .collect()
    }

    fn ids(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|node| node.id().as_str()).collect()
    }

    #[rstest]
    fn evicts_batch_from_two_cycles_prior() {
        let mut graph = GeoGraph::new();
        let mut window = BatchWindow::default();

        let first = window.advance(&mut graph, batch("a", 3)).expect("cycle 1");
        assert!(first.evicted.is_empty());
        let second = window.advance(&mut graph, batch("b", 3)).expect("cycle 2");
        assert!(second.evicted.is_empty());
        assert_eq!(graph.len(), 6);

        let third = window.advance(&mut graph, batch("c", 3)).expect("cycle 3");
        assert_eq!(ids(&third.evicted), ["a0", "a1", "a2"]);
        assert_eq!(third.cycle, 3);
        assert_eq!(graph.len(), 6);
        graph.invariants().check_all().expect("graph remains complete");
    }

    #[rstest]
    fn skips_ids_removed_elsewhere() {
        let mut graph = GeoGraph::new();
        let mut window = BatchWindow::new(NonZeroUsize::MIN);
        window.advance(&mut graph, batch("a", 2)).expect("cycle 1");
        graph
            .remove_node(&NodeId::new("a0"))
            .expect("a0 present");

        let report = window.advance(&mut graph, batch("b", 2)).expect("cycle 2");
        assert_eq!(ids(&report.evicted), ["a1"]);
        assert_eq!(graph.len(), 2);
    }

    #[rstest]
    fn overlapping_batch_skips_live_ids_and_keeps_advancing() {
        let mut graph = GeoGraph::new();
        let mut window = BatchWindow::default();
        window.advance(&mut graph, batch("a", 2)).expect("cycle 1");

        let mut second = batch("b", 2);
        second.push(article("a0", 40.0));
        let report = window.advance(&mut graph, second).expect("cycle 2");
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(window.cycle(), 2);
        assert_eq!(graph.len(), 4);
        assert_eq!(window.owner_of(&NodeId::new("a0")), Some(2));

        let third = window.advance(&mut graph, batch("c", 1)).expect("cycle 3");
        assert_eq!(ids(&third.evicted), ["a1"]);
        assert!(graph.contains(&NodeId::new("a0")));

        let fourth = window.advance(&mut graph, batch("d", 1)).expect("cycle 4");
        assert_eq!(ids(&fourth.evicted), ["b0", "b1", "a0"]);
        assert_eq!(graph.len(), 2);
        graph.invariants().check_all().expect("graph remains complete");
    }

    #[rstest]
    fn reinserted_id_outlives_its_first_batch() {
        let mut graph = GeoGraph::new();
        let mut window = BatchWindow::default();
        window
            .advance(&mut graph, vec![article("x", 5.0), article("a0", 0.0)])
            .expect("cycle 1");
        graph.remove_node(&NodeId::new("x")).expect("x present");

        let second = window
            .advance(&mut graph, vec![article("x", 6.0)])
            .expect("cycle 2");
        assert_eq!((second.inserted, second.skipped), (1, 0));

        let third = window.advance(&mut graph, batch("c", 1)).expect("cycle 3");
        assert_eq!(ids(&third.evicted), ["a0"]);
        assert!(graph.contains(&NodeId::new("x")));
        assert_eq!(window.owner_of(&NodeId::new("x")), Some(2));
    }

    #[rstest]
    fn live_ids_inserted_elsewhere_are_never_evicted() {
        let mut graph = GeoGraph::new();
        graph.add_node(article("pinned", 1.0)).expect("unique");
        let mut window = BatchWindow::new(NonZeroUsize::MIN);

        let first = window
            .advance(&mut graph, vec![article("pinned", 2.0), article("a0", 3.0)])
            .expect("cycle 1");
        assert_eq!(first.skipped, 1);
        assert_eq!(window.owner_of(&NodeId::new("pinned")), None);

        let second = window.advance(&mut graph, batch("b", 1)).expect("cycle 2");
        assert_eq!(ids(&second.evicted), ["a0"]);
        assert!(graph.contains(&NodeId::new("pinned")));
    }

    #[rstest]
    fn rejected_batch_does_not_advance() {
        let mut graph = GeoGraph::new();
        let mut window = BatchWindow::default();
        window.advance(&mut graph, batch("a", 2)).expect("cycle 1");
        window
            .advance(&mut graph, vec![article("z", 1.0), article("z", 2.0)])
            .expect_err("z repeats within the batch");
        assert_eq!(window.cycle(), 1);
        assert_eq!(window.live_batches().count(), 1);
        assert_eq!(window.owner_of(&NodeId::new("z")), None);
        assert_eq!(graph.len(), 2);
    }
}
