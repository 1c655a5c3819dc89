//! Node-set and per-list invariants: identity, self-edges, completeness, and
//! sorted marks.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::GeoGraph;

pub(super) fn check_unique_ids(
    graph: &GeoGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    let mut seen = HashSet::with_capacity(graph.order.len());
    for id in &graph.order {
        if !seen.insert(id) {
            mode.record(GraphInvariantViolation::DuplicateId { id: id.clone() })?;
        }
    }
    if seen.len() != graph.entries.len() || graph.order.len() != graph.entries.len() {
        mode.record(GraphInvariantViolation::SequenceMismatch {
            sequence: graph.order.len(),
            adjacency: graph.entries.len(),
        })?;
    }
    Ok(())
}

pub(super) fn check_no_self_edges(
    graph: &GeoGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for (id, entry) in &graph.entries {
        if entry.adjacency.edges().iter().any(|edge| edge.dest() == id) {
            mode.record(GraphInvariantViolation::SelfEdge { id: id.clone() })?;
        }
    }
    Ok(())
}

pub(super) fn check_completeness(
    graph: &GeoGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    let expected = graph.entries.len().saturating_sub(1);
    trace!(nodes = graph.entries.len(), expected, "checking completeness");
    for (origin, entry) in &graph.entries {
        let edges = entry.adjacency.edges();
        let targets: HashSet<_> = edges.iter().map(|edge| edge.dest()).collect();

        for target in &targets {
            if !graph.entries.contains_key(*target) {
                mode.record(GraphInvariantViolation::DanglingEdge {
                    origin: origin.clone(),
                    target: (*target).clone(),
                })?;
            }
        }
        for target in graph.entries.keys() {
            if target != origin && !targets.contains(target) {
                debug!(origin = %origin, target = %target, "missing edge");
                mode.record(GraphInvariantViolation::MissingEdge {
                    origin: origin.clone(),
                    target: target.clone(),
                })?;
            }
        }
        if edges.len() != expected {
            mode.record(GraphInvariantViolation::DegreeMismatch {
                id: origin.clone(),
                degree: edges.len(),
                expected,
            })?;
        }
    }
    Ok(())
}

pub(super) fn check_sorted_marks(
    graph: &GeoGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for (id, entry) in &graph.entries {
        if !entry.adjacency.is_sorted() {
            continue;
        }
        let out_of_order = entry
            .adjacency
            .edges()
            .windows(2)
            .position(|pair| match pair {
                [left, right] => left.distance().value() > right.distance().value(),
                _ => false,
            });
        if let Some(position) = out_of_order {
            mode.record(GraphInvariantViolation::UnsortedList {
                id: id.clone(),
                position: position + 1,
            })?;
        }
    }
    Ok(())
}
