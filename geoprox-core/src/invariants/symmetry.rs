//! Distance symmetry invariant.
//!
//! Every directed edge must have a reverse edge carrying the bit-identical
//! distance. A missing reverse edge is left to the completeness check.
use tracing::{Level, debug, trace};

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::GeoGraph;

pub(super) fn check_symmetry(
    graph: &GeoGraph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    if tracing::enabled!(Level::TRACE) {
        trace!(edges = graph.edge_count(), "checking distance symmetry");
    }
    for (origin, entry) in &graph.entries {
        for edge in entry.adjacency.edges() {
            let Some(reverse) = graph.entries.get(edge.dest()).and_then(|target| {
                target
                    .adjacency
                    .edges()
                    .iter()
                    .find(|candidate| candidate.dest() == origin)
            }) else {
                continue;
            };
            let forward = edge.distance().value();
            let backward = reverse.distance().value();
            if forward.to_bits() != backward.to_bits() {
                debug!(origin = %origin, target = %edge.dest(), forward, backward, "asymmetric edge");
                mode.record(GraphInvariantViolation::AsymmetricDistance {
                    origin: origin.clone(),
                    target: edge.dest().clone(),
                    forward,
                    reverse: backward,
                })?;
            }
        }
    }
    Ok(())
}
