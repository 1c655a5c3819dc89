//! Structural invariant checks for [`GeoGraph`].
//!
//! The checkers are surfaced via [`GeoGraph::invariants`] so property-based
//! tests can assert graph health after each mutation without reimplementing
//! adjacency traversal.

mod adjacency;
mod symmetry;

use thiserror::Error;

use crate::{graph::GeoGraph, node::NodeId};

use self::{
    adjacency::{check_completeness, check_no_self_edges, check_sorted_marks, check_unique_ids},
    symmetry::check_symmetry,
};

/// Enumerates the structural invariants maintained by [`GeoGraph`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphInvariant {
    /// The insertion sequence and the adjacency map name the same nodes,
    /// each exactly once.
    UniqueIds,
    /// No node has an edge to itself.
    NoSelfEdges,
    /// Every node has exactly one edge to every other node.
    Completeness,
    /// `A -> B` and `B -> A` carry bit-identical distances.
    Symmetry,
    /// Lists marked sorted are non-decreasing in distance.
    SortedMarks,
}

impl GraphInvariant {
    /// Returns all invariants in the order they should be evaluated.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::UniqueIds,
            Self::NoSelfEdges,
            Self::Completeness,
            Self::Symmetry,
            Self::SortedMarks,
        ]
    }
}

/// Reports an invariant violation surfaced by [`GraphInvariantChecker`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphInvariantViolation {
    /// The insertion sequence lists a node more than once.
    #[error("node `{id}` appears more than once in the insertion sequence")]
    DuplicateId {
        /// Repeated identifier.
        id: NodeId,
    },
    /// The insertion sequence and the adjacency map disagree.
    #[error("insertion sequence holds {sequence} node(s) but adjacency holds {adjacency}")]
    SequenceMismatch {
        /// Length of the insertion sequence.
        sequence: usize,
        /// Number of adjacency entries.
        adjacency: usize,
    },
    /// A node references itself.
    #[error("node `{id}` has an edge to itself")]
    SelfEdge {
        /// Offending node.
        id: NodeId,
    },
    /// An edge points at a node that is no longer present.
    #[error("edge `{origin}` -> `{target}` points at a missing node")]
    DanglingEdge {
        /// Source of the edge.
        origin: NodeId,
        /// Missing destination.
        target: NodeId,
    },
    /// A node lacks an edge to another present node.
    #[error("node `{origin}` has no edge to `{target}`")]
    MissingEdge {
        /// Node whose list is incomplete.
        origin: NodeId,
        /// Node that should be reachable.
        target: NodeId,
    },
    /// A node's degree differs from `n - 1`.
    #[error("node `{id}` has {degree} edge(s), expected {expected}")]
    DegreeMismatch {
        /// Offending node.
        id: NodeId,
        /// Actual edge count.
        degree: usize,
        /// Expected edge count.
        expected: usize,
    },
    /// Opposite directions of an edge pair carry different distances.
    #[error("edge `{origin}` -> `{target}` is {forward} km but the reverse is {reverse} km")]
    AsymmetricDistance {
        /// Source of the forward edge.
        origin: NodeId,
        /// Destination of the forward edge.
        target: NodeId,
        /// Forward distance.
        forward: f64,
        /// Reverse distance.
        reverse: f64,
    },
    /// A list marked sorted is out of order.
    #[error("node `{id}` is marked sorted but edge {position} is closer than its predecessor")]
    UnsortedList {
        /// Offending node.
        id: NodeId,
        /// Index of the first out-of-order edge.
        position: usize,
    },
}

/// Helper returned by [`GeoGraph::invariants`] to run structural checks.
#[derive(Debug)]
pub struct GraphInvariantChecker<'graph> {
    graph: &'graph GeoGraph,
}

impl<'graph> GraphInvariantChecker<'graph> {
    pub(crate) const fn new(graph: &'graph GeoGraph) -> Self {
        Self { graph }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_all(&self) -> Result<(), GraphInvariantViolation> {
        self.check_many(GraphInvariant::all())
    }

    /// Runs a custom subset of invariants in the provided order.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
    ) -> Result<(), GraphInvariantViolation> {
        self.run_with_mode(invariants, &mut EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check(&self, invariant: GraphInvariant) -> Result<(), GraphInvariantViolation> {
        self.check_many([invariant])
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<GraphInvariantViolation> {
        let mut violations = Vec::new();
        let mut mode = EvaluationMode::Collect(&mut violations);
        // Collect mode records instead of failing, so this cannot short-circuit.
        let _ = self.run_with_mode(GraphInvariant::all(), &mut mode);
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
        mode: &mut EvaluationMode<'_>,
    ) -> Result<(), GraphInvariantViolation> {
        for invariant in invariants {
            dispatch(self.graph, invariant, mode)?;
        }
        Ok(())
    }
}

fn dispatch(
    graph: &GeoGraph,
    invariant: GraphInvariant,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    match invariant {
        GraphInvariant::UniqueIds => check_unique_ids(graph, mode),
        GraphInvariant::NoSelfEdges => check_no_self_edges(graph, mode),
        GraphInvariant::Completeness => check_completeness(graph, mode),
        GraphInvariant::Symmetry => check_symmetry(graph, mode),
        GraphInvariant::SortedMarks => check_sorted_marks(graph, mode),
    }
}

pub(super) enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<GraphInvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(&mut self, violation: GraphInvariantViolation) -> Result<(), GraphInvariantViolation> {
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}
