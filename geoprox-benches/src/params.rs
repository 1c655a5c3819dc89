//! Benchmark parameter labels.

use std::fmt;

/// Parameters for a graph-size benchmark run.
#[derive(Clone, Debug)]
pub struct GraphBenchParams {
    /// Number of nodes in the graph.
    pub node_count: usize,
}

impl fmt::Display for GraphBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.node_count)
    }
}

/// Parameters for a fetch-cycle benchmark run.
#[derive(Clone, Debug)]
pub struct ChurnBenchParams {
    /// Nodes inserted per cycle.
    pub batch_size: usize,
    /// Batches kept live.
    pub retention: usize,
}

impl fmt::Display for ChurnBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch={},keep={}", self.batch_size, self.retention)
    }
}
