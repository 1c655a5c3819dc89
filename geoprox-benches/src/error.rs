//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of panicking
//! midway through a Criterion group.

use geoprox_core::GeoGraphError;

use crate::nodes::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic node generation failed.
    #[error("synthetic node generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building the graph under test failed.
    #[error("graph operation failed: {0}")]
    Graph(#[from] GeoGraphError),
}
