//! Benchmark support crate for geoprox.
//!
//! Generates reproducible synthetic node sets and parameter labels used by the
//! Criterion benchmarks for insertion, neighbour queries, and fetch-cycle
//! churn.

pub mod error;
pub mod nodes;
pub mod params;
