//! Command-line interface orchestration for geoprox.
//!
//! Every command loads an article feed payload, builds a proximity graph from
//! it, and reports either neighbour queries or a replay of fetch cycles.

mod commands;
mod payload;

pub use commands::{
    ChurnArgs, Cli, CliError, Command, CycleSummary, EdgesArgs, ExecutionSummary, NearestArgs,
    NearestMatch, render_summary, run_cli,
};
pub use payload::{Payload, load_payload};

#[cfg(test)]
mod tests;
