//! `geoprox` entry point.
//!
//! Diagnostics go to stderr through `tracing`; the rendered summary is the
//! only thing written to stdout.

use std::io::{BufWriter, Write, stdout};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use geoprox_cli::cli::{Cli, CliError, render_summary, run_cli};
use geoprox_cli::logging::init_logging;
use geoprox_core::GeoGraphErrorCode;
use tracing::error;

fn run(cli: Cli) -> anyhow::Result<()> {
    let summary = run_cli(cli).context("command failed")?;
    let mut out = BufWriter::new(stdout().lock());
    render_summary(&summary, &mut out).context("could not write summary")?;
    out.flush().context("could not flush stdout")
}

/// Stable code of the graph error behind `err`, if there is one.
fn graph_error_code(err: &anyhow::Error) -> Option<GeoGraphErrorCode> {
    match err.downcast_ref::<CliError>()? {
        CliError::Core(core) => Some(core.code()),
        CliError::Io { .. } | CliError::Json { .. } => None,
    }
}

#[expect(
    clippy::print_stderr,
    reason = "no subscriber exists to carry this diagnostic"
)]
fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        eprintln!("geoprox: logging setup failed: {err}");
        return ExitCode::FAILURE;
    }

    let Err(err) = run(Cli::parse()) else {
        return ExitCode::SUCCESS;
    };
    let chain = format!("{err:#}");
    match graph_error_code(&err) {
        Some(code) => error!(error = %chain, code = code.as_str(), "geoprox failed"),
        None => error!(error = %chain, "geoprox failed"),
    }
    ExitCode::FAILURE
}
