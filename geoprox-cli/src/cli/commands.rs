//! Command implementations and argument parsing for the geoprox CLI.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use geoprox_core::{
    BatchWindow, DEFAULT_RETENTION, Distance, Edge, GeoGraph, GeoGraphError, Node, NodeId,
    NodeKind,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::payload::load_payload;

const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(5) {
    Some(value) => value,
    None => NonZeroUsize::MIN,
};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "geoprox", about = "Query proximity between geotagged articles and places.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List nodes of one kind near a source node.
    Nearest(NearestArgs),
    /// Print a node's edges, nearest first.
    Edges(EdgesArgs),
    /// Replay the payload's articles as fetch cycles.
    Churn(ChurnArgs),
}

/// Options accepted by the `nearest` command.
#[derive(Debug, Args, Clone)]
pub struct NearestArgs {
    /// Path to the JSON payload.
    pub path: PathBuf,

    /// Identifier of the query source.
    #[arg(long)]
    pub source: String,

    /// Kind of node to return (`article` or `place`).
    #[arg(long)]
    pub kind: NodeKind,

    /// Inclusive search radius in kilometres.
    #[arg(long = "threshold-km", allow_negative_numbers = true)]
    pub threshold_km: f64,

    /// Return at most this many matches.
    #[arg(long, conflicts_with = "first")]
    pub limit: Option<usize>,

    /// Return only the nearest match.
    #[arg(long)]
    pub first: bool,
}

/// Options accepted by the `edges` command.
#[derive(Debug, Args, Clone)]
pub struct EdgesArgs {
    /// Path to the JSON payload.
    pub path: PathBuf,

    /// Identifier of the node whose edges are printed.
    #[arg(long)]
    pub source: String,
}

/// Options accepted by the `churn` command.
#[derive(Debug, Args, Clone)]
pub struct ChurnArgs {
    /// Path to the JSON payload.
    pub path: PathBuf,

    /// Articles inserted per cycle.
    #[arg(long = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: NonZeroUsize,

    /// Number of batches kept live.
    #[arg(long, default_value_t = DEFAULT_RETENTION)]
    pub retention: NonZeroUsize,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The payload file could not be read.
    #[error("failed to read `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The payload was not valid JSON or had the wrong shape.
    #[error("failed to decode `{path}`: {source}")]
    Json {
        /// Path of the offending payload.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// Graph construction or a query failed.
    #[error(transparent)]
    Core(#[from] GeoGraphError),
}

/// A node matched by the `nearest` command.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    /// The matching node.
    pub node: Node,
    /// Distance from the source.
    pub distance: Distance,
}

/// One line of `churn` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    /// One-based cycle number.
    pub cycle: u64,
    /// Articles inserted this cycle.
    pub inserted: usize,
    /// Articles skipped because their id was already live.
    pub skipped: usize,
    /// Articles evicted this cycle.
    pub evicted: usize,
    /// Nodes live after the cycle.
    pub live: usize,
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionSummary {
    /// Result of `nearest`.
    Nearest {
        /// Query source.
        source: NodeId,
        /// Requested kind.
        kind: NodeKind,
        /// Matches, nearest first.
        matches: Vec<NearestMatch>,
    },
    /// Result of `edges`.
    Edges {
        /// Node whose edges were listed.
        source: NodeId,
        /// Edges, nearest first.
        edges: Vec<Edge>,
    },
    /// Result of `churn`.
    Churn {
        /// Configured retention.
        retention: NonZeroUsize,
        /// One entry per replayed cycle.
        cycles: Vec<CycleSummary>,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the payload cannot be loaded or the graph
/// rejects an operation.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use geoprox_cli::cli::{Cli, Command, EdgesArgs, ExecutionSummary, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{"articles": [
///         {"slug": "a", "latlong": {"lat": 0.0, "long": 0.0}},
///         {"slug": "b", "latlong": {"lat": 0.0, "long": 1.0}}
///     ]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Edges(EdgesArgs {
///         path: file.path().to_path_buf(),
///         source: "a".into(),
///     }),
/// };
/// let ExecutionSummary::Edges { edges, .. } = run_cli(cli)? else {
///     unreachable!("edges command yields an edges summary");
/// };
/// assert_eq!(edges.len(), 1);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Nearest(args) => {
            span.record("command", "nearest");
            run_nearest(args)
        }
        Command::Edges(args) => {
            span.record("command", "edges");
            run_edges(args)
        }
        Command::Churn(args) => {
            span.record("command", "churn");
            run_churn(args)
        }
    }
}

#[instrument(
    name = "cli.nearest",
    err,
    skip(args),
    fields(source = %args.source, kind = %args.kind, threshold_km = args.threshold_km),
)]
pub(super) fn run_nearest(args: NearestArgs) -> Result<ExecutionSummary, CliError> {
    let mut graph = build_graph(load_payload(&args.path)?.into_nodes())?;
    let source = NodeId::new(args.source);
    let limit = if args.first { Some(1) } else { args.limit };

    let matches: Vec<NearestMatch> = graph
        .neighbours_of_kind(&source, args.kind, args.threshold_km)?
        .into_iter()
        .take(limit.unwrap_or(usize::MAX))
        .map(|neighbour| NearestMatch {
            node: neighbour.node.clone(),
            distance: neighbour.distance,
        })
        .collect();

    info!(matches = matches.len(), "nearest query completed");
    Ok(ExecutionSummary::Nearest {
        source,
        kind: args.kind,
        matches,
    })
}

#[instrument(name = "cli.edges", err, skip(args), fields(source = %args.source))]
pub(super) fn run_edges(args: EdgesArgs) -> Result<ExecutionSummary, CliError> {
    let mut graph = build_graph(load_payload(&args.path)?.into_nodes())?;
    let source = NodeId::new(args.source);
    let edges = graph.sorted_edges(&source)?.to_vec();
    info!(edges = edges.len(), "edge listing completed");
    Ok(ExecutionSummary::Edges { source, edges })
}

#[instrument(
    name = "cli.churn",
    err,
    skip(args),
    fields(batch_size = args.batch_size.get(), retention = args.retention.get()),
)]
pub(super) fn run_churn(args: ChurnArgs) -> Result<ExecutionSummary, CliError> {
    let articles = load_payload(&args.path)?.articles;
    let mut graph = GeoGraph::with_capacity(args.batch_size.get().saturating_mul(args.retention.get()));
    let mut window = BatchWindow::new(args.retention);

    let mut cycles = Vec::new();
    for batch in articles.chunks(args.batch_size.get()) {
        let report = window.advance(&mut graph, batch.to_vec())?;
        cycles.push(CycleSummary {
            cycle: report.cycle,
            inserted: report.inserted,
            skipped: report.skipped,
            evicted: report.evicted.len(),
            live: graph.len(),
        });
    }

    info!(cycles = cycles.len(), live = graph.len(), "churn replay completed");
    Ok(ExecutionSummary::Churn {
        retention: args.retention,
        cycles,
    })
}

fn build_graph(nodes: Vec<Node>) -> Result<GeoGraph, CliError> {
    let mut graph = GeoGraph::with_capacity(nodes.len());
    graph.add_nodes(nodes)?;
    Ok(graph)
}

/// Renders `summary` to `writer` as tab-separated text.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Nearest {
            source,
            kind,
            matches,
        } => {
            writeln!(writer, "source: {source}")?;
            writeln!(writer, "kind: {kind}")?;
            writeln!(writer, "matches: {}", matches.len())?;
            for found in matches {
                writeln!(
                    writer,
                    "{}\t{}\t{:.3}\t{}",
                    found.node.id(),
                    found.node.kind(),
                    found.distance.value(),
                    found.node.label().unwrap_or("-"),
                )?;
            }
        }
        ExecutionSummary::Edges { source, edges } => {
            writeln!(writer, "source: {source}")?;
            writeln!(writer, "edges: {}", edges.len())?;
            for edge in edges {
                writeln!(writer, "{}\t{:.3}", edge.dest(), edge.distance().value())?;
            }
        }
        ExecutionSummary::Churn { retention, cycles } => {
            writeln!(writer, "retention: {retention}")?;
            for cycle in cycles {
                writeln!(
                    writer,
                    "cycle {}\tinserted {}\tskipped {}\tevicted {}\tlive {}",
                    cycle.cycle, cycle.inserted, cycle.skipped, cycle.evicted, cycle.live,
                )?;
            }
        }
    }
    Ok(())
}
