//! Unit tests for payload loading and CLI commands.

use super::commands::{run_churn, run_edges, run_nearest};
use super::payload::parse_payload;
use super::{
    ChurnArgs, Cli, CliError, Command, CycleSummary, EdgesArgs, ExecutionSummary, NearestArgs,
    render_summary, run_cli,
};

use std::fs::File;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::Parser;
use geoprox_core::{GeoGraphError, NodeKind};
use rstest::rstest;
use tempfile::TempDir;
use tracing::Level;

use geoprox_test_support::tracing::capture;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const FEED: &str = r#"{
    "articles": [
        {
            "_id": {"$oid": "5f1a"},
            "slug": "fog-over-the-thames",
            "title": "Fog over the Thames",
            "url": "https://news.example/fog",
            "latlong": {"lat": 51.50853, "long": -0.12574}
        },
        {
            "slug": "subway-expansion",
            "title": "Subway expansion approved",
            "latlong": {"lat": 40.7128, "long": -74.006}
        },
        {"slug": "no-location", "title": "Opinion"},
        {"title": "Anonymous", "latlong": {"lat": 1.0, "long": 1.0}}
    ],
    "places": [
        {"id": "british-museum", "name": "British Museum", "latlong": {"lat": 51.5194, "long": -0.127}},
        {"id": "greenwich", "latlong": {"lat": 51.4769, "long": -0.0005}},
        {"id": "central-park", "name": "Central Park", "latlong": {"lat": 40.7829, "long": -73.9654}}
    ]
}"#;

const SEVEN_CITIES: &str = r#"{"articles": [
    {"slug": "new-york", "latlong": {"lat": 40.7128, "long": -74.006}},
    {"slug": "tokyo", "latlong": {"lat": 35.6895, "long": 139.69171}},
    {"slug": "osaka", "latlong": {"lat": 34.69374, "long": 135.50218}},
    {"slug": "boston", "latlong": {"lat": 42.3601, "long": -71.0589}},
    {"slug": "tampa", "latlong": {"lat": 27.9506, "long": -82.4572}},
    {"slug": "seattle", "latlong": {"lat": 47.60621, "long": -122.33207}},
    {"slug": "london", "latlong": {"lat": 51.50853, "long": -0.12574}}
]}"#;

#[rstest]
fn payload_ids_prefer_object_id_and_skip_unusable_articles() -> TestResult {
    let payload = parse_payload(FEED.as_bytes(), Path::new("feed.json"))?;
    let articles: Vec<(&str, Option<&str>)> = payload
        .articles
        .iter()
        .map(|node| (node.id().as_str(), node.label()))
        .collect();
    assert_eq!(
        articles,
        [
            ("5f1a", Some("Fog over the Thames")),
            ("subway-expansion", Some("Subway expansion approved")),
        ]
    );
    assert!(payload.articles.iter().all(|n| n.kind() == NodeKind::Article));

    let places: Vec<(&str, Option<&str>)> = payload
        .places
        .iter()
        .map(|node| (node.id().as_str(), node.label()))
        .collect();
    assert_eq!(
        places,
        [
            ("british-museum", Some("British Museum")),
            ("greenwich", None),
            ("central-park", Some("Central Park")),
        ]
    );
    Ok(())
}

#[rstest]
fn skipped_articles_are_reported() {
    let (result, layer) = capture(|| parse_payload(FEED.as_bytes(), Path::new("feed.json")));
    result.expect("feed parses");

    let missing_coordinates = layer.events_with_message("skipped article without coordinates");
    assert_eq!(missing_coordinates.len(), 1);
    assert_eq!(missing_coordinates[0].level, Level::WARN);
    assert_eq!(missing_coordinates[0].field("id"), Some("no-location"));

    let missing_id = layer.events_with_message("skipped article without identifier");
    assert_eq!(missing_id.len(), 1);
    assert_eq!(missing_id[0].field("index"), Some("3"));
}

#[rstest]
fn payload_without_places_is_accepted() -> TestResult {
    let payload = parse_payload(SEVEN_CITIES.as_bytes(), Path::new("cities.json"))?;
    assert_eq!(payload.articles.len(), 7);
    assert!(payload.places.is_empty());
    Ok(())
}

#[rstest]
#[case::out_of_range(r#"{"places": [{"id": "x", "latlong": {"lat": 91.0, "long": 0.0}}]}"#)]
#[case::malformed("{\"articles\": [")]
#[case::wrong_shape(r#"{"articles": {"slug": "a"}}"#)]
fn invalid_payloads_are_rejected(#[case] raw: &str) {
    let err = parse_payload(raw.as_bytes(), Path::new("bad.json")).expect_err("payload invalid");
    assert!(matches!(err, CliError::Json { .. }));
    assert!(err.to_string().contains("bad.json"));
}

#[rstest]
fn nearest_lists_places_within_threshold() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let summary = run_nearest(nearest_args(path, "5f1a", 50.0))?;
    let ExecutionSummary::Nearest { matches, kind, .. } = summary else {
        panic!("nearest yields a nearest summary");
    };
    assert_eq!(kind, NodeKind::Place);
    let ids: Vec<&str> = matches.iter().map(|m| m.node.id().as_str()).collect();
    assert_eq!(ids, ["british-museum", "greenwich"]);
    assert!(matches[0].distance.value() < matches[1].distance.value());
    Ok(())
}

#[rstest]
#[case::first(None, true, &["british-museum"])]
#[case::limit(Some(1), false, &["british-museum"])]
#[case::limit_beyond_matches(Some(10), false, &["british-museum", "greenwich"])]
#[case::zero(Some(0), false, &[])]
fn nearest_honours_result_caps(
    #[case] limit: Option<usize>,
    #[case] first: bool,
    #[case] expected: &[&str],
) -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let args = NearestArgs {
        limit,
        first,
        ..nearest_args(path, "5f1a", 50.0)
    };
    let ExecutionSummary::Nearest { matches, .. } = run_nearest(args)? else {
        panic!("nearest yields a nearest summary");
    };
    let ids: Vec<&str> = matches.iter().map(|m| m.node.id().as_str()).collect();
    assert_eq!(ids, expected);
    Ok(())
}

#[rstest]
#[case::unknown_source("atlantis", 10.0, "GEOGRAPH_NODE_NOT_FOUND")]
#[case::negative_threshold("5f1a", -1.0, "GEOGRAPH_INVALID_THRESHOLD")]
fn nearest_surfaces_core_errors(
    #[case] source: &str,
    #[case] threshold_km: f64,
    #[case] code: &str,
) -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let err = run_nearest(nearest_args(path, source, threshold_km))
        .expect_err("query must be rejected");
    match err {
        CliError::Core(core) => assert_eq!(core.code().as_str(), code),
        other => panic!("expected a core error, got {other:?}"),
    }
    Ok(())
}

#[rstest]
fn duplicate_ids_in_payload_are_rejected() -> TestResult {
    let dir = temp_dir();
    let raw = r#"{"articles": [
        {"slug": "a", "latlong": {"lat": 0.0, "long": 0.0}},
        {"slug": "a", "latlong": {"lat": 1.0, "long": 1.0}}
    ]}"#;
    let path = create_payload(&dir, "dupes.json", raw)?;
    let err = run_edges(EdgesArgs {
        path,
        source: "a".into(),
    })
    .expect_err("duplicate ids");
    assert!(matches!(
        err,
        CliError::Core(GeoGraphError::DuplicateNode { .. })
    ));
    Ok(())
}

#[rstest]
fn edges_are_listed_nearest_first() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let ExecutionSummary::Edges { edges, .. } = run_edges(EdgesArgs {
        path,
        source: "5f1a".into(),
    })?
    else {
        panic!("edges yields an edges summary");
    };
    let dests: Vec<&str> = edges.iter().map(|edge| edge.dest().as_str()).collect();
    assert_eq!(
        dests,
        ["british-museum", "greenwich", "central-park", "subway-expansion"]
    );
    Ok(())
}

#[rstest]
fn churn_replays_cycles_with_retention() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "cities.json", SEVEN_CITIES)?;
    let summary = run_churn(ChurnArgs {
        path,
        batch_size: non_zero(3),
        retention: non_zero(2),
    })?;
    let ExecutionSummary::Churn { cycles, .. } = summary else {
        panic!("churn yields a churn summary");
    };
    assert_eq!(
        cycles,
        [
            CycleSummary { cycle: 1, inserted: 3, skipped: 0, evicted: 0, live: 3 },
            CycleSummary { cycle: 2, inserted: 3, skipped: 0, evicted: 0, live: 6 },
            CycleSummary { cycle: 3, inserted: 1, skipped: 0, evicted: 3, live: 4 },
        ]
    );
    Ok(())
}

#[rstest]
fn churn_survives_articles_repeated_across_batches() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(
        &dir,
        "repeats.json",
        r#"{"articles": [
            {"slug": "tokyo", "latlong": {"lat": 35.6895, "long": 139.69171}},
            {"slug": "osaka", "latlong": {"lat": 34.69374, "long": 135.50218}},
            {"slug": "tokyo", "latlong": {"lat": 35.6895, "long": 139.69171}},
            {"slug": "boston", "latlong": {"lat": 42.3601, "long": -71.0589}},
            {"slug": "tampa", "latlong": {"lat": 27.9506, "long": -82.4572}}
        ]}"#,
    )?;
    let summary = run_churn(ChurnArgs {
        path,
        batch_size: non_zero(2),
        retention: non_zero(2),
    })?;
    let ExecutionSummary::Churn { cycles, .. } = summary else {
        panic!("churn yields a churn summary");
    };
    assert_eq!(
        cycles,
        [
            CycleSummary { cycle: 1, inserted: 2, skipped: 0, evicted: 0, live: 2 },
            CycleSummary { cycle: 2, inserted: 1, skipped: 1, evicted: 0, live: 3 },
            CycleSummary { cycle: 3, inserted: 1, skipped: 0, evicted: 1, live: 3 },
        ]
    );
    Ok(())
}

#[rstest]
fn missing_payload_is_an_io_error() {
    let dir = temp_dir();
    let err = run_edges(EdgesArgs {
        path: dir.path().join("missing.json"),
        source: "a".into(),
    })
    .expect_err("file is missing");
    assert!(matches!(err, CliError::Io { .. }));
}

#[rstest]
fn run_cli_records_command_and_payload_spans() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let cli = Cli {
        command: Command::Nearest(nearest_args(path, "5f1a", 50.0)),
    };
    let (summary, layer) = capture(|| run_cli(cli));
    summary?;

    let run = layer.span("cli.run").expect("cli.run span must exist");
    assert_eq!(run.field("command"), Some("nearest"));

    let load = layer.span("cli.load_payload").expect("load span must exist");
    assert!(load.field("path").is_some_and(|p| p.ends_with("feed.json")));
    assert_eq!(load.field("articles"), Some("2"));
    assert_eq!(load.field("places"), Some("3"));

    let [completed] = layer
        .events_with_message("nearest query completed")
        .try_into()
        .expect("one completion event");
    assert_eq!(completed.level, Level::INFO);
    assert_eq!(completed.field("matches"), Some("2"));
    Ok(())
}

#[rstest]
fn render_summary_outputs_tab_separated_rows() -> TestResult {
    let dir = temp_dir();
    let path = create_payload(&dir, "feed.json", FEED)?;
    let summary = run_nearest(nearest_args(path, "5f1a", 50.0))?;
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "source: 5f1a");
    assert_eq!(lines[2], "matches: 2");
    assert_eq!(lines[3], "british-museum\tPlace\t1.212\tBritish Museum");
    assert_eq!(lines[4], "greenwich\tPlace\t9.357\t-");
    Ok(())
}

#[rstest]
fn render_churn_summary() -> TestResult {
    let summary = ExecutionSummary::Churn {
        retention: non_zero(2),
        cycles: vec![CycleSummary {
            cycle: 1,
            inserted: 5,
            skipped: 0,
            evicted: 0,
            live: 5,
        }],
    };
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "retention: 2\ncycle 1\tinserted 5\tskipped 0\tevicted 0\tlive 5\n"
    );
    Ok(())
}

#[rstest]
fn clap_parses_nearest_arguments() -> TestResult {
    let cli = Cli::try_parse_from([
        "geoprox",
        "nearest",
        "feed.json",
        "--source",
        "5f1a",
        "--kind",
        "PLACE",
        "--threshold-km",
        "25.5",
        "--first",
    ])?;
    let Command::Nearest(args) = cli.command else {
        panic!("nearest subcommand expected");
    };
    assert_eq!(args.kind, NodeKind::Place);
    assert!((args.threshold_km - 25.5).abs() < f64::EPSILON);
    assert!(args.first);
    assert_eq!(args.limit, None);
    Ok(())
}

#[rstest]
fn clap_applies_churn_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["geoprox", "churn", "feed.json"])?;
    let Command::Churn(args) = cli.command else {
        panic!("churn subcommand expected");
    };
    assert_eq!(args.batch_size.get(), 5);
    assert_eq!(args.retention.get(), 2);
    Ok(())
}

#[rstest]
#[case::limit_and_first(&["--limit", "2", "--first"])]
#[case::unknown_kind(&["--kind", "venue"])]
fn clap_rejects_bad_nearest_flags(#[case] extra: &[&str]) {
    let mut args = vec![
        "geoprox",
        "nearest",
        "feed.json",
        "--source",
        "a",
        "--threshold-km",
        "1",
    ];
    if !extra.contains(&"--kind") {
        args.extend(["--kind", "place"]);
    }
    args.extend_from_slice(extra);
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn clap_rejects_zero_batch_size() {
    let result = Cli::try_parse_from(["geoprox", "churn", "feed.json", "--batch-size", "0"]);
    assert!(result.is_err());
}

fn nearest_args(path: PathBuf, source: &str, threshold_km: f64) -> NearestArgs {
    NearestArgs {
        path,
        source: source.to_owned(),
        kind: NodeKind::Place,
        threshold_km,
        limit: None,
        first: false,
    }
}

fn non_zero(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).expect("value is non-zero")
}

fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

fn create_payload(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}
