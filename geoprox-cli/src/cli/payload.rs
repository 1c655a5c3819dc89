//! Article feed payloads.
//!
//! The feed is a JSON object with an `articles` array in the shape served by
//! the news API and an optional `places` array of named landmarks. Articles
//! missing an identifier or a location cannot join the graph and are skipped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use geoprox_core::{Coordinate, Node, NodeKind};
use serde::Deserialize;
use tracing::{Span, debug, field, instrument, warn};

use super::commands::CliError;

/// Nodes decoded from a payload, split by kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload {
    /// Articles in feed order.
    pub articles: Vec<Node>,
    /// Places in feed order.
    pub places: Vec<Node>,
}

impl Payload {
    /// Articles followed by places.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        let mut nodes = self.articles;
        nodes.extend(self.places);
        nodes
    }
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(default)]
    places: Vec<RawPlace>,
}

#[derive(Deserialize)]
struct RawArticle {
    #[serde(rename = "_id")]
    object_id: Option<ObjectId>,
    slug: Option<String>,
    title: Option<String>,
    latlong: Option<Coordinate>,
}

#[derive(Deserialize)]
struct ObjectId {
    #[serde(rename = "$oid")]
    oid: String,
}

#[derive(Deserialize)]
struct RawPlace {
    id: String,
    name: Option<String>,
    latlong: Coordinate,
}

impl RawArticle {
    fn id(&self) -> Option<&str> {
        self.object_id
            .as_ref()
            .map(|object_id| object_id.oid.as_str())
            .or(self.slug.as_deref())
            .filter(|id| !id.trim().is_empty())
    }
}

/// Reads and decodes the payload at `path`.
///
/// # Errors
/// Returns [`CliError::Io`] when the file cannot be opened or read and
/// [`CliError::Json`] when it is not a valid payload.
#[instrument(
    name = "cli.load_payload",
    err,
    fields(path = field::Empty, articles = field::Empty, places = field::Empty),
)]
pub fn load_payload(path: &Path) -> Result<Payload, CliError> {
    let span = Span::current();
    span.record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = parse_payload(BufReader::new(file), path)?;
    span.record("articles", payload.articles.len());
    span.record("places", payload.places.len());
    Ok(payload)
}

pub(super) fn parse_payload(reader: impl Read, path: &Path) -> Result<Payload, CliError> {
    let raw: RawPayload = serde_json::from_reader(reader).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut articles = Vec::with_capacity(raw.articles.len());
    for (index, article) in raw.articles.into_iter().enumerate() {
        let Some(id) = article.id().map(ToOwned::to_owned) else {
            warn!(index, "skipped article without identifier");
            continue;
        };
        let Some(coordinate) = article.latlong else {
            warn!(index, id = %id, "skipped article without coordinates");
            continue;
        };
        let node = Node::new(id, coordinate, NodeKind::Article);
        articles.push(match article.title {
            Some(title) => node.with_label(title),
            None => node,
        });
    }

    let places = raw
        .places
        .into_iter()
        .map(|place| {
            let node = Node::new(place.id, place.latlong, NodeKind::Place);
            match place.name {
                Some(name) => node.with_label(name),
                None => node,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        articles = articles.len(),
        places = places.len(),
        "decoded payload"
    );
    Ok(Payload { articles, places })
}
