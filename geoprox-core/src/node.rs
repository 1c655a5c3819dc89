//! Node identity, kind tags, and the geolocated node value.

use core::{fmt, str::FromStr};

use thiserror::Error;

use crate::coordinate::{Coordinate, CoordinateError};

/// Opaque node identifier. Identity is by value, never by reference.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NodeId(String);

impl NodeId {
    /// Wraps an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrows the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Kind tag distinguishing the entities tracked by the graph.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    /// A geolocated news article.
    Article,
    /// A place visited by the user.
    Place,
}

impl NodeKind {
    /// Returns every kind in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Article, Self::Place]
    }

    /// Stable display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Article => "Article",
            Self::Place => "Place",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a [`NodeKind`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown node kind `{provided}`; expected `article` or `place`")]
pub struct ParseNodeKindError {
    /// Raw value supplied by the caller.
    pub provided: String,
}

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ParseNodeKindError {
                provided: raw.to_owned(),
            })
    }
}

/// A geolocated entity tracked by the graph.
///
/// # Examples
/// ```
/// use geoprox_core::{GeoGraphError, Node, NodeKind};
///
/// let node = Node::try_from_degrees("nyc", 40.7128, -74.0060, NodeKind::Article)?
///     .with_label("Storm makes landfall");
/// assert_eq!(node.id().as_str(), "nyc");
/// assert_eq!(node.kind(), NodeKind::Article);
/// assert_eq!(node.label(), Some("Storm makes landfall"));
/// # Ok::<(), GeoGraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    id: NodeId,
    coordinate: Coordinate,
    kind: NodeKind,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    label: Option<String>,
}

impl Node {
    /// Creates a node from an already validated coordinate.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, coordinate: Coordinate, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            coordinate,
            kind,
            label: None,
        }
    }

    /// Validates raw degrees and creates a node.
    ///
    /// # Errors
    /// Returns [`CoordinateError`] when the latitude or longitude is invalid.
    pub fn try_from_degrees(
        id: impl Into<NodeId>,
        lat: f64,
        long: f64,
        kind: NodeKind,
    ) -> Result<Self, CoordinateError> {
        Ok(Self::new(id, Coordinate::new(lat, long)?, kind))
    }

    /// Attaches a human-readable label such as an article title.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Node identifier.
    #[must_use]
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// Immutable position of the node.
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    /// Kind tag.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Optional display label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
