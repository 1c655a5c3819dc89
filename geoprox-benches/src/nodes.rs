//! Seeded synthetic node sets.
//!
//! Coordinates are drawn uniformly over the latitude and longitude ranges,
//! and each node is tagged as a place with a configurable probability.

use geoprox_core::{CoordinateError, Node, NodeKind};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use thiserror::Error;

/// Errors raised while generating synthetic nodes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SyntheticError {
    /// `count` was zero.
    #[error("node count must be greater than zero")]
    ZeroCount,
    /// `place_probability` was outside `[0, 1]` or not finite.
    #[error("place probability must lie within [0, 1], got {value}")]
    InvalidPlaceProbability {
        /// Value supplied by the caller.
        value: f64,
    },
    /// A generated coordinate was rejected.
    #[error(transparent)]
    Coordinate(#[from] CoordinateError),
}

/// Configuration for [`generate_nodes`].
#[derive(Clone, Debug)]
pub struct SyntheticNodesConfig {
    /// Number of nodes to generate.
    pub count: usize,
    /// Probability that a node is a [`NodeKind::Place`].
    pub place_probability: f64,
    /// RNG seed.
    pub seed: u64,
    /// Prefix for generated identifiers, so several sets can share a graph.
    pub id_prefix: &'static str,
}

impl SyntheticNodesConfig {
    /// Config with the default one-in-four place mix and `n` identifiers.
    #[must_use]
    pub const fn new(count: usize, seed: u64) -> Self {
        Self {
            count,
            place_probability: 0.25,
            seed,
            id_prefix: "n",
        }
    }
}

/// Generates `config.count` nodes with distinct identifiers.
///
/// The same config always yields the same nodes.
///
/// # Errors
/// Returns [`SyntheticError`] when the configuration is invalid.
///
/// # Examples
/// ```
/// use geoprox_benches::nodes::{SyntheticNodesConfig, generate_nodes};
///
/// let nodes = generate_nodes(&SyntheticNodesConfig::new(3, 7))?;
/// assert_eq!(nodes[2].id().as_str(), "n2");
/// # Ok::<(), geoprox_benches::nodes::SyntheticError>(())
/// ```
pub fn generate_nodes(config: &SyntheticNodesConfig) -> Result<Vec<Node>, SyntheticError> {
    if config.count == 0 {
        return Err(SyntheticError::ZeroCount);
    }
    if !(0.0..=1.0).contains(&config.place_probability) {
        return Err(SyntheticError::InvalidPlaceProbability {
            value: config.place_probability,
        });
    }

    let mut rng = SmallRng::seed_from_u64(config.seed);
    (0..config.count)
        .map(|index| {
            let lat = rng.gen_range(-90.0..=90.0);
            let long = rng.gen_range(-180.0..=180.0);
            let kind = if rng.gen_bool(config.place_probability) {
                NodeKind::Place
            } else {
                NodeKind::Article
            };
            Ok(Node::try_from_degrees(
                format!("{}{index}", config.id_prefix),
                lat,
                long,
                kind,
            )?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use geoprox_core::GeoGraph;
    use rstest::rstest;

    #[rstest]
    fn generation_is_deterministic() {
        let config = SyntheticNodesConfig::new(50, 11);
        let first = generate_nodes(&config).expect("valid config");
        let second = generate_nodes(&config).expect("valid config");
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(1.0, 40)]
    fn place_probability_controls_kind_mix(#[case] probability: f64, #[case] places: usize) {
        let config = SyntheticNodesConfig {
            place_probability: probability,
            ..SyntheticNodesConfig::new(40, 3)
        };
        let nodes = generate_nodes(&config).expect("valid config");
        let count = nodes
            .iter()
            .filter(|node| node.kind() == NodeKind::Place)
            .count();
        assert_eq!(count, places);
    }

    #[rstest]
    fn prefixed_sets_can_share_a_graph() {
        let mut graph = GeoGraph::new();
        for (prefix, seed) in [("a", 1), ("b", 2)] {
            let config = SyntheticNodesConfig {
                id_prefix: prefix,
                ..SyntheticNodesConfig::new(10, seed)
            };
            graph
                .add_nodes(generate_nodes(&config).expect("valid config"))
                .expect("prefixes keep ids distinct");
        }
        assert_eq!(graph.len(), 20);
    }

    #[rstest]
    #[case::zero(SyntheticNodesConfig::new(0, 1), SyntheticError::ZeroCount)]
    #[case::probability(
        SyntheticNodesConfig { place_probability: 1.5, ..SyntheticNodesConfig::new(5, 1) },
        SyntheticError::InvalidPlaceProbability { value: 1.5 },
    )]
    fn invalid_configs_are_rejected(
        #[case] config: SyntheticNodesConfig,
        #[case] expected: SyntheticError,
    ) {
        assert_eq!(generate_nodes(&config), Err(expected));
    }
}
