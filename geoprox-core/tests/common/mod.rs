use geoprox_core::{Node, NodeKind};

/// Seed articles pinned to major cities.
pub const CITIES: &[(&str, f64, f64)] = &[
    ("new-york", 40.7128, -74.0060),
    ("tokyo", 35.6895, 139.691_71),
    ("osaka", 34.693_74, 135.502_18),
    ("boston", 42.3601, -71.0589),
    ("tampa", 27.9506, -82.4572),
    ("seattle", 47.606_21, -122.332_07),
    ("los-angeles", 34.052_23, -118.243_68),
    ("london", 51.508_53, -0.125_74),
    ("barcelona", 41.388_79, 2.158_99),
    ("moscow", 55.752_22, 37.615_56),
    ("cairo", 30.0444, 31.2357),
    ("sao-paulo", -23.5505, -46.6333),
    ("nairobi", -1.2921, 36.8219),
    ("lagos", 6.5244, 3.3792),
    ("mumbai", 19.0760, 72.8777),
    ("beijing", 39.9042, 116.4074),
];

#[must_use]
pub fn node(id: &str, lat: f64, long: f64, kind: NodeKind) -> Node {
    Node::try_from_degrees(id, lat, long, kind).expect("fixture coordinates are valid")
}

#[must_use]
pub fn city_articles() -> Vec<Node> {
    CITIES
        .iter()
        .map(|&(id, lat, long)| node(id, lat, long, NodeKind::Article))
        .collect()
}
