//! Great-circle distance primitives.
//!
//! Distances are computed with the haversine formula over a spherical Earth
//! and reported in kilometres. Inputs are validated [`Coordinate`] values, so
//! the kernel itself cannot fail; it only guards against floating-point drift
//! that would otherwise turn near-antipodal inputs into NaN.
//!
//! [`Coordinate`]: crate::Coordinate

mod haversine;
mod types;

pub use self::haversine::{EARTH_RADIUS_KM, haversine_distance};
pub use self::types::Distance;

// ============================================================================
// Kani Formal Verification
// ============================================================================

#[cfg(kani)]
mod kani_proofs {
    use super::haversine_distance;
    use crate::Coordinate;

    fn any_coordinate() -> Coordinate {
        let lat: f64 = kani::any();
        let long: f64 = kani::any();
        kani::assume(lat.is_finite() && long.is_finite());
        kani::assume(lat.abs() <= 90.0 && long.abs() <= 180.0);
        match Coordinate::new(lat, long) {
            Ok(coordinate) => coordinate,
            Err(_) => kani::panic("validated inputs must construct"),
        }
    }

    /// Verifies haversine symmetry: d(a, b) = d(b, a).
    #[kani::proof]
    fn verify_haversine_symmetry() {
        let a = any_coordinate();
        let b = any_coordinate();
        kani::assert(
            haversine_distance(a, b) == haversine_distance(b, a),
            "haversine distance symmetry violated",
        );
    }

    /// Verifies the distance is never NaN and never negative.
    #[kani::proof]
    fn verify_haversine_is_finite_and_non_negative() {
        let a = any_coordinate();
        let b = any_coordinate();
        let d = haversine_distance(a, b).value();
        kani::assert(d.is_finite(), "haversine distance must be finite");
        kani::assert(d >= 0.0, "haversine distance must be non-negative");
    }
}
