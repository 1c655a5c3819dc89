use crate::coordinate::Coordinate;
use crate::distance::types::Distance;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Computes the great-circle distance between two coordinates.
///
/// Latitudes are converted from their stored degree values at the point of
/// use. The intermediate haversine term is clamped to `[0, 1]` so rounding
/// near antipodes cannot feed a negative value into the square root.
///
/// # Examples
///
/// ```
/// use geoprox_core::{Coordinate, CoordinateError, haversine_distance};
///
/// fn main() -> Result<(), CoordinateError> {
///     let new_york = Coordinate::new(40.7128, -74.0060)?;
///     let london = Coordinate::new(51.508_53, -0.125_74)?;
///     let distance = haversine_distance(new_york, london);
///     assert!((distance.value() - 5570.0).abs() < 15.0);
///     Ok(())
/// }
/// ```
#[must_use]
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> Distance {
    let delta_lat = (to.latitude() - from.latitude()).to_radians();
    let delta_long = (to.longitude() - from.longitude()).to_radians();

    let half_lat = (delta_lat / 2.0).sin();
    let half_long = (delta_long / 2.0).sin();
    let a = half_lat.mul_add(
        half_lat,
        from.latitude().to_radians().cos()
            * to.latitude().to_radians().cos()
            * half_long
            * half_long,
    );
    let a = a.clamp(0.0, 1.0);

    Distance::from_raw(EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt()))
}
