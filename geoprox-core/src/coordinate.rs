//! Validated geographic coordinates expressed in degrees.

use core::fmt;

use thiserror::Error;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Identifies which component of a coordinate failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// The north/south component.
    Latitude,
    /// The east/west component.
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latitude => f.write_str("latitude"),
            Self::Longitude => f.write_str("longitude"),
        }
    }
}

/// Errors emitted while constructing a [`Coordinate`].
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum CoordinateError {
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {value} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// The rejected latitude in degrees.
        value: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {value} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// The rejected longitude in degrees.
        value: f64,
    },
    /// A component was NaN or infinite.
    #[error("{axis} must be finite (got {value})")]
    NonFinite {
        /// Component carrying the non-finite value.
        axis: Axis,
        /// The rejected value.
        value: f64,
    },
}

/// Latitude/longitude pair in degrees.
///
/// Values are validated on construction and never change afterwards, so
/// distances derived from a coordinate stay valid for the lifetime of the
/// node that owns it.
///
/// # Examples
/// ```
/// use geoprox_core::{Coordinate, CoordinateError};
///
/// let london = Coordinate::new(51.508_53, -0.125_74)?;
/// assert_eq!(london.latitude(), 51.508_53);
///
/// let err = Coordinate::new(91.0, 0.0).expect_err("latitude out of range");
/// assert!(matches!(err, CoordinateError::LatitudeOutOfRange { .. }));
/// # Ok::<(), CoordinateError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate", into = "RawCoordinate"))]
pub struct Coordinate {
    lat: f64,
    long: f64,
}

impl Coordinate {
    /// Validates and constructs a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError::NonFinite`] when either component is NaN or
    /// infinite, and the range variants when a component lies outside its
    /// valid interval. Bounds are inclusive.
    pub fn new(lat: f64, long: f64) -> Result<Self, CoordinateError> {
        let lat = validate(lat, Axis::Latitude, MAX_LATITUDE)?;
        let long = validate(long, Axis::Longitude, MAX_LONGITUDE)?;
        Ok(Self { lat, long })
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.long
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.long)
    }
}

fn validate(value: f64, axis: Axis, bound: f64) -> Result<f64, CoordinateError> {
    if !value.is_finite() {
        return Err(CoordinateError::NonFinite { axis, value });
    }
    if value.abs() > bound {
        return Err(match axis {
            Axis::Latitude => CoordinateError::LatitudeOutOfRange { value },
            Axis::Longitude => CoordinateError::LongitudeOutOfRange { value },
        });
    }
    Ok(value)
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawCoordinate {
    lat: f64,
    long: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.long)
    }
}

#[cfg(feature = "serde")]
impl From<Coordinate> for RawCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            lat: coordinate.lat,
            long: coordinate.long,
        }
    }
}
