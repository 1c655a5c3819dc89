//! Domain primitives shared by the distance routines.

use core::{cmp::Ordering, fmt, ops::Deref};

/// Great-circle distance in kilometres.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Distance(f64);

impl Distance {
    pub(crate) const fn from_raw(value: f64) -> Self {
        Self(value)
    }

    /// Returns the raw distance in kilometres.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.0
    }

    /// Total ordering used when sorting adjacency lists.
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Deref for Distance {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} km", self.0)
    }
}
