//! Error types for the Geoprox core library.
//!
//! Defines the error enum exposed by the public API and a convenient result
//! alias.

use std::fmt;

use thiserror::Error;

use crate::{coordinate::CoordinateError, node::NodeId};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced by [`crate::GeoGraph`] mutations and queries.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GeoGraphError {
    /// A node with the same identifier is already present.
    #[error("node `{id}` is already present in the graph")]
    DuplicateNode {
        /// Identifier that collided.
        id: NodeId,
    },
    /// The referenced node is not present.
    #[error("node `{id}` is not present in the graph")]
    NodeNotFound {
        /// Identifier that was looked up.
        id: NodeId,
    },
    /// A node coordinate failed validation.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    /// A nearest-neighbour threshold was negative or NaN.
    #[error("threshold must be a non-negative number of kilometres (got {value})")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },
    /// A thread panicked while holding the shared graph lock.
    #[error("shared graph lock was poisoned")]
    LockPoisoned,
}

define_error_codes! {
    /// Stable codes describing [`GeoGraphError`] variants.
    enum GeoGraphErrorCode for GeoGraphError {
        /// A node with the same identifier is already present.
        DuplicateNode => DuplicateNode { .. } => "GEOGRAPH_DUPLICATE_NODE",
        /// The referenced node is not present.
        NodeNotFound => NodeNotFound { .. } => "GEOGRAPH_NODE_NOT_FOUND",
        /// A node coordinate failed validation.
        InvalidCoordinate => InvalidCoordinate(..) => "GEOGRAPH_INVALID_COORDINATE",
        /// A nearest-neighbour threshold was negative or NaN.
        InvalidThreshold => InvalidThreshold { .. } => "GEOGRAPH_INVALID_THRESHOLD",
        /// A thread panicked while holding the shared graph lock.
        LockPoisoned => LockPoisoned => "GEOGRAPH_LOCK_POISONED",
    }
}

/// Convenient result alias for graph operations.
pub type Result<T> = core::result::Result<T, GeoGraphError>;
