#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Great-circle distance and point-to-point spatial joins.
//!
//! Every distance in this crate is the haversine distance of
//! [`distance::distance`]; the R-tree in [`index`] is only used to prune
//! candidates, so results are never biased by treating degrees as a flat
//! plane.
//!
//! * [`join`] attaches columns from the nearest record of one dataset to
//!   every record of another.
//! * [`within_radius`] lists the records around a point.

pub mod distance;
pub mod index;
pub mod join;
pub mod progress;
pub mod proximity;

pub use distance::{EARTH_RADIUS_KM, distance};
pub use index::{NearestIndex, Neighbor};
pub use join::{JoinedRecord, join, join_with_progress};
pub use progress::{NullProgress, ProgressCallback};
pub use proximity::{Nearby, within_radius};

/// Errors from spatial operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpatialError {
    /// A join was asked to match against an empty destination set.
    #[error("nearest-neighbor join needs at least one destination point")]
    EmptyDestination,

    /// A source record cannot be located.
    #[error("source record {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the record in the source slice.
        index: usize,
    },

    /// The matched destination record lacks a requested column.
    #[error("destination record {index} has no column {column:?}")]
    MissingColumn {
        /// The requested column.
        column: String,
        /// Position of the record in the destination slice.
        index: usize,
    },
}
