#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address-to-coordinate lookup.
//!
//! Proximity queries start from a street address, so anything that can
//! turn an address into a position implements [`Geocoder`]. A missing
//! match is an ordinary outcome (`Ok(None)`), not an error; use [`require`]
//! where a match is mandatory.
//!
//! The crate ships one implementation, the in-memory [`Gazetteer`], loaded
//! from rows or a CSV table.

pub mod address;
pub mod gazetteer;

pub use address::normalize_address;
pub use gazetteer::Gazetteer;

use thiserror::Error;
use wild_hazard_geography_models::Coordinate;

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The address did not resolve to a position.
    #[error("Address not found: {address}")]
    NotFound {
        /// The address as given by the caller.
        address: String,
    },

    /// Reading geocoder data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Geocoder data is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Geocoder data has the wrong shape.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Resolves addresses to coordinates.
pub trait Geocoder {
    /// Looks up `address`.
    ///
    /// Returns `Ok(None)` when the address is unknown.
    ///
    /// # Errors
    ///
    /// Implementations return an error only when the lookup itself fails.
    fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        (**self).locate(address)
    }
}

/// Looks up `address`, treating a missing match as an error.
///
/// # Errors
///
/// * [`GeocodeError::NotFound`] if the geocoder has no match.
/// * Any error returned by the geocoder.
pub fn require<G: Geocoder + ?Sized>(
    geocoder: &G,
    address: &str,
) -> Result<Coordinate, GeocodeError> {
    geocoder
        .locate(address)?
        .ok_or_else(|| GeocodeError::NotFound {
            address: address.to_string(),
        })
}
