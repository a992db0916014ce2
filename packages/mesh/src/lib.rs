#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Hierarchical fixed-resolution mesh codes.
//!
//! A coordinate is quantized into a 1st-order (4-digit), 2nd-order (6-digit)
//! or 3rd-order (8-digit, roughly 1 km) cell of a national standard grid:
//!
//! | Tier | Digits | Cell height (lat) | Cell width (lon) |
//! |------|--------|-------------------|------------------|
//! | 1st  | 4      | 1/1.5 deg (40')   | 1 deg            |
//! | 2nd  | 6      | 1/12 deg (5')     | 1/8 deg (7.5')   |
//! | 3rd  | 8      | 1/120 deg (30")   | 1/80 deg (45")   |
//!
//! Coarser codes are prefixes of every finer code nested inside them.
//! Decoding returns the south-west reference corner of the cell, so
//! `decode(encode(c))` is a lossy quantization of `c`, never `c` itself.
//!
//! The free functions ([`encode1`], [`encode2`], [`encode3`], [`decode`],
//! [`adjacent`]) use [`GridScheme::JIS`] in permissive mode. Callers that
//! need another scheme, or strict domain validation, build a
//! [`GridScheme`] and call its methods.

pub mod bounds;
pub mod code;
pub mod navigate;
pub mod scheme;

pub use bounds::CellBounds;
pub use code::{MeshCode, MeshTier};
pub use navigate::Direction;
pub use scheme::{Domain, GridScheme, Validation};
pub use wild_hazard_geography_models::Coordinate;

/// Errors from mesh code operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// The coordinate lies outside the domain of a strict grid scheme.
    #[error("coordinate (lon {longitude}, lat {latitude}) is outside the grid scheme domain")]
    OutOfRange {
        /// Offending longitude.
        longitude: f64,
        /// Offending latitude.
        latitude: f64,
    },

    /// The value is not a mesh code (non-numeric or more than 8 digits).
    #[error("invalid mesh code {input:?}: {reason}")]
    InvalidMeshCode {
        /// The rejected input, as given.
        input: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Encodes a coordinate as a 1st-order (4-digit) mesh code.
///
/// Precondition: the coordinate lies inside the JIS grid domain. Outside
/// it the result is well defined but geographically meaningless.
#[must_use]
pub fn encode1(coord: Coordinate) -> MeshCode {
    GridScheme::JIS.encode_unchecked(coord, MeshTier::First)
}

/// Encodes a coordinate as a 2nd-order (6-digit) mesh code.
///
/// Same precondition as [`encode1`].
#[must_use]
pub fn encode2(coord: Coordinate) -> MeshCode {
    GridScheme::JIS.encode_unchecked(coord, MeshTier::Second)
}

/// Encodes a coordinate as a 3rd-order (8-digit) mesh code.
///
/// Same precondition as [`encode1`].
#[must_use]
pub fn encode3(coord: Coordinate) -> MeshCode {
    GridScheme::JIS.encode_unchecked(coord, MeshTier::Third)
}

/// Decodes a mesh code of any tier to its south-west reference corner.
#[must_use]
pub fn decode(code: MeshCode) -> Coordinate {
    GridScheme::JIS.decode(code)
}

/// Returns the 3rd-order mesh code adjacent to `code` in `direction`.
#[must_use]
pub fn adjacent(code: MeshCode, direction: Direction) -> MeshCode {
    GridScheme::JIS.adjacent_unchecked(code, direction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_tokyo_station() {
        let tokyo = Coordinate::new(139.767_125, 35.681_236);
        assert_eq!(encode1(tokyo).value(), 5339);
        assert_eq!(encode2(tokyo).value(), 533_946);
        assert_eq!(encode3(tokyo).value(), 53_394_611);
    }

    #[test]
    fn coarser_codes_are_prefixes() {
        let coord = Coordinate::new(140.740_593, 40.824_308);
        let third = encode3(coord).value();
        assert_eq!(third / 100, encode2(coord).value());
        assert_eq!(third / 10_000, encode1(coord).value());
    }

    #[test]
    fn decode_returns_south_west_corner() {
        let corner = decode(MeshCode::new(53_394_611).unwrap());
        assert!((corner.latitude - (53.0 / 1.5 + 4.0 / 12.0 + 1.0 / 120.0)).abs() < 1e-12);
        assert!((corner.longitude - (139.0 + 6.0 / 8.0 + 1.0 / 80.0)).abs() < 1e-12);
    }

    #[test]
    fn right_then_left_round_trips() {
        let origin = MeshCode::new(53_394_611).unwrap();
        let moved = adjacent(origin, Direction::RIGHT);
        assert_eq!(moved.value(), 53_394_612);
        assert_eq!(adjacent(moved, Direction::LEFT), origin);
    }

    #[test]
    fn left_moves_exactly_one_cell() {
        let origin = MeshCode::new(53_394_615).unwrap();
        assert_eq!(adjacent(origin, Direction::LEFT).value(), 53_394_614);
    }
}
