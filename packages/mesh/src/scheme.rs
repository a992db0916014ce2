//! Grid scheme configuration and the encode/decode formulas.
//!
//! A [`GridScheme`] is an immutable value: several schemes (or the same
//! scheme with different validation) can be used side by side.

use serde::{Deserialize, Serialize};

use crate::code::{MeshCode, MeshTier};
use crate::{Coordinate, MeshError};

/// 2nd-order cells per 1st-order cell along each axis.
const SECOND_DIVISIONS: f64 = 8.0;
/// 3rd-order cells per 1st-order cell along each axis.
const THIRD_DIVISIONS: f64 = 80.0;

/// How a scheme treats coordinates outside its [`Domain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Validation {
    /// Encode anything. Out-of-domain input yields a meaningless code;
    /// validating upstream data is the caller's job.
    #[default]
    Permissive,
    /// Reject out-of-domain coordinates with [`MeshError::OutOfRange`].
    Strict,
}

/// Half-open longitude/latitude box `[min, max)` a scheme can encode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// Inclusive lower longitude bound.
    pub min_longitude: f64,
    /// Exclusive upper longitude bound.
    pub max_longitude: f64,
    /// Inclusive lower latitude bound.
    pub min_latitude: f64,
    /// Exclusive upper latitude bound.
    pub max_latitude: f64,
}

impl Domain {
    /// Whether the coordinate is finite and inside the box.
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.longitude.is_finite()
            && coord.latitude.is_finite()
            && (self.min_longitude..self.max_longitude).contains(&coord.longitude)
            && (self.min_latitude..self.max_latitude).contains(&coord.latitude)
    }
}

/// Parameters of a hierarchical mesh grid.
///
/// The digit layout is fixed (two latitude digits, two longitude digits,
/// then one digit per axis for each finer tier); the scheme chooses where
/// the longitude digits start and how many 1st-order rows fit in a degree
/// of latitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridScheme {
    /// Longitude subtracted before taking the two longitude digits.
    pub longitude_origin: f64,
    /// 1st-order rows per degree of latitude.
    pub latitude_factor: f64,
    /// Coordinates whose codes keep two-digit latitude/longitude groups.
    pub domain: Domain,
    /// Out-of-domain handling.
    pub validation: Validation,
}

impl GridScheme {
    /// The Japanese standard regional mesh (JIS X 0410), permissive.
    pub const JIS: Self = Self {
        longitude_origin: 100.0,
        latitude_factor: 1.5,
        domain: Domain {
            min_longitude: 100.0,
            max_longitude: 200.0,
            min_latitude: 10.0 / 1.5,
            max_latitude: 100.0 / 1.5,
        },
        validation: Validation::Permissive,
    };

    /// Returns a copy of this scheme with the given validation mode.
    #[must_use]
    pub const fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    /// Returns a copy of this scheme in strict mode.
    #[must_use]
    pub const fn strict(self) -> Self {
        self.with_validation(Validation::Strict)
    }

    /// Cell size `(longitude, latitude)` in degrees at `tier`.
    #[must_use]
    pub fn cell_size(&self, tier: MeshTier) -> (f64, f64) {
        match tier {
            MeshTier::First => (1.0, 1.0 / self.latitude_factor),
            MeshTier::Second => (
                1.0 / SECOND_DIVISIONS,
                1.0 / (self.latitude_factor * SECOND_DIVISIONS),
            ),
            MeshTier::Third => (
                1.0 / THIRD_DIVISIONS,
                1.0 / (self.latitude_factor * THIRD_DIVISIONS),
            ),
        }
    }

    /// Checks a coordinate against the domain when the scheme is strict.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] for out-of-domain coordinates in
    /// strict mode. Permissive schemes accept everything.
    pub fn check(&self, coord: Coordinate) -> Result<(), MeshError> {
        if self.validation == Validation::Strict && !self.domain.contains(coord) {
            return Err(MeshError::OutOfRange {
                longitude: coord.longitude,
                latitude: coord.latitude,
            });
        }
        Ok(())
    }

    /// Encodes a coordinate at the given tier.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] if the scheme is strict and the
    /// coordinate is outside its domain.
    pub fn encode(&self, coord: Coordinate, tier: MeshTier) -> Result<MeshCode, MeshError> {
        self.check(coord)?;
        Ok(self.encode_unchecked(coord, tier))
    }

    /// Encodes without consulting [`Validation`].
    #[must_use]
    pub fn encode_unchecked(&self, coord: Coordinate, tier: MeshTier) -> MeshCode {
        let lat = coord.latitude;
        let lon = coord.longitude - self.longitude_origin;

        let first = floor_i64(lat * self.latitude_factor)
            .saturating_mul(100)
            .saturating_add(floor_i64(lon));
        if tier == MeshTier::First {
            return MeshCode::saturating(first);
        }

        let second = first.saturating_mul(100).saturating_add(
            floor_i64(lat * (self.latitude_factor * SECOND_DIVISIONS)).rem_euclid(8) * 10
                + floor_i64(lon * SECOND_DIVISIONS).rem_euclid(8),
        );
        if tier == MeshTier::Second {
            return MeshCode::saturating(second);
        }

        let third = second.saturating_mul(100).saturating_add(
            floor_i64(lat * (self.latitude_factor * THIRD_DIVISIONS)).rem_euclid(10) * 10
                + floor_i64(lon * THIRD_DIVISIONS).rem_euclid(10),
        );
        MeshCode::saturating(third)
    }

    /// Decodes a code to the south-west corner of its cell.
    ///
    /// Missing trailing digits count as zero, so a coarse code decodes to
    /// the corner of its own (coarse) cell.
    ///
    /// The corner is exact only up to float rounding (about `1e-9`
    /// degrees). A coordinate lying exactly on a grid line can encode into
    /// a cell whose decoded corner sits a few ulps north or east of it;
    /// compare decoded corners with a tolerance.
    #[must_use]
    pub fn decode(&self, code: MeshCode) -> Coordinate {
        let d = code.padded_digits().map(f64::from);

        let mut lat = d[0].mul_add(10.0, d[1]) / self.latitude_factor;
        let mut lon = d[2].mul_add(10.0, d[3]) + self.longitude_origin;

        lat += d[4] / (self.latitude_factor * SECOND_DIVISIONS);
        lon += d[5] / SECOND_DIVISIONS;

        lat += d[6] / (self.latitude_factor * THIRD_DIVISIONS);
        lon += d[7] / THIRD_DIVISIONS;

        Coordinate::new(lon, lat)
    }

    /// Parses and decodes a textual mesh code.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshCode`] if `code` is not numeric or
    /// has more than 8 digits.
    pub fn decode_str(&self, code: &str) -> Result<Coordinate, MeshError> {
        Ok(self.decode(code.parse()?))
    }
}

impl Default for GridScheme {
    fn default() -> Self {
        Self::JIS
    }
}

#[allow(clippy::cast_possible_truncation)]
fn floor_i64(value: f64) -> i64 {
    value.floor() as i64
}
