#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate and record types shared by the mesh codec, the spatial join,
//! and the region registry.
//!
//! All types here are plain values: constructed from caller-supplied data
//! and never mutated behind shared references.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A WGS84 position in degrees.
///
/// The mesh codec assumes positions inside the region its grid scheme was
/// designed for (latitude > 0, longitude > 100 for the JIS scheme). Values
/// outside that region are representable but encode to meaningless codes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a `(longitude, latitude)` pair.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns a copy shifted by the given longitude/latitude deltas.
    #[must_use]
    pub fn offset(self, d_lon: f64, d_lat: f64) -> Self {
        Self {
            longitude: self.longitude + d_lon,
            latitude: self.latitude + d_lat,
        }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((longitude, latitude): (f64, f64)) -> Self {
        Self::new(longitude, latitude)
    }
}

/// A row of a point dataset: a position plus arbitrary attribute columns.
///
/// Column names are owned by whoever loaded the data; the core only ever
/// reads the columns a caller names explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRecord {
    /// Position of the row.
    pub coordinate: Coordinate,
    /// Attribute columns keyed by column name.
    pub attributes: BTreeMap<String, String>,
}

impl PointRecord {
    /// Creates a record with no attributes.
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style setter for a single attribute column.
    #[must_use]
    pub fn with_attribute(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(column.into(), value.into());
        self
    }

    /// Returns the value of an attribute column, if present.
    #[must_use]
    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes.get(column).map(String::as_str)
    }
}

/// An administrative region covered by a set of first-order mesh cells.
///
/// Regions are loaded from configuration; neighbouring regions share the
/// first-order cells along their border.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Stable identifier (e.g. `"aomori"`).
    pub id: String,
    /// Human-readable name (e.g. `"Aomori"`).
    pub name: String,
    /// Two-digit administrative code (e.g. `"02"`).
    pub code: String,
    /// First-order (4-digit) mesh codes intersecting the region.
    pub first_order_meshes: Vec<u32>,
}
