//! In-memory address table.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use wild_hazard_geography_models::Coordinate;

use crate::address::normalize_address;
use crate::{GeocodeError, Geocoder};

/// A [`Geocoder`] backed by a fixed table of known addresses.
///
/// Keys are stored normalized, so lookups tolerate the differences
/// [`normalize_address`] removes. A later row for the same normalized
/// address replaces an earlier one.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: BTreeMap<String, Coordinate>,
}

impl Gazetteer {
    /// Creates an empty gazetteer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a gazetteer from `(address, longitude, latitude)` rows.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: impl IntoIterator<Item = (S, f64, f64)>) -> Self {
        let mut gazetteer = Self::new();
        for (address, longitude, latitude) in rows {
            gazetteer.insert(address.as_ref(), Coordinate::new(longitude, latitude));
        }
        gazetteer
    }

    /// Reads a CSV table with a header row.
    ///
    /// `address_column`, `lon_column` and `lat_column` name the header
    /// columns to read; other columns are ignored.
    ///
    /// # Errors
    ///
    /// * [`GeocodeError::Csv`] if the CSV is malformed.
    /// * [`GeocodeError::Parse`] if a named column is missing or a
    ///   coordinate is not a number.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        address_column: &str,
        lon_column: &str,
        lat_column: &str,
    ) -> Result<Self, GeocodeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| GeocodeError::Parse {
                    message: format!("CSV has no column '{column}'"),
                })
        };
        let address_idx = position(address_column)?;
        let lon_idx = position(lon_column)?;
        let lat_idx = position(lat_column)?;

        let mut gazetteer = Self::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();
            let number = |idx: usize, column: &str| {
                field(idx)
                    .parse::<f64>()
                    .map_err(|e| GeocodeError::Parse {
                        message: format!("row {}: invalid {column} '{}': {e}", row + 1, field(idx)),
                    })
            };

            let longitude = number(lon_idx, lon_column)?;
            let latitude = number(lat_idx, lat_column)?;
            gazetteer.insert(field(address_idx), Coordinate::new(longitude, latitude));
        }

        log::debug!("Loaded {} gazetteer entries", gazetteer.len());
        Ok(gazetteer)
    }

    /// Reads a CSV file; see [`Self::from_csv_reader`].
    ///
    /// # Errors
    ///
    /// * [`GeocodeError::Io`] if the file cannot be opened.
    /// * Any error of [`Self::from_csv_reader`].
    pub fn from_csv_path(
        path: impl AsRef<Path>,
        address_column: &str,
        lon_column: &str,
        lat_column: &str,
    ) -> Result<Self, GeocodeError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, address_column, lon_column, lat_column)
    }

    /// Adds or replaces an entry. Blank addresses are ignored.
    pub fn insert(&mut self, address: &str, coordinate: Coordinate) {
        let key = normalize_address(address);
        if key.is_empty() {
            log::warn!("Ignoring gazetteer entry with blank address");
            return;
        }
        self.entries.insert(key, coordinate);
    }

    /// Number of distinct normalized addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gazetteer has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn locate(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(self.entries.get(&normalize_address(address)).copied())
    }
}
