//! CSV point tables.
//!
//! Every table has a header row. A point table names its longitude and
//! latitude columns; all columns (including those two) are kept as string
//! attributes so they can be written back unchanged.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use thiserror::Error;
use wild_hazard_geography_models::{Coordinate, PointRecord};

/// Errors from reading or writing CSV tables.
#[derive(Debug, Error)]
pub enum TableError {
    /// Opening a table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A named column is not in the header row.
    #[error("Table has no column '{column}'")]
    MissingColumn {
        /// The requested column.
        column: String,
    },

    /// A numeric column holds something else.
    #[error("Row {row}: invalid {column} value '{value}'")]
    InvalidNumber {
        /// 1-based data row (the header row is not counted).
        row: usize,
        /// The column being parsed.
        column: String,
        /// The raw cell.
        value: String,
    },
}

/// Rows of a CSV table positioned by two of its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PointTable {
    /// Header row, in file order.
    pub headers: Vec<String>,
    /// One record per data row.
    pub records: Vec<PointRecord>,
}

impl PointTable {
    /// Appends `column` to the headers unless it is already there.
    pub fn add_header(&mut self, column: &str) {
        if !self.headers.iter().any(|h| h == column) {
            self.headers.push(column.to_string());
        }
    }
}

/// Opens a CSV file for reading.
///
/// # Errors
///
/// * [`TableError::Io`] if the file cannot be opened.
pub fn open(path: &Path) -> Result<std::fs::File, TableError> {
    Ok(std::fs::File::open(path)?)
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

fn headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, TableError> {
    Ok(reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect())
}

fn column_index(headers: &[String], column: &str) -> Result<usize, TableError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| TableError::MissingColumn {
            column: column.to_string(),
        })
}

fn parse_number<T: std::str::FromStr>(
    raw: &str,
    row: usize,
    column: &str,
) -> Result<T, TableError> {
    raw.parse().map_err(|_| TableError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

/// Reads a point table, taking positions from `lon_column`/`lat_column`.
///
/// # Errors
///
/// * [`TableError::Csv`] if the input is not valid CSV.
/// * [`TableError::MissingColumn`] if either coordinate column is absent.
/// * [`TableError::InvalidNumber`] if a coordinate cell is not a number.
pub fn read_points<R: Read>(
    input: R,
    lon_column: &str,
    lat_column: &str,
) -> Result<PointTable, TableError> {
    let mut reader = reader(input);
    let headers = headers(&mut reader)?;
    let lon_idx = column_index(&headers, lon_column)?;
    let lat_idx = column_index(&headers, lat_column)?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let cell = |idx: usize| row.get(idx).unwrap_or("").trim();

        let coordinate = Coordinate::new(
            parse_number(cell(lon_idx), i + 1, lon_column)?,
            parse_number(cell(lat_idx), i + 1, lat_column)?,
        );
        let mut record = PointRecord::new(coordinate);
        for (idx, header) in headers.iter().enumerate() {
            record
                .attributes
                .insert(header.clone(), cell(idx).to_string());
        }
        records.push(record);
    }

    log::debug!("Read {} points", records.len());
    Ok(PointTable { headers, records })
}

/// Reads `(key, count)` pairs, summing the counts of repeated keys.
///
/// Keys are returned in ascending order.
///
/// # Errors
///
/// * [`TableError::Csv`] if the input is not valid CSV.
/// * [`TableError::MissingColumn`] if either column is absent.
/// * [`TableError::InvalidNumber`] if a count is not a non-negative integer.
pub fn read_counts<R: Read>(
    input: R,
    key_column: &str,
    count_column: &str,
) -> Result<Vec<(String, u64)>, TableError> {
    let mut reader = reader(input);
    let headers = headers(&mut reader)?;
    let key_idx = column_index(&headers, key_column)?;
    let count_idx = column_index(&headers, count_column)?;

    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let key = row.get(key_idx).unwrap_or("").trim().to_string();
        let raw = row.get(count_idx).unwrap_or("").trim();
        let count: u64 = parse_number(raw, i + 1, count_column)?;
        *counts.entry(key).or_default() += count;
    }

    Ok(counts.into_iter().collect())
}

/// Writes `records` under `headers`; a record lacking a column gets an
/// empty cell.
///
/// # Errors
///
/// * [`TableError::Csv`] if writing fails.
pub fn write_points<'a, W: Write>(
    output: W,
    headers: &[String],
    records: impl IntoIterator<Item = &'a PointRecord>,
) -> Result<(), TableError> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(headers.iter().map(|h| record.attribute(h).unwrap_or("")))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGHTINGS: &str = "\
id,lat,lon,kind
1,40.82,140.74,bear
2,39.70,141.15,deer
";

    #[test]
    fn reads_positions_and_keeps_all_columns() {
        let table = read_points(SIGHTINGS.as_bytes(), "lon", "lat").unwrap();
        assert_eq!(table.headers, vec!["id", "lat", "lon", "kind"]);
        assert_eq!(table.records.len(), 2);

        let first = &table.records[0];
        assert_eq!(first.coordinate, Coordinate::new(140.74, 40.82));
        assert_eq!(first.attribute("kind"), Some("bear"));
        assert_eq!(first.attribute("lat"), Some("40.82"));
    }

    #[test]
    fn missing_coordinate_column() {
        let err = read_points(SIGHTINGS.as_bytes(), "longitude", "lat").unwrap_err();
        assert!(matches!(err, TableError::MissingColumn { ref column } if column == "longitude"));
    }

    #[test]
    fn invalid_coordinate_reports_row() {
        let input = "lat,lon\n40.0,140.0\nnorth,141.0\n";
        let err = read_points(input.as_bytes(), "lon", "lat").unwrap_err();
        assert!(matches!(
            err,
            TableError::InvalidNumber { row: 2, ref column, ref value } if column == "lat" && value == "north"
        ));
    }

    #[test]
    fn counts_are_summed_per_key() {
        let input = "area,n\nb,2\na,3\nb,5\n";
        let counts = read_counts(input.as_bytes(), "area", "n").unwrap();
        assert_eq!(counts, vec![("a".to_string(), 3), ("b".to_string(), 7)]);
    }

    #[test]
    fn negative_count_is_invalid() {
        let input = "area,n\na,-1\n";
        assert!(matches!(
            read_counts(input.as_bytes(), "area", "n"),
            Err(TableError::InvalidNumber { row: 1, .. })
        ));
    }

    #[test]
    fn writes_selected_headers_in_order() {
        let mut table = read_points(SIGHTINGS.as_bytes(), "lon", "lat").unwrap();
        table.add_header("mesh_code");
        table.add_header("kind");
        table.records[0]
            .attributes
            .insert("mesh_code".to_string(), "61401589".to_string());

        let mut out = Vec::new();
        write_points(&mut out, &table.headers, &table.records).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,lat,lon,kind,mesh_code\n1,40.82,140.74,bear,61401589\n2,39.70,141.15,deer,\n"
        );
    }
}
