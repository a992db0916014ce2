//! Nearest-neighbor spatial join between two point datasets.

use wild_hazard_geography_models::PointRecord;

use crate::SpatialError;
use crate::index::NearestIndex;
use crate::progress::{NullProgress, ProgressCallback};

/// A source record carrying the columns copied from its nearest
/// destination record.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
    /// Copy of the source record with the requested columns overwritten.
    pub record: PointRecord,
    /// Position of the matched record in the destination slice.
    pub matched_index: usize,
    /// Great-circle distance to the matched record, in kilometres.
    pub distance_km: f64,
}

/// For every record in `src`, copies `columns` from the closest record in
/// `dst` (by great-circle distance) into a copy of the source record.
///
/// Output order follows `src`. Columns not named in `columns` are never
/// copied; a requested column that already exists on the source record is
/// overwritten. When several destination records are equally close, the
/// one that appears first in `dst` wins.
///
/// # Errors
///
/// * [`SpatialError::EmptyDestination`] if `dst` has no finite coordinate.
/// * [`SpatialError::NonFiniteCoordinate`] if a source record has a
///   non-finite coordinate.
/// * [`SpatialError::MissingColumn`] if the matched destination record
///   lacks a requested column.
pub fn join<S: AsRef<str>>(
    src: &[PointRecord],
    dst: &[PointRecord],
    columns: &[S],
) -> Result<Vec<JoinedRecord>, SpatialError> {
    join_with_progress(src, dst, columns, &NullProgress)
}

/// [`join`], reporting one unit of progress per source record.
///
/// # Errors
///
/// Same as [`join`].
pub fn join_with_progress<S: AsRef<str>>(
    src: &[PointRecord],
    dst: &[PointRecord],
    columns: &[S],
    progress: &dyn ProgressCallback,
) -> Result<Vec<JoinedRecord>, SpatialError> {
    let index = NearestIndex::build(dst.iter().map(|r| r.coordinate).collect());
    if index.is_empty() {
        return Err(SpatialError::EmptyDestination);
    }

    log::info!(
        "Joining {} source records onto {} destination records ({} columns)",
        src.len(),
        index.len(),
        columns.len()
    );
    progress.set_total(src.len() as u64);

    let mut joined = Vec::with_capacity(src.len());
    for (i, source) in src.iter().enumerate() {
        let neighbor = index
            .nearest(source.coordinate)
            .ok_or(SpatialError::NonFiniteCoordinate { index: i })?;
        let matched = &dst[neighbor.index];

        let mut record = source.clone();
        for column in columns {
            let column = column.as_ref();
            let value = matched
                .attribute(column)
                .ok_or_else(|| SpatialError::MissingColumn {
                    column: column.to_string(),
                    index: neighbor.index,
                })?;
            record
                .attributes
                .insert(column.to_string(), value.to_string());
        }

        joined.push(JoinedRecord {
            record,
            matched_index: neighbor.index,
            distance_km: neighbor.distance_km,
        });
        progress.inc(1);
    }

    progress.finish(format!("Joined {} records", joined.len()));
    Ok(joined)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use wild_hazard_geography_models::Coordinate;

    use super::*;

    fn point(lon: f64, lat: f64) -> PointRecord {
        PointRecord::new(Coordinate::new(lon, lat))
    }

    #[test]
    fn exact_match_beats_farther_point() {
        let src = vec![point(135.0, 35.0)];
        let dst = vec![
            point(135.0, 35.0).with_attribute("tag", "A"),
            point(140.0, 40.0).with_attribute("tag", "B"),
        ];
        let joined = join(&src, &dst, &["tag"]).unwrap();
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].record.attribute("tag"), Some("A"));
        assert_eq!(joined[0].matched_index, 0);
    }

    #[test]
    fn empty_destination_is_an_error() {
        let src = vec![point(135.0, 35.0)];
        assert!(matches!(
            join::<&str>(&src, &[], &["tag"]),
            Err(SpatialError::EmptyDestination)
        ));
    }

    #[test]
    fn copies_only_requested_columns() {
        let src = vec![point(140.0, 40.0).with_attribute("id", "s1")];
        let dst = vec![
            point(140.01, 40.01)
                .with_attribute("prefcode", "02")
                .with_attribute("citycode", "02201")
                .with_attribute("secret", "x"),
        ];
        let joined = join(&src, &dst, &["prefcode", "citycode"]).unwrap();
        let record = &joined[0].record;
        assert_eq!(record.attribute("id"), Some("s1"));
        assert_eq!(record.attribute("prefcode"), Some("02"));
        assert_eq!(record.attribute("citycode"), Some("02201"));
        assert_eq!(record.attribute("secret"), None);
        assert_eq!(record.coordinate, Coordinate::new(140.0, 40.0));
    }

    #[test]
    fn requested_columns_overwrite_source_values() {
        let src = vec![point(140.0, 40.0).with_attribute("tag", "old")];
        let dst = vec![point(140.0, 40.0).with_attribute("tag", "new")];
        let joined = join(&src, &dst, &["tag"]).unwrap();
        assert_eq!(joined[0].record.attribute("tag"), Some("new"));
    }

    #[test]
    fn output_follows_source_order() {
        let src = vec![point(141.0, 41.0), point(139.0, 36.0), point(141.0, 41.0)];
        let dst = vec![
            point(139.0, 36.0).with_attribute("tag", "south"),
            point(141.0, 41.0).with_attribute("tag", "north"),
        ];
        let tags: Vec<String> = join(&src, &dst, &["tag"])
            .unwrap()
            .into_iter()
            .map(|j| j.record.attributes["tag"].clone())
            .collect();
        assert_eq!(tags, vec!["north", "south", "north"]);
    }

    #[test]
    fn missing_destination_column_is_reported() {
        let src = vec![point(140.0, 40.0)];
        let dst = vec![point(140.0, 40.0).with_attribute("tag", "A")];
        let err = join(&src, &dst, &["tag", "kind"]).unwrap_err();
        assert!(matches!(
            err,
            SpatialError::MissingColumn { ref column, index: 0 } if column == "kind"
        ));
    }

    #[test]
    fn non_finite_source_is_reported() {
        let src = vec![point(140.0, 40.0), point(f64::NAN, 40.0)];
        let dst = vec![point(140.0, 40.0).with_attribute("tag", "A")];
        assert!(matches!(
            join(&src, &dst, &["tag"]),
            Err(SpatialError::NonFiniteCoordinate { index: 1 })
        ));
    }

    #[test]
    fn reports_progress_per_record() {
        struct Counter(AtomicU64);
        impl ProgressCallback for Counter {
            fn set_total(&self, _total: u64) {}
            fn inc(&self, delta: u64) {
                self.0.fetch_add(delta, Ordering::Relaxed);
            }
            fn finish(&self, _msg: String) {}
        }

        let counter = Counter(AtomicU64::new(0));
        let src = vec![point(140.0, 40.0); 5];
        let dst = vec![point(140.0, 40.0).with_attribute("tag", "A")];
        join_with_progress(&src, &dst, &["tag"], &counter).unwrap();
        assert_eq!(counter.0.load(Ordering::Relaxed), 5);
    }
}
