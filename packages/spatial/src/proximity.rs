//! "What is near this point" queries over a record set.

use wild_hazard_geography_models::{Coordinate, PointRecord};

use crate::index::NearestIndex;

/// A record found near a query point.
#[derive(Debug, Clone, PartialEq)]
pub struct Nearby<'a> {
    /// The matching record.
    pub record: &'a PointRecord,
    /// Great-circle distance from the query point, in kilometres.
    pub distance_km: f64,
}

/// Returns the records within `radius_km` of `origin` (inclusive), nearest
/// first. Equal distances keep input order.
///
/// Builds a [`NearestIndex`] over `records` for the one query; keep an
/// index around instead when querying the same records repeatedly.
/// Records with non-finite coordinates are never returned.
#[must_use]
pub fn within_radius(
    origin: Coordinate,
    records: &[PointRecord],
    radius_km: f64,
) -> Vec<Nearby<'_>> {
    NearestIndex::build(records.iter().map(|r| r.coordinate).collect())
        .within_radius(origin, radius_km)
        .into_iter()
        .map(|neighbor| Nearby {
            record: &records[neighbor.index],
            distance_km: neighbor.distance_km,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::distance;

    #[test]
    fn keeps_points_inside_radius_nearest_first() {
        let origin = Coordinate::new(140.74, 40.82);
        let records = vec![
            PointRecord::new(Coordinate::new(140.74, 40.90)).with_attribute("id", "b"),
            PointRecord::new(Coordinate::new(141.74, 40.82)).with_attribute("id", "far"),
            PointRecord::new(Coordinate::new(140.75, 40.82)).with_attribute("id", "a"),
        ];
        let ids: Vec<&str> = within_radius(origin, &records, 10.0)
            .iter()
            .filter_map(|n| n.record.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn radius_is_inclusive() {
        let origin = Coordinate::new(140.0, 40.0);
        let point = Coordinate::new(140.0, 40.1);
        let records = vec![PointRecord::new(point)];
        let exact = distance(origin, point);
        assert_eq!(within_radius(origin, &records, exact).len(), 1);
        assert!(within_radius(origin, &records, exact - 1e-6).is_empty());
    }

    #[test]
    fn skips_records_without_a_position() {
        let origin = Coordinate::new(140.0, 40.0);
        let records = vec![
            PointRecord::new(Coordinate::new(f64::NAN, 40.0)).with_attribute("id", "nan"),
            PointRecord::new(Coordinate::new(140.01, 40.0)).with_attribute("id", "near"),
            PointRecord::new(Coordinate::new(140.0, f64::INFINITY)).with_attribute("id", "inf"),
        ];
        let ids: Vec<&str> = within_radius(origin, &records, 1e9)
            .iter()
            .filter_map(|n| n.record.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["near"]);
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let origin = Coordinate::new(140.0, 40.0);
        let records = vec![
            PointRecord::new(Coordinate::new(140.0, 40.05)).with_attribute("id", "first"),
            PointRecord::new(Coordinate::new(140.0, 40.05)).with_attribute("id", "second"),
        ];
        let ids: Vec<&str> = within_radius(origin, &records, 10.0)
            .iter()
            .filter_map(|n| n.record.attribute("id"))
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }
}
