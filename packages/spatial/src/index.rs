//! R-tree index for nearest-neighbor and radius queries on the sphere.
//!
//! Points are stored as unit vectors in 3-D. Straight-line (chord) distance
//! between unit vectors grows monotonically with great-circle distance, so
//! an axis-aligned box around the query bounds every candidate that can be
//! closer than a given great-circle distance. The tree only prunes; the
//! winner is always picked with [`distance`](crate::distance::distance).

use rstar::{AABB, RTree, RTreeObject};
use wild_hazard_geography_models::Coordinate;

use crate::distance::{EARTH_RADIUS_KM, distance};

/// Chord half-width of the first search box (~6 km on the ground).
const INITIAL_HALF_WIDTH: f64 = 1e-3;

/// Longest possible chord between two unit vectors.
const MAX_CHORD: f64 = 2.0;

/// A point stored in the R-tree, tagged with its input position.
struct IndexedPoint {
    index: usize,
    position: [f64; 3],
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

/// A query result: which indexed point, and how far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Position of the point in the slice the index was built from.
    pub index: usize,
    /// Great-circle distance from the query, in kilometres.
    pub distance_km: f64,
}

/// Spatial index over a fixed set of coordinates.
///
/// Built once, queried many times. The index owns plain data only, so it
/// is `Send + Sync` and a batch of queries can be split across threads.
pub struct NearestIndex {
    coordinates: Vec<Coordinate>,
    tree: RTree<IndexedPoint>,
}

impl NearestIndex {
    /// Builds the index. Coordinates with non-finite components are left
    /// out of the tree and can never be returned.
    #[must_use]
    pub fn build(coordinates: Vec<Coordinate>) -> Self {
        let points: Vec<IndexedPoint> = coordinates
            .iter()
            .enumerate()
            .filter_map(|(index, coord)| {
                let position = unit_vector(*coord)?;
                Some(IndexedPoint { index, position })
            })
            .collect();

        let skipped = coordinates.len() - points.len();
        if skipped > 0 {
            log::warn!("Skipped {skipped} non-finite coordinates while building spatial index");
        }
        log::debug!("Indexed {} points", points.len());

        Self {
            coordinates,
            tree: RTree::bulk_load(points),
        }
    }

    /// Number of points that can be returned by queries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether no point can be returned by queries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Finds the indexed point closest to `query`.
    ///
    /// Ties go to the lowest input index. Returns `None` when the index is
    /// empty or the query is not finite.
    #[must_use]
    pub fn nearest(&self, query: Coordinate) -> Option<Neighbor> {
        let center = unit_vector(query)?;
        if self.is_empty() {
            return None;
        }

        let mut half_width = INITIAL_HALF_WIDTH;
        loop {
            // Every point within `half_width` chord of the query is inside
            // the box, and the nearest point is at least as close as any
            // of them.
            let best = self
                .candidates(center, half_width)
                .filter(|point| chord_squared(point.position, center) <= half_width * half_width)
                .map(|point| self.neighbor(point.index, query))
                .min_by(|a, b| {
                    a.distance_km
                        .total_cmp(&b.distance_km)
                        .then(a.index.cmp(&b.index))
                });

            if best.is_some() || half_width > MAX_CHORD {
                return best;
            }
            half_width *= 4.0;
        }
    }

    /// All indexed points within `radius_km` of `query`, nearest first.
    #[must_use]
    pub fn within_radius(&self, query: Coordinate, radius_km: f64) -> Vec<Neighbor> {
        let Some(center) = unit_vector(query) else {
            return Vec::new();
        };
        if radius_km.is_nan() || radius_km < 0.0 {
            return Vec::new();
        }

        let angle = radius_km / EARTH_RADIUS_KM;
        let half_width = if angle >= std::f64::consts::PI {
            MAX_CHORD
        } else {
            2.0 * (angle / 2.0).sin()
        };
        // Pad the box so rounding never prunes a point on the boundary.
        let half_width = half_width.mul_add(1.0 + 1e-9, 1e-12);

        let mut found: Vec<Neighbor> = self
            .candidates(center, half_width)
            .map(|point| self.neighbor(point.index, query))
            .filter(|neighbor| neighbor.distance_km <= radius_km)
            .collect();

        found.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(a.index.cmp(&b.index))
        });
        found
    }

    fn candidates(
        &self,
        center: [f64; 3],
        half_width: f64,
    ) -> impl Iterator<Item = &IndexedPoint> {
        let [x, y, z] = center;
        let query_env = AABB::from_corners(
            [x - half_width, y - half_width, z - half_width],
            [x + half_width, y + half_width, z + half_width],
        );
        self.tree.locate_in_envelope_intersecting(&query_env)
    }

    fn neighbor(&self, index: usize, query: Coordinate) -> Neighbor {
        Neighbor {
            index,
            distance_km: distance(query, self.coordinates[index]),
        }
    }
}

/// Position on the unit sphere, or `None` for non-finite input.
fn unit_vector(coord: Coordinate) -> Option<[f64; 3]> {
    if !coord.longitude.is_finite() || !coord.latitude.is_finite() {
        return None;
    }
    let (lat, lon) = (coord.latitude.to_radians(), coord.longitude.to_radians());
    Some([lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()])
}

fn chord_squared(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter().zip(b).map(|(p, q)| (p - q).powi(2)).sum()
}
