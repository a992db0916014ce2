//! Great-circle distance.

use wild_hazard_geography_models::Coordinate;

/// Earth radius used for every distance in this crate, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Haversine great-circle distance between two coordinates, in kilometres.
///
/// Defined for every latitude/longitude pair; zero when `a == b`.
#[must_use]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs a hair above 1.
    let h = h.min(1.0);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}
