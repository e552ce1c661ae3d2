//! Bounding-box arithmetic for turning a viewport into a search.
//!
//! Distances use a flat 111 km per degree of latitude. Longitude is ignored
//! when estimating a radius because its length depends on latitude and on
//! how the map happens to be oriented.

use crate::types::{Coordinate, ViewportBounds};

pub const KM_PER_LAT_DEGREE: f64 = 111.0;

/// Searches never go narrower than this.
pub const MIN_SEARCH_RADIUS_KM: f64 = 5.0;

/// Arithmetic midpoint of the box edges.
#[must_use]
pub fn center_of(bounds: &ViewportBounds) -> Coordinate {
    let lat = (bounds.south() + bounds.north()) / 2.0;
    let lng = (bounds.west() + bounds.east()) / 2.0;
    // Midpoint of two valid edges is itself in range.
    Coordinate::new(lat, lng).unwrap_or_else(|_| unreachable!("midpoint of valid bounds"))
}

/// Half the latitude span in kilometres.
#[must_use]
pub fn radius_km_of(bounds: &ViewportBounds) -> f64 {
    (bounds.north() - bounds.south()) / 2.0 * KM_PER_LAT_DEGREE
}

/// Raises `km` to `minimum`. NaN is treated as below the floor.
#[must_use]
pub fn clamp_radius(km: f64, minimum: f64) -> f64 {
    if km >= minimum {
        km
    } else {
        minimum
    }
}

/// Box of half-height `radius_km` around `center`, clipped to valid degrees.
///
/// Longitude half-width is `radius_km / (111 · cos lat)`, with the cosine
/// taken as 1 on the equator. Negative or NaN radii give the degenerate box
/// at `center`.
#[must_use]
pub fn bounds_around(center: Coordinate, radius_km: f64) -> ViewportBounds {
    let radius_km = radius_km.max(0.0);
    let lat_delta = radius_km / KM_PER_LAT_DEGREE;
    let cos_lat = if center.lat() == 0.0 {
        1.0
    } else {
        center.lat().to_radians().cos().abs().max(1e-6)
    };
    let lng_delta = radius_km / (KM_PER_LAT_DEGREE * cos_lat);

    let south = (center.lat() - lat_delta).max(-90.0);
    let north = (center.lat() + lat_delta).min(90.0);
    let west = (center.lng() - lng_delta).max(-180.0);
    let east = (center.lng() + lng_delta).min(180.0);

    ViewportBounds::new(south, north, west, east)
        .unwrap_or_else(|_| unreachable!("clipped box around a valid center"))
}

/// The box actually sent for a "search this area" request.
///
/// Viewports whose radius is at least `minimum_km` are used as-is; smaller
/// ones are widened to the box around their center at `minimum_km`.
#[must_use]
pub fn search_bounds(bounds: &ViewportBounds, minimum_km: f64) -> ViewportBounds {
    let radius = radius_km_of(bounds);
    if radius >= minimum_km {
        *bounds
    } else {
        bounds_around(center_of(bounds), clamp_radius(radius, minimum_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_boxes() -> Vec<ViewportBounds> {
        vec![
            ViewportBounds::new(24.9, 25.1, 121.4, 121.6).unwrap(),
            ViewportBounds::new(-90.0, 90.0, -180.0, 180.0).unwrap(),
            ViewportBounds::new(1.2, 1.2, 103.8, 103.8).unwrap(),
            ViewportBounds::new(-45.0, -10.0, 100.0, 160.0).unwrap(),
            ViewportBounds::new(37.70, 37.83, -122.52, -122.35).unwrap(),
        ]
    }

    #[test]
    fn center_lies_within_bounds() {
        for b in sample_boxes() {
            assert!(b.contains(center_of(&b)), "center outside {b:?}");
        }
    }

    #[test]
    fn radius_is_never_negative() {
        for b in sample_boxes() {
            assert!(radius_km_of(&b) >= 0.0);
        }
    }

    #[test]
    fn radius_uses_half_lat_span() {
        let b = ViewportBounds::new(24.0, 25.0, 121.0, 123.0).unwrap();
        assert!((radius_km_of(&b) - 55.5).abs() < 1e-9);
    }

    #[test]
    fn bounds_around_negative_radius_collapses_to_center() {
        let c = Coordinate::new(25.0, 121.0).unwrap();
        for radius in [-1.0, f64::NAN, f64::NEG_INFINITY] {
            let b = bounds_around(c, radius);
            assert!(b.contains(c));
            assert!(radius_km_of(&b).abs() < f64::EPSILON, "radius {radius}");
        }
    }

    #[test]
    fn clamp_radius_applies_floor() {
        assert!((clamp_radius(1.0, MIN_SEARCH_RADIUS_KM) - 5.0).abs() < f64::EPSILON);
        assert!((clamp_radius(12.5, MIN_SEARCH_RADIUS_KM) - 12.5).abs() < f64::EPSILON);
        assert!((clamp_radius(f64::NAN, MIN_SEARCH_RADIUS_KM) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bounds_around_widens_longitude_away_from_equator() {
        let c = Coordinate::new(60.0, 10.0).unwrap();
        let b = bounds_around(c, 111.0);
        assert!((b.north() - b.south() - 2.0).abs() < 1e-9);
        // cos 60° = 0.5, so lng half-width doubles.
        assert!((b.east() - b.west() - 4.0).abs() < 1e-6);
        assert!(b.contains(c));
    }

    #[test]
    fn bounds_around_clips_at_the_pole() {
        let b = bounds_around(Coordinate::new(89.99, 0.0).unwrap(), 50.0);
        assert!(b.north() <= 90.0);
    }

    #[test]
    fn search_bounds_keeps_large_viewports() {
        let b = ViewportBounds::new(24.9, 25.1, 121.4, 121.6).unwrap();
        assert_eq!(search_bounds(&b, MIN_SEARCH_RADIUS_KM), b);
    }

    #[test]
    fn search_bounds_widens_tiny_viewports_to_the_floor() {
        let b = ViewportBounds::new(25.03, 25.031, 121.5, 121.501).unwrap();
        let widened = search_bounds(&b, MIN_SEARCH_RADIUS_KM);
        assert!((radius_km_of(&widened) - MIN_SEARCH_RADIUS_KM).abs() < 1e-6);
        assert!(widened.contains(center_of(&b)));
    }
}
