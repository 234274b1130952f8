use crate::geo::EARTH_RADIUS_KM;
use crate::model::Point;

/// A lat/lon rectangle enclosing a search circle.
///
/// `top_left` is the north-west corner and `bottom_right` the south-east
/// one. When the box crosses the antimeridian the east edge has wrapped to
/// the other side, so `bottom_right.longitude < top_left.longitude`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Computes the smallest lat/lon box containing every point within
    /// `expansion_km` of `center`.
    ///
    /// The box is sized from `expansion_km` alone. Searches must keep their
    /// radius at or below it, otherwise venues outside the box are missed.
    #[must_use]
    pub fn around(center: Point, expansion_km: f64) -> Self {
        let angular = expansion_km / EARTH_RADIUS_KM;
        let lat_delta = angular.to_degrees();

        let north = center.latitude + lat_delta;
        let south = center.latitude - lat_delta;

        // The circle reaches a pole: every longitude is covered.
        if north >= 90.0 || south <= -90.0 {
            return Self::full_longitude(north.min(90.0), south.max(-90.0));
        }

        // Widest longitude extent of a spherical cap, reached poleward of
        // the center rather than at its latitude.
        let ratio = angular.sin() / center.latitude_rad().cos();
        if ratio >= 1.0 {
            return Self::full_longitude(north, south);
        }
        let lon_delta = ratio.asin().to_degrees();
        if lon_delta >= 180.0 {
            return Self::full_longitude(north, south);
        }

        Self {
            top_left: Point::new(north, normalize_longitude(center.longitude - lon_delta)),
            bottom_right: Point::new(south, normalize_longitude(center.longitude + lon_delta)),
        }
    }

    const fn full_longitude(north: f64, south: f64) -> Self {
        Self {
            top_left: Point::new(north, -180.0),
            bottom_right: Point::new(south, 180.0),
        }
    }

    /// Whether the east edge wrapped past ±180°.
    #[must_use]
    pub fn crosses_antimeridian(&self) -> bool {
        self.bottom_right.longitude < self.top_left.longitude
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let in_lat = (self.bottom_right.latitude..=self.top_left.latitude).contains(&point.latitude);
        let in_lon = if self.crosses_antimeridian() {
            point.longitude >= self.top_left.longitude
                || point.longitude <= self.bottom_right.longitude
        } else {
            (self.top_left.longitude..=self.bottom_right.longitude).contains(&point.longitude)
        };
        in_lat && in_lon
    }
}

fn normalize_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else if longitude < -180.0 {
        longitude + 360.0
    } else {
        longitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Point reached from `start` after `distance_km` on `bearing_deg`.
    fn destination(start: Point, bearing_deg: f64, distance_km: f64) -> Point {
        let angular = distance_km / EARTH_RADIUS_KM;
        let bearing = bearing_deg.to_radians();
        let lat1 = start.latitude_rad();
        let lon1 = start.longitude_rad();

        let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());

        Point::new(lat2.to_degrees(), normalize_longitude(lon2.to_degrees()))
    }

    #[test]
    fn test_zero_expansion_is_degenerate() {
        let center = Point::new(52.518_311_3, 13.471_767_6);
        let bbox = BoundingBox::around(center, 0.0);

        assert_eq!(bbox.top_left, center);
        assert_eq!(bbox.bottom_right, center);
        assert!(bbox.contains(center));
        assert!(!bbox.crosses_antimeridian());
    }

    #[test]
    fn test_box_encloses_circle() {
        let centers = [
            Point::new(52.518_311_3, 13.471_767_6),
            Point::new(0.0, 0.0),
            Point::new(-33.86, 151.21),
            Point::new(64.15, -21.94),
            Point::new(10.0, 179.9),
        ];
        for center in centers {
            for radius in [0.5, 2.0, 50.0, 1000.0] {
                let bbox = BoundingBox::around(center, radius);
                for step in 0..72 {
                    let edge = destination(center, f64::from(step) * 5.0, radius * 0.999);
                    assert!(
                        bbox.contains(edge),
                        "{edge:?} outside {bbox:?} (center {center:?}, radius {radius})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_latitude_span_matches_degrees_per_km() {
        let bbox = BoundingBox::around(Point::new(0.0, 0.0), 111.319_490_8);
        assert!((bbox.top_left.latitude - 1.0).abs() < 1e-6);
        assert!((bbox.bottom_right.latitude + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_antimeridian_wraps_east_edge() {
        let bbox = BoundingBox::around(Point::new(10.0, 179.9), 30.0);

        assert!(bbox.crosses_antimeridian());
        assert!(bbox.top_left.longitude > 179.0);
        assert!(bbox.bottom_right.longitude < -179.0);
        assert!(bbox.contains(Point::new(10.0, -179.9)));
        assert!(bbox.contains(Point::new(10.0, 179.95)));
        assert!(!bbox.contains(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_west_edge_wraps() {
        let bbox = BoundingBox::around(Point::new(-20.0, -179.95), 30.0);

        assert!(bbox.crosses_antimeridian());
        assert!(bbox.contains(Point::new(-20.0, 179.9)));
    }

    #[test]
    fn test_polar_circle_covers_all_longitudes() {
        let bbox = BoundingBox::around(Point::new(89.5, 45.0), 100.0);

        assert!((bbox.top_left.latitude - 90.0).abs() < f64::EPSILON);
        assert!((bbox.top_left.longitude + 180.0).abs() < f64::EPSILON);
        assert!((bbox.bottom_right.longitude - 180.0).abs() < f64::EPSILON);
        assert!(!bbox.crosses_antimeridian());
        assert!(bbox.contains(Point::new(89.9, -135.0)));
    }

    #[test]
    fn test_normalize_longitude() {
        assert!((normalize_longitude(181.0) + 179.0).abs() < 1e-12);
        assert!((normalize_longitude(-181.0) - 179.0).abs() < 1e-12);
        assert!((normalize_longitude(42.0) - 42.0).abs() < f64::EPSILON);
    }
}
