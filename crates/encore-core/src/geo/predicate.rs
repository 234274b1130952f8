use std::fmt;

use crate::error::{Error, Result};
use crate::geo::{BoundingBox, EARTH_RADIUS_KM};
use crate::model::Point;

/// Slack added to the radius bound so a venue sitting exactly on the
/// center survives `acos` rounding (about 0.64 m).
pub const DISTANCE_TOLERANCE_RAD: f64 = 1e-7;

/// How the latitude and longitude range checks are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCombinator {
    And,
    /// Used when the box crosses the antimeridian: its longitude range is
    /// then the complement of `[lon_min, lon_max]`, so the range check
    /// alone cannot bound longitude and the distance bound does it.
    Or,
}

impl RangeCombinator {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for RangeCombinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Spatial filter in radians: a coordinate range check combined with a
/// great-circle distance bound around the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialPredicate {
    pub lat_min_rad: f64,
    pub lat_max_rad: f64,
    pub lon_min_rad: f64,
    pub lon_max_rad: f64,
    pub center_lat_rad: f64,
    pub center_lon_rad: f64,
    pub radius_rad: f64,
    pub wraps: bool,
}

impl SpatialPredicate {
    /// Builds the predicate for venues within `radius_km` of `center`,
    /// pre-filtered by `bbox`.
    ///
    /// `bbox` must have been computed with an expansion of at least
    /// `radius_km`.
    #[must_use]
    pub fn build(bbox: &BoundingBox, center: Point, radius_km: f64) -> Self {
        let BoundingBox {
            top_left,
            bottom_right,
        } = *bbox;

        Self {
            lat_min_rad: top_left.latitude.min(bottom_right.latitude).to_radians(),
            lat_max_rad: top_left.latitude.max(bottom_right.latitude).to_radians(),
            lon_min_rad: top_left.longitude.min(bottom_right.longitude).to_radians(),
            lon_max_rad: top_left.longitude.max(bottom_right.longitude).to_radians(),
            center_lat_rad: center.latitude_rad(),
            center_lon_rad: center.longitude_rad(),
            radius_rad: radius_km / EARTH_RADIUS_KM,
            wraps: bbox.crosses_antimeridian(),
        }
    }

    #[must_use]
    pub const fn combinator(&self) -> RangeCombinator {
        if self.wraps {
            RangeCombinator::Or
        } else {
            RangeCombinator::And
        }
    }

    /// Positional parameters in canonical order: lat min, lat max, lon min,
    /// lon max, center lat, center lon, radius.
    #[must_use]
    pub const fn params(&self) -> [f64; 7] {
        [
            self.lat_min_rad,
            self.lat_max_rad,
            self.lon_min_rad,
            self.lon_max_rad,
            self.center_lat_rad,
            self.center_lon_rad,
            self.radius_rad,
        ]
    }

    /// Rejects predicates that could not filter anything meaningfully.
    pub fn validate(&self) -> Result<()> {
        const NAMES: [&str; 7] = [
            "lat_min_rad",
            "lat_max_rad",
            "lon_min_rad",
            "lon_max_rad",
            "center_lat_rad",
            "center_lon_rad",
            "radius_rad",
        ];

        if let Some((name, value)) = NAMES
            .iter()
            .zip(self.params())
            .find(|(_, value)| !value.is_finite())
        {
            return Err(Error::InvalidPredicate(format!("{name} is {value}")));
        }
        if self.radius_rad < 0.0 {
            return Err(Error::InvalidPredicate(format!(
                "negative radius {}",
                self.radius_rad
            )));
        }
        if self.lat_min_rad > self.lat_max_rad || self.lon_min_rad > self.lon_max_rad {
            return Err(Error::InvalidPredicate("inverted coordinate range".into()));
        }
        Ok(())
    }

    /// Evaluates the predicate for one point, exactly as the store does.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        let lat = point.latitude_rad();
        let lon = point.longitude_rad();

        let in_lat = (self.lat_min_rad..=self.lat_max_rad).contains(&lat);
        let in_lon = (self.lon_min_rad..=self.lon_max_rad).contains(&lon);
        let in_range = match self.combinator() {
            RangeCombinator::And => in_lat && in_lon,
            RangeCombinator::Or => in_lat || in_lon,
        };

        in_range
            && angle_between(self.center_lat_rad, self.center_lon_rad, lat, lon)
                <= self.radius_rad + DISTANCE_TOLERANCE_RAD
    }
}

/// Central angle in radians between two points, by the spherical law of
/// cosines.
#[must_use]
pub fn central_angle(a: Point, b: Point) -> f64 {
    angle_between(a.latitude_rad(), a.longitude_rad(), b.latitude_rad(), b.longitude_rad())
}

/// Great-circle distance in kilometres.
#[must_use]
pub fn distance_km(a: Point, b: Point) -> f64 {
    central_angle(a, b) * EARTH_RADIUS_KM
}

fn angle_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // Rounding can push the cosine just past 1 for coincident points.
    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
    cosine.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    const K17: Point = Point::new(52.518_311_3, 13.471_767_6);

    fn predicate(center: Point, radius_km: f64) -> SpatialPredicate {
        SpatialPredicate::build(&BoundingBox::around(center, 1000.0), center, radius_km)
    }

    #[test]
    fn test_params_order_and_radius() {
        let p = predicate(K17, 2.0);
        let params = p.params();

        assert!(params[0] < params[1]);
        assert!(params[2] < params[3]);
        assert!((params[4] - K17.latitude.to_radians()).abs() < 1e-15);
        assert!((params[5] - K17.longitude.to_radians()).abs() < 1e-15);
        assert!((params[6] - 2.0 / 6378.137).abs() < 1e-15);
        assert!(!p.wraps);
        assert_eq!(p.combinator(), RangeCombinator::And);
    }

    #[test]
    fn test_zero_radius_matches_only_center() {
        let centers = [
            K17,
            Point::new(0.0, 0.0),
            Point::new(-45.123_456_7, 170.987_654_3),
            Point::new(89.0, -179.5),
            Point::new(33.333_333_3, -111.111_111_1),
        ];
        for center in centers {
            let p = predicate(center, 0.0);
            assert!(p.contains(center), "{center:?} should match itself");
            assert!(!p.contains(Point::new(center.latitude - 0.001, center.longitude)));
        }
    }

    #[test]
    fn test_distance_bound() {
        let p = predicate(K17, 2.0);

        // ~1 km north and ~1.5 km east
        assert!(p.contains(Point::new(52.527_311_3, 13.471_767_6)));
        assert!(p.contains(Point::new(52.518_311_3, 13.493_767_6)));
        // ~5 km north
        assert!(!p.contains(Point::new(52.563_311_3, 13.471_767_6)));
    }

    #[test]
    fn test_antimeridian_venue_is_included() {
        let center = Point::new(10.0, 179.9);
        let venue = Point::new(10.0, -179.9);
        let p = predicate(center, 25.0);

        assert!(p.wraps);
        assert_eq!(p.combinator(), RangeCombinator::Or);
        assert!(distance_km(center, venue) < 25.0);
        assert!(p.contains(venue));
        assert!(p.contains(Point::new(10.0, 179.95)));
        assert!(!p.contains(Point::new(10.0, -179.0)));
        assert!(!p.contains(Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_antimeridian_from_the_west_side() {
        let center = Point::new(-20.0, -179.95);
        let p = predicate(center, 25.0);

        assert!(p.wraps);
        assert!(p.contains(Point::new(-20.0, 179.9)));
    }

    #[test]
    fn test_radius_monotonicity() {
        let small = predicate(K17, 1.0);
        let large = predicate(K17, 3.0);

        for i in -20..=20 {
            for j in -20..=20 {
                let point = Point::new(
                    K17.latitude + f64::from(i) * 0.002,
                    K17.longitude + f64::from(j) * 0.003,
                );
                if small.contains(point) {
                    assert!(large.contains(point), "{point:?} lost when widening");
                }
            }
        }
    }

    #[test]
    fn test_validate() {
        assert!(predicate(K17, 2.0).validate().is_ok());

        let mut nan = predicate(K17, 2.0);
        nan.center_lat_rad = f64::NAN;
        assert!(matches!(nan.validate(), Err(Error::InvalidPredicate(_))));

        let negative = predicate(K17, -1.0);
        assert!(matches!(negative.validate(), Err(Error::InvalidPredicate(_))));

        let infinite = predicate(K17, f64::INFINITY);
        assert!(matches!(infinite.validate(), Err(Error::InvalidPredicate(_))));
    }

    #[test]
    fn test_distance_km() {
        // Berlin to Paris, roughly 880 km
        let paris = Point::new(48.8566, 2.3522);
        let d = distance_km(K17, paris);
        assert!((d - 880.0).abs() < 15.0, "got {d}");
        assert!(distance_km(K17, K17) < 1e-3);
    }
}
