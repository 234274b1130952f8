//! Spatial filtering: the bounding box around a search center and the
//! great-circle predicate that refines it.

pub mod bounding_box;
pub mod predicate;

pub use bounding_box::BoundingBox;
pub use predicate::{central_angle, distance_km, RangeCombinator, SpatialPredicate};

/// Equatorial Earth radius (WGS 84).
pub const EARTH_RADIUS_KM: f64 = 6378.137;
