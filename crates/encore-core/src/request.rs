//! Validation of raw search parameters and selection of the search mode.

use crate::error::{Error, Result};
use crate::model::{BandId, BandIdSet, Point};

/// What a validated request asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Concerts within `radius_km` of `center`, restricted to `bands` when
    /// that set is non-empty.
    Location {
        center: Point,
        radius_km: f64,
        bands: BandIdSet,
    },
    /// Concerts of these bands anywhere. An empty set matches nothing.
    Bands(BandIdSet),
}

impl SearchMode {
    /// Validate request parameters and pick a mode.
    ///
    /// The three location arguments come as a group: either all are given
    /// and valid, or none is.
    pub fn select(
        latitude: Option<f64>,
        longitude: Option<f64>,
        radius: Option<f64>,
        band_ids: Option<&str>,
    ) -> Result<Self> {
        let bands = match band_ids {
            Some(raw) => parse_band_ids(raw)?,
            None => BandIdSet::new(),
        };

        match (latitude, longitude, radius) {
            (None, None, None) => Ok(Self::Bands(bands)),
            (Some(latitude), Some(longitude), Some(radius_km)) => {
                let center = Point::new(latitude, longitude);
                if !center.is_valid() {
                    return Err(Error::InvalidRequest(format!(
                        "location ({latitude}, {longitude}) is out of range"
                    )));
                }
                if !radius_km.is_finite() || radius_km < 0.0 {
                    return Err(Error::InvalidRequest(format!(
                        "radius must be a non-negative number of kilometres, got {radius_km}"
                    )));
                }
                Ok(Self::Location {
                    center,
                    radius_km,
                    bands,
                })
            }
            _ => Err(Error::InvalidRequest(
                "latitude, longitude and radius must be given together".into(),
            )),
        }
    }

    #[must_use]
    pub fn bands(&self) -> &BandIdSet {
        match self {
            Self::Location { bands, .. } | Self::Bands(bands) => bands,
        }
    }
}

/// Parse comma-separated band ids such as `"1,2,3"`. Empty segments are
/// skipped.
pub fn parse_band_ids(raw: &str) -> Result<BandIdSet> {
    raw.split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment.parse::<BandId>().map_err(|_| {
                Error::InvalidRequest(format!("band id '{segment}' is not a positive integer"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(set: &BandIdSet) -> Vec<u32> {
        set.iter().map(BandId::get).collect()
    }

    #[test]
    fn test_parse_band_ids() {
        assert_eq!(ids(&parse_band_ids("1,2,3").unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&parse_band_ids(" 223, 146 ,").unwrap()), vec![146, 223]);
        assert!(parse_band_ids("").unwrap().is_empty());
        assert!(parse_band_ids(",,").unwrap().is_empty());
    }

    #[test]
    fn test_parse_band_ids_rejects_garbage() {
        for raw in ["1,x", "0", "-4", "1.5", "2,3;4"] {
            assert!(
                matches!(parse_band_ids(raw), Err(Error::InvalidRequest(_))),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_location_mode() {
        let mode = SearchMode::select(Some(52.5), Some(13.4), Some(2.0), Some("223,146")).unwrap();

        match &mode {
            SearchMode::Location {
                center, radius_km, ..
            } => {
                assert_eq!(*center, Point::new(52.5, 13.4));
                assert!((radius_km - 2.0).abs() < f64::EPSILON);
            }
            SearchMode::Bands(_) => panic!("expected location mode"),
        }
        assert_eq!(mode.bands().len(), 2);
    }

    #[test]
    fn test_band_only_mode() {
        let mode = SearchMode::select(None, None, None, Some("1,2,3")).unwrap();
        assert!(matches!(&mode, SearchMode::Bands(bands) if bands.len() == 3));

        let empty = SearchMode::select(None, None, None, None).unwrap();
        assert_eq!(empty, SearchMode::Bands(BandIdSet::new()));
    }

    #[test]
    fn test_partial_location_is_rejected() {
        let cases = [
            (Some(52.5), None, None),
            (None, Some(13.4), Some(2.0)),
            (Some(52.5), Some(13.4), None),
        ];
        for (lat, lon, radius) in cases {
            assert!(matches!(
                SearchMode::select(lat, lon, radius, None),
                Err(Error::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_out_of_range_location_is_rejected() {
        let cases = [
            (91.0, 0.0, 1.0),
            (0.0, -180.5, 1.0),
            (f64::NAN, 0.0, 1.0),
            (0.0, 0.0, -1.0),
            (0.0, 0.0, f64::INFINITY),
        ];
        for (lat, lon, radius) in cases {
            assert!(matches!(
                SearchMode::select(Some(lat), Some(lon), Some(radius), None),
                Err(Error::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_boundaries_are_accepted() {
        assert!(SearchMode::select(Some(90.0), Some(-180.0), Some(0.0), None).is_ok());
        assert!(SearchMode::select(Some(-90.0), Some(180.0), Some(0.0), None).is_ok());
    }
}
