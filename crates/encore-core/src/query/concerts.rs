use crate::error::Result;
use crate::geo::predicate::DISTANCE_TOLERANCE_RAD;
use crate::geo::SpatialPredicate;
use crate::query::{placeholders, BandFilter, KeySet, Param};

// Each kind of document flattened to the columns the joins need.
const VENUES: &str = "(
        SELECT
            key,
            json_extract(body, '$.name') AS name,
            json_extract(body, '$.latitude') AS latitude,
            json_extract(body, '$.longitude') AS longitude
        FROM documents
        WHERE json_extract(body, '$.kind') = 'venue'
    ) AS venue";

const CONCERTS: &str = "(
        SELECT
            key,
            json_extract(body, '$.bandId') AS band_id,
            json_extract(body, '$.venueId') AS venue_id,
            json_extract(body, '$.date') AS date
        FROM documents
        WHERE json_extract(body, '$.kind') = 'concert'
    ) AS concert";

const BANDS: &str = "(
        SELECT
            key,
            json_extract(body, '$.name') AS name
        FROM documents
        WHERE json_extract(body, '$.kind') = 'band'
    ) AS band";

/// Column list producing a [`crate::model::ConcertRecord`].
const PROJECTION: &str = "
        band.name AS band,
        venue.name AS location,
        concert.date AS date,
        venue.latitude AS latitude,
        venue.longitude AS longitude";

const ORDERING: &str = "ORDER BY concert.date DESC, concert.key ASC";

/// Number of parameters a spatial predicate binds.
const SPATIAL_PARAMS: usize = 7;

/// A rendered statement plus its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcertQuery {
    statement: String,
    params: Vec<Param>,
}

impl ConcertQuery {
    /// Concerts at venues matching `predicate`, optionally only those of
    /// the bands in `filter`, newest first.
    pub fn by_location(predicate: &SpatialPredicate, filter: Option<&BandFilter>) -> Result<Self> {
        predicate.validate()?;

        let mut params: Vec<Param> = predicate.params().into_iter().map(Param::from).collect();
        let band_condition = match filter {
            Some(filter) => {
                params.extend(filter.keys().iter().cloned().map(Param::from));
                format!(
                    "\n    AND {}",
                    filter.condition("band.key", SPATIAL_PARAMS + 1)
                )
            }
            None => String::new(),
        };

        let statement = format!(
            "SELECT{PROJECTION}
FROM {VENUES}
JOIN {CONCERTS}
    ON concert.venue_id = venue.key
JOIN {BANDS}
    ON band.key = concert.band_id
WHERE (
        (radians(venue.latitude) BETWEEN ?1 AND ?2)
        {combinator}
        (radians(venue.longitude) BETWEEN ?3 AND ?4)
    )
    AND acos(max(-1.0, min(1.0,
        sin(?5) * sin(radians(venue.latitude))
        + cos(?5) * cos(radians(venue.latitude)) * cos(radians(venue.longitude) - ?6)
    ))) <= ?7 + {DISTANCE_TOLERANCE_RAD}{band_condition}
{ORDERING}",
            combinator = predicate.combinator(),
        );

        Ok(Self { statement, params })
    }

    /// Concerts of the bands in `keys`, wherever they play, newest first.
    #[must_use]
    pub fn by_band_ids(keys: &KeySet) -> Self {
        let statement = format!(
            "SELECT{PROJECTION}
FROM {BANDS}
JOIN {CONCERTS}
    ON concert.band_id = band.key
JOIN {VENUES}
    ON venue.key = concert.venue_id
WHERE band.key IN ({keys})
{ORDERING}",
            keys = placeholders(1, keys.keys().len()),
        );

        Self {
            statement,
            params: keys.keys().iter().cloned().map(Param::from).collect(),
        }
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}
