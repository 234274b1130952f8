//! Concert search: builds the query for a request and hands it to an
//! executor.

use crate::error::{Error, Result};
use crate::executor::QueryExecutor;
use crate::geo::{BoundingBox, SpatialPredicate};
use crate::model::{BandIdSet, ConcertRecord, Point};
use crate::query::{BandFilter, ConcertQuery, KeySet};
use crate::request::SearchMode;

/// Default distance the bounding box is expanded by around a center.
pub const DEFAULT_ENVELOPE_KM: f64 = 1000.0;

/// Entry point for concert searches.
///
/// `envelope_km` sizes the bounding box and is the largest radius a
/// location search accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcertSearch {
    envelope_km: f64,
}

impl Default for ConcertSearch {
    fn default() -> Self {
        Self {
            envelope_km: DEFAULT_ENVELOPE_KM,
        }
    }
}

impl ConcertSearch {
    #[must_use]
    pub const fn new(envelope_km: f64) -> Self {
        Self { envelope_km }
    }

    #[must_use]
    pub const fn envelope_km(&self) -> f64 {
        self.envelope_km
    }

    /// Build the query for concerts within `radius_km` of `center`.
    pub fn location_query(
        &self,
        center: Point,
        radius_km: f64,
        bands: &BandIdSet,
    ) -> Result<ConcertQuery> {
        if !(self.envelope_km.is_finite() && self.envelope_km >= 0.0) {
            return Err(Error::InvalidPredicate(format!(
                "envelope must be a non-negative distance, got {} km",
                self.envelope_km
            )));
        }
        if radius_km > self.envelope_km {
            return Err(Error::InvalidPredicate(format!(
                "radius {radius_km} km exceeds the {} km search envelope",
                self.envelope_km
            )));
        }

        let bbox = BoundingBox::around(center, self.envelope_km);
        let predicate = SpatialPredicate::build(&bbox, center, radius_km);
        ConcertQuery::by_location(&predicate, BandFilter::for_filter(bands).as_ref())
    }

    /// Concerts within `radius_km` of `center`, newest first.
    pub async fn near<E>(
        &self,
        executor: &E,
        center: Point,
        radius_km: f64,
        bands: &BandIdSet,
    ) -> Result<Vec<ConcertRecord>>
    where
        E: QueryExecutor + ?Sized,
    {
        log::debug!(
            "Searching concerts within {radius_km} km of ({}, {}), {} band(s)",
            center.latitude,
            center.longitude,
            bands.len()
        );
        let query = self.location_query(center, radius_km, bands)?;
        execute(executor, &query).await
    }

    /// Concerts of `bands` anywhere, newest first.
    pub async fn by_bands<E>(&self, executor: &E, bands: &BandIdSet) -> Result<Vec<ConcertRecord>>
    where
        E: QueryExecutor + ?Sized,
    {
        log::debug!("Searching concerts of {} band(s)", bands.len());
        let query = ConcertQuery::by_band_ids(&KeySet::for_lookup(bands));
        execute(executor, &query).await
    }

    /// Run whichever search `mode` selects.
    pub async fn run<E>(&self, executor: &E, mode: &SearchMode) -> Result<Vec<ConcertRecord>>
    where
        E: QueryExecutor + ?Sized,
    {
        match mode {
            SearchMode::Location {
                center,
                radius_km,
                bands,
            } => self.near(executor, *center, *radius_km, bands).await,
            SearchMode::Bands(bands) => self.by_bands(executor, bands).await,
        }
    }
}

async fn execute<E>(executor: &E, query: &ConcertQuery) -> Result<Vec<ConcertRecord>>
where
    E: QueryExecutor + ?Sized,
{
    match executor.execute(query).await {
        Ok(records) => Ok(records),
        Err(e) => {
            log::warn!("Concert query failed: {e}");
            Err(Error::QueryExecution(e))
        }
    }
}
