//! Loading band, venue and concert fixtures into the document store.
//!
//! A fixture directory holds three JSON arrays:
//!
//! - `data_bands.json`: `[{"id": 1, "name": "..."}]`
//! - `data_venues.json`: `[{"id": 1, "name": "...", "latitude": .., "longitude": ..}]`
//! - `data_concerts.json`: `[{"bandId": 1, "venueId": 1, "date": ..}]`
//!
//! Fields beyond these are stored as they are.

use encore_core::model::{Band, Concert, Venue};
use encore_core::schema::Database;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, IngestResult};

pub const BANDS_FILE: &str = "data_bands.json";
pub const VENUES_FILE: &str = "data_venues.json";
pub const CONCERTS_FILE: &str = "data_concerts.json";

/// Counts from one fixture load.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub bands: usize,
    pub venues: usize,
    pub concerts: usize,
    /// Records that could not be decoded or stored.
    pub skipped: usize,
}

impl LoadSummary {
    #[must_use]
    pub const fn loaded(&self) -> usize {
        self.bands + self.venues + self.concerts
    }
}

/// Load every fixture file in `dir` into `db`.
///
/// All three files must exist and hold JSON arrays. A record that does not
/// decode or fails to store is logged and skipped.
pub fn load_fixtures(db: &Database, dir: &Path) -> IngestResult<LoadSummary> {
    let bands: Vec<serde_json::Value> = read_array(&dir.join(BANDS_FILE))?;
    let venues: Vec<serde_json::Value> = read_array(&dir.join(VENUES_FILE))?;
    let concerts: Vec<serde_json::Value> = read_array(&dir.join(CONCERTS_FILE))?;

    let mut summary = LoadSummary::default();

    for band in decode::<Band>(BANDS_FILE, bands, &mut summary) {
        if store(db, &band.id.document_key(), &band.to_document()) {
            summary.bands += 1;
        } else {
            summary.skipped += 1;
        }
    }

    for venue in decode::<Venue>(VENUES_FILE, venues, &mut summary) {
        if !venue.location().is_valid() {
            log::warn!(
                "Skipping venue {}: location ({}, {}) is out of range",
                venue.id,
                venue.latitude,
                venue.longitude
            );
            summary.skipped += 1;
            continue;
        }
        if store(db, &venue.id.document_key(), &venue.to_document()) {
            summary.venues += 1;
        } else {
            summary.skipped += 1;
        }
    }

    for concert in decode::<Concert>(CONCERTS_FILE, concerts, &mut summary) {
        if store(db, &concert.document_key(), &concert.to_document()) {
            summary.concerts += 1;
        } else {
            summary.skipped += 1;
        }
    }

    log::info!(
        "Loaded {} bands, {} venues, {} concerts from {} ({} skipped)",
        summary.bands,
        summary.venues,
        summary.concerts,
        dir.display(),
        summary.skipped
    );

    Ok(summary)
}

fn read_array<T: DeserializeOwned>(path: &Path) -> IngestResult<Vec<T>> {
    let contents = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: PathBuf::from(path),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| IngestError::Parse {
        path: PathBuf::from(path),
        source,
    })
}

fn decode<T: DeserializeOwned>(
    file: &str,
    records: Vec<serde_json::Value>,
    summary: &mut LoadSummary,
) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("Skipping record {index} in {file}: {e}");
                summary.skipped += 1;
                None
            }
        })
        .collect()
}

fn store(db: &Database, key: &str, document: &serde_json::Value) -> bool {
    match db.upsert_document(key, document) {
        Ok(()) => {
            log::debug!("Stored {key}");
            true
        }
        Err(e) => {
            log::warn!("Failed to store {key}: {e}");
            false
        }
    }
}
