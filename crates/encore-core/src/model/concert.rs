use serde::{Deserialize, Serialize};

use crate::model::ids::{concert_key, BandId, VenueId};
use crate::model::DocumentKind;

/// A concert linking one band to one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    pub band_id: BandId,
    pub venue_id: VenueId,

    /// Timestamp of the concert.
    pub date: i64,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Concert {
    #[must_use]
    pub fn new(band_id: BandId, venue_id: VenueId, date: i64) -> Self {
        Self {
            band_id,
            venue_id,
            date,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn document_key(&self) -> String {
        concert_key(self.band_id, self.venue_id)
    }

    /// The stored document. `bandId` and `venueId` hold full document keys
    /// so the store can join on them.
    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = self.extra.clone();
        doc.insert("id".into(), self.document_key().into());
        doc.insert("bandId".into(), self.band_id.document_key().into());
        doc.insert("venueId".into(), self.venue_id.document_key().into());
        doc.insert("date".into(), self.date.into());
        doc.insert("kind".into(), DocumentKind::Concert.as_str().into());
        serde_json::Value::Object(doc)
    }
}

/// One search result: a concert with its band name and venue.
///
/// Field order matches the serialized key order callers rely on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcertRecord {
    pub band: String,
    pub date: i64,
    pub latitude: f64,
    pub location: String,
    pub longitude: f64,
}
