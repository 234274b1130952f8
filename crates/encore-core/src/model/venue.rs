use serde::{Deserialize, Serialize};

use crate::model::ids::VenueId;
use crate::model::{DocumentKind, Point};

/// A venue as stored in the document store. Coordinates are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Venue {
    #[must_use]
    pub fn new(id: VenueId, name: impl Into<String>, location: Point) -> Self {
        Self {
            id,
            name: name.into(),
            latitude: location.latitude,
            longitude: location.longitude,
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub const fn location(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = self.extra.clone();
        doc.insert("id".into(), self.id.document_key().into());
        doc.insert("name".into(), self.name.clone().into());
        doc.insert("latitude".into(), self.latitude.into());
        doc.insert("longitude".into(), self.longitude.into());
        doc.insert("kind".into(), DocumentKind::Venue.as_str().into());
        serde_json::Value::Object(doc)
    }
}
