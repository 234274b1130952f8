use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::ids::BandId;
use crate::model::DocumentKind;

/// A band as stored in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub id: BandId,
    pub name: String,

    /// Any further fields of the source record, stored untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Band {
    #[must_use]
    pub fn new(id: BandId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// The stored document: `id` becomes the full key and `kind` is set.
    #[must_use]
    pub fn to_document(&self) -> serde_json::Value {
        let mut doc = self.extra.clone();
        doc.insert("id".into(), self.id.document_key().into());
        doc.insert("name".into(), self.name.clone().into());
        doc.insert("kind".into(), DocumentKind::Band.as_str().into());
        serde_json::Value::Object(doc)
    }
}

/// Band identifiers a search is restricted to. Empty means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BandIdSet(BTreeSet<BandId>);

impl BandIdSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = BandId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<BandId> for BandIdSet {
    fn from_iter<I: IntoIterator<Item = BandId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
