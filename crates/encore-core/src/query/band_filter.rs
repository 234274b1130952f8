use crate::model::BandIdSet;
use crate::query::placeholders;

/// Membership filter restricting a location search to some bands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandFilter {
    keys: Vec<String>,
}

impl BandFilter {
    /// `None` when `bands` is empty: the search is not restricted.
    #[must_use]
    pub fn for_filter(bands: &BandIdSet) -> Option<Self> {
        if bands.is_empty() {
            return None;
        }
        Some(Self {
            keys: bands.iter().map(|id| id.document_key()).collect(),
        })
    }

    /// Band document keys, bound in this order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// `<column> IN (...)` with placeholders starting at `first`.
    pub(crate) fn condition(&self, column: &str, first: usize) -> String {
        format!("{column} IN ({})", placeholders(first, self.keys.len()))
    }
}

/// Band document keys fetched directly in band-only searches.
///
/// Key order carries no meaning; results are ordered by date downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    keys: Vec<String>,
}

impl KeySet {
    #[must_use]
    pub fn for_lookup(bands: &BandIdSet) -> Self {
        Self {
            keys: bands.iter().map(|id| id.document_key()).collect(),
        }
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
