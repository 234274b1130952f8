//! Query construction. Everything here is pure: builders take values and
//! return a [`ConcertQuery`] for an executor to run.

pub mod band_filter;
pub mod concerts;

pub use band_filter::{BandFilter, KeySet};
pub use concerts::ConcertQuery;

/// A positional query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Real(f64),
    Text(String),
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Numbered placeholders `?first, ?first+1, ...` for `count` parameters.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}
