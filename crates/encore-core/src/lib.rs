//! Core of encore: the concert domain model and the geospatial query
//! construction engine.
//!
//! A search turns a center point and radius into a bounding box
//! ([`geo::BoundingBox`]), refines it with a great-circle distance bound
//! ([`geo::SpatialPredicate`]), merges an optional band filter
//! ([`query::BandFilter`]) and renders one parameterized query
//! ([`query::ConcertQuery`]). Queries are handed to a
//! [`executor::QueryExecutor`]; [`schema::Database`] is the SQLite-backed
//! document store that implements it.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod executor;
pub mod geo;
pub mod model;
pub mod query;
pub mod request;
pub mod schema;
pub mod search;

pub use error::{Error, QueryFailure, Result};
pub use executor::QueryExecutor;
pub use search::ConcertSearch;
