//! Getting data into encore: fixture loading and configuration.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod fixtures;

pub use config::Config;
pub use error::{IngestError, IngestResult};
pub use fixtures::{load_fixtures, LoadSummary};
