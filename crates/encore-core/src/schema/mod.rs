//! SQLite-backed document store.

pub mod db;
pub mod migrations;

pub use db::Database;
