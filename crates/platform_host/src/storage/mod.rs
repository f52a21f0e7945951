//! Persistence port contracts and backends.

pub mod app_state;
pub mod file;
pub mod prefs;
