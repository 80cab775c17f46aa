//! I/O helpers: remote API, checkpoint and stage archive, configuration.

pub mod api;
pub mod checkpoint;
pub mod config;
pub mod files;
pub mod stage_store;
