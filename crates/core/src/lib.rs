//! Core types for discovery-tags
//!
//! Database-free domain types shared by the storage layer and the CLI:
//! revision ids, migration targets, configuration and the tag view model.

mod constants;
mod env_config;
mod error;
mod revision;
mod tags;

pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use revision::*;
pub use tags::*;
