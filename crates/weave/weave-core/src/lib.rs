//! Core types for weave: configuration, errors, tracing, collections.
//!
//! Everything here is shared between the analysis pipeline and whatever
//! front end drives it. No analysis logic lives in this crate.

pub mod config;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::{AppConfig, GroupConfig, WeaveConfig};
pub use errors::{CommandError, ConfigError, GraphError, ProviderRef, ScanError};
pub use types::source::Position;
