//! Weave configuration model.

pub mod weave_config;

pub use weave_config::{AppConfig, GroupConfig, WeaveConfig};
