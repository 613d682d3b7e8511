//! Error handling for weave.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod command_error;
pub mod config_error;
pub mod graph_error;
pub mod scan_error;

pub use command_error::CommandError;
pub use config_error::ConfigError;
pub use graph_error::{GraphError, ProviderRef};
pub use scan_error::ScanError;
