//! Configuration errors.

/// Errors produced while parsing or validating a weave configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid TOML: {message}")]
    ParseError { message: String },

    #[error("invalid config value for {field}: {message}")]
    ValidationFailed { field: String, message: String },
}
