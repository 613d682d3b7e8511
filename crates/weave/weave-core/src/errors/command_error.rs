//! Command detector errors.

/// Errors that abort command discovery.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The loader reported errors for one or more command packages.
    #[error("command package errors:\n  {}", .errors.join("\n  "))]
    PackageErrors { errors: Vec<String> },
}
