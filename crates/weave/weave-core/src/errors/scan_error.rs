//! Provider scanner errors.

/// Errors that abort a provider scan.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The package loader reported errors; the typed model is unreliable
    /// and the scan cannot proceed.
    #[error("package errors:\n  {}", .errors.join("\n  "))]
    PackageErrors { errors: Vec<String> },
}
