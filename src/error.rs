//! Error types for plugin-validate
//!
//! Only run-level problems surface as errors: a missing repository root or a
//! discovery pattern that cannot be evaluated. Per-file problems (unreadable
//! files, malformed frontmatter) are skipped by the classifier and never reach
//! this type. Uses `thiserror` for `Display` and `Error` implementations.

use thiserror::Error;

/// The primary error type for validation runs.
#[derive(Error, Debug)]
pub enum ValidateError {
    /// Invalid run configuration (missing repository root, not a directory, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File discovery failures (bad glob pattern, unreadable directory entry)
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Standard I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization errors (report rendering)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ValidateError::Config("repository root not found: /nope".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: repository root not found: /nope"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ValidateError = io_err.into();
        assert!(matches!(err, ValidateError::Io(_)));
    }

    #[test]
    fn test_error_from_yaml() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let err: ValidateError = yaml_err.into();
        assert!(err.to_string().starts_with("YAML error:"));
    }

    #[test]
    fn test_discovery_display() {
        let err = ValidateError::Discovery("invalid pattern plugins/[".to_string());
        assert_eq!(err.to_string(), "Discovery error: invalid pattern plugins/[");
    }
}
