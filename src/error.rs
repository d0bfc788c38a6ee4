use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for fw-ota operations
#[derive(Error, Debug)]
pub enum OtaError {
    #[error("VCS query failed: {0}")]
    VcsQuery(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Built firmware not at expected location: {}", .0.display())]
    ArtifactMissing(PathBuf),

    #[error("Staging failed: {0}")]
    Staging(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in fw-ota
pub type Result<T> = std::result::Result<T, OtaError>;

impl From<git2::Error> for OtaError {
    fn from(err: git2::Error) -> Self {
        OtaError::VcsQuery(err.message().to_string())
    }
}

impl From<toml::de::Error> for OtaError {
    fn from(err: toml::de::Error) -> Self {
        OtaError::Configuration(err.to_string())
    }
}

impl OtaError {
    /// Create a VCS query error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        OtaError::VcsQuery(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        OtaError::Configuration(msg.into())
    }

    /// Create a staging error with context
    pub fn staging(msg: impl Into<String>) -> Self {
        OtaError::Staging(msg.into())
    }

    /// Create a per-node notification error with context
    pub fn notification(msg: impl Into<String>) -> Self {
        OtaError::Notification(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OtaError::config("missing key 'ota.host'");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing key 'ota.host'"
        );
    }

    #[test]
    fn test_artifact_missing_names_path() {
        let err = OtaError::ArtifactMissing(PathBuf::from(".pio/build/esp32-co2/firmware.bin"));
        assert_eq!(
            err.to_string(),
            "Built firmware not at expected location: .pio/build/esp32-co2/firmware.bin"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: OtaError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let err: OtaError = git2::Error::from_str("No names found").into();
        assert!(matches!(err, OtaError::VcsQuery(_)));
        assert_eq!(err.to_string(), "VCS query failed: No names found");
    }

    #[test]
    fn test_error_from_toml() {
        let parse_err = toml::from_str::<toml::Value>("[ota\nhost = 1").unwrap_err();
        let err: OtaError = parse_err.into();
        assert!(matches!(err, OtaError::Configuration(_)));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (OtaError::vcs("x"), "VCS query failed"),
            (OtaError::config("x"), "Configuration error"),
            (OtaError::staging("x"), "Staging failed"),
            (OtaError::notification("x"), "Notification failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
