//! Builder methods for creating errors with context

use super::types::{DeviceState, Error};
use std::path::PathBuf;

// Helper methods for creating errors with context
impl Error {
    /// Create an argument validation error
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a device state verification error
    #[must_use]
    pub fn device_invalid_state(id: impl Into<String>, state: DeviceState) -> Self {
        Error::DeviceInvalidState {
            id: id.into(),
            state,
        }
    }

    /// Create a remote directory error
    #[must_use]
    pub fn service(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Service {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a remote directory error with a source error
    #[must_use]
    pub fn service_with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Service {
            operation: operation.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an identity store error
    #[must_use]
    pub fn store(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Store {
            operation: operation.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an identity store error with a source error
    #[must_use]
    pub fn store_with_source(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Store {
            operation: operation.into(),
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether retrying the same call later may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Service { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AuthChainError;

    #[test]
    fn test_transient_classification() {
        assert!(Error::service("get identity", "connection reset").is_transient());
        assert!(!Error::invalid_argument("id", "must not be empty").is_transient());
        assert!(!Error::configuration("refresh rate must be greater than zero").is_transient());
    }

    #[test]
    fn test_display_includes_context() {
        let err = Error::device_invalid_state("leaf1", DeviceState::NotInScope);
        assert_eq!(
            err.to_string(),
            "device 'leaf1' is in an invalid state: not in scope"
        );

        let err: Error = AuthChainError::Disabled {
            id: "e1".to_string(),
        }
        .into();
        assert!(err.to_string().contains("'e1' is disabled"));
    }
}
