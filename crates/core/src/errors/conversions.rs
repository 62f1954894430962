//! Conversion implementations for error types

use super::auth_chain::AuthChainError;
use super::types::Error;
use std::path::PathBuf;

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

impl From<AuthChainError> for Error {
    fn from(error: AuthChainError) -> Self {
        Error::AuthChain(error)
    }
}
