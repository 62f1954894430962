//! Display implementations for error types

use super::types::Error;
use std::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument { name, message } => {
                write!(f, "invalid argument '{name}': {message}")
            }
            Error::DeviceInvalidState { id, state } => {
                write!(f, "device '{id}' is in an invalid state: {state}")
            }
            Error::AuthChain(inner) => {
                write!(f, "authentication chain unavailable: {inner}")
            }
            Error::Service {
                operation, message, ..
            } => {
                write!(f, "remote directory {operation} failed: {message}")
            }
            Error::Store {
                operation, message, ..
            } => {
                write!(f, "identity store {operation} failed: {message}")
            }
            Error::Json { message, .. } => {
                write!(f, "JSON error: {message}")
            }
            Error::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "file system {} operation failed for '{}': {}",
                    operation,
                    path.display(),
                    source
                )
            }
            Error::Configuration { message } => {
                write!(f, "configuration error: {message}")
            }
        }
    }
}
