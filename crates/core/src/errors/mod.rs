//! Error types for edgescope operations

mod auth_chain;
mod builders;
mod conversions;
mod display;
mod types;

pub use auth_chain::AuthChainError;
pub use types::{DeviceState, Error, Result};
