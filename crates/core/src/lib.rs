//! Core domain types, errors, events and constants for edgescope.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum, `Result` alias and the typed
//!   `AuthChainError` returned when a chain cannot be resolved.
//! - **`types`**: the immutable `ServiceIdentity` value and the `AuthChain`
//!   newtype.
//! - **`events`**: `IdentityEvent` and the fan-out `EventBus` consumers
//!   subscribe to.
//! - **`constants`**: shared defaults and environment variable names.

pub mod constants;
pub mod errors;
pub mod events;
pub mod types;

pub use self::{
    constants::*,
    errors::{AuthChainError, DeviceState, Error, Result},
    events::{EventBus, IdentityEvent},
    types::*,
};
