//! Core domain types for identity caching.
//!
//! - **`identity`**: the immutable [`ServiceIdentity`] value and its
//!   authentication descriptor
//! - **`auth_chain`**: the leaf-to-root [`AuthChain`] newtype

pub mod auth_chain;
pub mod identity;

pub use auth_chain::*;
pub use identity::*;
