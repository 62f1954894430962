//! Shared utilities for edgescope
//!
//! Atomic file writes for the identity store, XDG directory resolution and
//! tracing initialisation.

pub mod atomic_file;
pub mod tracing;
pub mod xdg;

pub use atomic_file::*;
pub use xdg::*;
