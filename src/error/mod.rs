//! Error handling module
//!
//! Defines the provider error type and the diagnostic shape reported to the host.

pub mod types;

pub use types::{Diagnostic, ProviderError};
