//! AWS Extras provider library
//!
//! Read-only views of AWS resources for declarative infrastructure tooling.
//! Currently exposes the `awsx_lb_listener_rules` data source.

// Public modules
pub mod config;
pub mod converters;
pub mod error;
pub mod logging;
pub mod provider;
pub mod schemas;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::{ListenerRulesQuery, ProviderConfig, Settings};
pub use error::{Diagnostic, ProviderError};
pub use provider::{ConfiguredProvider, Provider};
