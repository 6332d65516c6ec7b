//! Configuration management module
//!
//! Process settings, the inbound provider/data-source records, and AWS SDK
//! client construction.

pub mod aws;
pub mod provider;
pub mod settings;

pub use aws::AwsConfigBuilder;
pub use provider::{ListenerRulesQuery, ProviderConfig, DEFAULT_SESSION_NAME};
pub use settings::{LogFormat, Settings};
