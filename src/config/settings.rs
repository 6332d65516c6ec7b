//! Process settings
//!
//! Settings are loaded from `AWSX_*` environment variables (and a `.env` file when
//! present) with defaults. CLI flags override them in `main`.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;

use crate::utils::TimeoutConfig;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Pretty => write!(f, "pretty"),
        }
    }
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Json
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            _ => anyhow::bail!("Invalid log format: {}. Expected: json or pretty", s),
        }
    }
}

/// Main process settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub log_level: String,
    pub log_format: LogFormat,

    // Provider configuration defaults
    pub aws_region: Option<String>,
    pub assume_role_arn: Option<String>,
    pub session_name: Option<String>,

    // Endpoint overrides for local testing
    pub elbv2_endpoint_url: Option<String>,
    pub sts_endpoint_url: Option<String>,

    /// Attempts per remote call under the adaptive retry policy
    pub max_attempts: u32,

    #[serde(skip)]
    pub timeouts: TimeoutConfig,
}

impl Settings {
    /// Load settings from environment variables with defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let settings = Self {
            app_name: env_or_default("AWSX_APP_NAME", "aws-extras"),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: env_or_default("AWSX_LOG_LEVEL", "info"),
            log_format: env_parsed("AWSX_LOG_FORMAT", "json")?,

            aws_region: env_non_empty("AWSX_REGION"),
            assume_role_arn: env_non_empty("AWSX_ASSUME_ROLE_ARN"),
            session_name: env_non_empty("AWSX_SESSION_NAME"),

            elbv2_endpoint_url: env_non_empty("AWSX_ELBV2_ENDPOINT_URL"),
            sts_endpoint_url: env_non_empty("AWSX_STS_ENDPOINT_URL"),

            max_attempts: env_parsed("AWSX_MAX_ATTEMPTS", "3")?,

            timeouts: TimeoutConfig::from_env()?,
        };

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            anyhow::bail!("max_attempts must be > 0");
        }

        if self.timeouts.sts_timeout.is_zero() || self.timeouts.elbv2_timeout.is_zero() {
            anyhow::bail!("Remote call timeouts must be > 0");
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "aws-extras".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            aws_region: None,
            assume_role_arn: None,
            session_name: None,
            elbv2_endpoint_url: None,
            sts_endpoint_url: None,
            max_attempts: 3,
            timeouts: TimeoutConfig::default(),
        }
    }
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a setting, naming the variable and the offending value on failure.
fn env_parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    parse_setting(key, &env_or_default(key, default))
}

fn parse_setting<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Invalid {} value: {:?}", key, raw))
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
