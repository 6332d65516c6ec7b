//! Deadlines for remote calls
//!
//! Every remote call runs under a deadline. Dropping the returned future cancels
//! the in-flight SDK request.

use anyhow::Context;
use std::time::Duration;

/// Per-operation deadlines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Deadline for the STS AssumeRole exchange (default: 30s)
    pub sts_timeout: Duration,

    /// Deadline for the ELBv2 DescribeRules query, retries included (default: 60s)
    pub elbv2_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            sts_timeout: Duration::from_secs(30),
            elbv2_timeout: Duration::from_secs(60),
        }
    }
}

impl TimeoutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sts_timeout(mut self, timeout: Duration) -> Self {
        self.sts_timeout = timeout;
        self
    }

    pub fn with_elbv2_timeout(mut self, timeout: Duration) -> Self {
        self.elbv2_timeout = timeout;
        self
    }

    /// Create config from environment variables with defaults
    ///
    /// A set but malformed value is an error rather than a silent default.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = env_secs("AWSX_STS_TIMEOUT_SECS")? {
            config.sts_timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = env_secs("AWSX_ELBV2_TIMEOUT_SECS")? {
            config.elbv2_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn env_secs(key: &str) -> anyhow::Result<Option<u64>> {
    match std::env::var(key) {
        Ok(raw) => parse_secs(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_secs(key: &str, raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid {} value: {:?}", key, raw))
}

/// Apply timeout to an async operation
pub async fn with_timeout<T, E>(
    timeout: Duration,
    future: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, TimeoutError<E>> {
    match tokio::time::timeout(timeout, future).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(TimeoutError::Inner(err)),
        Err(_) => Err(TimeoutError::Timeout(timeout)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError<E> {
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Inner(E),
}

impl<E> TimeoutError<E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TimeoutError::Timeout(_))
    }
}
