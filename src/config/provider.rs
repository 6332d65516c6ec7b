//! Inbound provider and data-source configuration records
//!
//! The host decodes these from the practitioner's configuration. They are
//! validated before any remote call is attempted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::ProviderError;

/// Session name used when a role is assumed without an explicit name.
pub const DEFAULT_SESSION_NAME: &str = "aws-extras";

static SESSION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+=,.@_-]+$").expect("session name pattern is a valid regex")
});

/// Provider configuration block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProviderConfig {
    #[validate(length(min = 1, message = "region must not be empty"))]
    pub region: String,

    /// ARN of an IAM role to assume. Empty means not configured.
    #[serde(default)]
    pub assume_role_arn: Option<String>,

    #[serde(default)]
    #[validate(
        length(min = 2, max = 64, message = "session_name must be 2-64 characters long"),
        regex(
            path = *SESSION_NAME_PATTERN,
            message = "session_name may only contain alphanumeric characters and any of _+=,.@-"
        )
    )]
    pub session_name: Option<String>,
}

impl ProviderConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    pub fn with_assume_role(mut self, role_arn: impl Into<String>) -> Self {
        self.assume_role_arn = Some(role_arn.into());
        self
    }

    pub fn with_session_name(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = Some(session_name.into());
        self
    }

    /// Role to assume, if one is configured with a non-empty value.
    pub fn role_to_assume(&self) -> Option<&str> {
        self.assume_role_arn.as_deref().filter(|arn| !arn.is_empty())
    }

    pub fn session_name_or_default(&self) -> &str {
        self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME)
    }

    pub fn check(&self) -> Result<(), ProviderError> {
        Ok(self.validate()?)
    }
}

/// `awsx_lb_listener_rules` data source arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ListenerRulesQuery {
    #[validate(length(min = 1, message = "listener_arn must not be empty"))]
    pub listener_arn: String,
}

impl ListenerRulesQuery {
    pub fn new(listener_arn: impl Into<String>) -> Self {
        Self {
            listener_arn: listener_arn.into(),
        }
    }

    pub fn check(&self) -> Result<(), ProviderError> {
        Ok(self.validate()?)
    }
}
