//! Provider error types

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors surfaced by provider configuration and data-source reads.
///
/// Every variant is terminal for the operation that produced it. Retries, where
/// they exist, happen inside the SDK transport before an error reaches this type.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unable to load AWS config: {message}")]
    ConfigLoad { message: String },

    #[error("Unable to assume role: {message}")]
    RoleAssumption { message: String },

    #[error("Failed to describe ELB rules: {message}")]
    RemoteQuery { message: String },

    #[error("Invalid listener rule payload at {path}: {message}")]
    ContractViolation { path: String, message: String },
}

impl ProviderError {
    pub fn config_load(message: impl Into<String>) -> Self {
        ProviderError::ConfigLoad {
            message: message.into(),
        }
    }

    pub fn role_assumption(message: impl Into<String>) -> Self {
        ProviderError::RoleAssumption {
            message: message.into(),
        }
    }

    pub fn remote_query(message: impl Into<String>) -> Self {
        ProviderError::RemoteQuery {
            message: message.into(),
        }
    }

    /// A required field was absent from the remote payload.
    pub fn missing(path: impl Into<String>) -> Self {
        ProviderError::ContractViolation {
            path: path.into(),
            message: "required field is absent".to_string(),
        }
    }

    /// Name of the operation that failed, as shown in diagnostics.
    pub fn operation(&self) -> &'static str {
        match self {
            ProviderError::InvalidConfig(_) => "ValidateConfig",
            ProviderError::ConfigLoad { .. } => "LoadDefaultConfig",
            ProviderError::RoleAssumption { .. } => "AssumeRole",
            ProviderError::RemoteQuery { .. } => "DescribeRules",
            ProviderError::ContractViolation { .. } => "NormalizeRules",
        }
    }

    /// Render the error the way the host displays it.
    pub fn diagnostic(&self) -> Diagnostic {
        let (summary, cause) = match self {
            ProviderError::InvalidConfig(msg) => ("Invalid provider configuration", msg.clone()),
            ProviderError::ConfigLoad { message } => ("Unable to load AWS config", message.clone()),
            ProviderError::RoleAssumption { message } => ("Unable to assume role", message.clone()),
            ProviderError::RemoteQuery { message } => ("Failed to describe ELB rules", message.clone()),
            ProviderError::ContractViolation { path, message } => (
                "Unexpected listener rule payload",
                format!("{}: {}", path, message),
            ),
        };

        Diagnostic {
            summary: summary.to_string(),
            detail: format!("{} failed:\n\n{}", self.operation(), cause),
        }
    }
}

impl From<validator::ValidationErrors> for ProviderError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ProviderError::InvalidConfig(errors.to_string())
    }
}

/// Human-readable error report handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub summary: String,
    pub detail: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}\n\n{}", self.summary, self.detail)
    }
}
