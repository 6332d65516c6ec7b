//! Credential resolution
//!
//! Produces the credential source every data-source read signs with: the default
//! chain for the configured region, or temporary session credentials obtained by
//! assuming an IAM role on top of it. Selection happens once per configuration
//! and the result is immutable.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_smithy_types::error::display::DisplayErrorContext;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::{AwsConfigBuilder, ProviderConfig, Settings};
use crate::error::ProviderError;
use crate::utils::{with_timeout, TimeoutError};

// ============================================================================
// Credential Source
// ============================================================================

/// Resolved credential capability
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Ambient discovery: environment, shared config files, instance metadata
    DefaultChain(SharedCredentialsProvider),
    /// Static, time-bounded credentials from an STS AssumeRole exchange
    AssumedRole(AssumedRole),
}

impl CredentialSource {
    /// Provider to hand to SDK clients
    pub fn provider(&self) -> SharedCredentialsProvider {
        match self {
            CredentialSource::DefaultChain(provider) => provider.clone(),
            CredentialSource::AssumedRole(role) => role.provider.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CredentialSource::DefaultChain(_) => "default-chain",
            CredentialSource::AssumedRole(_) => "assumed-role",
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CredentialSource::DefaultChain(_) => None,
            CredentialSource::AssumedRole(role) => role.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AssumedRole {
    pub role_arn: String,
    pub session_name: String,
    pub expires_at: Option<DateTime<Utc>>,
    provider: SharedCredentialsProvider,
}

/// Temporary credentials as returned by STS, before completeness checks
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl SessionCredentials {
    fn missing_member(&self) -> Option<&'static str> {
        if self.access_key_id.is_empty() {
            Some("access_key_id")
        } else if self.secret_access_key.is_empty() {
            Some("secret_access_key")
        } else if self.session_token.is_empty() {
            Some("session_token")
        } else {
            None
        }
    }
}

// ============================================================================
// Collaborators
// ============================================================================

/// Loads the default-chain SDK configuration for a region
#[async_trait]
pub trait DefaultChainLoader: Send + Sync {
    async fn load(&self, region: &str) -> Result<SdkConfig, ProviderError>;
}

/// Exchanges the base identity for role session credentials
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    /// `Ok(None)` means STS answered without a credentials block.
    async fn assume_role(
        &self,
        base: &SdkConfig,
        role_arn: &str,
        session_name: &str,
    ) -> Result<Option<SessionCredentials>, ProviderError>;
}

/// Default chain backed by `aws-config`
pub struct SdkDefaultChain {
    settings: Arc<Settings>,
}

impl SdkDefaultChain {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl DefaultChainLoader for SdkDefaultChain {
    async fn load(&self, region: &str) -> Result<SdkConfig, ProviderError> {
        Ok(AwsConfigBuilder::new(&self.settings)
            .build_default_config(region)
            .await)
    }
}

/// Role assumption through the STS `AssumeRole` API
pub struct StsRoleAssumer {
    settings: Arc<Settings>,
}

impl StsRoleAssumer {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(
        &self,
        base: &SdkConfig,
        role_arn: &str,
        session_name: &str,
    ) -> Result<Option<SessionCredentials>, ProviderError> {
        let client = AwsConfigBuilder::new(&self.settings).build_sts_client(base);

        tracing::debug!(
            role_arn = %role_arn,
            session_name = %session_name,
            "Calling STS AssumeRole"
        );

        let request = client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .send();

        let output = with_timeout(self.settings.timeouts.sts_timeout, request)
            .await
            .map_err(|err| match err {
                TimeoutError::Timeout(after) => {
                    ProviderError::role_assumption(format!("request timed out after {:?}", after))
                }
                TimeoutError::Inner(err) => {
                    ProviderError::role_assumption(DisplayErrorContext(&err).to_string())
                }
            })?;

        Ok(output.credentials.map(|creds| SessionCredentials {
            expiration: DateTime::from_timestamp(
                creds.expiration.secs(),
                creds.expiration.subsec_nanos(),
            ),
            access_key_id: creds.access_key_id,
            secret_access_key: creds.secret_access_key,
            session_token: creds.session_token,
        }))
    }
}

// ============================================================================
// Resolver
// ============================================================================

/// Credential resolver
///
/// Each call re-resolves; nothing is cached between configurations. There is no
/// fallback between strategies: a failed role assumption never degrades to the
/// default chain.
#[derive(Clone)]
pub struct CredentialResolver {
    default_chain: Arc<dyn DefaultChainLoader>,
    role_assumer: Arc<dyn RoleAssumer>,
}

impl CredentialResolver {
    /// Resolver backed by `aws-config` and STS
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            default_chain: Arc::new(SdkDefaultChain::new(settings.clone())),
            role_assumer: Arc::new(StsRoleAssumer::new(settings)),
        }
    }

    pub fn with_collaborators(
        default_chain: Arc<dyn DefaultChainLoader>,
        role_assumer: Arc<dyn RoleAssumer>,
    ) -> Self {
        Self {
            default_chain,
            role_assumer,
        }
    }

    pub async fn resolve(&self, config: &ProviderConfig) -> Result<CredentialSource, ProviderError> {
        config.check()?;

        let sdk_config = self.default_chain.load(&config.region).await?;
        let default_provider = sdk_config.credentials_provider().ok_or_else(|| {
            ProviderError::config_load(format!(
                "no credentials provider could be resolved for region {}",
                config.region
            ))
        })?;

        let Some(role_arn) = config.role_to_assume() else {
            if config.assume_role_arn.is_some() {
                tracing::debug!("assume_role_arn is empty, not assuming a role");
            }
            tracing::debug!(region = %config.region, "Using default credential chain");
            return Ok(CredentialSource::DefaultChain(default_provider));
        };

        let session_name = config.session_name_or_default();
        let session = self
            .role_assumer
            .assume_role(&sdk_config, role_arn, session_name)
            .await?
            .ok_or_else(|| {
                ProviderError::role_assumption("AssumeRole response contained no credentials")
            })?;

        if let Some(member) = session.missing_member() {
            return Err(ProviderError::role_assumption(format!(
                "AssumeRole returned incomplete credentials: {} is empty",
                member
            )));
        }

        let credentials = Credentials::new(
            session.access_key_id,
            session.secret_access_key,
            Some(session.session_token),
            session.expiration.map(SystemTime::from),
            "AssumeRole",
        );

        tracing::info!(
            role_arn = %role_arn,
            session_name = %session_name,
            expires_at = ?session.expiration.map(|t| t.to_rfc3339()),
            "Assumed role"
        );

        Ok(CredentialSource::AssumedRole(AssumedRole {
            role_arn: role_arn.to_string(),
            session_name: session_name.to_string(),
            expires_at: session.expiration,
            provider: SharedCredentialsProvider::new(credentials),
        }))
    }
}

// ============================================================================
// Tests
// ============================================================================
