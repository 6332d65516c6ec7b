//! Provider facade
//!
//! `Provider::configure` resolves credentials once and returns a
//! [`ConfiguredProvider`]. That value is immutable and is handed explicitly to
//! every data-source read; reconfiguring produces a new value.

use std::sync::Arc;

use crate::config::{ListenerRulesQuery, ProviderConfig, Settings};
use crate::error::ProviderError;
use crate::schemas::state::ListenerRulesState;
use crate::services::{CredentialResolver, CredentialSource, Elbv2RuleSource, ListenerRuleService};

/// Unconfigured provider
#[derive(Clone)]
pub struct Provider {
    settings: Arc<Settings>,
    resolver: CredentialResolver,
}

impl Provider {
    pub fn new(settings: Arc<Settings>) -> Self {
        let resolver = CredentialResolver::new(settings.clone());
        Self { settings, resolver }
    }

    pub fn with_resolver(settings: Arc<Settings>, resolver: CredentialResolver) -> Self {
        Self { settings, resolver }
    }

    /// Validate `config` and resolve its credentials.
    pub async fn configure(&self, config: ProviderConfig) -> Result<ConfiguredProvider, ProviderError> {
        let credentials = self.resolver.resolve(&config).await?;

        tracing::info!(
            region = %config.region,
            credential_source = credentials.kind(),
            "Provider configured"
        );

        Ok(ConfiguredProvider {
            settings: self.settings.clone(),
            region: config.region,
            credentials,
        })
    }
}

/// Configured provider state: region plus resolved credentials
#[derive(Debug, Clone)]
pub struct ConfiguredProvider {
    settings: Arc<Settings>,
    region: String,
    credentials: CredentialSource,
}

impl ConfiguredProvider {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Listener rules service signing with this provider's credentials
    pub fn listener_rules(&self) -> ListenerRuleService {
        let source = Elbv2RuleSource::from_credentials(&self.settings, &self.region, &self.credentials);
        ListenerRuleService::new(Arc::new(source))
    }

    /// Read the `awsx_lb_listener_rules` data source.
    pub async fn read_listener_rules(
        &self,
        query: &ListenerRulesQuery,
    ) -> Result<ListenerRulesState, ProviderError> {
        self.listener_rules().read(query).await
    }
}
