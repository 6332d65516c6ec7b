//! Listener rules service
//!
//! Fetches the rules attached to a load-balancer listener and normalizes them
//! into the flattened records stored as data-source state.

use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::operation::describe_rules::DescribeRulesError;
use aws_sdk_elasticloadbalancingv2::Client as Elbv2Client;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{AwsConfigBuilder, ListenerRulesQuery, Settings};
use crate::converters::{to_state, Elbv2ToRuleConverter};
use crate::error::ProviderError;
use crate::schemas::elbv2::DescribeRulesPayload;
use crate::schemas::rule::Rule;
use crate::schemas::state::{ListenerRule, ListenerRulesState};
use crate::services::credentials::CredentialSource;
use crate::utils::{with_timeout, TimeoutError};

/// Source of `DescribeRules` pages
#[async_trait]
pub trait ListenerRuleSource: Send + Sync {
    /// Fetch the first page of rules for `listener_arn`.
    async fn describe_rules(&self, listener_arn: &str) -> Result<DescribeRulesPayload, ProviderError>;
}

/// `DescribeRules` over the ELBv2 API
#[derive(Clone)]
pub struct Elbv2RuleSource {
    client: Elbv2Client,
    timeout: Duration,
}

impl Elbv2RuleSource {
    pub fn new(client: Elbv2Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build a source whose client signs with `credentials` in `region`.
    pub fn from_credentials(settings: &Settings, region: &str, credentials: &CredentialSource) -> Self {
        let client =
            AwsConfigBuilder::new(settings).build_elbv2_client(region, credentials.provider());
        Self::new(client, settings.timeouts.elbv2_timeout)
    }

    fn map_error<R>(err: SdkError<DescribeRulesError, R>) -> ProviderError
    where
        R: std::fmt::Debug,
    {
        match &err {
            SdkError::ServiceError(service_err) => match service_err.err() {
                DescribeRulesError::ListenerNotFoundException(e) => ProviderError::remote_query(
                    format!("ListenerNotFound: {}", e.message().unwrap_or("listener not found")),
                ),
                DescribeRulesError::RuleNotFoundException(e) => ProviderError::remote_query(
                    format!("RuleNotFound: {}", e.message().unwrap_or("rule not found")),
                ),
                DescribeRulesError::UnsupportedProtocolException(e) => {
                    ProviderError::remote_query(format!(
                        "UnsupportedProtocol: {}",
                        e.message().unwrap_or("unsupported protocol")
                    ))
                }
                other => ProviderError::remote_query(DisplayErrorContext(other).to_string()),
            },
            _ => ProviderError::remote_query(DisplayErrorContext(&err).to_string()),
        }
    }
}

#[async_trait]
impl ListenerRuleSource for Elbv2RuleSource {
    async fn describe_rules(&self, listener_arn: &str) -> Result<DescribeRulesPayload, ProviderError> {
        tracing::debug!(listener_arn = %listener_arn, "Calling ELBv2 DescribeRules");

        let request = self
            .client
            .describe_rules()
            .listener_arn(listener_arn)
            .send();

        let output = with_timeout(self.timeout, request)
            .await
            .map_err(|err| match err {
                TimeoutError::Timeout(after) => {
                    ProviderError::remote_query(format!("request timed out after {:?}", after))
                }
                TimeoutError::Inner(err) => Self::map_error(err),
            })?;

        Ok(DescribeRulesPayload::from(output))
    }
}

/// Listener rule reads
///
/// One remote query per read, and no state carried between reads. Only the
/// first page of results is normalized.
#[derive(Clone)]
pub struct ListenerRuleService {
    source: Arc<dyn ListenerRuleSource>,
    converter: Elbv2ToRuleConverter,
}

impl ListenerRuleService {
    pub fn new(source: Arc<dyn ListenerRuleSource>) -> Self {
        Self {
            source,
            converter: Elbv2ToRuleConverter::new(),
        }
    }

    /// Flattened rules for a listener, in service order.
    pub async fn list_rules(&self, listener_arn: &str) -> Result<Vec<ListenerRule>, ProviderError> {
        Ok(self
            .fetch(listener_arn)
            .await?
            .into_iter()
            .map(ListenerRule::from)
            .collect())
    }

    /// Data-source read: validate the query, then produce the full state.
    pub async fn read(&self, query: &ListenerRulesQuery) -> Result<ListenerRulesState, ProviderError> {
        query.check()?;
        let rules = self.fetch(&query.listener_arn).await?;
        Ok(to_state(query.listener_arn.clone(), rules))
    }

    async fn fetch(&self, listener_arn: &str) -> Result<Vec<Rule>, ProviderError> {
        let payload = self.source.describe_rules(listener_arn).await?;

        if let Some(marker) = payload.next_marker.as_deref() {
            tracing::warn!(
                listener_arn = %listener_arn,
                next_marker = %marker,
                "DescribeRules returned more pages; only the first page is read"
            );
        }

        let rules = self.converter.convert_rules(payload.rules)?;
        tracing::debug!(
            listener_arn = %listener_arn,
            count = rules.len(),
            "Normalized listener rules"
        );
        Ok(rules)
    }
}

/// List the rules of `listener_arn` with an already resolved credential source.
pub async fn list_rules(
    settings: &Settings,
    listener_arn: &str,
    credentials: &CredentialSource,
    region: &str,
) -> Result<Vec<ListenerRule>, ProviderError> {
    let source = Elbv2RuleSource::from_credentials(settings, region, credentials);
    ListenerRuleService::new(Arc::new(source))
        .list_rules(listener_arn)
        .await
}
