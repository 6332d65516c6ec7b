//! AWS SDK configuration
//!
//! This module builds the SDK configuration and service clients used by the
//! provider, supporting custom endpoints for local development and testing.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_elasticloadbalancingv2::Client as Elbv2Client;
use aws_sdk_sts::Client as StsClient;
use aws_smithy_types::retry::RetryConfig;

use crate::config::Settings;

/// AWS configuration builder
///
/// Every client it creates uses the adaptive retry policy with
/// `settings.max_attempts` attempts. Retrying is left entirely to the SDK.
pub struct AwsConfigBuilder<'a> {
    settings: &'a Settings,
}

impl<'a> AwsConfigBuilder<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::adaptive().with_max_attempts(self.settings.max_attempts)
    }

    /// Load the default-chain configuration for `region`
    ///
    /// Credentials are discovered from the environment, shared config files and
    /// instance or container metadata. Discovery is lazy: nothing is fetched until
    /// a client signs its first request.
    pub async fn build_default_config(&self, region: &str) -> SdkConfig {
        aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(self.retry_config())
            .load()
            .await
    }

    /// Create an STS client on top of the default-chain configuration
    ///
    /// If `AWSX_STS_ENDPOINT_URL` is set in settings, the client will use
    /// that endpoint.
    pub fn build_sts_client(&self, sdk_config: &SdkConfig) -> StsClient {
        if let Some(endpoint_url) = &self.settings.sts_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom STS endpoint");

            let sts_config = aws_sdk_sts::config::Builder::from(sdk_config)
                .endpoint_url(endpoint_url)
                .build();

            StsClient::from_conf(sts_config)
        } else {
            StsClient::new(sdk_config)
        }
    }

    /// Create an ELBv2 client bound to a resolved credential provider
    ///
    /// If `AWSX_ELBV2_ENDPOINT_URL` is set in settings, the client will use
    /// that endpoint (useful for LocalStack).
    pub fn build_elbv2_client(
        &self,
        region: &str,
        credentials: SharedCredentialsProvider,
    ) -> Elbv2Client {
        let mut builder = aws_sdk_elasticloadbalancingv2::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .retry_config(self.retry_config());

        if let Some(endpoint_url) = &self.settings.elbv2_endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom ELBv2 endpoint");
            builder = builder.endpoint_url(endpoint_url);
        }

        Elbv2Client::from_conf(builder.build())
    }
}
