//! AWS Extras
//!
//! Command-line host for the provider: configures it, reads data sources and
//! prints their state as JSON on stdout.

use anyhow::{Context, Result};
use aws_extras::{
    config::{ListenerRulesQuery, LogFormat, ProviderConfig, Settings},
    converters::{normalize_rules, to_state, Elbv2ToRuleConverter},
    error::ProviderError,
    logging::init_tracing,
    provider::Provider,
    schemas::{
        listener_rules_schema, provider_schema, DescribeRulesPayload, ListenerRulesState,
        LISTENER_RULES_DATA_SOURCE, PROVIDER_NAME,
    },
};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// AWS Extras
///
/// Read-only AWS views, normalized for declarative infrastructure tooling.
#[derive(Parser, Debug)]
#[command(name = "aws-extras")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overrides AWSX_LOG_LEVEL env var)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log format (overrides AWSX_LOG_FORMAT env var)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read the awsx_lb_listener_rules data source for a listener
    ListenerRules {
        /// ARN of the load-balancer listener
        #[arg(long)]
        listener_arn: String,

        /// AWS region (overrides AWSX_REGION env var)
        #[arg(long)]
        region: Option<String>,

        /// IAM role to assume before querying (overrides AWSX_ASSUME_ROLE_ARN)
        #[arg(long)]
        assume_role_arn: Option<String>,

        /// Session name for the assumed role (overrides AWSX_SESSION_NAME)
        #[arg(long)]
        session_name: Option<String>,
    },

    /// Normalize a saved `aws elbv2 describe-rules` JSON response
    Normalize {
        /// Path to the describe-rules output
        #[arg(long)]
        input: PathBuf,

        /// Wrap the rules into full data-source state for this listener
        #[arg(long)]
        listener_arn: Option<String>,
    },

    /// Print the declared provider and data source schemas
    Schema,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ProviderError>() {
                Some(provider_err) => eprintln!("{}", provider_err.diagnostic()),
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration first (before logging, so we can use log_level)
    let mut settings = Settings::load()?;

    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }
    if let Some(log_format) = args.log_format {
        settings.log_format = log_format;
    }

    init_tracing(&settings.log_level, settings.log_format)?;

    tracing::debug!(
        app_name = %settings.app_name,
        version = %settings.app_version,
        "Starting"
    );

    let output = match args.command {
        Command::ListenerRules {
            listener_arn,
            region,
            assume_role_arn,
            session_name,
        } => {
            let region = region
                .or_else(|| settings.aws_region.clone())
                .context("No region configured: pass --region or set AWSX_REGION")?;

            let config = ProviderConfig {
                region,
                assume_role_arn: assume_role_arn.or_else(|| settings.assume_role_arn.clone()),
                session_name: session_name.or_else(|| settings.session_name.clone()),
            };

            let provider = Provider::new(Arc::new(settings));
            let configured = provider.configure(config).await?;
            let state = configured
                .read_listener_rules(&ListenerRulesQuery::new(listener_arn))
                .await?;

            checked_state(&state)?
        }

        Command::Normalize {
            input,
            listener_arn,
        } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let payload: DescribeRulesPayload = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a describe-rules response", input.display()))?;

            if payload.next_marker.is_some() {
                tracing::warn!("Input carries a NextMarker; only the rules it contains are normalized");
            }

            match listener_arn {
                Some(listener_arn) => {
                    let rules = Elbv2ToRuleConverter::new().convert_rules(payload.rules)?;
                    checked_state(&to_state(listener_arn, rules))?
                }
                None => serde_json::to_value(normalize_rules(payload.rules)?)?,
            }
        }

        Command::Schema => json!({
            "provider": {
                "name": PROVIDER_NAME,
                "schema": provider_schema(),
            },
            "data_sources": {
                LISTENER_RULES_DATA_SOURCE: listener_rules_schema(),
            },
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Serialize state and check it against the declared schema.
fn checked_state(state: &ListenerRulesState) -> Result<Value> {
    let value = serde_json::to_value(state)?;
    listener_rules_schema()
        .check_state(&value)
        .context("Listener rules state does not match the declared schema")?;
    Ok(value)
}
