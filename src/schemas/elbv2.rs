//! ELBv2 DescribeRules payload definitions
//!
//! Mirror of the `DescribeRules` response as the remote service returns it: every
//! member optional, unions expressed as one tag plus many optional slots. The
//! structures deserialize from the AWS CLI JSON output (PascalCase keys) and
//! convert from the SDK output types, so the normalizer never touches SDK types.

use aws_sdk_elasticloadbalancingv2::operation::describe_rules::DescribeRulesOutput;
use aws_sdk_elasticloadbalancingv2::types as sdk;
use serde::Deserialize;

// ============================================================================
// Payload Types
// ============================================================================

/// One page of `DescribeRules` output.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRulesPayload {
    #[serde(default)]
    pub rules: Vec<RemoteRule>,
    pub next_marker: Option<String>,
}

/// A listener rule as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteRule {
    pub rule_arn: Option<String>,
    pub priority: Option<String>,
    #[serde(default)]
    pub conditions: Vec<RemoteCondition>,
    #[serde(default)]
    pub actions: Vec<RemoteAction>,
    pub is_default: Option<bool>,
}

/// Rule condition union: `field` tags which slot is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteCondition {
    pub field: Option<String>,
    pub values: Option<Vec<String>>,
    pub host_header_config: Option<RemoteValues<String>>,
    pub path_pattern_config: Option<RemoteValues<String>>,
    pub http_header_config: Option<RemoteHttpHeaderConfig>,
    pub query_string_config: Option<RemoteValues<RemoteKeyValue>>,
    pub http_request_method_config: Option<RemoteValues<String>>,
    pub source_ip_config: Option<RemoteValues<String>>,
}

/// The `{ "Values": [...] }` wrapper shared by most condition configs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteValues<T> {
    pub values: Option<Vec<T>>,
}

impl<T> RemoteValues<T> {
    pub fn new(values: Vec<T>) -> Self {
        Self {
            values: Some(values),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteHttpHeaderConfig {
    pub http_header_name: Option<String>,
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteKeyValue {
    pub key: Option<String>,
    pub value: Option<String>,
}

/// Rule action union: `type` tags which slot is meaningful.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteAction {
    #[serde(rename = "Type")]
    pub action_type: Option<String>,
    pub order: Option<i32>,
    pub target_group_arn: Option<String>,
    pub forward_config: Option<RemoteForwardConfig>,
    pub fixed_response_config: Option<RemoteFixedResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteForwardConfig {
    pub target_groups: Option<Vec<RemoteTargetGroup>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteTargetGroup {
    pub target_group_arn: Option<String>,
    pub weight: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoteFixedResponse {
    pub status_code: Option<String>,
    pub message_body: Option<String>,
    pub content_type: Option<String>,
}

// ============================================================================
// SDK Conversions
// ============================================================================

impl From<DescribeRulesOutput> for DescribeRulesPayload {
    fn from(output: DescribeRulesOutput) -> Self {
        Self {
            rules: output
                .rules
                .unwrap_or_default()
                .into_iter()
                .map(RemoteRule::from)
                .collect(),
            next_marker: output.next_marker,
        }
    }
}

impl From<sdk::Rule> for RemoteRule {
    fn from(rule: sdk::Rule) -> Self {
        Self {
            rule_arn: rule.rule_arn,
            priority: rule.priority,
            conditions: rule
                .conditions
                .unwrap_or_default()
                .into_iter()
                .map(RemoteCondition::from)
                .collect(),
            actions: rule
                .actions
                .unwrap_or_default()
                .into_iter()
                .map(RemoteAction::from)
                .collect(),
            is_default: rule.is_default,
        }
    }
}

impl From<sdk::RuleCondition> for RemoteCondition {
    fn from(condition: sdk::RuleCondition) -> Self {
        Self {
            field: condition.field,
            values: condition.values,
            host_header_config: condition
                .host_header_config
                .map(|c| RemoteValues { values: c.values }),
            path_pattern_config: condition
                .path_pattern_config
                .map(|c| RemoteValues { values: c.values }),
            http_header_config: condition
                .http_header_config
                .map(|c| RemoteHttpHeaderConfig {
                    http_header_name: c.http_header_name,
                    values: c.values,
                }),
            query_string_config: condition.query_string_config.map(|c| RemoteValues {
                values: c.values.map(|pairs| {
                    pairs
                        .into_iter()
                        .map(|pair| RemoteKeyValue {
                            key: pair.key,
                            value: pair.value,
                        })
                        .collect()
                }),
            }),
            http_request_method_config: condition
                .http_request_method_config
                .map(|c| RemoteValues { values: c.values }),
            source_ip_config: condition
                .source_ip_config
                .map(|c| RemoteValues { values: c.values }),
        }
    }
}

impl From<sdk::Action> for RemoteAction {
    fn from(action: sdk::Action) -> Self {
        Self {
            action_type: action.r#type.map(|t| t.as_str().to_string()),
            order: action.order,
            target_group_arn: action.target_group_arn,
            forward_config: action.forward_config.map(|c| RemoteForwardConfig {
                target_groups: c.target_groups.map(|groups| {
                    groups
                        .into_iter()
                        .map(|group| RemoteTargetGroup {
                            target_group_arn: group.target_group_arn,
                            weight: group.weight,
                        })
                        .collect()
                }),
            }),
            fixed_response_config: action
                .fixed_response_config
                .map(|c| RemoteFixedResponse {
                    status_code: c.status_code,
                    message_body: c.message_body,
                    content_type: c.content_type,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use serde_json::json;

    #[test]
    fn test_deserialize_cli_output() {
        let payload: DescribeRulesPayload = serde_json::from_value(json!({
            "Rules": [{
                "RuleArn": "arn:aws:elasticloadbalancing:us-east-1:123456789012:listener-rule/app/x/1/2/3",
                "Priority": "10",
                "Conditions": [{
                    "Field": "http-header",
                    "HttpHeaderConfig": { "HttpHeaderName": "X-Env", "Values": ["prod"] }
                }],
                "Actions": [{
                    "Type": "fixed-response",
                    "Order": 1,
                    "FixedResponseConfig": {
                        "StatusCode": "503",
                        "MessageBody": "down",
                        "ContentType": "text/plain"
                    }
                }],
                "IsDefault": false
            }]
        }))
        .unwrap();

        assert_eq!(payload.rules.len(), 1);
        assert!(payload.next_marker.is_none());

        let rule = &payload.rules[0];
        assert_eq!(rule.priority.as_deref(), Some("10"));
        assert_eq!(rule.is_default, Some(false));

        let header = rule.conditions[0].http_header_config.as_ref().unwrap();
        assert_eq!(header.http_header_name.as_deref(), Some("X-Env"));
        assert_eq!(header.values, Some(vec!["prod".to_string()]));

        let action = &rule.actions[0];
        assert_eq!(action.action_type.as_deref(), Some("fixed-response"));
        assert_eq!(
            action.fixed_response_config.as_ref().unwrap().status_code.as_deref(),
            Some("503")
        );
    }

    #[test]
    fn test_deserialize_missing_lists_as_empty() {
        let rule: RemoteRule = serde_json::from_value(json!({
            "RuleArn": "arn",
            "Priority": "default",
            "IsDefault": true
        }))
        .unwrap();

        assert!(rule.conditions.is_empty());
        assert!(rule.actions.is_empty());
    }

    #[test]
    fn test_condition_slot_present_with_absent_values() {
        let condition: RemoteCondition = serde_json::from_value(json!({
            "Field": "source-ip",
            "SourceIpConfig": {}
        }))
        .unwrap();

        assert_eq!(condition.source_ip_config, Some(RemoteValues { values: None }));
        assert!(condition.host_header_config.is_none());
    }

    fn sdk_rule(conditions: Vec<sdk::RuleCondition>, actions: Vec<sdk::Action>) -> sdk::Rule {
        sdk::Rule::builder()
            .rule_arn("arn:aws:elasticloadbalancing:us-east-1:123456789012:listener-rule/app/x/1/2/3")
            .priority("7")
            .is_default(false)
            .set_conditions(Some(conditions))
            .set_actions(Some(actions))
            .build()
    }

    #[test]
    fn test_from_sdk_condition_keeps_every_slot_in_place() {
        let condition = sdk::RuleCondition::builder()
            .field("host-header")
            .values("/legacy")
            .host_header_config(sdk::HostHeaderConditionConfig::builder().values("a.com").build())
            .path_pattern_config(sdk::PathPatternConditionConfig::builder().values("/api/*").build())
            .http_header_config(
                sdk::HttpHeaderConditionConfig::builder()
                    .http_header_name("X-Env")
                    .values("prod")
                    .build(),
            )
            .query_string_config(
                sdk::QueryStringConditionConfig::builder()
                    .values(
                        sdk::QueryStringKeyValuePair::builder()
                            .key("version")
                            .value("v2")
                            .build(),
                    )
                    .build(),
            )
            .http_request_method_config(
                sdk::HttpRequestMethodConditionConfig::builder().values("GET").build(),
            )
            .source_ip_config(sdk::SourceIpConditionConfig::builder().values("10.0.0.0/8").build())
            .build();

        let remote = RemoteCondition::from(condition);

        assert_eq!(remote.field.as_deref(), Some("host-header"));
        assert_eq!(remote.values, Some(vec!["/legacy".to_string()]));
        assert_eq!(remote.host_header_config, Some(RemoteValues::new(vec!["a.com".to_string()])));
        assert_eq!(remote.path_pattern_config, Some(RemoteValues::new(vec!["/api/*".to_string()])));
        assert_eq!(
            remote.http_header_config,
            Some(RemoteHttpHeaderConfig {
                http_header_name: Some("X-Env".to_string()),
                values: Some(vec!["prod".to_string()]),
            })
        );
        assert_eq!(
            remote.query_string_config,
            Some(RemoteValues::new(vec![RemoteKeyValue {
                key: Some("version".to_string()),
                value: Some("v2".to_string()),
            }]))
        );
        assert_eq!(
            remote.http_request_method_config,
            Some(RemoteValues::new(vec!["GET".to_string()]))
        );
        assert_eq!(remote.source_ip_config, Some(RemoteValues::new(vec!["10.0.0.0/8".to_string()])));
    }

    #[test]
    fn test_from_sdk_output_host_header_and_fixed_response() {
        let output = DescribeRulesOutput::builder()
            .rules(sdk_rule(
                vec![
                    sdk::RuleCondition::builder()
                        .field("host-header")
                        .host_header_config(
                            sdk::HostHeaderConditionConfig::builder().values("a.com").build(),
                        )
                        .build(),
                    sdk::RuleCondition::builder()
                        .field("path-pattern")
                        .values("/x")
                        .build(),
                ],
                vec![sdk::Action::builder()
                    .r#type(sdk::ActionTypeEnum::FixedResponse)
                    .order(2)
                    .fixed_response_config(
                        sdk::FixedResponseActionConfig::builder()
                            .status_code("503")
                            .content_type("text/plain")
                            .message_body("down")
                            .build(),
                    )
                    .build()],
            ))
            .next_marker("page-2")
            .build();

        let payload = DescribeRulesPayload::from(output);
        assert_eq!(payload.next_marker.as_deref(), Some("page-2"));

        let rules = crate::converters::normalize_rules(payload.rules).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].priority, "7");
        assert!(!rules[0].is_default);

        let host = &rules[0].conditions[0];
        assert_eq!(host.host_header_config, Some(vec!["a.com".to_string()]));
        assert_eq!(host.path_pattern_config, None);
        assert_eq!(host.values, None);

        let legacy = &rules[0].conditions[1];
        assert_eq!(legacy.values, Some(vec!["/x".to_string()]));
        assert_eq!(legacy.path_pattern_config, None);

        let action = &rules[0].actions[0];
        assert_eq!(action.action_type, "fixed-response");
        assert_eq!(action.order, 2);
        let fixed = action.fixed_response_config.as_ref().unwrap();
        assert_eq!(fixed.status_code, "503");
        assert_eq!(fixed.content_type, "text/plain");
        assert_eq!(fixed.message_body, "down");
    }

    #[test]
    fn test_from_sdk_weighted_forward_config() {
        let action = sdk::Action::builder()
            .r#type(sdk::ActionTypeEnum::Forward)
            .order(1)
            .forward_config(
                sdk::ForwardActionConfig::builder()
                    .target_groups(
                        sdk::TargetGroupTuple::builder()
                            .target_group_arn("arn:tg/blue")
                            .weight(80)
                            .build(),
                    )
                    .target_groups(
                        sdk::TargetGroupTuple::builder()
                            .target_group_arn("arn:tg/green")
                            .weight(20)
                            .build(),
                    )
                    .build(),
            )
            .build();

        let remote = RemoteAction::from(action);
        assert_eq!(remote.action_type.as_deref(), Some("forward"));
        assert_eq!(
            remote.forward_config,
            Some(RemoteForwardConfig {
                target_groups: Some(vec![
                    RemoteTargetGroup {
                        target_group_arn: Some("arn:tg/blue".to_string()),
                        weight: Some(80),
                    },
                    RemoteTargetGroup {
                        target_group_arn: Some("arn:tg/green".to_string()),
                        weight: Some(20),
                    },
                ]),
            })
        );
        assert!(remote.target_group_arn.is_none());
        assert!(remote.fixed_response_config.is_none());
    }

    #[test]
    fn test_from_sdk_action_without_type_is_violation() {
        let payload = DescribeRulesPayload::from(
            DescribeRulesOutput::builder()
                .rules(sdk_rule(vec![], vec![sdk::Action::builder().order(1).build()]))
                .build(),
        );
        assert!(payload.rules[0].actions[0].action_type.is_none());

        match crate::converters::normalize_rules(payload.rules) {
            Err(ProviderError::ContractViolation { path, .. }) => {
                assert_eq!(path, "rules[0].actions[0].type")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_from_sdk_fixed_response_without_status_is_violation() {
        let action = sdk::Action::builder()
            .r#type(sdk::ActionTypeEnum::FixedResponse)
            .order(1)
            .fixed_response_config(
                sdk::FixedResponseActionConfig::builder()
                    .content_type("text/plain")
                    .message_body("down")
                    .build(),
            )
            .build();
        let payload = DescribeRulesPayload::from(
            DescribeRulesOutput::builder()
                .rules(sdk_rule(vec![], vec![action]))
                .build(),
        );

        match crate::converters::normalize_rules(payload.rules) {
            Err(ProviderError::ContractViolation { path, .. }) => {
                assert_eq!(path, "rules[0].actions[0].fixed_response_config.status_code")
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
