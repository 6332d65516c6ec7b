//! ELBv2 payload to rule model converter
//!
//! Turns the `DescribeRules` payload into the internal tagged-variant model. No
//! reordering, filtering or deduplication happens here: rules, conditions and
//! actions come out in the order and count they went in.

use crate::error::ProviderError;
use crate::schemas::elbv2::{
    RemoteAction, RemoteCondition, RemoteFixedResponse, RemoteKeyValue, RemoteRule,
    RemoteTargetGroup, RemoteValues,
};
use crate::schemas::rule::{
    Action, ActionPayload, Condition, ConditionMatcher, FixedResponse, QueryStringPair, Rule,
    WeightedTargetGroup,
};

/// Converter for `DescribeRules` payloads into [`Rule`] values.
///
/// Required members that are absent fail with
/// [`ProviderError::ContractViolation`] carrying the location of the member, e.g.
/// `rules[2].actions[0].order`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Elbv2ToRuleConverter;

impl Elbv2ToRuleConverter {
    pub fn new() -> Self {
        Self
    }

    /// Convert every rule of a response page. Fails on the first violation.
    pub fn convert_rules(&self, rules: Vec<RemoteRule>) -> Result<Vec<Rule>, ProviderError> {
        rules
            .into_iter()
            .enumerate()
            .map(|(i, rule)| self.convert_rule(&format!("rules[{}]", i), rule))
            .collect()
    }

    fn convert_rule(&self, path: &str, rule: RemoteRule) -> Result<Rule, ProviderError> {
        let rule_arn = required(rule.rule_arn, path, "rule_arn")?;
        let is_default = required(rule.is_default, path, "is_default")?;
        let priority = required(rule.priority, path, "priority")?;

        let conditions = rule
            .conditions
            .into_iter()
            .enumerate()
            .map(|(i, c)| self.convert_condition(&format!("{}.conditions[{}]", path, i), c))
            .collect::<Result<Vec<_>, _>>()?;

        let actions = rule
            .actions
            .into_iter()
            .enumerate()
            .map(|(i, a)| self.convert_action(&format!("{}.actions[{}]", path, i), a))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Rule {
            rule_arn,
            is_default,
            priority,
            conditions,
            actions,
        })
    }

    // ========================================================================
    // Conditions
    // ========================================================================

    fn convert_condition(
        &self,
        path: &str,
        condition: RemoteCondition,
    ) -> Result<Condition, ProviderError> {
        let field = required(condition.field, path, "field")?;

        let mut matchers = Vec::new();
        if let Some(cfg) = condition.host_header_config {
            matchers.push(ConditionMatcher::HostHeader(values_of(cfg)));
        }
        if let Some(cfg) = condition.http_header_config {
            matchers.push(ConditionMatcher::HttpHeader(cfg.values.unwrap_or_default()));
        }
        if let Some(cfg) = condition.http_request_method_config {
            matchers.push(ConditionMatcher::HttpRequestMethod(values_of(cfg)));
        }
        if let Some(cfg) = condition.path_pattern_config {
            matchers.push(ConditionMatcher::PathPattern(values_of(cfg)));
        }
        if let Some(cfg) = condition.query_string_config {
            let pairs = values_of(cfg)
                .into_iter()
                .enumerate()
                .map(|(i, pair)| {
                    convert_pair(&format!("{}.query_string_config[{}]", path, i), pair)
                })
                .collect::<Result<Vec<_>, _>>()?;
            matchers.push(ConditionMatcher::QueryString(pairs));
        }
        if let Some(cfg) = condition.source_ip_config {
            matchers.push(ConditionMatcher::SourceIp(values_of(cfg)));
        }
        if let Some(values) = condition.values {
            matchers.push(ConditionMatcher::Values(values));
        }

        Ok(Condition {
            field: field.into(),
            matchers,
        })
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn convert_action(&self, path: &str, action: RemoteAction) -> Result<Action, ProviderError> {
        let action_type = required(action.action_type, path, "type")?;
        let order = required(action.order, path, "order")?;

        let mut payloads = Vec::new();
        if let Some(cfg) = action.forward_config {
            let groups = cfg
                .target_groups
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(i, group)| {
                    convert_target_group(&format!("{}.forward_config[{}]", path, i), group)
                })
                .collect::<Result<Vec<_>, _>>()?;
            payloads.push(ActionPayload::Forward(groups));
        }
        if let Some(cfg) = action.fixed_response_config {
            payloads.push(ActionPayload::FixedResponse(convert_fixed_response(
                &format!("{}.fixed_response_config", path),
                cfg,
            )?));
        }
        if let Some(arn) = action.target_group_arn {
            payloads.push(ActionPayload::TargetGroup(arn));
        }

        Ok(Action {
            action_type: action_type.into(),
            order,
            payloads,
        })
    }
}

fn convert_pair(path: &str, pair: RemoteKeyValue) -> Result<QueryStringPair, ProviderError> {
    Ok(QueryStringPair {
        key: required(pair.key, path, "key")?,
        value: required(pair.value, path, "value")?,
    })
}

fn convert_target_group(
    path: &str,
    group: RemoteTargetGroup,
) -> Result<WeightedTargetGroup, ProviderError> {
    Ok(WeightedTargetGroup {
        target_group_arn: required(group.target_group_arn, path, "target_group_arn")?,
        weight: required(group.weight, path, "weight")?,
    })
}

fn convert_fixed_response(
    path: &str,
    cfg: RemoteFixedResponse,
) -> Result<FixedResponse, ProviderError> {
    Ok(FixedResponse {
        status_code: required(cfg.status_code, path, "status_code")?,
        message_body: required(cfg.message_body, path, "message_body")?,
        content_type: required(cfg.content_type, path, "content_type")?,
    })
}

/// A present slot whose value list is absent reads as an empty list.
fn values_of<T>(cfg: RemoteValues<T>) -> Vec<T> {
    cfg.values.unwrap_or_default()
}

fn required<T>(value: Option<T>, path: &str, member: &str) -> Result<T, ProviderError> {
    value.ok_or_else(|| ProviderError::missing(format!("{}.{}", path, member)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::elbv2::{DescribeRulesPayload, RemoteForwardConfig};
    use crate::schemas::rule::{ActionType, ConditionField};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> Vec<RemoteRule> {
        serde_json::from_value::<DescribeRulesPayload>(value)
            .unwrap()
            .rules
    }

    fn rule_with(conditions: Vec<RemoteCondition>, actions: Vec<RemoteAction>) -> RemoteRule {
        RemoteRule {
            rule_arn: Some("arn:rule".to_string()),
            priority: Some("1".to_string()),
            is_default: Some(false),
            conditions,
            actions,
        }
    }

    fn forward_action(order: i32) -> RemoteAction {
        RemoteAction {
            action_type: Some("forward".to_string()),
            order: Some(order),
            target_group_arn: Some("arn:tg".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_converts_path_pattern_forward_rule() {
        let rules = payload(json!({
            "Rules": [{
                "RuleArn": "arn:aws:elasticloadbalancing:us-east-1:1:listener-rule/app/x/1/2/3",
                "Priority": "1",
                "IsDefault": false,
                "Conditions": [{
                    "Field": "path-pattern",
                    "PathPatternConfig": { "Values": ["/api/*"] }
                }],
                "Actions": [{
                    "Type": "forward",
                    "Order": 1,
                    "TargetGroupArn": "arn:aws:elasticloadbalancing:us-east-1:1:targetgroup/tg/4"
                }]
            }]
        }));

        let converted = Elbv2ToRuleConverter::new().convert_rules(rules).unwrap();

        assert_eq!(
            converted,
            vec![Rule {
                rule_arn: "arn:aws:elasticloadbalancing:us-east-1:1:listener-rule/app/x/1/2/3"
                    .to_string(),
                is_default: false,
                priority: "1".to_string(),
                conditions: vec![Condition {
                    field: ConditionField::PathPattern,
                    matchers: vec![ConditionMatcher::PathPattern(vec!["/api/*".to_string()])],
                }],
                actions: vec![Action {
                    action_type: ActionType::Forward,
                    order: 1,
                    payloads: vec![ActionPayload::TargetGroup(
                        "arn:aws:elasticloadbalancing:us-east-1:1:targetgroup/tg/4".to_string()
                    )],
                }],
            }]
        );
    }

    #[test]
    fn test_preserves_rule_and_action_order() {
        let rules = vec![
            RemoteRule {
                rule_arn: Some("arn:rule/b".to_string()),
                ..rule_with(vec![], vec![forward_action(2), forward_action(1)])
            },
            RemoteRule {
                rule_arn: Some("arn:rule/a".to_string()),
                ..rule_with(vec![], vec![])
            },
        ];

        let converted = Elbv2ToRuleConverter::new().convert_rules(rules).unwrap();

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].rule_arn, "arn:rule/b");
        assert_eq!(converted[1].rule_arn, "arn:rule/a");
        let orders: Vec<i32> = converted[0].actions.iter().map(|a| a.order).collect();
        assert_eq!(orders, vec![2, 1]);
    }

    #[test]
    fn test_keeps_every_present_slot() {
        let condition = RemoteCondition {
            field: Some("path-pattern".to_string()),
            values: Some(vec!["/legacy".to_string()]),
            path_pattern_config: Some(RemoteValues::new(vec!["/legacy".to_string()])),
            ..Default::default()
        };

        let converted = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![condition], vec![])])
            .unwrap();

        assert_eq!(
            converted[0].conditions[0].matchers,
            vec![
                ConditionMatcher::PathPattern(vec!["/legacy".to_string()]),
                ConditionMatcher::Values(vec!["/legacy".to_string()]),
            ]
        );
    }

    #[test]
    fn test_slot_without_values_is_empty_not_absent() {
        let condition = RemoteCondition {
            field: Some("source-ip".to_string()),
            source_ip_config: Some(RemoteValues { values: None }),
            ..Default::default()
        };

        let converted = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![condition], vec![])])
            .unwrap();

        assert_eq!(
            converted[0].conditions[0].matchers,
            vec![ConditionMatcher::SourceIp(vec![])]
        );
    }

    #[test]
    fn test_query_string_pair_missing_value_is_violation() {
        let condition = RemoteCondition {
            field: Some("query-string".to_string()),
            query_string_config: Some(RemoteValues::new(vec![
                RemoteKeyValue {
                    key: Some("a".to_string()),
                    value: Some("1".to_string()),
                },
                RemoteKeyValue {
                    key: Some("b".to_string()),
                    value: None,
                },
            ])),
            ..Default::default()
        };

        let err = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![condition], vec![])])
            .unwrap_err();

        match err {
            ProviderError::ContractViolation { path, .. } => {
                assert_eq!(path, "rules[0].conditions[0].query_string_config[1].value")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_condition_without_field_is_violation() {
        let err = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![RemoteCondition::default()], vec![])])
            .unwrap_err();

        assert_eq!(err.operation(), "NormalizeRules");
        assert!(err.to_string().contains("rules[0].conditions[0].field"));
    }

    #[test]
    fn test_missing_rule_scalars_are_violations() {
        for (rule, member) in [
            (
                RemoteRule {
                    rule_arn: None,
                    ..rule_with(vec![], vec![])
                },
                "rules[0].rule_arn",
            ),
            (
                RemoteRule {
                    is_default: None,
                    ..rule_with(vec![], vec![])
                },
                "rules[0].is_default",
            ),
            (
                RemoteRule {
                    priority: None,
                    ..rule_with(vec![], vec![])
                },
                "rules[0].priority",
            ),
        ] {
            let err = Elbv2ToRuleConverter::new()
                .convert_rules(vec![rule])
                .unwrap_err();
            assert!(err.to_string().contains(member), "{err}");
        }
    }

    #[test]
    fn test_action_without_order_is_violation() {
        let action = RemoteAction {
            order: None,
            ..forward_action(1)
        };

        let err = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![], vec![action])])
            .unwrap_err();

        assert!(err.to_string().contains("rules[0].actions[0].order"));
    }

    #[test]
    fn test_weighted_forward_config() {
        let action = RemoteAction {
            action_type: Some("forward".to_string()),
            order: Some(1),
            forward_config: Some(RemoteForwardConfig {
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
            }),
            ..Default::default()
        };

        let converted = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![], vec![action])])
            .unwrap();

        assert_eq!(
            converted[0].actions[0].payloads,
            vec![ActionPayload::Forward(vec![
                WeightedTargetGroup {
                    target_group_arn: "arn:tg/blue".to_string(),
                    weight: 80,
                },
                WeightedTargetGroup {
                    target_group_arn: "arn:tg/green".to_string(),
                    weight: 20,
                },
            ])]
        );
    }

    #[test]
    fn test_forward_target_without_weight_is_violation() {
        let action = RemoteAction {
            forward_config: Some(RemoteForwardConfig {
                target_groups: Some(vec![RemoteTargetGroup {
                    target_group_arn: Some("arn:tg".to_string()),
                    weight: None,
                }]),
            }),
            ..forward_action(1)
        };

        let err = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![], vec![action])])
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("rules[0].actions[0].forward_config[0].weight"));
    }

    #[test]
    fn test_fixed_response_requires_all_members() {
        let action = RemoteAction {
            action_type: Some("fixed-response".to_string()),
            order: Some(1),
            fixed_response_config: Some(RemoteFixedResponse {
                status_code: Some("200".to_string()),
                message_body: None,
                content_type: Some("text/plain".to_string()),
            }),
            ..Default::default()
        };

        let err = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![], vec![action])])
            .unwrap_err();

        assert!(err
            .to_string()
            .contains("rules[0].actions[0].fixed_response_config.message_body"));
    }

    #[test]
    fn test_undecoded_action_types_carry_no_payload() {
        let action = RemoteAction {
            action_type: Some("redirect".to_string()),
            order: Some(1),
            ..Default::default()
        };

        let converted = Elbv2ToRuleConverter::new()
            .convert_rules(vec![rule_with(vec![], vec![action])])
            .unwrap();

        assert_eq!(converted[0].actions[0].action_type, ActionType::Redirect);
        assert!(converted[0].actions[0].payloads.is_empty());
    }
}
