//! Rule model to host state converter
//!
//! Flattens the tagged variants into the all-slots-present records the host
//! schema declares. Each matcher or payload lands in its own slot; slots without
//! one stay `None`.

use crate::schemas::rule::{
    Action, ActionPayload, Condition, ConditionMatcher, FixedResponse, QueryStringPair, Rule,
    WeightedTargetGroup,
};
use crate::schemas::state::{
    FixedResponseConfig, ForwardTarget, KeyValuePair, ListenerRule, ListenerRuleAction,
    ListenerRuleCondition, ListenerRulesState,
};

/// Build the data-source state for one listener.
pub fn to_state(listener_arn: impl Into<String>, rules: Vec<Rule>) -> ListenerRulesState {
    ListenerRulesState {
        listener_arn: listener_arn.into(),
        rules: rules.into_iter().map(ListenerRule::from).collect(),
    }
}

impl From<Rule> for ListenerRule {
    fn from(rule: Rule) -> Self {
        Self {
            rule_arn: rule.rule_arn,
            is_default: rule.is_default,
            priority: rule.priority,
            conditions: rule
                .conditions
                .into_iter()
                .map(ListenerRuleCondition::from)
                .collect(),
            actions: rule
                .actions
                .into_iter()
                .map(ListenerRuleAction::from)
                .collect(),
        }
    }
}

impl From<Condition> for ListenerRuleCondition {
    fn from(condition: Condition) -> Self {
        let mut record = ListenerRuleCondition {
            field: condition.field.as_str().to_string(),
            ..Default::default()
        };

        for matcher in condition.matchers {
            match matcher {
                ConditionMatcher::HostHeader(v) => record.host_header_config = Some(v),
                ConditionMatcher::HttpHeader(v) => record.http_header_config = Some(v),
                ConditionMatcher::HttpRequestMethod(v) => {
                    record.http_request_method_config = Some(v)
                }
                ConditionMatcher::PathPattern(v) => record.path_pattern_config = Some(v),
                ConditionMatcher::QueryString(pairs) => {
                    record.query_string_config =
                        Some(pairs.into_iter().map(KeyValuePair::from).collect())
                }
                ConditionMatcher::SourceIp(v) => record.source_ip_config = Some(v),
                ConditionMatcher::Values(v) => record.values = Some(v),
            }
        }

        record
    }
}

impl From<QueryStringPair> for KeyValuePair {
    fn from(pair: QueryStringPair) -> Self {
        Self {
            key: pair.key,
            value: pair.value,
        }
    }
}

impl From<Action> for ListenerRuleAction {
    fn from(action: Action) -> Self {
        let mut record = ListenerRuleAction {
            action_type: action.action_type.as_str().to_string(),
            order: i64::from(action.order),
            ..Default::default()
        };

        for payload in action.payloads {
            match payload {
                ActionPayload::Forward(groups) => {
                    record.forward_config =
                        Some(groups.into_iter().map(ForwardTarget::from).collect())
                }
                ActionPayload::FixedResponse(fixed) => {
                    record.fixed_response_config = Some(FixedResponseConfig::from(fixed))
                }
                ActionPayload::TargetGroup(arn) => record.target_group_arn = Some(arn),
            }
        }

        record
    }
}

impl From<WeightedTargetGroup> for ForwardTarget {
    fn from(group: WeightedTargetGroup) -> Self {
        Self {
            target_group_arn: group.target_group_arn,
            weight: i64::from(group.weight),
        }
    }
}

impl From<FixedResponse> for FixedResponseConfig {
    fn from(fixed: FixedResponse) -> Self {
        Self {
            status_code: fixed.status_code,
            message_body: fixed.message_body,
            content_type: fixed.content_type,
        }
    }
}
