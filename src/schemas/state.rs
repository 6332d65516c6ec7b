//! Flattened data-source state
//!
//! These records are the exact attribute shape the host schema declares for
//! `awsx_lb_listener_rules`. Optional slots are always serialized, as `null` when
//! the remote payload did not carry them.

use serde::{Deserialize, Serialize};

/// Full state of one data-source read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerRulesState {
    pub listener_arn: String,
    pub rules: Vec<ListenerRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerRule {
    pub rule_arn: String,
    pub is_default: bool,
    pub priority: String,
    pub conditions: Vec<ListenerRuleCondition>,
    pub actions: Vec<ListenerRuleAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenerRuleCondition {
    pub field: String,
    pub host_header_config: Option<Vec<String>>,
    pub http_header_config: Option<Vec<String>>,
    pub http_request_method_config: Option<Vec<String>>,
    pub path_pattern_config: Option<Vec<String>>,
    pub query_string_config: Option<Vec<KeyValuePair>>,
    pub source_ip_config: Option<Vec<String>>,
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListenerRuleAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub order: i64,
    pub forward_config: Option<Vec<ForwardTarget>>,
    pub fixed_response_config: Option<FixedResponseConfig>,
    pub target_group_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardTarget {
    pub target_group_arn: String,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedResponseConfig {
    pub status_code: String,
    pub message_body: String,
    pub content_type: String,
}
