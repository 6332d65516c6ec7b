//! Internal listener rule model
//!
//! Conditions and actions are held as tagged variants here. A remote condition may
//! carry more than one populated slot, so each one keeps the full list of matchers
//! it arrived with instead of collapsing to a single variant.

use std::fmt;

/// A normalized listener rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub rule_arn: String,
    pub is_default: bool,
    pub priority: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

// ============================================================================
// Conditions
// ============================================================================

/// Condition field tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionField {
    HostHeader,
    HttpHeader,
    HttpRequestMethod,
    PathPattern,
    QueryString,
    SourceIp,
    /// Any tag outside the known vocabulary, kept verbatim.
    Other(String),
}

impl ConditionField {
    pub fn as_str(&self) -> &str {
        match self {
            ConditionField::HostHeader => "host-header",
            ConditionField::HttpHeader => "http-header",
            ConditionField::HttpRequestMethod => "http-request-method",
            ConditionField::PathPattern => "path-pattern",
            ConditionField::QueryString => "query-string",
            ConditionField::SourceIp => "source-ip",
            ConditionField::Other(field) => field,
        }
    }
}

impl From<String> for ConditionField {
    fn from(field: String) -> Self {
        match field.as_str() {
            "host-header" => ConditionField::HostHeader,
            "http-header" => ConditionField::HttpHeader,
            "http-request-method" => ConditionField::HttpRequestMethod,
            "path-pattern" => ConditionField::PathPattern,
            "query-string" => ConditionField::QueryString,
            "source-ip" => ConditionField::SourceIp,
            _ => ConditionField::Other(field),
        }
    }
}

impl fmt::Display for ConditionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One populated condition slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionMatcher {
    HostHeader(Vec<String>),
    HttpHeader(Vec<String>),
    HttpRequestMethod(Vec<String>),
    PathPattern(Vec<String>),
    QueryString(Vec<QueryStringPair>),
    SourceIp(Vec<String>),
    /// Legacy `Values` list.
    Values(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStringPair {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: ConditionField,
    pub matchers: Vec<ConditionMatcher>,
}

// ============================================================================
// Actions
// ============================================================================

/// Action type tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionType {
    Forward,
    FixedResponse,
    Redirect,
    AuthenticateOidc,
    AuthenticateCognito,
    Other(String),
}

impl ActionType {
    pub fn as_str(&self) -> &str {
        match self {
            ActionType::Forward => "forward",
            ActionType::FixedResponse => "fixed-response",
            ActionType::Redirect => "redirect",
            ActionType::AuthenticateOidc => "authenticate-oidc",
            ActionType::AuthenticateCognito => "authenticate-cognito",
            ActionType::Other(action_type) => action_type,
        }
    }
}

impl From<String> for ActionType {
    fn from(action_type: String) -> Self {
        match action_type.as_str() {
            "forward" => ActionType::Forward,
            "fixed-response" => ActionType::FixedResponse,
            "redirect" => ActionType::Redirect,
            "authenticate-oidc" => ActionType::AuthenticateOidc,
            "authenticate-cognito" => ActionType::AuthenticateCognito,
            _ => ActionType::Other(action_type),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One populated action slot. Redirect and authenticate payloads are not decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionPayload {
    /// Legacy single target group.
    TargetGroup(String),
    Forward(Vec<WeightedTargetGroup>),
    FixedResponse(FixedResponse),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTargetGroup {
    pub target_group_arn: String,
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedResponse {
    pub status_code: String,
    pub message_body: String,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub action_type: ActionType,
    /// 1-based execution order within the rule.
    pub order: i32,
    pub payloads: Vec<ActionPayload>,
}
