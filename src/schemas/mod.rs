//! Schema module
//!
//! Remote payload mirrors, the internal rule model, and the host-facing state
//! records with their declared schema.

pub mod attributes;
pub mod elbv2;
pub mod rule;
pub mod state;

pub use attributes::{
    listener_rules_schema, provider_schema, AttributeType, Schema, ShapeError,
    LISTENER_RULES_DATA_SOURCE, PROVIDER_NAME,
};
pub use elbv2::{DescribeRulesPayload, RemoteAction, RemoteCondition, RemoteRule};
pub use rule::{Action, ActionPayload, ActionType, Condition, ConditionField, ConditionMatcher, Rule};
pub use state::{ListenerRule, ListenerRuleAction, ListenerRuleCondition, ListenerRulesState};
