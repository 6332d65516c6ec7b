//! Services module
//!
//! Remote integrations: credential resolution and the listener rules query.

pub mod credentials;
pub mod listener_rules;

pub use credentials::{
    AssumedRole, CredentialResolver, CredentialSource, DefaultChainLoader, RoleAssumer,
    SdkDefaultChain, SessionCredentials, StsRoleAssumer,
};
pub use listener_rules::{list_rules, Elbv2RuleSource, ListenerRuleService, ListenerRuleSource};
