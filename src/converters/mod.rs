//! Converters module
//!
//! Two steps turn a `DescribeRules` payload into data-source state:
//!
//! ```rust,ignore
//! use aws_extras::converters::{to_state, Elbv2ToRuleConverter};
//!
//! // Remote payload -> internal tagged variants (contract checks happen here)
//! let rules = Elbv2ToRuleConverter::new().convert_rules(payload.rules)?;
//!
//! // Internal variants -> flattened, all-slots-present records
//! let state = to_state(listener_arn, rules);
//! ```

pub mod elbv2_to_rule;
pub mod rule_to_state;

pub use elbv2_to_rule::Elbv2ToRuleConverter;
pub use rule_to_state::to_state;

use crate::error::ProviderError;
use crate::schemas::elbv2::RemoteRule;
use crate::schemas::state::ListenerRule;

/// Normalize remote rules into flattened records in one pass.
pub fn normalize_rules(rules: Vec<RemoteRule>) -> Result<Vec<ListenerRule>, ProviderError> {
    Ok(Elbv2ToRuleConverter::new()
        .convert_rules(rules)?
        .into_iter()
        .map(ListenerRule::from)
        .collect())
}
