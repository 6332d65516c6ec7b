//! Declared host schemas
//!
//! The host validates state strictly against these declarations, so the state
//! records in [`super::state`] must serialize to exactly this shape.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Provider type name registered with the host.
pub const PROVIDER_NAME: &str = "aws-extras";

/// Data source type name for listener rules.
pub const LISTENER_RULES_DATA_SOURCE: &str = "awsx_lb_listener_rules";

/// Attribute value type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Number,
    List(Box<AttributeType>),
    Object(BTreeMap<String, AttributeType>),
}

impl AttributeType {
    pub fn list(elem: AttributeType) -> Self {
        AttributeType::List(Box::new(elem))
    }

    pub fn object<const N: usize>(attrs: [(&str, AttributeType); N]) -> Self {
        AttributeType::Object(
            attrs
                .into_iter()
                .map(|(name, ty)| (name.to_string(), ty))
                .collect(),
        )
    }

    /// Check a JSON value against this type.
    ///
    /// `null` is accepted at any position. Objects must carry exactly the declared
    /// keys, no more and no fewer.
    pub fn check(&self, value: &Value) -> Result<(), ShapeError> {
        self.check_at("$", value)
    }

    fn check_at(&self, path: &str, value: &Value) -> Result<(), ShapeError> {
        match (self, value) {
            (_, Value::Null) => Ok(()),
            (AttributeType::String, Value::String(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),
            (AttributeType::Number, Value::Number(_)) => Ok(()),
            (AttributeType::List(elem), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    elem.check_at(&format!("{}[{}]", path, i), item)?;
                }
                Ok(())
            }
            (AttributeType::Object(attrs), Value::Object(map)) => {
                if let Some(extra) = map.keys().find(|key| !attrs.contains_key(*key)) {
                    return Err(ShapeError::new(
                        format!("{}.{}", path, extra),
                        "attribute is not declared",
                    ));
                }
                for (name, ty) in attrs {
                    let child = format!("{}.{}", path, name);
                    match map.get(name) {
                        Some(v) => ty.check_at(&child, v)?,
                        None => return Err(ShapeError::new(child, "attribute is missing")),
                    }
                }
                Ok(())
            }
            (expected, _) => Err(ShapeError::new(
                path,
                format!("expected {}", expected.kind()),
            )),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Number => "number",
            AttributeType::List(_) => "list",
            AttributeType::Object(_) => "object",
        }
    }
}

/// A value did not match the declared attribute shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct ShapeError {
    pub path: String,
    pub message: String,
}

impl ShapeError {
    fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A top-level schema attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub description: &'static str,
}

impl Attribute {
    fn required(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            attr_type,
            required: true,
            optional: false,
            computed: false,
            description,
        }
    }

    fn optional(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            optional: true,
            required: false,
            ..Self::required(attr_type, description)
        }
    }

    fn computed(attr_type: AttributeType, description: &'static str) -> Self {
        Self {
            computed: true,
            required: false,
            ..Self::required(attr_type, description)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    /// Check a full state object against the schema.
    pub fn check_state(&self, state: &Value) -> Result<(), ShapeError> {
        AttributeType::Object(
            self.attributes
                .iter()
                .map(|(name, attr)| (name.clone(), attr.attr_type.clone()))
                .collect(),
        )
        .check(state)
    }
}

/// Provider configuration schema.
pub fn provider_schema() -> Schema {
    Schema {
        attributes: BTreeMap::from([
            (
                "region".to_string(),
                Attribute::required(AttributeType::String, "AWS Region"),
            ),
            (
                "assume_role_arn".to_string(),
                Attribute::optional(AttributeType::String, "ARN of an IAM Role to assume"),
            ),
            (
                "session_name".to_string(),
                Attribute::optional(
                    AttributeType::String,
                    "Name for the assumed role session: 2-64 characters of [A-Za-z0-9+=,.@_-]",
                ),
            ),
        ]),
    }
}

/// `awsx_lb_listener_rules` data source schema.
pub fn listener_rules_schema() -> Schema {
    let string_list = || AttributeType::list(AttributeType::String);

    let condition = AttributeType::object([
        ("field", AttributeType::String),
        ("host_header_config", string_list()),
        ("http_header_config", string_list()),
        ("http_request_method_config", string_list()),
        ("path_pattern_config", string_list()),
        (
            "query_string_config",
            AttributeType::list(AttributeType::object([
                ("key", AttributeType::String),
                ("value", AttributeType::String),
            ])),
        ),
        ("source_ip_config", string_list()),
        ("values", string_list()),
    ]);

    let action = AttributeType::object([
        ("type", AttributeType::String),
        ("order", AttributeType::Number),
        (
            "forward_config",
            AttributeType::list(AttributeType::object([
                ("target_group_arn", AttributeType::String),
                ("weight", AttributeType::Number),
            ])),
        ),
        (
            "fixed_response_config",
            AttributeType::object([
                ("status_code", AttributeType::String),
                ("message_body", AttributeType::String),
                ("content_type", AttributeType::String),
            ]),
        ),
        ("target_group_arn", AttributeType::String),
    ]);

    let rule = AttributeType::object([
        ("rule_arn", AttributeType::String),
        ("is_default", AttributeType::Bool),
        ("priority", AttributeType::String),
        ("conditions", AttributeType::list(condition)),
        ("actions", AttributeType::list(action)),
    ]);

    Schema {
        attributes: BTreeMap::from([
            (
                "listener_arn".to_string(),
                Attribute::required(AttributeType::String, "ARN of an ELB listener"),
            ),
            (
                "rules".to_string(),
                Attribute::computed(AttributeType::list(rule), "List of ELB rules"),
            ),
        ]),
    }
}
