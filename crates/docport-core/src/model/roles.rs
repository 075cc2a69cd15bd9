//! Signer roles.

use serde::{Deserialize, Serialize};

/// Prefix of role-derived variable ids: `ROLE.{label}.{property}`.
pub const ROLE_VARIABLE_PREFIX: &str = "ROLE.";

/// A named signing position (e.g. "Buyer"), not yet bound to a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerRoleDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub name: InjectableValue,
    pub email: InjectableValue,
    pub order: i64,
}

/// Either a literal string or a reference to a variable resolved later.
///
/// Wire form: `{"type": "text" | "injectable", "value": "..."}`.
/// `"literal"` is accepted as a synonym of `"text"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum InjectableValue {
    #[serde(rename = "text", alias = "literal")]
    Literal(String),
    #[serde(rename = "injectable")]
    Injectable(String),
}

impl InjectableValue {
    pub fn literal(v: impl Into<String>) -> Self {
        Self::Literal(v.into())
    }

    pub fn injectable(variable_id: impl Into<String>) -> Self {
        Self::Injectable(variable_id.into())
    }

    /// The referenced variable id, if this is an injectable.
    pub fn variable_id(&self) -> Option<&str> {
        match self {
            Self::Injectable(id) => Some(id),
            Self::Literal(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(v) | Self::Injectable(v) => v,
        }
    }
}

/// Whether a variable id names a role-derived variable.
pub fn is_role_variable_id(id: &str) -> bool {
    id.starts_with(ROLE_VARIABLE_PREFIX)
}
