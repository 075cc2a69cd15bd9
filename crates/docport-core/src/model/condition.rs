//! Condition trees attached to `conditional` nodes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A condition tree: either a single rule or a group of sub-conditions.
///
/// No depth limit is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConditionGroup {
    Rule(ConditionRule),
    Group {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        logic: Option<LogicOperator>,
        #[serde(default)]
        children: Vec<ConditionGroup>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRule {
    pub variable_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub value: RuleValue,
}

/// Right-hand side of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleValue {
    pub mode: RuleValueMode,
    #[serde(default)]
    pub value: Value,
}

impl RuleValue {
    /// The compared variable id when the value is itself a variable.
    pub fn variable_id(&self) -> Option<&str> {
        match self.mode {
            RuleValueMode::Variable => self.value.as_str(),
            RuleValueMode::Literal => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleValueMode {
    #[serde(rename = "text", alias = "literal")]
    Literal,
    #[serde(rename = "variable")]
    Variable,
}

impl ConditionGroup {
    /// Visit every rule with its path relative to `base`.
    pub fn for_each_rule<F>(&self, base: &str, f: &mut F)
    where
        F: FnMut(&ConditionRule, &str),
    {
        match self {
            ConditionGroup::Rule(rule) => f(rule, base),
            ConditionGroup::Group { children, .. } => {
                for (i, child) in children.iter().enumerate() {
                    child.for_each_rule(&format!("{base}.children[{i}]"), f);
                }
            }
        }
    }
}
