//! External variable catalog.
//!
//! The catalog is a read-only reference set supplied by the host (typically
//! fetched from a backend before import). It is used for orphan detection and
//! for splitting a document's `variableIds` into resolved and orphaned ids.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{DocportError, DocportResult};
use crate::model::roles::is_role_variable_id;

/// One catalog entry. Only `variableId` is interpreted; everything else is
/// carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableRecord {
    pub variable_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl VariableRecord {
    pub fn new(variable_id: impl Into<String>) -> Self {
        Self {
            variable_id: variable_id.into(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableCatalog {
    records: Vec<VariableRecord>,
    ids: BTreeSet<String>,
}

impl VariableCatalog {
    pub fn new(records: Vec<VariableRecord>) -> Self {
        let ids = records.iter().map(|r| r.variable_id.clone()).collect();
        Self { records, ids }
    }

    /// Build from raw ids (tests, CLI shortcuts).
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(ids.into_iter().map(VariableRecord::new).collect())
    }

    /// Parse a catalog from JSON.
    ///
    /// Accepts either a bare list of records or an object wrapping the list
    /// under `variables`.
    pub fn from_json(v: Value) -> DocportResult<Self> {
        let list = match v {
            Value::Array(_) => v,
            Value::Object(mut o) => o.remove("variables").ok_or_else(|| {
                DocportError::invalid_argument("catalog object has no 'variables' list")
            })?,
            _ => {
                return Err(DocportError::invalid_argument(
                    "catalog must be a list of {variableId} records",
                ))
            }
        };
        let records: Vec<VariableRecord> = serde_json::from_value(list)?;
        Ok(Self::new(records))
    }

    pub fn records(&self) -> &[VariableRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Whether `id` counts as present. Role-derived ids never live in the
    /// catalog and always resolve.
    pub fn resolves(&self, id: &str) -> bool {
        is_role_variable_id(id) || self.contains(id)
    }
}

/// Result of `split_variables`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableSplit {
    pub resolved: Vec<String>,
    pub orphaned: Vec<String>,
}

/// Partition declared ids by catalog presence, keeping input order.
pub fn split_variables(variable_ids: &[String], catalog: &VariableCatalog) -> VariableSplit {
    let (resolved, orphaned) = variable_ids
        .iter()
        .cloned()
        .partition(|id| catalog.resolves(id));
    VariableSplit { resolved, orphaned }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn split_keeps_order_and_role_ids() {
        let cat = VariableCatalog::from_ids(["a", "c"]);
        let ids: Vec<String> = ["c", "b", "ROLE.Buyer.email", "a"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let split = split_variables(&ids, &cat);
        assert_eq!(split.resolved, vec!["c", "ROLE.Buyer.email", "a"]);
        assert_eq!(split.orphaned, vec!["b"]);
    }

    #[test]
    fn records_keep_extra_fields() {
        let cat = VariableCatalog::from_json(json!([
            { "variableId": "amount", "type": "CURRENCY", "label": "Amount" }
        ]))
        .unwrap();
        assert!(cat.contains("amount"));
        assert_eq!(cat.records()[0].extra["type"], "CURRENCY");
    }

    #[test]
    fn wrapped_catalog_is_accepted() {
        let cat = VariableCatalog::from_json(json!({ "variables": [{ "variableId": "x" }] })).unwrap();
        assert_eq!(cat.len(), 1);
        assert!(VariableCatalog::from_json(json!("nope")).is_err());
        assert!(VariableCatalog::from_json(json!([{ "name": "no id" }])).is_err());
    }
}
