//! Structural validation of raw documents.
//!
//! The validator walks a raw `serde_json::Value`, records every structural
//! problem as a `{path, message}` pair and canonicalizes nullable fields on
//! the way:
//! - nullable lists (`variableIds`, `signerRoles`, node `content` / `marks`,
//!   `signatures`, `roleConfigs`, `selectedRoleIds`, group `children`) become `[]`
//! - nullable trigger maps become `{}` and `null` trigger entries are dropped
//! - `metadata` is renamed to `meta`
//!
//! Only a document with zero errors is decoded into `PortableDocument`.
//! Downstream stages consume that canonical form, never the raw input.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::{node_types, PortableDocument};
use crate::version::FormatVersion;

const TOP_LEVEL_KEYS: &[&str] = &[
    "version",
    "meta",
    "pageConfig",
    "variableIds",
    "signerRoles",
    "signingWorkflow",
    "content",
    "exportInfo",
];

const TRIGGER_ORDER_MODES: &[&str] = &["parallel", "sequential"];
const NOTIFICATION_SCOPES: &[&str] = &["global", "individual"];
const PREVIOUS_ROLES_MODES: &[&str] = &["auto", "custom"];
const INJECTABLE_TYPES: &[&str] = &["text", "literal", "injectable"];
const RULE_VALUE_MODES: &[&str] = &["text", "literal", "variable"];
const LOGIC_OPERATORS: &[&str] = &["AND", "OR"];

/// A single structural problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    pub path: String,
    pub message: String,
}

impl SchemaError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "document {}", self.message)
        } else {
            write!(f, "{} {}", self.path, self.message)
        }
    }
}

/// Validate and canonicalize a raw document.
pub fn validate_schema(raw: &Value) -> Result<PortableDocument, Vec<SchemaError>> {
    let mut doc = raw.clone();
    let mut v = Validator::default();
    v.document(&mut doc);

    if !v.errors.is_empty() {
        return Err(v.errors);
    }

    serde_json::from_value(doc)
        .map_err(|e| vec![SchemaError::new("", format!("does not match the format: {e}"))])
}

#[derive(Clone, Copy)]
enum Kind {
    String,
    Number,
    Integer,
    Bool,
}

impl Kind {
    fn matches(self, v: &Value) -> bool {
        match self {
            Kind::String => v.is_string(),
            Kind::Number => v.is_number(),
            Kind::Integer => v.is_i64(),
            Kind::Bool => v.is_boolean(),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Kind::String => "a string",
            Kind::Number => "a number",
            Kind::Integer => "a signed 64-bit integer",
            Kind::Bool => "a boolean",
        }
    }
}

fn field_path(base: &str, key: &str) -> String {
    if base.is_empty() {
        key.to_string()
    } else {
        format!("{base}.{key}")
    }
}

#[derive(Default)]
struct Validator {
    errors: Vec<SchemaError>,
}

impl Validator {
    fn err(&mut self, path: &str, message: impl Into<String>) {
        self.errors.push(SchemaError::new(path, message));
    }

    fn object<'v>(&mut self, v: &'v mut Value, path: &str) -> Option<&'v mut Map<String, Value>> {
        match v {
            Value::Object(o) => Some(o),
            _ => {
                self.err(path, "must be an object");
                None
            }
        }
    }

    fn field(&mut self, o: &Map<String, Value>, base: &str, key: &str, kind: Kind, required: bool) {
        match o.get(key) {
            Some(v) if kind.matches(v) => {}
            None | Some(Value::Null) if !required => {}
            None => self.err(&field_path(base, key), "is required"),
            Some(_) => self.err(&field_path(base, key), format!("must be {}", kind.describe())),
        }
    }

    fn one_of(&mut self, o: &Map<String, Value>, base: &str, key: &str, allowed: &[&str], required: bool) {
        let path = field_path(base, key);
        match o.get(key) {
            Some(Value::String(s)) if allowed.contains(&s.as_str()) => {}
            None | Some(Value::Null) if !required => {}
            None => self.err(&path, "is required"),
            Some(_) => self.err(&path, format!("must be one of: {}", allowed.join(", "))),
        }
    }

    /// A nullable list field. `null` (and, with `insert_missing`, absence)
    /// becomes `[]`.
    fn list<'v>(
        &mut self,
        o: &'v mut Map<String, Value>,
        base: &str,
        key: &str,
        insert_missing: bool,
    ) -> Option<&'v mut Vec<Value>> {
        match o.get(key) {
            Some(Value::Null) => {
                o.insert(key.to_string(), Value::Array(Vec::new()));
            }
            None if insert_missing => {
                o.insert(key.to_string(), Value::Array(Vec::new()));
            }
            _ => {}
        }

        match o.get_mut(key) {
            Some(Value::Array(items)) => Some(items),
            Some(_) => {
                self.err(&field_path(base, key), "must be an array");
                None
            }
            None => None,
        }
    }

    fn strings(&mut self, items: &[Value], path: &str) {
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.err(&format!("{path}[{i}]"), "must be a string");
            }
        }
    }

    fn document(&mut self, v: &mut Value) {
        let Some(obj) = self.object(v, "") else {
            return;
        };

        if obj.contains_key("metadata") {
            if obj.contains_key("meta") {
                self.err("metadata", "cannot be combined with meta");
            } else if let Some(m) = obj.remove("metadata") {
                obj.insert("meta".to_string(), m);
            }
        }

        let unknown: Vec<String> = obj
            .keys()
            .filter(|k| !TOP_LEVEL_KEYS.contains(&k.as_str()) && k.as_str() != "metadata")
            .cloned()
            .collect();
        for key in unknown {
            self.err(&key, "is not a known top-level field");
        }

        match obj.get("version") {
            Some(Value::String(s)) => {
                if FormatVersion::parse(s).is_err() {
                    self.err("version", format!("'{s}' is not a MAJOR.MINOR.PATCH version"));
                }
            }
            Some(_) => self.err("version", "must be a string"),
            None => self.err("version", "is required"),
        }

        match obj.get_mut("meta") {
            Some(m) => self.meta(m),
            None => self.err("meta", "is required"),
        }

        match obj.get_mut("pageConfig") {
            Some(p) => self.page_config(p),
            None => self.err("pageConfig", "is required"),
        }

        if let Some(ids) = self.list(obj, "", "variableIds", true) {
            self.strings(ids, "variableIds");
        }

        if let Some(roles) = self.list(obj, "", "signerRoles", true) {
            for (i, role) in roles.iter_mut().enumerate() {
                self.signer_role(role, &format!("signerRoles[{i}]"));
            }
        }

        match obj.get_mut("signingWorkflow") {
            None | Some(Value::Null) => {}
            Some(w) => self.workflow(w),
        }

        match obj.get_mut("content") {
            Some(c) => {
                self.node(c, "content");
                if c.get("type").and_then(Value::as_str).is_some_and(|t| t != node_types::DOC) {
                    self.err("content.type", "root node must be of type 'doc'");
                }
            }
            None => self.err("content", "is required"),
        }

        match obj.get_mut("exportInfo") {
            None | Some(Value::Null) => {}
            Some(e) => {
                if let Some(o) = self.object(e, "exportInfo") {
                    self.field(o, "exportInfo", "exportedAt", Kind::String, true);
                    self.field(o, "exportInfo", "sourceApp", Kind::String, true);
                    self.field(o, "exportInfo", "exportedBy", Kind::String, false);
                    self.field(o, "exportInfo", "checksum", Kind::String, false);
                }
            }
        }
    }

    fn meta(&mut self, v: &mut Value) {
        let Some(o) = self.object(v, "meta") else {
            return;
        };
        self.field(o, "meta", "title", Kind::String, true);
        self.field(o, "meta", "language", Kind::String, true);
        self.field(o, "meta", "description", Kind::String, false);
        match o.get("customFields") {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(_) => self.err("meta.customFields", "must be an object"),
        }
    }

    fn page_config(&mut self, v: &mut Value) {
        let base = "pageConfig";
        let Some(o) = self.object(v, base) else {
            return;
        };
        self.field(o, base, "formatId", Kind::String, true);
        self.field(o, base, "width", Kind::Number, true);
        self.field(o, base, "height", Kind::Number, true);
        self.field(o, base, "showPageNumbers", Kind::Bool, false);
        self.field(o, base, "pageGap", Kind::Number, false);

        match o.get_mut("margins") {
            Some(m) => {
                if let Some(mo) = self.object(m, "pageConfig.margins") {
                    for side in ["top", "bottom", "left", "right"] {
                        self.field(mo, "pageConfig.margins", side, Kind::Number, true);
                    }
                }
            }
            None => self.err("pageConfig.margins", "is required"),
        }
    }

    fn signer_role(&mut self, v: &mut Value, path: &str) {
        let Some(o) = self.object(v, path) else {
            return;
        };
        if o.get("label").is_some_and(Value::is_null) {
            o.remove("label");
        }
        self.field(o, path, "id", Kind::String, true);
        self.field(o, path, "label", Kind::String, false);
        self.field(o, path, "order", Kind::Integer, true);
        self.injectable(o.get("name"), &field_path(path, "name"));
        self.injectable(o.get("email"), &field_path(path, "email"));
    }

    fn injectable(&mut self, v: Option<&Value>, path: &str) {
        match v {
            Some(Value::Object(o)) => {
                self.one_of(o, path, "type", INJECTABLE_TYPES, true);
                self.field(o, path, "value", Kind::String, true);
            }
            Some(_) => self.err(path, "must be an object"),
            None => self.err(path, "is required"),
        }
    }

    fn workflow(&mut self, v: &mut Value) {
        let base = "signingWorkflow";
        let Some(o) = self.object(v, base) else {
            return;
        };
        self.one_of(o, base, "orderMode", TRIGGER_ORDER_MODES, true);

        let npath = "signingWorkflow.notifications";
        let Some(n) = o.get_mut("notifications") else {
            self.err(npath, "is required");
            return;
        };
        let Some(no) = self.object(n, npath) else {
            return;
        };
        self.one_of(no, npath, "scope", NOTIFICATION_SCOPES, true);
        self.trigger_map(no, npath, "globalTriggers");

        if let Some(configs) = self.list(no, npath, "roleConfigs", true) {
            for (i, rc) in configs.iter_mut().enumerate() {
                let rpath = format!("{npath}.roleConfigs[{i}]");
                if let Some(ro) = self.object(rc, &rpath) {
                    self.field(ro, &rpath, "roleId", Kind::String, true);
                    self.trigger_map(ro, &rpath, "triggers");
                }
            }
        }
    }

    fn trigger_map(&mut self, o: &mut Map<String, Value>, base: &str, key: &str) {
        let path = field_path(base, key);
        if o.get(key).map_or(true, Value::is_null) {
            o.insert(key.to_string(), Value::Object(Map::new()));
        }
        let Some(m) = o.get_mut(key) else {
            return;
        };
        let Some(triggers) = self.object(m, &path) else {
            return;
        };
        triggers.retain(|_, t| !t.is_null());

        for (name, settings) in triggers.iter_mut() {
            let tpath = format!("{path}.{name}");
            let Some(so) = self.object(settings, &tpath) else {
                continue;
            };
            self.field(so, &tpath, "enabled", Kind::Bool, true);

            let ppath = format!("{tpath}.previousRolesConfig");
            match so.get_mut("previousRolesConfig") {
                None | Some(Value::Null) => {}
                Some(p) => {
                    if let Some(po) = self.object(p, &ppath) {
                        self.one_of(po, &ppath, "mode", PREVIOUS_ROLES_MODES, true);
                        if let Some(ids) = self.list(po, &ppath, "selectedRoleIds", true) {
                            let ids_path = format!("{ppath}.selectedRoleIds");
                            self.strings(ids, &ids_path);
                        }
                    }
                }
            }
        }
    }

    fn node(&mut self, v: &mut Value, path: &str) {
        let Some(o) = self.object(v, path) else {
            return;
        };

        let node_type = match o.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.err(&field_path(path, "type"), "must be a string");
                return;
            }
            None => {
                self.err(&field_path(path, "type"), "is required");
                return;
            }
        };

        self.field(o, path, "text", Kind::String, false);
        match o.get("attrs") {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(_) => self.err(&field_path(path, "attrs"), "must be an object"),
        }
        self.list(o, path, "marks", false);

        let apath = field_path(path, "attrs");
        match node_type.as_str() {
            node_types::INJECTOR => match o.get("attrs").and_then(Value::as_object) {
                Some(a) => {
                    self.field(a, &apath, "variableId", Kind::String, true);
                    self.field(a, &apath, "isRoleVariable", Kind::Bool, false);
                    self.field(a, &apath, "roleId", Kind::String, false);
                    self.field(a, &apath, "label", Kind::String, false);
                }
                None => self.err(&field_path(&apath, "variableId"), "is required"),
            },
            node_types::SIGNATURE => {
                if let Some(a) = o.get_mut("attrs").and_then(Value::as_object_mut) {
                    if let Some(items) = self.list(a, &apath, "signatures", false) {
                        for (i, item) in items.iter_mut().enumerate() {
                            let spath = format!("{apath}.signatures[{i}]");
                            if let Some(so) = self.object(item, &spath) {
                                self.field(so, &spath, "id", Kind::String, true);
                                self.field(so, &spath, "roleId", Kind::String, false);
                                self.field(so, &spath, "imageData", Kind::String, false);
                                self.field(so, &spath, "imageOriginal", Kind::String, false);
                            }
                        }
                    }
                }
            }
            node_types::CONDITIONAL => {
                if let Some(a) = o.get_mut("attrs").and_then(Value::as_object_mut) {
                    match a.get_mut("conditions") {
                        None | Some(Value::Null) => {}
                        Some(c) => self.condition(c, &field_path(&apath, "conditions")),
                    }
                }
            }
            node_types::IMAGE => {
                if let Some(a) = o.get("attrs").and_then(Value::as_object) {
                    self.field(a, &apath, "src", Kind::String, false);
                }
            }
            _ => {}
        }

        if let Some(children) = self.list(o, path, "content", false) {
            for (i, child) in children.iter_mut().enumerate() {
                self.node(child, &format!("{path}.content[{i}]"));
            }
        }
    }

    fn condition(&mut self, v: &mut Value, path: &str) {
        let Some(o) = self.object(v, path) else {
            return;
        };

        let kind = o.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("group") => {
                self.one_of(o, path, "logic", LOGIC_OPERATORS, false);
                if let Some(children) = self.list(o, path, "children", true) {
                    for (i, child) in children.iter_mut().enumerate() {
                        self.condition(child, &format!("{path}.children[{i}]"));
                    }
                }
            }
            Some("rule") => {
                self.field(o, path, "variableId", Kind::String, true);
                self.field(o, path, "operator", Kind::String, false);
                let vpath = field_path(path, "value");
                match o.get("value") {
                    Some(Value::Object(rv)) => {
                        self.one_of(rv, &vpath, "mode", RULE_VALUE_MODES, true);
                        let is_variable = rv.get("mode").and_then(Value::as_str) == Some("variable");
                        if is_variable && !rv.get("value").is_some_and(Value::is_string) {
                            self.err(
                                &field_path(&vpath, "value"),
                                "must be a variable id when mode is 'variable'",
                            );
                        }
                    }
                    Some(_) => self.err(&vpath, "must be an object"),
                    None => self.err(&vpath, "is required"),
                }
            }
            _ => self.err(&field_path(path, "type"), "must be 'group' or 'rule'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> Value {
        json!({
            "version": "1.1.0",
            "meta": { "title": "NDA", "language": "en" },
            "pageConfig": {
                "formatId": "A4", "width": 794, "height": 1123,
                "margins": { "top": 96, "bottom": 96, "left": 72, "right": 72 },
                "showPageNumbers": true, "pageGap": 40
            },
            "variableIds": [],
            "signerRoles": [],
            "content": { "type": "doc", "content": [] }
        })
    }

    fn paths(errs: &[SchemaError]) -> Vec<&str> {
        errs.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn minimal_document_is_valid() {
        let doc = validate_schema(&minimal()).unwrap();
        assert_eq!(doc.version, "1.1.0");
        assert!(doc.signing_workflow.is_none());
    }

    #[test]
    fn null_lists_become_empty() {
        let mut raw = minimal();
        raw["variableIds"] = Value::Null;
        raw["signerRoles"] = Value::Null;
        raw["content"] = json!({ "type": "doc", "content": [
            { "type": "paragraph", "content": null, "marks": null },
            { "type": "signature", "attrs": { "signatures": null } }
        ]});
        let doc = validate_schema(&raw).unwrap();
        assert!(doc.variable_ids.is_empty());
        assert!(doc.signer_roles.is_empty());
        let para = &doc.content.children()[0];
        assert_eq!(para.content, Some(Vec::new()));
        assert_eq!(para.marks, Some(Vec::new()));
        assert!(doc.content.children()[1].signature_attrs().unwrap().signatures.is_empty());
    }

    #[test]
    fn missing_lists_are_filled() {
        let mut raw = minimal();
        raw.as_object_mut().unwrap().remove("variableIds");
        let doc = validate_schema(&raw).unwrap();
        assert!(doc.variable_ids.is_empty());
    }

    #[test]
    fn workflow_nulls_are_canonicalized() {
        let mut raw = minimal();
        raw["signingWorkflow"] = json!({
            "orderMode": "parallel",
            "notifications": {
                "scope": "individual",
                "globalTriggers": null,
                "roleConfigs": [{
                    "roleId": "r1",
                    "triggers": {
                        "on_turn_to_sign": null,
                        "on_previous_roles_signed": {
                            "enabled": true,
                            "previousRolesConfig": { "mode": "auto", "selectedRoleIds": null }
                        }
                    }
                }]
            }
        });
        let doc = validate_schema(&raw).unwrap();
        let wf = doc.signing_workflow.unwrap();
        assert!(wf.notifications.global_triggers.is_empty());
        let triggers = &wf.notifications.role_configs[0].triggers;
        assert_eq!(triggers.len(), 1);
        let prev = triggers["on_previous_roles_signed"].previous_roles_config.as_ref().unwrap();
        assert!(prev.selected_role_ids.is_empty());
    }

    #[test]
    fn metadata_is_renamed() {
        let mut raw = minimal();
        let meta = raw.as_object_mut().unwrap().remove("meta").unwrap();
        raw["metadata"] = meta;
        let doc = validate_schema(&raw).unwrap();
        assert_eq!(doc.meta.title, "NDA");
    }

    #[test]
    fn unknown_top_level_field_rejected() {
        let mut raw = minimal();
        raw["extra"] = json!(1);
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(paths(&errs), vec!["extra"]);
    }

    #[test]
    fn malformed_version_rejected() {
        let mut raw = minimal();
        raw["version"] = json!("1.1");
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(paths(&errs), vec!["version"]);
    }

    #[test]
    fn non_object_input_rejected() {
        let errs = validate_schema(&json!("hello")).unwrap_err();
        assert_eq!(errs[0].path, "");
        assert_eq!(errs[0].to_string(), "document must be an object");
    }

    #[test]
    fn errors_are_collected_with_paths() {
        let mut raw = minimal();
        raw["pageConfig"]["width"] = json!("wide");
        raw["signerRoles"] = json!([
            { "id": "r1", "order": 1, "name": { "type": "bogus", "value": "x" },
              "email": { "type": "text", "value": "a@b.c" } }
        ]);
        raw["content"] = json!({ "type": "doc", "content": [
            { "type": "injector", "attrs": { "label": "no id" } }
        ]});
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(
            paths(&errs),
            vec![
                "pageConfig.width",
                "signerRoles[0].name.type",
                "content.content[0].attrs.variableId",
            ]
        );
    }

    #[test]
    fn condition_tree_is_checked() {
        let mut raw = minimal();
        raw["content"] = json!({ "type": "doc", "content": [
            { "type": "conditional", "attrs": { "conditions": {
                "type": "group", "logic": "AND", "children": [
                    { "type": "rule", "variableId": "a", "value": { "mode": "variable", "value": 3 } },
                    { "type": "bogus" },
                    { "type": "group", "children": null }
                ]
            }}}
        ]});
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(
            paths(&errs),
            vec![
                "content.content[0].attrs.conditions.children[0].value.value",
                "content.content[0].attrs.conditions.children[1].type",
            ]
        );
    }

    #[test]
    fn root_must_be_doc() {
        let mut raw = minimal();
        raw["content"] = json!({ "type": "paragraph" });
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(paths(&errs), vec!["content.type"]);
    }

    #[test]
    fn older_shape_without_new_fields_is_accepted() {
        let mut raw = minimal();
        raw["version"] = json!("1.0.0");
        let page = raw["pageConfig"].as_object_mut().unwrap();
        page.remove("showPageNumbers");
        page.remove("pageGap");
        let doc = validate_schema(&raw).unwrap();
        assert!(doc.page_config.show_page_numbers.is_none());
        assert!(doc.page_config.page_gap.is_none());
    }

    #[test]
    fn out_of_range_order_reports_its_path() {
        let mut raw = minimal();
        raw["signerRoles"] = json!([
            { "id": "r1", "order": u64::MAX,
              "name": { "type": "text", "value": "A" },
              "email": { "type": "text", "value": "a@b.c" } }
        ]);
        let errs = validate_schema(&raw).unwrap_err();
        assert_eq!(paths(&errs), vec!["signerRoles[0].order"]);
    }
}
