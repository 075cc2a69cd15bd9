//! Cross-reference extraction.
//!
//! One pure visitor over the document yields a flat list of
//! `(kind, id, path)` references. Semantic validation and the exporter's
//! `variableIds` derivation both consume this list instead of walking the
//! tree themselves.

use crate::model::roles::is_role_variable_id;
use crate::model::workflow::{triggers, PreviousRolesMode, TriggerMap};
use crate::model::{ContentNode, InjectableValue, PortableDocument, SignerRoleDefinition};

/// What a reference points at and where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    /// `injector.attrs.variableId` on a non-role injector, or on a role
    /// injector whose id lacks the `ROLE.` prefix.
    Variable,
    /// `injector.attrs.roleId` on a role-variable injector.
    InjectorRole,
    /// `signature.attrs.signatures[].roleId`.
    SignatureRole,
    /// `rule.variableId` inside a condition tree.
    ConditionVariable,
    /// `rule.value.value` when the rule compares against a variable.
    ConditionValueVariable,
    /// Injectable `signerRoles[].name`.
    RoleNameVariable,
    /// Injectable `signerRoles[].email`.
    RoleEmailVariable,
    /// `notifications.roleConfigs[].roleId`.
    WorkflowRole,
    /// `selectedRoleIds` under a per-role `on_previous_roles_signed` trigger
    /// in `custom` mode.
    PreviousRole,
    /// `selectedRoleIds` under the global `on_previous_roles_signed` trigger
    /// in `custom` mode.
    GlobalPreviousRole,
}

impl ReferenceKind {
    /// True for references resolved against the variable sets.
    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            Self::Variable
                | Self::ConditionVariable
                | Self::ConditionValueVariable
                | Self::RoleNameVariable
                | Self::RoleEmailVariable
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    pub id: String,
    pub path: String,
}

impl Reference {
    fn new(kind: ReferenceKind, id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            path: path.into(),
        }
    }
}

/// Every reference in the document, in document order: content first, then
/// signer roles, then workflow.
pub fn collect_references(doc: &PortableDocument) -> Vec<Reference> {
    let mut out = content_references(&doc.content, "content");
    out.extend(role_references(&doc.signer_roles));

    if let Some(wf) = &doc.signing_workflow {
        let base = "signingWorkflow.notifications";
        for (i, rc) in wf.notifications.role_configs.iter().enumerate() {
            let rpath = format!("{base}.roleConfigs[{i}]");
            out.push(Reference::new(
                ReferenceKind::WorkflowRole,
                rc.role_id.as_str(),
                format!("{rpath}.roleId"),
            ));
            previous_role_references(
                &rc.triggers,
                &format!("{rpath}.triggers"),
                ReferenceKind::PreviousRole,
                &mut out,
            );
        }
        previous_role_references(
            &wf.notifications.global_triggers,
            &format!("{base}.globalTriggers"),
            ReferenceKind::GlobalPreviousRole,
            &mut out,
        );
    }

    out
}

/// References found in a content tree rooted at `root_path`.
pub fn content_references(root: &ContentNode, root_path: &str) -> Vec<Reference> {
    let mut out = Vec::new();
    root.walk(root_path, &mut |node, path| {
        if let Some(attrs) = node.injector_attrs() {
            if attrs.is_role_variable() {
                if let Some(role_id) = attrs.role_id.as_deref().filter(|r| !r.is_empty()) {
                    out.push(Reference::new(
                        ReferenceKind::InjectorRole,
                        role_id,
                        format!("{path}.attrs.roleId"),
                    ));
                }
                if !is_role_variable_id(&attrs.variable_id) {
                    out.push(Reference::new(ReferenceKind::Variable, attrs.variable_id, path));
                }
            } else {
                out.push(Reference::new(ReferenceKind::Variable, attrs.variable_id, path));
            }
        } else if let Some(attrs) = node.signature_attrs() {
            for (i, sig) in attrs.signatures.iter().enumerate() {
                if let Some(role_id) = sig.assigned_role() {
                    out.push(Reference::new(
                        ReferenceKind::SignatureRole,
                        role_id,
                        format!("{path}.attrs.signatures[{i}].roleId"),
                    ));
                }
            }
        } else if let Some(attrs) = node.conditional_attrs() {
            if let Some(conditions) = &attrs.conditions {
                let base = format!("{path}.attrs.conditions");
                conditions.for_each_rule(&base, &mut |rule, rpath| {
                    out.push(Reference::new(
                        ReferenceKind::ConditionVariable,
                        rule.variable_id.as_str(),
                        format!("{rpath}.variableId"),
                    ));
                    if let Some(value_var) = rule.value.variable_id() {
                        out.push(Reference::new(
                            ReferenceKind::ConditionValueVariable,
                            value_var,
                            format!("{rpath}.value.value"),
                        ));
                    }
                });
            }
        }
    });
    out
}

/// Injectable name/email references of the signer roles.
pub fn role_references(roles: &[SignerRoleDefinition]) -> Vec<Reference> {
    let mut out = Vec::new();
    for (i, role) in roles.iter().enumerate() {
        if let InjectableValue::Injectable(id) = &role.name {
            out.push(Reference::new(
                ReferenceKind::RoleNameVariable,
                id.as_str(),
                format!("signerRoles[{i}].name.value"),
            ));
        }
        if let InjectableValue::Injectable(id) = &role.email {
            out.push(Reference::new(
                ReferenceKind::RoleEmailVariable,
                id.as_str(),
                format!("signerRoles[{i}].email.value"),
            ));
        }
    }
    out
}

fn previous_role_references(
    map: &TriggerMap,
    base: &str,
    kind: ReferenceKind,
    out: &mut Vec<Reference>,
) {
    let Some(prev) = map
        .get(triggers::ON_PREVIOUS_ROLES_SIGNED)
        .and_then(|t| t.previous_roles_config.as_ref())
        .filter(|p| p.mode == PreviousRolesMode::Custom)
    else {
        return;
    };

    let ppath = format!(
        "{base}.{}.previousRolesConfig.selectedRoleIds",
        triggers::ON_PREVIOUS_ROLES_SIGNED
    );
    for (j, id) in prev.selected_role_ids.iter().enumerate() {
        out.push(Reference::new(kind, id.as_str(), format!("{ppath}[{j}]")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(v: serde_json::Value) -> PortableDocument {
        crate::pipeline::schema::validate_schema(&v).unwrap()
    }

    fn base() -> serde_json::Value {
        json!({
            "version": "1.1.0",
            "meta": { "title": "t", "language": "en" },
            "pageConfig": {
                "formatId": "A4", "width": 794, "height": 1123,
                "margins": { "top": 96, "bottom": 96, "left": 72, "right": 72 }
            },
            "content": { "type": "doc", "content": [] }
        })
    }

    #[test]
    fn content_references_cover_every_node_kind() {
        let mut v = base();
        v["content"] = json!({ "type": "doc", "content": [
            { "type": "paragraph", "content": [
                { "type": "injector", "attrs": { "variableId": "amount" } },
                { "type": "injector", "attrs": {
                    "variableId": "ROLE.Buyer.name", "isRoleVariable": true, "roleId": "r1" } }
            ]},
            { "type": "signature", "attrs": { "signatures": [
                { "id": "s1", "roleId": "r2" }, { "id": "s2", "roleId": "" }
            ]}},
            { "type": "conditional", "attrs": { "conditions": {
                "type": "group", "logic": "OR", "children": [
                    { "type": "rule", "variableId": "a", "value": { "mode": "variable", "value": "b" } }
                ]
            }}}
        ]});

        let refs = collect_references(&doc(v));
        let got: Vec<(ReferenceKind, &str, &str)> = refs
            .iter()
            .map(|r| (r.kind, r.id.as_str(), r.path.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (ReferenceKind::Variable, "amount", "content.content[0].content[0]"),
                (
                    ReferenceKind::InjectorRole,
                    "r1",
                    "content.content[0].content[1].attrs.roleId"
                ),
                (
                    ReferenceKind::SignatureRole,
                    "r2",
                    "content.content[1].attrs.signatures[0].roleId"
                ),
                (
                    ReferenceKind::ConditionVariable,
                    "a",
                    "content.content[2].attrs.conditions.children[0].variableId"
                ),
                (
                    ReferenceKind::ConditionValueVariable,
                    "b",
                    "content.content[2].attrs.conditions.children[0].value.value"
                ),
            ]
        );
    }

    #[test]
    fn roles_and_workflow_references() {
        let mut v = base();
        v["signerRoles"] = json!([
            { "id": "r1", "order": 1,
              "name": { "type": "injectable", "value": "buyer_name" },
              "email": { "type": "text", "value": "a@b.c" } }
        ]);
        v["signingWorkflow"] = json!({
            "orderMode": "sequential",
            "notifications": {
                "scope": "individual",
                "globalTriggers": {
                    "on_previous_roles_signed": {
                        "enabled": true,
                        "previousRolesConfig": { "mode": "custom", "selectedRoleIds": ["g1"] }
                    }
                },
                "roleConfigs": [{
                    "roleId": "r9",
                    "triggers": {
                        "on_previous_roles_signed": {
                            "enabled": true,
                            "previousRolesConfig": { "mode": "custom", "selectedRoleIds": ["p1"] }
                        },
                        "on_turn_to_sign": { "enabled": true }
                    }
                }]
            }
        });

        let refs = collect_references(&doc(v));
        let kinds: Vec<ReferenceKind> = refs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ReferenceKind::RoleNameVariable,
                ReferenceKind::WorkflowRole,
                ReferenceKind::PreviousRole,
                ReferenceKind::GlobalPreviousRole,
            ]
        );
        assert_eq!(refs[0].path, "signerRoles[0].name.value");
        assert_eq!(refs[1].path, "signingWorkflow.notifications.roleConfigs[0].roleId");
        assert_eq!(
            refs[2].path,
            "signingWorkflow.notifications.roleConfigs[0].triggers.on_previous_roles_signed.previousRolesConfig.selectedRoleIds[0]"
        );
        assert_eq!(refs[3].id, "g1");
    }
}
