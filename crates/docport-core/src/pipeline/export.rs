//! Export: live content plus state stores -> `PortableDocument`.
//!
//! Export is the inverse of import. Feeding an exported document straight back
//! into the importer restores the same content, page config, signer roles and
//! workflow.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::ExportOptions;
use crate::determinism::hashing::hash_canonical_json_hex;
use crate::errors::{DocportError, DocportResult};
use crate::model::{
    node_types, ContentNode, DocumentMeta, ExportInfo, PortableDocument, SignerRoleDefinition,
};
use crate::pipeline::references::{content_references, role_references};
use crate::state::StateSource;
use crate::CURRENT_VERSION;

/// Build a document from the live editor state.
pub fn export_document<S: StateSource + ?Sized>(
    content: &ContentNode,
    state: &S,
    meta: DocumentMeta,
    options: &ExportOptions,
) -> DocportResult<PortableDocument> {
    if !content.is(node_types::DOC) {
        return Err(DocportError::invalid_argument(format!(
            "content root must be '{}', got '{}'",
            node_types::DOC,
            content.node_type
        )));
    }

    let signer_roles = state.signer_roles().to_vec();
    let variable_ids = derive_variable_ids(content, &signer_roles);

    let mut doc = PortableDocument {
        version: CURRENT_VERSION.to_string(),
        meta,
        page_config: state.page_layout().to_page_config(),
        variable_ids,
        signer_roles,
        signing_workflow: Some(state.workflow_config().clone()),
        content: content.clone(),
        export_info: Some(ExportInfo {
            exported_at: options.exported_at.clone(),
            exported_by: options.exported_by.clone(),
            source_app: options.source_app.clone(),
            checksum: None,
        }),
    };

    if options.include_checksum {
        let checksum = compute_checksum(&doc)?;
        if let Some(info) = doc.export_info.as_mut() {
            info.checksum = Some(checksum);
        }
    }

    debug!(
        variables = doc.variable_ids.len(),
        roles = doc.signer_roles.len(),
        checksum = options.include_checksum,
        "document exported"
    );
    Ok(doc)
}

/// Every variable the content and roles reference, sorted and de-duplicated.
///
/// Role-variable injectors are excluded when their id carries the `ROLE.`
/// prefix: those ids are derived from roles.
pub fn derive_variable_ids(content: &ContentNode, roles: &[SignerRoleDefinition]) -> Vec<String> {
    let ids: BTreeSet<String> = content_references(content, "content")
        .into_iter()
        .chain(role_references(roles))
        .filter(|r| r.kind.is_variable())
        .map(|r| r.id)
        .collect();
    ids.into_iter().collect()
}

/// Lowercase hex SHA-256 over the canonical JSON of every top-level field
/// except `exportInfo`.
pub fn compute_checksum(doc: &PortableDocument) -> DocportResult<String> {
    let mut v = serde_json::to_value(doc)?;
    let obj = v
        .as_object_mut()
        .ok_or_else(|| DocportError::invariant("document did not serialize to an object"))?;
    obj.remove("exportInfo");
    hash_canonical_json_hex(&v)
}

/// Serialize for writing to disk.
pub fn export_to_json_pretty(doc: &PortableDocument) -> DocportResult<String> {
    Ok(serde_json::to_string_pretty(doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InjectableValue;
    use crate::state::{EditorState, StateSink};
    use serde_json::json;

    fn content() -> ContentNode {
        serde_json::from_value(json!({ "type": "doc", "content": [
            { "type": "paragraph", "content": [
                { "type": "injector", "attrs": { "variableId": "zeta" } },
                { "type": "injector", "attrs": { "variableId": "alpha" } },
                { "type": "injector", "attrs": { "variableId": "zeta" } },
                { "type": "injector", "attrs": {
                    "variableId": "ROLE.Buyer.name", "isRoleVariable": true, "roleId": "r1" } }
            ]},
            { "type": "conditional", "attrs": { "conditions": {
                "type": "rule", "variableId": "mid", "value": { "mode": "variable", "value": "beta" }
            }}}
        ]}))
        .unwrap()
    }

    fn state() -> EditorState {
        let mut s = EditorState::default();
        s.restore_signer_roles(vec![SignerRoleDefinition {
            id: "r1".to_string(),
            label: "Buyer".to_string(),
            name: InjectableValue::injectable("buyer_name"),
            email: InjectableValue::literal("buyer@example.com"),
            order: 1,
        }]);
        s
    }

    #[test]
    fn variable_ids_are_derived_sorted_and_unique() {
        let doc = export_document(&content(), &state(), DocumentMeta::new("t", "en"), &ExportOptions::default())
            .unwrap();
        assert_eq!(doc.variable_ids, vec!["alpha", "beta", "buyer_name", "mid", "zeta"]);
        assert_eq!(doc.version, CURRENT_VERSION);
        assert!(doc.export_info.unwrap().checksum.is_none());
    }

    #[test]
    fn checksum_ignores_export_info() {
        let mut opts = ExportOptions {
            include_checksum: true,
            ..ExportOptions::default()
        };
        let a = export_document(&content(), &state(), DocumentMeta::new("t", "en"), &opts).unwrap();
        opts.exported_at = "2030-01-01T00:00:00Z".to_string();
        opts.exported_by = Some("someone".to_string());
        let b = export_document(&content(), &state(), DocumentMeta::new("t", "en"), &opts).unwrap();

        let ca = a.export_info.as_ref().unwrap().checksum.clone().unwrap();
        let cb = b.export_info.as_ref().unwrap().checksum.clone().unwrap();
        assert_eq!(ca, cb);
        assert_eq!(ca.len(), 64);
        assert_eq!(compute_checksum(&a).unwrap(), ca);
    }

    #[test]
    fn checksum_tracks_content() {
        let a = export_document(&content(), &state(), DocumentMeta::new("t", "en"), &ExportOptions::default())
            .unwrap();
        let mut b = a.clone();
        b.meta.title = "changed".to_string();
        assert_ne!(compute_checksum(&a).unwrap(), compute_checksum(&b).unwrap());
    }

    #[test]
    fn non_doc_root_is_rejected() {
        let err = export_document(
            &ContentNode::new("paragraph"),
            &state(),
            DocumentMeta::new("t", "en"),
            &ExportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DocportError::InvalidArgument(_)));
    }

    #[test]
    fn pretty_json_is_parseable() {
        let doc = export_document(&content(), &state(), DocumentMeta::new("t", "en"), &ExportOptions::default())
            .unwrap();
        let s = export_to_json_pretty(&doc).unwrap();
        let back: PortableDocument = serde_json::from_str(&s).unwrap();
        assert_eq!(back, doc);
    }
}
