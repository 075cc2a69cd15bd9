//! Semantic validation.
//!
//! Checks every cross-reference collected by `references` against the
//! document's declared ids and, when supplied, an external variable catalog.
//! A separate pass screens inline images against a size ceiling.
//!
//! All findings are warnings. `valid` stays true; import succeeds once the
//! schema and version checks pass.

use std::collections::BTreeSet;

use tracing::debug;

use crate::catalog::VariableCatalog;
use crate::config::ImportOptions;
use crate::model::{ContentNode, PortableDocument};
use crate::pipeline::export::compute_checksum;
use crate::pipeline::references::{collect_references, Reference, ReferenceKind};
use crate::pipeline::{IssueCode, ValidationIssue, ValidationResult};

/// Run all semantic checks on a schema-validated document.
pub fn validate_semantics(
    doc: &PortableDocument,
    options: &ImportOptions,
    catalog: Option<&VariableCatalog>,
) -> ValidationResult {
    let mut result = ValidationResult::ok();

    let declared_vars: BTreeSet<&str> = doc.variable_ids.iter().map(String::as_str).collect();
    let declared_roles: BTreeSet<&str> = doc.role_ids().collect();
    let catalog = catalog.filter(|c| !c.is_empty());

    for r in collect_references(doc) {
        check_reference(&r, &declared_vars, &declared_roles, catalog, &mut result);
    }

    check_images(&doc.content, options.max_image_size, &mut result);

    if options.verify_checksum {
        check_checksum(doc, &mut result);
    }

    debug!(
        warnings = result.warnings.len(),
        catalog = catalog.is_some(),
        "semantic validation finished"
    );
    result
}

/// Undefined / orphaned codes for each variable reference kind.
fn variable_codes(kind: ReferenceKind) -> Option<(IssueCode, IssueCode)> {
    let codes = match kind {
        ReferenceKind::Variable => (IssueCode::UndefinedVariable, IssueCode::OrphanedVariable),
        ReferenceKind::ConditionVariable => (
            IssueCode::UndefinedConditionVariable,
            IssueCode::OrphanedConditionVariable,
        ),
        ReferenceKind::ConditionValueVariable => (
            IssueCode::UndefinedConditionValueVariable,
            IssueCode::OrphanedConditionValueVariable,
        ),
        ReferenceKind::RoleNameVariable => (
            IssueCode::UndefinedRoleNameVariable,
            IssueCode::OrphanedRoleNameVariable,
        ),
        ReferenceKind::RoleEmailVariable => (
            IssueCode::UndefinedRoleEmailVariable,
            IssueCode::OrphanedRoleEmailVariable,
        ),
        _ => return None,
    };
    Some(codes)
}

fn role_code(kind: ReferenceKind) -> Option<IssueCode> {
    match kind {
        ReferenceKind::InjectorRole | ReferenceKind::SignatureRole => Some(IssueCode::UndefinedRole),
        ReferenceKind::WorkflowRole => Some(IssueCode::UndefinedWorkflowRole),
        ReferenceKind::PreviousRole => Some(IssueCode::UndefinedPreviousRole),
        ReferenceKind::GlobalPreviousRole => Some(IssueCode::UndefinedGlobalPreviousRole),
        _ => None,
    }
}

fn check_reference(
    r: &Reference,
    declared_vars: &BTreeSet<&str>,
    declared_roles: &BTreeSet<&str>,
    catalog: Option<&VariableCatalog>,
    result: &mut ValidationResult,
) {
    if let Some((undefined, orphaned)) = variable_codes(r.kind) {
        if !declared_vars.contains(r.id.as_str()) {
            result.push_warning(
                ValidationIssue::new(
                    undefined,
                    r.path.as_str(),
                    format!("variable '{}' is not declared in variableIds", r.id),
                )
                .with_suggestion(format!("Add '{}' to variableIds", r.id)),
            );
        }
        if let Some(cat) = catalog {
            if !cat.resolves(&r.id) {
                result.push_warning(
                    ValidationIssue::new(
                        orphaned,
                        r.path.as_str(),
                        format!("variable '{}' does not exist in the variable catalog", r.id),
                    )
                    .with_suggestion("Create the variable or remove the reference"),
                );
            }
        }
        return;
    }

    if let Some(code) = role_code(r.kind) {
        if !declared_roles.contains(r.id.as_str()) {
            result.push_warning(
                ValidationIssue::new(
                    code,
                    r.path.as_str(),
                    format!("role '{}' is not declared in signerRoles", r.id),
                )
                .with_suggestion(format!("Add a signer role with id '{}' or reassign", r.id)),
            );
        }
    }
}

/// Decoded size of a base64 data URI, or `None` for anything else.
pub fn estimate_data_uri_size(src: &str) -> Option<u64> {
    if !src.starts_with("data:") {
        return None;
    }
    let (header, payload) = src.split_once(',')?;
    if !header.ends_with(";base64") {
        return None;
    }
    Some(payload.len() as u64 * 3 / 4)
}

fn check_images(root: &ContentNode, max: u64, result: &mut ValidationResult) {
    let mut check = |code: IssueCode, src: Option<&str>, path: String, what: &str| {
        let Some(size) = src.and_then(estimate_data_uri_size) else {
            return;
        };
        if size > max {
            result.push_warning(
                ValidationIssue::new(
                    code,
                    path,
                    format!("{what} is about {size} bytes, above the {max} byte limit"),
                )
                .with_suggestion("Use a smaller or compressed image"),
            );
        }
    };

    root.walk("content", &mut |node, path| {
        if let Some(attrs) = node.image_attrs() {
            check(
                IssueCode::ImageTooLarge,
                attrs.src.as_deref(),
                format!("{path}.attrs.src"),
                "image",
            );
        } else if let Some(attrs) = node.signature_attrs() {
            for (i, sig) in attrs.signatures.iter().enumerate() {
                let spath = format!("{path}.attrs.signatures[{i}]");
                check(
                    IssueCode::SignatureImageTooLarge,
                    sig.image_data.as_deref(),
                    format!("{spath}.imageData"),
                    "signature image",
                );
                check(
                    IssueCode::SignatureOriginalTooLarge,
                    sig.image_original.as_deref(),
                    format!("{spath}.imageOriginal"),
                    "original signature image",
                );
            }
        }
    });
}

fn check_checksum(doc: &PortableDocument, result: &mut ValidationResult) {
    let Some(expected) = doc.export_info.as_ref().and_then(|e| e.checksum.as_deref()) else {
        return;
    };
    match compute_checksum(doc) {
        Ok(actual) if actual == expected => {}
        Ok(actual) => result.push_warning(
            ValidationIssue::new(
                IssueCode::ChecksumMismatch,
                "exportInfo.checksum",
                format!("checksum {expected} does not match document contents ({actual})"),
            )
            .with_suggestion("The document was modified after export"),
        ),
        Err(e) => result.push_warning(ValidationIssue::new(
            IssueCode::ChecksumMismatch,
            "exportInfo.checksum",
            format!("checksum could not be computed: {e}"),
        )),
    }
}
