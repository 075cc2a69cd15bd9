//! Import orchestration.
//!
//! parse -> schema -> version gate -> semantics -> migrate -> split variables
//! -> restore state -> load content
//!
//! Every fatal outcome is returned as `ImportResult::Failure`; nothing in
//! here panics or returns `Err`. Steps that already ran are not undone unless
//! `ImportOptions::rollback_on_content_error` is set.

use std::cmp::Ordering;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::{debug, info, info_span, warn};

use crate::catalog::{split_variables, VariableCatalog};
use crate::config::ImportOptions;
use crate::model::PortableDocument;
use crate::pipeline::migrate::{migrate_with, MigrationRegistry};
use crate::pipeline::parse::{normalize_input, DocumentInput};
use crate::pipeline::restore::restore_state;
use crate::pipeline::schema::validate_schema;
use crate::pipeline::semantic::validate_semantics;
use crate::pipeline::{IssueCode, ValidationIssue, ValidationResult};
use crate::state::{ContentSink, StateSink};
use crate::version::{compare_versions, is_version_compatible, FormatVersion};
use crate::CURRENT_VERSION;

/// Outcome of an import.
///
/// A success still carries the semantic warnings in `validation`; callers
/// are expected to surface them.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportResult {
    Success {
        document: PortableDocument,
        validation: ValidationResult,
        /// Present only when a catalog was supplied.
        orphaned_variables: Option<Vec<String>>,
    },
    Failure {
        validation: ValidationResult,
        document: Option<PortableDocument>,
    },
}

impl ImportResult {
    /// A failed result. Hosts use this for failures they detect themselves
    /// (e.g. `FILE_READ_ERROR` before any bytes reach the importer).
    pub fn failure(validation: ValidationResult, document: Option<PortableDocument>) -> Self {
        Self::Failure {
            validation,
            document,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn validation(&self) -> &ValidationResult {
        match self {
            Self::Success { validation, .. } | Self::Failure { validation, .. } => validation,
        }
    }

    pub fn document(&self) -> Option<&PortableDocument> {
        match self {
            Self::Success { document, .. } => Some(document),
            Self::Failure { document, .. } => document.as_ref(),
        }
    }

    pub fn orphaned_variables(&self) -> Option<&[String]> {
        match self {
            Self::Success {
                orphaned_variables, ..
            } => orphaned_variables.as_deref(),
            Self::Failure { .. } => None,
        }
    }

    /// The first fatal code, if the import failed.
    pub fn fatal_code(&self) -> Option<IssueCode> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { validation, .. } => validation.errors.first().map(|e| e.code),
        }
    }
}

impl Serialize for ImportResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success {
                document,
                validation,
                orphaned_variables,
            } => {
                let len = 3 + usize::from(orphaned_variables.is_some());
                let mut st = serializer.serialize_struct("ImportResult", len)?;
                st.serialize_field("success", &true)?;
                st.serialize_field("document", document)?;
                st.serialize_field("validation", validation)?;
                if let Some(orphaned) = orphaned_variables {
                    st.serialize_field("orphanedVariables", orphaned)?;
                }
                st.end()
            }
            Self::Failure {
                validation,
                document,
            } => {
                let len = 2 + usize::from(document.is_some());
                let mut st = serializer.serialize_struct("ImportResult", len)?;
                st.serialize_field("success", &false)?;
                st.serialize_field("validation", validation)?;
                if let Some(doc) = document {
                    st.serialize_field("document", doc)?;
                }
                st.end()
            }
        }
    }
}

/// A document that passed schema and version checks.
struct Prepared {
    doc: PortableDocument,
    validation: ValidationResult,
    needs_migration: bool,
}

type Rejected = (ValidationResult, Option<PortableDocument>);

/// Import orchestrator.
#[derive(Debug, Clone)]
pub struct Importer {
    options: ImportOptions,
    registry: MigrationRegistry,
}

impl Default for Importer {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

impl Importer {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            registry: MigrationRegistry::builtin(),
        }
    }

    /// Use a custom migration registry instead of the built-in chain.
    pub fn with_registry(mut self, registry: MigrationRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Run the full import into the given sinks.
    pub fn import<C, S>(
        &self,
        input: impl Into<DocumentInput>,
        content: &mut C,
        state: &mut S,
        catalog: Option<&VariableCatalog>,
    ) -> ImportResult
    where
        C: ContentSink + ?Sized,
        S: StateSink + ?Sized,
    {
        let span = info_span!("import", auto_migrate = self.options.auto_migrate);
        let _guard = span.enter();

        let prepared = match self.prepare(
            input.into(),
            catalog,
            self.options.auto_migrate,
            self.options.validate_semantics,
        ) {
            Ok(p) => p,
            Err((validation, document)) => return reject(validation, document),
        };
        let Prepared {
            doc,
            mut validation,
            needs_migration,
        } = prepared;

        let doc = if needs_migration {
            let from = doc.version.clone();
            match migrate_with(&self.registry, doc.clone(), FormatVersion::current()) {
                Ok(migrated) => {
                    debug!(from = %from, to = CURRENT_VERSION, "document migrated");
                    migrated
                }
                Err(e) => {
                    validation.push_error(ValidationIssue::new(
                        IssueCode::MigrationError,
                        "version",
                        format!("could not migrate from {from} to {CURRENT_VERSION}: {e}"),
                    ));
                    return reject(validation, Some(doc));
                }
            }
        } else {
            doc
        };

        let orphaned_variables = catalog
            .filter(|c| !c.is_empty())
            .map(|c| split_variables(&doc.variable_ids, c).orphaned);

        let snapshot = self.options.rollback_on_content_error.then(|| state.snapshot());
        restore_state(state, &doc);

        if let Err(e) = content.load_content(&doc.content) {
            if let Some(snap) = snapshot {
                debug!("rolling back state restore");
                state.apply_snapshot(snap);
            }
            validation.push_error(ValidationIssue::new(
                IssueCode::ContentLoadError,
                "content",
                format!("content could not be loaded: {e}"),
            ));
            return reject(validation, Some(doc));
        }

        info!(
            version = %doc.version,
            warnings = validation.warnings.len(),
            "document imported"
        );
        ImportResult::Success {
            document: doc,
            validation,
            orphaned_variables,
        }
    }

    /// Schema, version and semantic checks only. Nothing is restored.
    pub fn validate(
        &self,
        input: impl Into<DocumentInput>,
        catalog: Option<&VariableCatalog>,
    ) -> ValidationResult {
        let span = info_span!("validate");
        let _guard = span.enter();

        match self.prepare(
            input.into(),
            catalog,
            self.options.auto_migrate,
            self.options.validate_semantics,
        ) {
            Ok(p) => p.validation,
            Err((validation, _)) => validation,
        }
    }

    /// Parse, validate and migrate to the current version, regardless of
    /// `auto_migrate`. Semantic checks are skipped.
    pub fn migrate(&self, input: impl Into<DocumentInput>) -> Result<PortableDocument, ValidationResult> {
        let span = info_span!("migrate");
        let _guard = span.enter();

        let p = self.prepare(input.into(), None, true, false).map_err(|(v, _)| v)?;
        if !p.needs_migration {
            return Ok(p.doc);
        }
        let from = p.doc.version.clone();
        migrate_with(&self.registry, p.doc, FormatVersion::current()).map_err(|e| {
            ValidationResult::fatal(
                IssueCode::MigrationError,
                "version",
                format!("could not migrate from {from} to {CURRENT_VERSION}: {e}"),
            )
        })
    }

    fn prepare(
        &self,
        input: DocumentInput,
        catalog: Option<&VariableCatalog>,
        auto_migrate: bool,
        semantics: bool,
    ) -> Result<Prepared, Rejected> {
        let raw = normalize_input(input, self.options.limits.max_json_bytes).map_err(|e| {
            (
                ValidationResult::fatal(IssueCode::ParseError, "", e.to_string()),
                None,
            )
        })?;
        debug!("input parsed");

        let doc = validate_schema(&raw).map_err(|errors| {
            let mut v = ValidationResult::ok();
            for e in errors {
                v.push_error(ValidationIssue::new(IssueCode::SchemaError, e.path, e.message));
            }
            (v, None)
        })?;
        debug!(version = %doc.version, "schema validated");

        if !is_version_compatible(&doc.version) {
            let v = ValidationResult::fatal(
                IssueCode::VersionTooNew,
                "version",
                format!(
                    "document version {} is newer than supported version {CURRENT_VERSION}",
                    doc.version
                ),
            );
            return Err((v, Some(doc)));
        }

        let needs_migration = compare_versions(&doc.version, CURRENT_VERSION) == Ordering::Less;
        if needs_migration && !auto_migrate {
            let mut v = ValidationResult::ok();
            v.push_error(
                ValidationIssue::new(
                    IssueCode::VersionMismatch,
                    "version",
                    format!(
                        "document version {} is older than {CURRENT_VERSION}",
                        doc.version
                    ),
                )
                .with_suggestion("Enable auto-migration to upgrade the document"),
            );
            return Err((v, Some(doc)));
        }

        let validation = if semantics {
            validate_semantics(&doc, &self.options, catalog)
        } else {
            ValidationResult::ok()
        };

        Ok(Prepared {
            doc,
            validation,
            needs_migration,
        })
    }
}

fn reject(validation: ValidationResult, document: Option<PortableDocument>) -> ImportResult {
    if let Some(first) = validation.errors.first() {
        warn!(code = %first.code, path = %first.path, "import failed: {}", first.message);
    }
    ImportResult::failure(validation, document)
}

/// One-shot import with the built-in migration chain.
pub fn import_document<C, S>(
    input: impl Into<DocumentInput>,
    content: &mut C,
    state: &mut S,
    catalog: Option<&VariableCatalog>,
    options: &ImportOptions,
) -> ImportResult
where
    C: ContentSink + ?Sized,
    S: StateSink + ?Sized,
{
    Importer::new(options.clone()).import(input, content, state, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EditorContent, EditorState};
    use serde_json::json;

    #[test]
    fn failure_serializes_without_document_when_absent() {
        let r = ImportResult::failure(
            ValidationResult::fatal(IssueCode::ParseError, "", "bad"),
            None,
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["validation"]["errors"][0]["code"], "PARSE_ERROR");
        assert!(v.get("document").is_none());
    }

    #[test]
    fn parse_error_leaves_state_alone() {
        let mut content = EditorContent::default();
        let mut state = EditorState::default();
        let before = state.clone();
        let r = import_document("{", &mut content, &mut state, None, &ImportOptions::default());
        assert_eq!(r.fatal_code(), Some(IssueCode::ParseError));
        assert_eq!(state, before);
    }

    #[test]
    fn oversized_input_is_a_parse_error() {
        let mut opts = ImportOptions::default();
        opts.limits.max_json_bytes = 8;
        let r = import_document(
            json!({"version": "1.1.0"}).to_string(),
            &mut EditorContent::default(),
            &mut EditorState::default(),
            None,
            &opts,
        );
        assert_eq!(r.fatal_code(), Some(IssueCode::ParseError));
    }
}
