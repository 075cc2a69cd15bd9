//! Version migration.
//!
//! Migrations are an ordered registry of `from -> to` steps. Each step is a
//! pure transform over a schema-validated document. `migrate_with` applies
//! steps in a loop until the document reaches the target version, so a
//! document several versions behind walks the whole chain.
//!
//! Built-in chain:
//! - 1.0.0 -> 1.0.1: page numbering and page gap
//! - 1.0.1 -> 1.1.0: signing workflow

use std::collections::BTreeMap;

use tracing::debug;

use crate::errors::{DocportError, DocportResult};
use crate::model::page::{DEFAULT_PAGE_GAP, DEFAULT_SHOW_PAGE_NUMBERS};
use crate::model::{PortableDocument, SigningWorkflowConfig};
use crate::version::FormatVersion;

/// A pure document transform.
pub type MigrationFn = fn(PortableDocument) -> DocportResult<PortableDocument>;

/// One registered step.
#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    pub from: FormatVersion,
    pub to: FormatVersion,
    pub transform: MigrationFn,
}

impl MigrationStep {
    pub fn new(from: FormatVersion, to: FormatVersion, transform: MigrationFn) -> Self {
        Self {
            from,
            to,
            transform,
        }
    }
}

/// Ordered set of steps keyed by the version they start from.
#[derive(Debug, Clone, Default)]
pub struct MigrationRegistry {
    steps: BTreeMap<FormatVersion, MigrationStep>,
}

impl MigrationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in chain up to the current format version.
    pub fn builtin() -> Self {
        let mut r = Self::new();
        r.steps.insert(
            FormatVersion::new(1, 0, 0),
            MigrationStep::new(
                FormatVersion::new(1, 0, 0),
                FormatVersion::new(1, 0, 1),
                add_page_numbering,
            ),
        );
        r.steps.insert(
            FormatVersion::new(1, 0, 1),
            MigrationStep::new(
                FormatVersion::new(1, 0, 1),
                FormatVersion::new(1, 1, 0),
                add_signing_workflow,
            ),
        );
        r
    }

    /// Register a step. A step must move the version forward and its source
    /// version must not already be taken.
    pub fn register(&mut self, step: MigrationStep) -> DocportResult<&mut Self> {
        if step.to <= step.from {
            return Err(DocportError::invalid_argument(format!(
                "migration step {} -> {} does not advance the version",
                step.from, step.to
            )));
        }
        if self.steps.contains_key(&step.from) {
            return Err(DocportError::invalid_argument(format!(
                "a migration step from {} is already registered",
                step.from
            )));
        }
        self.steps.insert(step.from, step);
        Ok(self)
    }

    pub fn step_from(&self, v: &FormatVersion) -> Option<&MigrationStep> {
        self.steps.get(v)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Migrate a document to `CURRENT_VERSION` with the built-in registry.
pub fn migrate_document(doc: PortableDocument) -> DocportResult<PortableDocument> {
    migrate_with(&MigrationRegistry::builtin(), doc, FormatVersion::current())
}

/// Apply registered steps until `doc.version == target`.
pub fn migrate_with(
    registry: &MigrationRegistry,
    mut doc: PortableDocument,
    target: FormatVersion,
) -> DocportResult<PortableDocument> {
    let mut current = FormatVersion::parse(&doc.version)?;

    if current > target {
        return Err(DocportError::migration(format!(
            "document version {current} is newer than target {target}"
        )));
    }

    while current != target {
        let step = registry.step_from(&current).ok_or_else(|| {
            DocportError::migration(format!("no migration step registered from {current}"))
        })?;

        if step.to <= current {
            return Err(DocportError::migration(format!(
                "migration step from {current} does not advance the version"
            )));
        }
        if step.to > target {
            return Err(DocportError::migration(format!(
                "migration step {current} -> {} overshoots target {target}",
                step.to
            )));
        }

        debug!(from = %current, to = %step.to, "applying migration step");
        doc = (step.transform)(doc).map_err(|e| match e {
            DocportError::Migration(_) => e,
            other => DocportError::migration(format!("step {current} -> {}: {other}", step.to)),
        })?;
        doc.version = step.to.to_string();
        current = step.to;
    }

    Ok(doc)
}

fn add_page_numbering(mut doc: PortableDocument) -> DocportResult<PortableDocument> {
    let page = &mut doc.page_config;
    page.show_page_numbers.get_or_insert(DEFAULT_SHOW_PAGE_NUMBERS);
    page.page_gap.get_or_insert(DEFAULT_PAGE_GAP);
    Ok(doc)
}

fn add_signing_workflow(mut doc: PortableDocument) -> DocportResult<PortableDocument> {
    doc.signing_workflow.get_or_insert_with(SigningWorkflowConfig::default);
    Ok(doc)
}
