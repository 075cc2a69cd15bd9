//! docport-core
//!
//! Core engine for portable contract documents:
//! - Document model (page layout, signer roles, signing workflow, content tree)
//! - Structural schema validation with null canonicalization
//! - Version gate and registered migrations
//! - Semantic cross-reference checks against a variable catalog
//! - Restoration into editor state stores, and export back to the format
//!
//! The crate performs no I/O. Callers read files, fetch catalogs and supply
//! timestamps; everything here operates on in-memory values.

pub mod catalog;
pub mod config;
pub mod determinism;
pub mod errors;
pub mod model;
pub mod pipeline;
pub mod state;
pub mod version;

pub use crate::errors::{DocportError, DocportResult};

/// Format version this build reads and writes.
pub const CURRENT_VERSION: &str = "1.1.0";

/// Convenience re-exports.
pub mod prelude {
    pub use crate::catalog::{split_variables, VariableCatalog, VariableRecord, VariableSplit};
    pub use crate::config::{ExportOptions, ImportOptions};
    pub use crate::model::{
        ContentNode, DocumentMeta, ExportInfo, InjectableValue, PageConfig, PortableDocument,
        SignerRoleDefinition, SigningWorkflowConfig,
    };
    pub use crate::pipeline::export::{export_document, export_to_json_pretty};
    pub use crate::pipeline::import::{import_document, ImportResult, Importer};
    pub use crate::pipeline::parse::DocumentInput;
    pub use crate::pipeline::semantic::validate_semantics;
    pub use crate::pipeline::{IssueCode, ValidationIssue, ValidationResult};
    pub use crate::state::{ContentSink, EditorContent, EditorState, StateSink, StateSource};
    pub use crate::{DocportError, DocportResult, CURRENT_VERSION};
}
