//! Import/export pipeline for portable documents.
//!
//! Import composes, in order:
//! - `parse`: bytes / text / JSON value -> `serde_json::Value`
//! - `schema`: structural validation + null canonicalization -> `PortableDocument`
//! - version gate (`crate::version`)
//! - `semantic`: cross-reference and image-size checks (warnings only)
//! - `migrate`: registered version-to-version transforms
//! - `restore`: page layout, signer roles and workflow into the state stores
//! - content load into the live editing surface
//!
//! `import` owns the orchestration; `export` is the inverse.
//!
//! Every stage is a pure computation over in-memory values; the only side
//! effects are the calls into the caller-provided sinks. Diagnostics for UI
//! rendering are collected as `ValidationIssue`s.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod export;
pub mod import;
pub mod migrate;
pub mod parse;
pub mod references;
pub mod restore;
pub mod schema;
pub mod semantic;

/// Stable diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    // Fatal
    ParseError,
    SchemaError,
    VersionTooNew,
    VersionMismatch,
    MigrationError,
    ContentLoadError,
    FileReadError,

    // Warnings
    UndefinedVariable,
    OrphanedVariable,
    UndefinedRole,
    UndefinedConditionVariable,
    OrphanedConditionVariable,
    UndefinedConditionValueVariable,
    OrphanedConditionValueVariable,
    ImageTooLarge,
    SignatureImageTooLarge,
    SignatureOriginalTooLarge,
    UndefinedRoleNameVariable,
    OrphanedRoleNameVariable,
    UndefinedRoleEmailVariable,
    OrphanedRoleEmailVariable,
    UndefinedWorkflowRole,
    UndefinedPreviousRole,
    UndefinedGlobalPreviousRole,
    ChecksumMismatch,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::SchemaError => "SCHEMA_ERROR",
            Self::VersionTooNew => "VERSION_TOO_NEW",
            Self::VersionMismatch => "VERSION_MISMATCH",
            Self::MigrationError => "MIGRATION_ERROR",
            Self::ContentLoadError => "CONTENT_LOAD_ERROR",
            Self::FileReadError => "FILE_READ_ERROR",
            Self::UndefinedVariable => "UNDEFINED_VARIABLE",
            Self::OrphanedVariable => "ORPHANED_VARIABLE",
            Self::UndefinedRole => "UNDEFINED_ROLE",
            Self::UndefinedConditionVariable => "UNDEFINED_CONDITION_VARIABLE",
            Self::OrphanedConditionVariable => "ORPHANED_CONDITION_VARIABLE",
            Self::UndefinedConditionValueVariable => "UNDEFINED_CONDITION_VALUE_VARIABLE",
            Self::OrphanedConditionValueVariable => "ORPHANED_CONDITION_VALUE_VARIABLE",
            Self::ImageTooLarge => "IMAGE_TOO_LARGE",
            Self::SignatureImageTooLarge => "SIGNATURE_IMAGE_TOO_LARGE",
            Self::SignatureOriginalTooLarge => "SIGNATURE_ORIGINAL_TOO_LARGE",
            Self::UndefinedRoleNameVariable => "UNDEFINED_ROLE_NAME_VARIABLE",
            Self::OrphanedRoleNameVariable => "ORPHANED_ROLE_NAME_VARIABLE",
            Self::UndefinedRoleEmailVariable => "UNDEFINED_ROLE_EMAIL_VARIABLE",
            Self::OrphanedRoleEmailVariable => "ORPHANED_ROLE_EMAIL_VARIABLE",
            Self::UndefinedWorkflowRole => "UNDEFINED_WORKFLOW_ROLE",
            Self::UndefinedPreviousRole => "UNDEFINED_PREVIOUS_ROLE",
            Self::UndefinedGlobalPreviousRole => "UNDEFINED_GLOBAL_PREVIOUS_ROLE",
            Self::ChecksumMismatch => "CHECKSUM_MISMATCH",
        }
    }

    /// Fatal codes stop the import; everything else is advisory.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ParseError
                | Self::SchemaError
                | Self::VersionTooNew
                | Self::VersionMismatch
                | Self::MigrationError
                | Self::ContentLoadError
                | Self::FileReadError
        )
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured finding, shaped for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Outcome of a validation pass.
///
/// `valid` is false iff `errors` is non-empty. Semantic checks only ever
/// produce warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// A failed result carrying a single fatal error.
    pub fn fatal(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        let mut r = Self::ok();
        r.push_error(ValidationIssue::new(code, path, message));
        r
    }

    pub fn push_error(&mut self, issue: ValidationIssue) {
        self.valid = false;
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    /// Fold another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors.iter().chain(&self.warnings).any(|i| i.code == code)
    }

    pub fn count(&self, code: IssueCode) -> usize {
        self.errors
            .iter()
            .chain(&self.warnings)
            .filter(|i| i.code == code)
            .count()
    }
}
