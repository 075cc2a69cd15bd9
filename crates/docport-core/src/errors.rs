//! Error types for docport-core.
//!
//! Library-level failures are reported through `DocportError`. Pipeline
//! outcomes that a UI has to render (schema errors, version gates, warnings)
//! are not errors in this sense: they travel as `ImportResult` /
//! `ValidationResult` values built in `crate::pipeline`.

use thiserror::Error;

/// Result alias used across the crate.
pub type DocportResult<T> = Result<T, DocportError>;

/// Stable error categories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocportError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("content load failed: {0}")]
    ContentLoad(String),

    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl DocportError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn migration(msg: impl Into<String>) -> Self {
        Self::Migration(msg.into())
    }

    pub fn content_load(msg: impl Into<String>) -> Self {
        Self::ContentLoad(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

impl From<serde_json::Error> for DocportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let e = DocportError::migration("no step registered from 0.9.0");
        assert_eq!(e.to_string(), "migration failed: no step registered from 0.9.0");
    }

    #[test]
    fn serde_errors_convert() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: DocportError = err.into();
        assert!(matches!(e, DocportError::Serialization(_)));
    }
}
