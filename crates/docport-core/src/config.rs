//! Configuration structures for docport-core.
//!
//! This module defines explicit, serializable option objects used by the
//! importer and exporter to control validation, migration and limits.
//!
//! The core crate itself does not read environment variables or the clock.
//! Everything must be provided explicitly by the caller (CLI, UI host).

use serde::{Deserialize, Serialize};

use crate::errors::{DocportError, DocportResult};

/// Default ceiling for decoded inline image payloads (5 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Default maximum JSON bytes accepted by the parser (32 MiB).
///
/// Documents embed base64 images, so this is well above the image ceiling.
pub const DEFAULT_MAX_JSON_BYTES: usize = 32 * 1024 * 1024;

/// Options for a single import run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    /// Run cross-reference checks after schema validation.
    #[serde(default = "default_true")]
    pub validate_semantics: bool,

    /// Migrate older documents instead of rejecting them with `VERSION_MISMATCH`.
    #[serde(default)]
    pub auto_migrate: bool,

    /// Decoded byte ceiling for inline images.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,

    /// Recompute `exportInfo.checksum` and warn on mismatch.
    #[serde(default)]
    pub verify_checksum: bool,

    /// Snapshot the state stores before restoring and roll back if the content
    /// sink fails. Off by default: the stores stay mutated, as they always have.
    #[serde(default)]
    pub rollback_on_content_error: bool,

    #[serde(default)]
    pub limits: LimitsConfig,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            validate_semantics: true,
            auto_migrate: false,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            verify_checksum: false,
            rollback_on_content_error: false,
            limits: LimitsConfig::default(),
        }
    }
}

impl ImportOptions {
    pub fn with_auto_migrate(mut self, on: bool) -> Self {
        self.auto_migrate = on;
        self
    }

    pub fn with_semantics(mut self, on: bool) -> Self {
        self.validate_semantics = on;
        self
    }

    pub fn with_max_image_size(mut self, bytes: u64) -> Self {
        self.max_image_size = bytes;
        self
    }
}

/// Resource limits applied before any structural work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitsConfig {
    pub max_json_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_json_bytes: DEFAULT_MAX_JSON_BYTES,
        }
    }
}

/// Options for the exporter.
///
/// `exported_at` is injected by the caller; core never reads system time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub include_checksum: bool,
    pub exported_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_by: Option<String>,
    pub source_app: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_checksum: false,
            exported_at: "1970-01-01T00:00:00Z".to_string(),
            exported_by: None,
            source_app: format!("docport/{}", crate::CURRENT_VERSION),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_image_size() -> u64 {
    DEFAULT_MAX_IMAGE_SIZE
}

/// Validate import options.
pub fn validate_config(opts: &ImportOptions) -> DocportResult<()> {
    if opts.max_image_size == 0 {
        return Err(DocportError::invalid_argument(
            "max_image_size must be greater than zero",
        ));
    }

    if opts.limits.max_json_bytes == 0 {
        return Err(DocportError::invalid_argument(
            "max_json_bytes must be greater than zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let opts = ImportOptions::default();
        validate_config(&opts).unwrap();
        assert!(opts.validate_semantics);
        assert!(!opts.auto_migrate);
        assert_eq!(opts.max_image_size, 5_242_880);
    }

    #[test]
    fn zero_image_ceiling_detected() {
        let opts = ImportOptions::default().with_max_image_size(0);
        assert!(validate_config(&opts).is_err());
    }

    #[test]
    fn zero_json_limit_detected() {
        let mut opts = ImportOptions::default();
        opts.limits.max_json_bytes = 0;
        assert!(validate_config(&opts).is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let opts: ImportOptions = serde_json::from_str(r#"{"autoMigrate":true}"#).unwrap();
        assert!(opts.auto_migrate);
        assert!(opts.validate_semantics);
        assert_eq!(opts.limits, LimitsConfig::default());
    }
}
