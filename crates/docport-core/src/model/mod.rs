//! docport data models.
//!
//! Strongly-typed Rust representations of the portable document format.
//!
//! Design goals:
//! - **Lossless:** content nodes keep every attribute they arrive with, so an
//!   export/import cycle returns the same tree.
//! - **Closed unions where the format is closed:** condition trees, injectable
//!   values, order modes and scopes are enums with exhaustive matching.
//! - **Minimal policy:** models are mostly data. Structural validation lives in
//!   `crate::pipeline::schema`; cross-reference checks in
//!   `crate::pipeline::semantic`.
//!
//! Wire names are camelCase and match the JSON format exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod condition;
pub mod content;
pub mod page;
pub mod roles;
pub mod workflow;

pub use condition::{ConditionGroup, ConditionRule, LogicOperator, RuleValue, RuleValueMode};
pub use content::{
    node_types, ConditionalAttrs, ContentNode, ImageAttrs, InjectorAttrs, SignatureAttrs,
    SignatureItem,
};
pub use page::{find_page_format, Margins, PageConfig, PageFormat, KNOWN_PAGE_FORMATS};
pub use roles::{InjectableValue, SignerRoleDefinition, ROLE_VARIABLE_PREFIX};
pub use workflow::{
    triggers, NotificationConfig, NotificationScope, OrderMode, PreviousRolesConfig,
    PreviousRolesMode, RoleNotificationConfig, SigningWorkflowConfig, TriggerMap, TriggerSettings,
};

/// The interchange unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableDocument {
    pub version: String,

    #[serde(alias = "metadata")]
    pub meta: DocumentMeta,

    pub page_config: PageConfig,

    #[serde(default)]
    pub variable_ids: Vec<String>,

    #[serde(default)]
    pub signer_roles: Vec<SignerRoleDefinition>,

    /// Absent in documents older than 1.1.0 until migrated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signing_workflow: Option<SigningWorkflowConfig>,

    pub content: ContentNode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_info: Option<ExportInfo>,
}

impl PortableDocument {
    /// Workflow configuration, falling back to the format default.
    pub fn workflow_or_default(&self) -> SigningWorkflowConfig {
        self.signing_workflow.clone().unwrap_or_default()
    }

    /// Declared role ids in document order.
    pub fn role_ids(&self) -> impl Iterator<Item = &str> {
        self.signer_roles.iter().map(|r| r.id.as_str())
    }
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<BTreeMap<String, Value>>,
}

impl DocumentMeta {
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            language: language.into(),
            custom_fields: None,
        }
    }
}

/// Export provenance block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub exported_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_by: Option<String>,

    pub source_app: String,

    /// Lowercase hex sha256 over the canonical document body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}
