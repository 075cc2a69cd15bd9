//! Editor state stores and the sinks the importer writes into.
//!
//! The editor owns three independent slices (page layout, signer roles,
//! signing workflow) plus the live content tree. They are explicit values
//! passed by reference into the importer and exporter; nothing here is global.
//!
//! `StateSink` replaces slices wholesale and can snapshot / restore all three
//! at once, which is what lets the importer offer an all-or-nothing restore.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    node_types, ContentNode, Margins, PageConfig, PageFormat, SignerRoleDefinition,
    SigningWorkflowConfig,
};
use crate::model::page::{DEFAULT_PAGE_GAP, DEFAULT_SHOW_PAGE_NUMBERS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayoutState {
    pub format: PageFormat,
    pub show_page_numbers: bool,
    pub page_gap: f64,
}

impl Default for PageLayoutState {
    fn default() -> Self {
        Self {
            format: PageFormat {
                id: "A4".to_string(),
                name: "A4".to_string(),
                width: 794.0,
                height: 1123.0,
                margins: Margins::default(),
            },
            show_page_numbers: DEFAULT_SHOW_PAGE_NUMBERS,
            page_gap: DEFAULT_PAGE_GAP,
        }
    }
}

impl PageLayoutState {
    /// The persisted form of this layout.
    pub fn to_page_config(&self) -> PageConfig {
        PageConfig {
            format_id: self.format.id.clone(),
            width: self.format.width,
            height: self.format.height,
            margins: self.format.margins,
            show_page_numbers: Some(self.show_page_numbers),
            page_gap: Some(self.page_gap),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerRolesState {
    pub roles: Vec<SignerRoleDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub config: SigningWorkflowConfig,
}

/// The three state slices owned by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub page_layout: PageLayoutState,
    pub signer_roles: SignerRolesState,
    pub workflow: WorkflowState,
}

/// A copy of all three slices, taken before a restore.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorStateSnapshot {
    pub page_layout: PageLayoutState,
    pub signer_roles: SignerRolesState,
    pub workflow: WorkflowState,
}

/// Write side of the state stores.
pub trait StateSink {
    fn restore_page_config(&mut self, layout: PageLayoutState);
    fn restore_signer_roles(&mut self, roles: Vec<SignerRoleDefinition>);
    fn restore_workflow_config(&mut self, config: SigningWorkflowConfig);

    fn snapshot(&self) -> EditorStateSnapshot;
    fn apply_snapshot(&mut self, snapshot: EditorStateSnapshot);
}

/// Read side of the state stores, used by the exporter.
pub trait StateSource {
    fn page_layout(&self) -> &PageLayoutState;
    fn signer_roles(&self) -> &[SignerRoleDefinition];
    fn workflow_config(&self) -> &SigningWorkflowConfig;
}

impl StateSink for EditorState {
    fn restore_page_config(&mut self, layout: PageLayoutState) {
        self.page_layout = layout;
    }

    fn restore_signer_roles(&mut self, roles: Vec<SignerRoleDefinition>) {
        self.signer_roles = SignerRolesState { roles };
    }

    fn restore_workflow_config(&mut self, config: SigningWorkflowConfig) {
        self.workflow = WorkflowState { config };
    }

    fn snapshot(&self) -> EditorStateSnapshot {
        EditorStateSnapshot {
            page_layout: self.page_layout.clone(),
            signer_roles: self.signer_roles.clone(),
            workflow: self.workflow.clone(),
        }
    }

    fn apply_snapshot(&mut self, snapshot: EditorStateSnapshot) {
        self.page_layout = snapshot.page_layout;
        self.signer_roles = snapshot.signer_roles;
        self.workflow = snapshot.workflow;
    }
}

impl StateSource for EditorState {
    fn page_layout(&self) -> &PageLayoutState {
        &self.page_layout
    }

    fn signer_roles(&self) -> &[SignerRoleDefinition] {
        &self.signer_roles.roles
    }

    fn workflow_config(&self) -> &SigningWorkflowConfig {
        &self.workflow.config
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ContentLoadError(pub String);

/// The live editing surface.
pub trait ContentSink {
    /// Replace the live content with `content`.
    fn load_content(&mut self, content: &ContentNode) -> Result<(), ContentLoadError>;
}

/// In-memory content surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorContent {
    doc: ContentNode,
}

impl Default for EditorContent {
    fn default() -> Self {
        Self {
            doc: ContentNode::empty_doc(),
        }
    }
}

impl EditorContent {
    pub fn new(doc: ContentNode) -> Self {
        Self { doc }
    }

    pub fn content(&self) -> &ContentNode {
        &self.doc
    }
}

impl ContentSink for EditorContent {
    fn load_content(&mut self, content: &ContentNode) -> Result<(), ContentLoadError> {
        if !content.is(node_types::DOC) {
            return Err(ContentLoadError(format!(
                "root node must be '{}', got '{}'",
                node_types::DOC,
                content.node_type
            )));
        }
        self.doc = content.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InjectableValue;

    fn role(id: &str) -> SignerRoleDefinition {
        SignerRoleDefinition {
            id: id.to_string(),
            label: id.to_string(),
            name: InjectableValue::literal("n"),
            email: InjectableValue::literal("e"),
            order: 1,
        }
    }

    #[test]
    fn restores_replace_slices_wholesale() {
        let mut s = EditorState::default();
        s.restore_signer_roles(vec![role("a"), role("b")]);
        s.restore_signer_roles(vec![role("c")]);
        assert_eq!(s.signer_roles().len(), 1);
        assert_eq!(s.signer_roles()[0].id, "c");
    }

    #[test]
    fn snapshot_round_trip() {
        let mut s = EditorState::default();
        s.restore_signer_roles(vec![role("a")]);
        let snap = s.snapshot();

        s.restore_signer_roles(Vec::new());
        s.restore_page_config(PageLayoutState {
            page_gap: 0.0,
            ..PageLayoutState::default()
        });
        s.apply_snapshot(snap);

        assert_eq!(s.signer_roles()[0].id, "a");
        assert_eq!(s.page_layout().page_gap, 40.0);
    }

    #[test]
    fn layout_to_page_config() {
        let cfg = PageLayoutState::default().to_page_config();
        assert_eq!(cfg.format_id, "A4");
        assert_eq!(cfg.show_page_numbers, Some(true));
        assert_eq!(cfg.page_gap, Some(40.0));
    }

    #[test]
    fn content_sink_rejects_non_doc_root() {
        let mut c = EditorContent::default();
        assert!(c.load_content(&ContentNode::new("paragraph")).is_err());
        let doc = ContentNode::empty_doc().with_children(vec![ContentNode::text("hi")]);
        c.load_content(&doc).unwrap();
        assert_eq!(c.content(), &doc);
    }
}
