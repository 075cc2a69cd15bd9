//! On-disk editor session: the content and stores a host would hold in
//! memory between import and export.

use serde::{Deserialize, Serialize};

use docport_core::model::{ContentNode, DocumentMeta};
use docport_core::state::EditorState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub meta: DocumentMeta,
    pub state: EditorState,
    pub content: ContentNode,
}
