//! Rich content tree.
//!
//! Nodes are stored in their generic wire shape (`type`, `attrs`, `content`,
//! `marks`, `text`) so that editor-specific attributes survive a round trip
//! untouched. The node types the engine cares about get typed, read-only
//! attribute views parsed on demand.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::condition::ConditionGroup;

/// Node type tags with engine semantics.
pub mod node_types {
    pub const DOC: &str = "doc";
    pub const INJECTOR: &str = "injector";
    pub const SIGNATURE: &str = "signature";
    pub const CONDITIONAL: &str = "conditional";
    pub const IMAGE: &str = "image";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    #[serde(rename = "type")]
    pub node_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<ContentNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ContentNode {
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            attrs: None,
            content: None,
            marks: None,
            text: None,
        }
    }

    /// An empty root document node.
    pub fn empty_doc() -> Self {
        Self::new(node_types::DOC).with_children(Vec::new())
    }

    pub fn text(text: impl Into<String>) -> Self {
        let mut n = Self::new("text");
        n.text = Some(text.into());
        n
    }

    pub fn with_attrs(mut self, attrs: Value) -> Self {
        if let Value::Object(map) = attrs {
            self.attrs = Some(map);
        }
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        self.content = Some(children);
        self
    }

    pub fn children(&self) -> &[ContentNode] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn is(&self, node_type: &str) -> bool {
        self.node_type == node_type
    }

    fn parse_attrs<T: DeserializeOwned>(&self) -> Option<T> {
        let attrs = self.attrs.clone().unwrap_or_default();
        serde_json::from_value(Value::Object(attrs)).ok()
    }

    /// Typed view of an `injector` node.
    pub fn injector_attrs(&self) -> Option<InjectorAttrs> {
        if !self.is(node_types::INJECTOR) {
            return None;
        }
        self.parse_attrs()
    }

    /// Typed view of a `signature` node.
    pub fn signature_attrs(&self) -> Option<SignatureAttrs> {
        if !self.is(node_types::SIGNATURE) {
            return None;
        }
        self.parse_attrs()
    }

    /// Typed view of a `conditional` node.
    pub fn conditional_attrs(&self) -> Option<ConditionalAttrs> {
        if !self.is(node_types::CONDITIONAL) {
            return None;
        }
        self.parse_attrs()
    }

    /// Typed view of an `image` node.
    pub fn image_attrs(&self) -> Option<ImageAttrs> {
        if !self.is(node_types::IMAGE) {
            return None;
        }
        self.parse_attrs()
    }

    /// Depth-first, pre-order walk with the JSON path of every node.
    ///
    /// `root_path` is the path of `self` (e.g. `"content"` for the document root).
    pub fn walk<F>(&self, root_path: &str, f: &mut F)
    where
        F: FnMut(&ContentNode, &str),
    {
        f(self, root_path);
        for (i, child) in self.children().iter().enumerate() {
            let path = format!("{root_path}.content[{i}]");
            child.walk(&path, f);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectorAttrs {
    pub variable_id: String,
    #[serde(default)]
    pub is_role_variable: Option<bool>,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl InjectorAttrs {
    pub fn is_role_variable(&self) -> bool {
        self.is_role_variable.unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureAttrs {
    #[serde(default)]
    pub signatures: Vec<SignatureItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureItem {
    pub id: String,
    #[serde(default)]
    pub role_id: Option<String>,
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub image_original: Option<String>,
}

impl SignatureItem {
    /// The assigned role id, treating "" as unassigned.
    pub fn assigned_role(&self) -> Option<&str> {
        self.role_id.as_deref().filter(|r| !r.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalAttrs {
    #[serde(default)]
    pub conditions: Option<ConditionGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageAttrs {
    #[serde(default)]
    pub src: Option<String>,
}
