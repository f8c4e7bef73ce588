//! Serde shapes of the persisted document.
//!
//! Field names follow the established file format (`Title`, `Subs`, `Txt`,
//! ...). Every node field is optional on read so that missing data is
//! reported with a record path instead of a bare serde error.

use serde::{Deserialize, Serialize};

/// `Type` value of a plain node.
pub const PLAIN_NODE_TYPE: &str = "oitem";
/// `Type` value of a proxy node.
pub const PROXY_NODE_TYPE: &str = "oitemproxy";

/// Top-level object of a document file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(rename = "Title", default)]
    pub title: Option<NodeRecord>,
    #[serde(rename = "Config", default)]
    pub config: Option<NodeRecord>,
    /// Index of the cursor row in the visible outline.
    #[serde(rename = "Cursor", default)]
    pub cursor: i64,
}

/// One node, plain or proxy, with its owned subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Discriminator; missing or empty means plain.
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "Created", default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(rename = "Changed", default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<i64>,
    #[serde(rename = "Txt", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "Numbered", default, skip_serializing_if = "Option::is_none")]
    pub numbered: Option<bool>,
    #[serde(rename = "Checked", default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(rename = "Expanded", default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(rename = "Subs", default, skip_serializing_if = "Option::is_none")]
    pub subs: Option<Vec<NodeRecord>>,
    #[serde(rename = "Meta", default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Box<NodeRecord>>,
    /// Proxy records only: id of the transcluded node.
    #[serde(rename = "Target", default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl NodeRecord {
    pub fn is_proxy(&self) -> bool {
        self.kind.as_deref() == Some(PROXY_NODE_TYPE)
    }
}
