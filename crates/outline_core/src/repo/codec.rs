//! JSON encoding and decoding of whole documents.
//!
//! # Responsibility
//! - Map `Document` nodes to `NodeRecord`s and back, choosing the node shape
//!   from the `Type` discriminator.
//! - Validate decoded documents before handing them to a session.
//!
//! # Invariants
//! - Ids survive a round trip; records with an empty `Id` get a fresh one.
//! - Decoded proxies point at existing nodes and their chains end at an item.
//! - A decoded root is a plain item with at least one child.

use super::record::{DocumentRecord, NodeRecord, PLAIN_NODE_TYPE, PROXY_NODE_TYPE};
use super::{StorageError, StorageResult};
use crate::model::document::Document;
use crate::model::node::{now_secs, Item, Node, NodeBody, NodeId};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const INDENT: &[u8] = b"    ";

/// A decoded document plus the persisted cursor row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub document: Document,
    pub cursor: usize,
}

/// Serializes `document` (root tree and config) as indented JSON.
pub fn encode_document(document: &Document, cursor: usize) -> StorageResult<String> {
    let record = DocumentRecord {
        title: Some(encode_node(document, document.root())),
        config: document.config().map(|config| encode_node(document, config)),
        cursor: i64::try_from(cursor).unwrap_or(i64::MAX),
    };

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    record
        .serialize(&mut serializer)
        .map_err(StorageError::Encode)?;
    String::from_utf8(buffer)
        .map_err(|err| StorageError::parse("document", format!("encoded text is not UTF-8: {err}")))
}

fn encode_node(document: &Document, id: NodeId) -> NodeRecord {
    let Some(node) = document.node(id) else {
        return NodeRecord::default();
    };
    match node.body() {
        NodeBody::Item(item) => NodeRecord {
            kind: Some(PLAIN_NODE_TYPE.to_string()),
            id: Some(id.to_string()),
            created: Some(item.created_at),
            changed: Some(item.changed_at),
            text: Some(item.text.clone()),
            numbered: Some(item.numbered),
            checked: Some(item.checked),
            expanded: Some(node.is_expanded()),
            subs: Some(
                item.children()
                    .iter()
                    .map(|child| encode_node(document, *child))
                    .collect(),
            ),
            meta: item.meta().map(|meta| Box::new(encode_node(document, meta))),
            target: None,
        },
        NodeBody::Proxy(link) => NodeRecord {
            kind: Some(PROXY_NODE_TYPE.to_string()),
            id: Some(id.to_string()),
            expanded: Some(node.is_expanded()),
            target: Some(link.target().to_string()),
            ..NodeRecord::default()
        },
    }
}

/// Parses and validates a document.
///
/// # Errors
/// - `DocumentParse` for malformed JSON, missing required fields, bad or
///   duplicate ids, dangling proxy targets, and proxy cycles.
/// - `UnsupportedNodeVariant` for an unknown `Type`.
pub fn decode_document(text: &str) -> StorageResult<DecodedDocument> {
    let record: DocumentRecord =
        serde_json::from_str(text).map_err(|err| StorageError::parse("document", err.to_string()))?;
    let title = record
        .title
        .ok_or_else(|| StorageError::parse("Title", "missing root node"))?;
    if title.is_proxy() {
        return Err(StorageError::parse("Title", "root must be a plain item"));
    }

    let mut decoder = Decoder::default();
    let root = decoder.decode_node(title, "Title".to_string())?;
    let config = record
        .config
        .map(|config| decoder.decode_node(config, "Config".to_string()))
        .transpose()?;
    decoder.validate_proxies()?;

    let mut document = Document::from_parts(decoder.nodes, root, config);
    if document.children(root).is_empty() {
        let item = document.create_item("");
        document.attach_last(root, item);
    }

    Ok(DecodedDocument {
        document,
        cursor: usize::try_from(record.cursor).unwrap_or(0),
    })
}

#[derive(Default)]
struct Decoder {
    nodes: HashMap<NodeId, Node>,
    proxy_paths: Vec<(NodeId, String)>,
}

impl Decoder {
    fn decode_node(&mut self, record: NodeRecord, path: String) -> StorageResult<NodeId> {
        let kind = record.kind.clone().unwrap_or_default();
        match kind.as_str() {
            "" | PLAIN_NODE_TYPE => self.decode_item(record, path),
            PROXY_NODE_TYPE => self.decode_proxy(record, path),
            other => Err(StorageError::UnsupportedNodeVariant {
                kind: other.to_string(),
                context: path,
            }),
        }
    }

    fn decode_item(&mut self, record: NodeRecord, path: String) -> StorageResult<NodeId> {
        let id = self.claim_id(record.id.as_deref(), &path)?;
        let text = record
            .text
            .ok_or_else(|| StorageError::parse(format!("{path}.Txt"), "missing text"))?;

        let mut children = Vec::new();
        for (index, sub) in record.subs.unwrap_or_default().into_iter().enumerate() {
            children.push(self.decode_node(sub, format!("{path}.Subs[{index}]"))?);
        }
        let meta = record
            .meta
            .map(|meta| self.decode_node(*meta, format!("{path}.Meta")))
            .transpose()?;

        let now = now_secs();
        let mut node = Node::from_item(Item {
            created_at: record.created.unwrap_or(now),
            changed_at: record.changed.unwrap_or(now),
            text,
            numbered: record.numbered.unwrap_or(false),
            checked: record.checked.unwrap_or(false),
            children,
            meta,
        });
        node.expanded = record.expanded.unwrap_or(false);
        self.nodes.insert(id, node);
        Ok(id)
    }

    fn decode_proxy(&mut self, record: NodeRecord, path: String) -> StorageResult<NodeId> {
        let id = self.claim_id(record.id.as_deref(), &path)?;
        let target = record
            .target
            .as_deref()
            .ok_or_else(|| StorageError::parse(format!("{path}.Target"), "missing proxy target"))
            .and_then(|raw| parse_id(raw, &format!("{path}.Target")))?;
        if target == id {
            return Err(StorageError::parse(path, "proxy targets itself"));
        }

        let mut node = Node::proxy(target, false);
        node.expanded = record.expanded.unwrap_or(false);
        self.nodes.insert(id, node);
        self.proxy_paths.push((id, path));
        Ok(id)
    }

    fn claim_id(&mut self, raw: Option<&str>, path: &str) -> StorageResult<NodeId> {
        let id = match raw.map(str::trim) {
            None | Some("") => Uuid::new_v4(),
            Some(raw) => parse_id(raw, &format!("{path}.Id"))?,
        };
        if self.nodes.contains_key(&id) {
            return Err(StorageError::parse(
                format!("{path}.Id"),
                format!("duplicate id {id}"),
            ));
        }
        Ok(id)
    }

    /// Every proxy chain must reach an item without revisiting a node.
    fn validate_proxies(&self) -> StorageResult<()> {
        for (proxy, path) in &self.proxy_paths {
            let mut seen = HashSet::from([*proxy]);
            let mut current = *proxy;
            loop {
                let Some(node) = self.nodes.get(&current) else {
                    return Err(StorageError::parse(
                        path.clone(),
                        format!("proxy target {current} not found"),
                    ));
                };
                let NodeBody::Proxy(link) = &node.body else {
                    break;
                };
                if !seen.insert(link.target) {
                    return Err(StorageError::parse(path.clone(), "proxy chain forms a cycle"));
                }
                current = link.target;
            }
        }
        Ok(())
    }
}

fn parse_id(raw: &str, context: &str) -> StorageResult<NodeId> {
    Uuid::parse_str(raw.trim())
        .map_err(|err| StorageError::parse(context, format!("invalid id `{raw}`: {err}")))
}
