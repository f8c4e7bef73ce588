//! Core domain logic for the outline editor.
//! This crate is the single source of truth for tree invariants.

pub mod history;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod tree;

pub use history::History;
pub use logging::{default_log_dir, default_log_level, init_logging, logging_status};
pub use model::document::{Document, DEFAULT_ITEM_TEXT, DEFAULT_TITLE};
pub use model::node::{Item, Node, NodeBody, NodeId, ProxyLink, EMPTY_PLACEHOLDER};
pub use repo::codec::{decode_document, encode_document, DecodedDocument};
pub use repo::document_repo::{DocumentRepository, JsonFileRepository, MemoryRepository};
pub use repo::{StorageError, StorageResult};
pub use service::command::{Command, CommandOutcome};
pub use service::session::{Clipboard, Session};
pub use service::view::RowView;
pub use tree::linearize::{position_of, Linearizer, VisibleEntry};
pub use tree::mutation::Deletion;
pub use tree::{EditError, EditResult};
