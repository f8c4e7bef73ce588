//! Document persistence: wire records, JSON codec, and storage backends.
//!
//! # Responsibility
//! - Translate between the `Document` arena and its on-disk JSON form.
//! - Isolate file-system details from session orchestration.
//!
//! # Invariants
//! - Decoding either yields a fully linked, validated document or an error
//!   naming the failing record path.
//! - Parent links and editing flags are never read from or written to disk.
//!
//! # See also
//! - `repo::record` for the field layout.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod codec;
pub mod document_repo;
pub mod record;

pub type StorageResult<T> = Result<T, StorageError>;

/// Load/save failure.
#[derive(Debug)]
pub enum StorageError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Content is not a valid outline document.
    DocumentParse { context: String, reason: String },
    /// A node record carries a `Type` this program does not know.
    UnsupportedNodeVariant { kind: String, context: String },
    /// Document could not be serialized.
    Encode(serde_json::Error),
    /// File could not be written.
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileRead { path, source } => {
                write!(f, "could not read `{}`: {source}", path.display())
            }
            Self::DocumentParse { context, reason } => {
                write!(f, "invalid document at {context}: {reason}")
            }
            Self::UnsupportedNodeVariant { kind, context } => {
                write!(f, "unsupported node type `{kind}` at {context}")
            }
            Self::Encode(err) => write!(f, "could not encode document: {err}"),
            Self::FileWrite { path, source } => {
                write!(f, "could not write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FileRead { source, .. } | Self::FileWrite { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
            Self::DocumentParse { .. } | Self::UnsupportedNodeVariant { .. } => None,
        }
    }
}

impl StorageError {
    /// Short stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::FileRead { .. } => "file_read_failed",
            Self::DocumentParse { .. } => "document_parse_failed",
            Self::UnsupportedNodeVariant { .. } => "unsupported_node_variant",
            Self::Encode(_) => "encode_failed",
            Self::FileWrite { .. } => "file_write_failed",
        }
    }

    pub(crate) fn parse(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DocumentParse {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
