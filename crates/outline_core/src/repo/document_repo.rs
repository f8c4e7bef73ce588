//! Document repository contracts and storage backends.
//!
//! # Responsibility
//! - Load and save whole documents by path.
//! - Emit `document_load` / `document_save` events with duration and status.
//!
//! # Invariants
//! - `load` returns a validated document or an error; it never returns a
//!   partially decoded tree.
//! - `save` writes the root tree and config only; detached nodes are dropped.

use super::codec::{decode_document, encode_document, DecodedDocument};
use super::{StorageError, StorageResult};
use crate::model::document::Document;
use log::{error, info};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Repository interface for whole-document persistence.
pub trait DocumentRepository {
    fn load(&self, path: &Path) -> StorageResult<DecodedDocument>;
    fn save(&self, path: &Path, document: &Document, cursor: usize) -> StorageResult<()>;
}

/// JSON files on the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileRepository;

impl JsonFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRepository for JsonFileRepository {
    fn load(&self, path: &Path) -> StorageResult<DecodedDocument> {
        let started_at = Instant::now();
        info!("event=document_load module=repo status=start mode=file");

        let result = std::fs::read_to_string(path)
            .map_err(|source| StorageError::FileRead {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|text| decode_document(&text));
        log_load(&result, started_at, "file");
        result
    }

    fn save(&self, path: &Path, document: &Document, cursor: usize) -> StorageResult<()> {
        let started_at = Instant::now();
        info!("event=document_save module=repo status=start mode=file");

        let result = encode_document(document, cursor).and_then(|text| {
            std::fs::write(path, text).map_err(|source| StorageError::FileWrite {
                path: path.to_path_buf(),
                source,
            })
        });
        log_save(&result, started_at, document, "file");
        result
    }
}

/// In-process store keyed by path, holding encoded documents.
///
/// Goes through the same codec as the file backend, so it exercises the
/// full save/load path without touching the disk.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    files: RefCell<HashMap<PathBuf, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text under `path`, as if a file with that content existed.
    pub fn insert_raw(&self, path: impl Into<PathBuf>, text: impl Into<String>) {
        self.files.borrow_mut().insert(path.into(), text.into());
    }

    /// Raw text last saved under `path`.
    pub fn raw(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }
}

impl DocumentRepository for MemoryRepository {
    fn load(&self, path: &Path) -> StorageResult<DecodedDocument> {
        let started_at = Instant::now();
        info!("event=document_load module=repo status=start mode=memory");

        let result = self
            .raw(path)
            .ok_or_else(|| StorageError::FileRead {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
            .and_then(|text| decode_document(&text));
        log_load(&result, started_at, "memory");
        result
    }

    fn save(&self, path: &Path, document: &Document, cursor: usize) -> StorageResult<()> {
        let started_at = Instant::now();
        info!("event=document_save module=repo status=start mode=memory");

        let result = encode_document(document, cursor).map(|text| self.insert_raw(path, text));
        log_save(&result, started_at, document, "memory");
        result
    }
}

fn log_load(result: &StorageResult<DecodedDocument>, started_at: Instant, mode: &str) {
    match result {
        Ok(decoded) => info!(
            "event=document_load module=repo status=ok mode={} duration_ms={} nodes={}",
            mode,
            started_at.elapsed().as_millis(),
            decoded.document.tree_len()
        ),
        Err(err) => error!(
            "event=document_load module=repo status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
}

fn log_save(result: &StorageResult<()>, started_at: Instant, document: &Document, mode: &str) {
    match result {
        Ok(()) => info!(
            "event=document_save module=repo status=ok mode={} duration_ms={} nodes={}",
            mode,
            started_at.elapsed().as_millis(),
            document.tree_len()
        ),
        Err(err) => error!(
            "event=document_save module=repo status=error mode={} duration_ms={} error_code={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err.code(),
            err
        ),
    }
}
