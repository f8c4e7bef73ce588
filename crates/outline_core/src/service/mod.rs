//! Editing session orchestration.
//!
//! # Responsibility
//! - Translate discrete commands into tree edits, history entries, and
//!   cursor movement.
//! - Expose render-ready rows without handing out mutable tree access.
//!
//! # Invariants
//! - Services depend on `DocumentRepository`, not on a concrete backend.
//! - All editing state lives in one `Session` value; there are no globals.

pub mod command;
pub mod session;
pub mod view;
