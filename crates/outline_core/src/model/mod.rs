//! Outline domain model.
//!
//! # Responsibility
//! - Define the node record and the arena that owns a whole outline.
//!
//! # Invariants
//! - Every node is identified by a stable `NodeId`.
//! - Children and meta are ownership edges; parent and proxy target are
//!   handles.

pub mod document;
pub mod node;
