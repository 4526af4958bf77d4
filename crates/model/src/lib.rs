//! Structural document model.
//!
//! A [`Document`] owns a rope text buffer and a structure tree derived from
//! it. The tree is built on demand and dropped on every edit, so node
//! references are only meaningful for the exact buffer version they were
//! taken from. [`NodeRef`] carries enough provenance (tree stamp plus slot
//! generation) that staleness is a checkable condition: callers revalidate
//! with [`Document::is_valid`] after any point where an edit may have
//! happened, instead of dereferencing a dangling handle.

/// Document: rope buffer, version, cached structure.
pub mod document;
/// Node identity and reference types.
pub mod node;
/// Outline segmentation of a text buffer.
pub mod outline;
/// The structure tree arena.
pub mod tree;

pub use document::Document;
pub use node::{NodeId, NodeKind, NodeRef, TreeStamp};
pub use tree::StructureTree;
