//! Node identity and reference types.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique tree stamps.
static NEXT_TREE_STAMP: AtomicU64 = AtomicU64::new(1);

/// Monotonic identity of one built structure tree.
///
/// Every rebuild gets a fresh stamp, so references into a previous build
/// never validate against the current one, even when slot indices collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeStamp(u64);

impl TreeStamp {
	/// Returns the next tree stamp.
	pub(crate) fn next() -> Self {
		Self(NEXT_TREE_STAMP.fetch_add(1, Ordering::Relaxed))
	}
}

/// Structural role of a node in the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// The root node spanning the whole buffer.
	Document,
	/// A maximal run of non-blank lines.
	Block,
	/// A single line inside a block, without its line break.
	Line,
}

/// Stable index of a node within one structure tree.
///
/// The slot may be reused after the node is detached; the generation is
/// bumped on every free so a stale id never resolves against a reused slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
	pub(crate) slot: u32,
	pub(crate) generation: u32,
}

/// A revalidatable reference to a node.
///
/// Combines the owning tree's stamp with the node id. Only meaningful to the
/// document it was taken from; check [`crate::Document::is_valid`] after any
/// point where an edit may have occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
	pub(crate) stamp: TreeStamp,
	pub(crate) id: NodeId,
}

impl NodeRef {
	/// Returns the stamp of the tree this reference was taken from.
	pub fn stamp(&self) -> TreeStamp {
		self.stamp
	}

	/// Returns the node id within that tree.
	pub fn id(&self) -> NodeId {
		self.id
	}
}
