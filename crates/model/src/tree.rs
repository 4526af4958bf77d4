//! The structure tree arena.
//!
//! Nodes live in slot storage addressed by [`NodeId`]. Slots are reused
//! through a free list; each free bumps the slot's generation, so an id taken
//! before the free fails the generation check afterwards instead of aliasing
//! whatever node landed in the slot next.

use arbor_primitives::TextRange;

use crate::node::{NodeId, NodeKind, NodeRef, TreeStamp};

#[derive(Debug, Clone)]
struct Node {
	kind: NodeKind,
	range: TextRange,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
}

/// Tree of structural nodes over one buffer version.
pub struct StructureTree {
	stamp: TreeStamp,
	slots: Vec<Option<Node>>,
	// Last generation per slot; persists across frees.
	generations: Vec<u32>,
	free_list: Vec<usize>,
	root: NodeId,
}

impl std::fmt::Debug for StructureTree {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StructureTree")
			.field("stamp", &self.stamp)
			.field("nodes_alive", &self.node_count())
			.field("slots_total", &self.slots.len())
			.field("free_list", &self.free_list.len())
			.finish()
	}
}

impl StructureTree {
	/// Creates a tree containing only a root [`NodeKind::Document`] node.
	pub fn new(document_range: TextRange) -> Self {
		let mut tree = Self {
			stamp: TreeStamp::next(),
			slots: Vec::new(),
			generations: Vec::new(),
			free_list: Vec::new(),
			root: NodeId { slot: 0, generation: 0 },
		};
		tree.root = tree.alloc_slot(Node {
			kind: NodeKind::Document,
			range: document_range,
			parent: None,
			children: Vec::new(),
		});
		tree
	}

	/// Returns the stamp identifying this build.
	pub fn stamp(&self) -> TreeStamp {
		self.stamp
	}

	/// Returns the root node id.
	pub fn root(&self) -> NodeId {
		self.root
	}

	/// Allocates a node as the last child of `parent`.
	///
	/// Returns `None` if `parent` does not resolve to a live node.
	pub fn alloc(&mut self, kind: NodeKind, range: TextRange, parent: NodeId) -> Option<NodeId> {
		if self.get(parent).is_none() {
			return None;
		}
		let id = self.alloc_slot(Node {
			kind,
			range,
			parent: Some(parent),
			children: Vec::new(),
		});
		if let Some(node) = self.get_mut(parent) {
			node.children.push(id);
		}
		Some(id)
	}

	/// Detaches `id` and frees its whole subtree.
	///
	/// The root cannot be detached. Returns false when `id` is the root or
	/// does not resolve to a live node.
	pub fn detach(&mut self, id: NodeId) -> bool {
		if id == self.root || self.get(id).is_none() {
			return false;
		}
		if let Some(parent) = self.get(id).and_then(|node| node.parent)
			&& let Some(parent_node) = self.get_mut(parent)
		{
			parent_node.children.retain(|child| *child != id);
		}
		let mut pending = vec![id];
		while let Some(current) = pending.pop() {
			let slot = current.slot as usize;
			if let Some(node) = self.slots[slot].take() {
				pending.extend(node.children);
				self.generations[slot] = self.generations[slot].wrapping_add(1);
				self.free_list.push(slot);
			}
		}
		true
	}

	/// Returns true if `id` resolves to a live node in this tree.
	pub fn contains(&self, id: NodeId) -> bool {
		self.get(id).is_some()
	}

	/// Returns the node's kind, if live.
	pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
		self.get(id).map(|node| node.kind)
	}

	/// Returns the node's text range, if live.
	pub fn range(&self, id: NodeId) -> Option<TextRange> {
		self.get(id).map(|node| node.range)
	}

	/// Returns the node's parent. `None` for the root or a dead id.
	pub fn parent(&self, id: NodeId) -> Option<NodeId> {
		self.get(id).and_then(|node| node.parent)
	}

	/// Returns the node's children in order. Empty for a dead id.
	pub fn children(&self, id: NodeId) -> &[NodeId] {
		self.get(id).map_or(&[], |node| node.children.as_slice())
	}

	/// Returns the next sibling under the same parent.
	pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
		self.sibling_at_offset(id, 1)
	}

	/// Returns the previous sibling under the same parent.
	pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
		self.sibling_at_offset(id, -1)
	}

	/// Returns the number of live nodes, including the root.
	pub fn node_count(&self) -> usize {
		self.slots.iter().filter(|slot| slot.is_some()).count()
	}

	/// Returns a revalidatable reference for a live node.
	pub fn node_ref(&self, id: NodeId) -> Option<NodeRef> {
		self.contains(id).then_some(NodeRef { stamp: self.stamp, id })
	}

	/// Returns true if the reference was taken from this build and its node
	/// is still live.
	pub fn valid_ref(&self, node_ref: NodeRef) -> bool {
		node_ref.stamp == self.stamp && self.contains(node_ref.id)
	}

	fn sibling_at_offset(&self, id: NodeId, offset: isize) -> Option<NodeId> {
		let parent = self.parent(id)?;
		let siblings = self.children(parent);
		let position = siblings.iter().position(|sibling| *sibling == id)?;
		let target = position.checked_add_signed(offset)?;
		siblings.get(target).copied()
	}

	fn alloc_slot(&mut self, node: Node) -> NodeId {
		let slot = match self.free_list.pop() {
			Some(slot) => {
				self.slots[slot] = Some(node);
				slot
			}
			None => {
				self.slots.push(Some(node));
				self.generations.push(0);
				self.slots.len() - 1
			}
		};
		NodeId {
			slot: slot as u32,
			generation: self.generations[slot],
		}
	}

	fn get(&self, id: NodeId) -> Option<&Node> {
		let slot = id.slot as usize;
		if self.generations.get(slot) != Some(&id.generation) {
			return None;
		}
		self.slots[slot].as_ref()
	}

	fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
		let slot = id.slot as usize;
		if self.generations.get(slot) != Some(&id.generation) {
			return None;
		}
		self.slots[slot].as_mut()
	}
}
