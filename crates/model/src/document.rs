//! Document: rope buffer, version, cached structure.
//!
//! The structure tree is a projection of the buffer at one version. Any edit
//! drops the cached tree, so every node reference taken before the edit
//! reports invalid afterwards. The library never resolves a reference
//! without checking it; callers holding references across a possible edit
//! must do the same via [`Document::is_valid`].

use arbor_primitives::{DocumentId, EditError, TextChange};
use ropey::{Rope, RopeSlice};

use crate::node::NodeRef;
use crate::outline;
use crate::tree::StructureTree;

/// A text document with an on-demand structural view.
pub struct Document {
	/// Unique identifier for this document.
	pub id: DocumentId,
	content: Rope,
	version: u64,
	structure: Option<StructureTree>,
}

impl std::fmt::Debug for Document {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Document")
			.field("id", &self.id)
			.field("version", &self.version)
			.field("len_chars", &self.content.len_chars())
			.field("structure_cached", &self.structure.is_some())
			.finish()
	}
}

impl Document {
	/// Creates a document with the given initial content.
	pub fn new(content: &str) -> Self {
		Self {
			id: DocumentId::next(),
			content: Rope::from(content),
			version: 0,
			structure: None,
		}
	}

	/// Creates an empty document.
	pub fn empty() -> Self {
		Self::new("")
	}

	/// Returns the buffer contents.
	pub fn text(&self) -> RopeSlice<'_> {
		self.content.slice(..)
	}

	/// Returns the buffer length in characters.
	pub fn len_chars(&self) -> usize {
		self.content.len_chars()
	}

	/// Returns the document version, incremented on every applied change.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Applies a text change through the single edit gate.
	///
	/// On success the version is bumped and the cached structure tree is
	/// dropped, invalidating every outstanding [`NodeRef`].
	///
	/// # Errors
	///
	/// Returns [`EditError::InvertedRange`] when the change's end precedes
	/// its start, and [`EditError::OutOfBounds`] when it addresses positions
	/// past the end of the buffer. Failed changes have no effect.
	pub fn apply(&mut self, change: &TextChange) -> Result<(), EditError> {
		if change.start > change.end {
			return Err(EditError::InvertedRange {
				start: change.start,
				end: change.end,
			});
		}
		let len = self.content.len_chars();
		if change.end > len {
			return Err(EditError::OutOfBounds { index: change.end, len });
		}

		self.content.remove(change.start..change.end);
		if let Some(replacement) = &change.replacement {
			self.content.insert(change.start, replacement);
		}
		self.version += 1;
		self.structure = None;
		tracing::trace!(
			document = self.id.0,
			version = self.version,
			removed = change.removed_len(),
			inserted = change.inserted_len(),
			delta = change.net_delta(),
			"document.edit"
		);
		Ok(())
	}

	/// Returns the structure tree, building it from the buffer if no build
	/// is cached for the current version.
	pub fn structure(&mut self) -> &StructureTree {
		if self.structure.is_none() {
			let tree = outline::parse(self.content.slice(..));
			tracing::debug!(
				document = self.id.0,
				version = self.version,
				nodes = tree.node_count(),
				"document.structure.rebuilt"
			);
			self.structure = Some(tree);
		}
		// Populated above.
		self.structure.as_ref().expect("structure cached")
	}

	/// Returns the cached structure tree without building one.
	pub fn try_structure(&self) -> Option<&StructureTree> {
		self.structure.as_ref()
	}

	/// Reports whether a previously obtained node reference still points at
	/// live structure of the current buffer version.
	pub fn is_valid(&self, node_ref: NodeRef) -> bool {
		self.structure
			.as_ref()
			.is_some_and(|tree| tree.valid_ref(node_ref))
	}

	/// Returns the text covered by a node, or `None` when the reference is
	/// stale or no structure is cached.
	pub fn node_text(&self, node_ref: NodeRef) -> Option<String> {
		let tree = self.structure.as_ref()?;
		if !tree.valid_ref(node_ref) {
			return None;
		}
		let range = tree.range(node_ref.id())?;
		Some(self.content.slice(range.start..range.end).to_string())
	}
}

#[cfg(test)]
mod tests {
	use arbor_primitives::TextRange;

	use super::*;
	use crate::node::NodeKind;

	#[test]
	fn apply_bumps_version_and_edits_text() {
		let mut doc = Document::new("hello world");
		doc.apply(&TextChange::replace(TextRange::new(6, 11), "arbor")).unwrap();
		assert_eq!(doc.text().to_string(), "hello arbor");
		assert_eq!(doc.version(), 1);
	}

	#[test]
	fn apply_rejects_out_of_bounds_without_side_effect() {
		let mut doc = Document::new("short");
		let err = doc.apply(&TextChange::delete(TextRange::new(2, 99))).unwrap_err();
		assert_eq!(err, EditError::OutOfBounds { index: 99, len: 5 });
		assert_eq!(doc.text().to_string(), "short");
		assert_eq!(doc.version(), 0);
	}

	#[test]
	fn apply_rejects_inverted_ranges() {
		let mut doc = Document::new("text");
		let change = TextChange {
			start: 3,
			end: 1,
			replacement: None,
		};
		let err = doc.apply(&change).unwrap_err();
		assert_eq!(err, EditError::InvertedRange { start: 3, end: 1 });
	}

	#[test]
	fn structure_is_cached_until_the_next_edit() {
		let mut doc = Document::new("a\n\nb\n");
		let stamp = doc.structure().stamp();
		assert_eq!(doc.structure().stamp(), stamp);

		doc.apply(&TextChange::insert(0, "x")).unwrap();
		assert!(doc.try_structure().is_none());
		assert_ne!(doc.structure().stamp(), stamp);
	}

	#[test]
	fn edit_invalidates_existing_node_refs() {
		let mut doc = Document::new("one\ntwo\n");
		let tree = doc.structure();
		let block = tree.children(tree.root())[0];
		let node_ref = tree.node_ref(block).unwrap();
		assert!(doc.is_valid(node_ref));

		doc.apply(&TextChange::insert(0, "zero\n")).unwrap();
		assert!(!doc.is_valid(node_ref));
		assert!(doc.node_text(node_ref).is_none());

		// A fresh acquisition resolves against the rebuilt structure.
		let tree = doc.structure();
		assert_eq!(tree.kind(tree.children(tree.root())[0]), Some(NodeKind::Block));
	}

	#[test]
	fn node_text_slices_the_buffer() {
		let mut doc = Document::new("alpha\nbeta\n");
		let tree = doc.structure();
		let block = tree.children(tree.root())[0];
		let line = tree.children(block)[1];
		let line_ref = tree.node_ref(line).unwrap();
		assert_eq!(doc.node_text(line_ref).as_deref(), Some("beta"));
	}
}
