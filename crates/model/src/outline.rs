//! Outline segmentation of a text buffer.
//!
//! The structural parse is deliberately simple and deterministic: blocks are
//! maximal runs of non-blank lines, and each block's lines become its
//! children. All ranges are half-open character ranges into the buffer the
//! tree was built from.

use arbor_primitives::TextRange;
use ropey::RopeSlice;

use crate::node::NodeKind;
use crate::tree::StructureTree;

struct BlockSpan {
	range: TextRange,
	lines: Vec<TextRange>,
}

/// Builds a structure tree for the given buffer.
pub fn parse(text: RopeSlice<'_>) -> StructureTree {
	let mut tree = StructureTree::new(TextRange::new(0, text.len_chars()));
	let root = tree.root();
	for block in segment(text) {
		// Parents are freshly allocated live nodes, so alloc cannot fail.
		let Some(block_id) = tree.alloc(NodeKind::Block, block.range, root) else {
			continue;
		};
		for line in block.lines {
			let _ = tree.alloc(NodeKind::Line, line, block_id);
		}
	}
	tree
}

fn segment(text: RopeSlice<'_>) -> Vec<BlockSpan> {
	let mut blocks: Vec<BlockSpan> = Vec::new();
	let mut open: Option<BlockSpan> = None;
	let mut line_start = 0usize;

	for line in text.lines() {
		let line_len = line.len_chars();
		let content_len = content_len(line);
		let blank = line.chars().take(content_len).all(char::is_whitespace);

		if blank {
			if let Some(block) = open.take() {
				blocks.push(block);
			}
		} else {
			let line_range = TextRange::new(line_start, line_start + content_len);
			match open.as_mut() {
				Some(block) => {
					block.range = TextRange::new(block.range.start, line_range.end);
					block.lines.push(line_range);
				}
				None => {
					open = Some(BlockSpan {
						range: line_range,
						lines: vec![line_range],
					});
				}
			}
		}

		line_start += line_len;
	}
	if let Some(block) = open.take() {
		blocks.push(block);
	}
	blocks
}

/// Length of the line without its trailing line break.
fn content_len(line: RopeSlice<'_>) -> usize {
	let mut len = line.len_chars();
	let mut tail = line.chars_at(len);
	while let Some(c) = tail.prev() {
		if c == '\n' || c == '\r' {
			len -= 1;
		} else {
			break;
		}
	}
	len
}

#[cfg(test)]
mod tests {
	use ropey::Rope;

	use super::*;

	fn kinds_under_root(tree: &StructureTree) -> Vec<NodeKind> {
		tree.children(tree.root())
			.iter()
			.filter_map(|id| tree.kind(*id))
			.collect()
	}

	#[test]
	fn empty_buffer_yields_root_only() {
		let text = Rope::new();
		let tree = parse(text.slice(..));
		assert_eq!(tree.node_count(), 1);
		assert_eq!(tree.kind(tree.root()), Some(NodeKind::Document));
	}

	#[test]
	fn blank_lines_separate_blocks() {
		let text = Rope::from("alpha\nbeta\n\ngamma\n");
		let tree = parse(text.slice(..));

		let blocks = tree.children(tree.root());
		assert_eq!(blocks.len(), 2);
		assert_eq!(kinds_under_root(&tree), vec![NodeKind::Block, NodeKind::Block]);
		assert_eq!(tree.children(blocks[0]).len(), 2);
		assert_eq!(tree.children(blocks[1]).len(), 1);
	}

	#[test]
	fn whitespace_only_lines_count_as_blank() {
		let text = Rope::from("alpha\n   \nbeta\n");
		let tree = parse(text.slice(..));
		assert_eq!(tree.children(tree.root()).len(), 2);
	}

	#[test]
	fn line_ranges_exclude_the_line_break() {
		let text = Rope::from("ab\ncdef\n");
		let tree = parse(text.slice(..));

		let block = tree.children(tree.root())[0];
		let lines = tree.children(block);
		assert_eq!(tree.range(lines[0]), Some(TextRange::new(0, 2)));
		assert_eq!(tree.range(lines[1]), Some(TextRange::new(3, 7)));
		assert_eq!(tree.range(block), Some(TextRange::new(0, 7)));
	}

	#[test]
	fn block_without_trailing_newline_is_kept() {
		let text = Rope::from("one\n\ntwo");
		let tree = parse(text.slice(..));

		let blocks = tree.children(tree.root());
		assert_eq!(blocks.len(), 2);
		assert_eq!(tree.range(blocks[1]), Some(TextRange::new(5, 8)));
	}
}
