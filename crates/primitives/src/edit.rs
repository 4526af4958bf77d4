//! Edit failure types.

use thiserror::Error;

use crate::range::CharIdx;

/// Errors that can occur when applying a text change to a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The change addresses a position past the end of the buffer.
	#[error("edit position {index} is out of bounds (buffer length {len})")]
	OutOfBounds {
		/// The offending character index.
		index: CharIdx,
		/// The buffer length at the time of the edit.
		len: usize,
	},

	/// The change's end precedes its start.
	#[error("inverted edit range: start {start} > end {end}")]
	InvertedRange {
		/// The change's start index.
		start: CharIdx,
		/// The change's end index.
		end: CharIdx,
	},
}
