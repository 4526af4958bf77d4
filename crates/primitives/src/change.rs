//! Text change descriptions.

use crate::range::{CharIdx, CharLen, TextRange};

/// Represents a single text change operation.
///
/// A change describes replacing the text range `[start, end)` with the
/// optional `replacement` text. If `replacement` is [`None`], this represents
/// a deletion. An insertion is an empty range with a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
	/// The starting character index of the change.
	pub start: CharIdx,
	/// The ending character index of the change (exclusive).
	pub end: CharIdx,
	/// The replacement text, or [`None`] for deletion.
	pub replacement: Option<String>,
}

impl TextChange {
	/// Creates an insertion at the given position.
	pub fn insert(at: CharIdx, text: impl Into<String>) -> Self {
		Self {
			start: at,
			end: at,
			replacement: Some(text.into()),
		}
	}

	/// Creates a deletion of the given range.
	pub fn delete(range: TextRange) -> Self {
		Self {
			start: range.start,
			end: range.end,
			replacement: None,
		}
	}

	/// Creates a replacement of the given range.
	pub fn replace(range: TextRange, text: impl Into<String>) -> Self {
		Self {
			start: range.start,
			end: range.end,
			replacement: Some(text.into()),
		}
	}

	/// Returns the range this change removes.
	pub fn removed_range(&self) -> TextRange {
		TextRange::new(self.start.min(self.end), self.end.max(self.start))
	}

	/// Returns the number of characters removed.
	pub fn removed_len(&self) -> CharLen {
		self.end.saturating_sub(self.start)
	}

	/// Returns the number of characters inserted.
	pub fn inserted_len(&self) -> CharLen {
		self.replacement.as_ref().map_or(0, |text| text.chars().count())
	}

	/// Returns the signed length difference this change applies to the text.
	pub fn net_delta(&self) -> isize {
		self.inserted_len() as isize - self.removed_len() as isize
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_is_empty_range_with_text() {
		let change = TextChange::insert(4, "abc");
		assert_eq!(change.removed_len(), 0);
		assert_eq!(change.inserted_len(), 3);
	}

	#[test]
	fn delete_has_no_replacement() {
		let change = TextChange::delete(TextRange::new(2, 6));
		assert_eq!(change.removed_len(), 4);
		assert_eq!(change.inserted_len(), 0);
		assert!(change.replacement.is_none());
	}

	#[test]
	fn net_delta_is_signed_growth() {
		assert_eq!(TextChange::insert(0, "abc").net_delta(), 3);
		assert_eq!(TextChange::delete(TextRange::new(2, 6)).net_delta(), -4);
		assert_eq!(TextChange::replace(TextRange::new(0, 2), "xy").net_delta(), 0);
	}

	#[test]
	fn inserted_len_counts_chars_not_bytes() {
		let change = TextChange::replace(TextRange::new(0, 1), "äöü");
		assert_eq!(change.inserted_len(), 3);
	}
}
