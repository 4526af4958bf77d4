//! Character-indexed text ranges.

/// A position in the text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for Arbor.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// A half-open character range `[start, end)` into a text buffer.
///
/// Ranges are only meaningful against the buffer version they were computed
/// from; they are never adjusted through edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
	/// Inclusive start position.
	pub start: CharIdx,
	/// Exclusive end position.
	pub end: CharIdx,
}

impl TextRange {
	/// Creates a range from start to end.
	///
	/// # Panics
	///
	/// Debug-asserts that `start <= end`.
	pub fn new(start: CharIdx, end: CharIdx) -> Self {
		debug_assert!(start <= end, "inverted text range");
		Self { start, end }
	}

	/// Creates an empty range at the given position.
	pub fn empty_at(pos: CharIdx) -> Self {
		Self { start: pos, end: pos }
	}

	/// Returns the number of characters covered.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.end - self.start
	}

	/// Returns true if the range covers no characters.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.start == self.end
	}

	/// Returns true if `pos` falls inside the range.
	#[inline]
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.start <= pos && pos < self.end
	}

	/// Returns true if `other` lies entirely inside this range.
	#[inline]
	pub fn contains_range(&self, other: Self) -> bool {
		self.start <= other.start && other.end <= self.end
	}

	/// Returns true if the two ranges share at least one position.
	#[inline]
	pub fn intersects(&self, other: Self) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Returns the range moved by `delta` characters, saturating at zero.
	#[inline]
	pub fn shifted(&self, delta: isize) -> Self {
		Self {
			start: self.start.saturating_add_signed(delta),
			end: self.end.saturating_add_signed(delta),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn contains_is_half_open() {
		let r = TextRange::new(2, 5);
		assert!(r.contains(2));
		assert!(r.contains(4));
		assert!(!r.contains(5));
	}

	#[test]
	fn empty_range_contains_nothing() {
		let r = TextRange::empty_at(3);
		assert!(r.is_empty());
		assert_eq!(r.len(), 0);
		assert!(!r.contains(3));
	}

	#[test]
	fn intersects_excludes_touching_ranges() {
		let a = TextRange::new(0, 3);
		let b = TextRange::new(3, 6);
		assert!(!a.intersects(b));
		assert!(a.intersects(TextRange::new(2, 4)));
	}

	#[test]
	fn shifted_moves_both_bounds() {
		let r = TextRange::new(2, 5);
		assert_eq!(r.shifted(3), TextRange::new(5, 8));
		assert_eq!(r.shifted(-2), TextRange::new(0, 3));
		assert_eq!(r.shifted(-10), TextRange::new(0, 0));
	}

	#[test]
	fn contains_range_accepts_equal_bounds() {
		let outer = TextRange::new(1, 9);
		assert!(outer.contains_range(TextRange::new(1, 9)));
		assert!(outer.contains_range(TextRange::new(4, 4)));
		assert!(!outer.contains_range(TextRange::new(0, 2)));
	}
}
