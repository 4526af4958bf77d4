//! Core text primitives shared across the Arbor workspace.

/// Text change descriptions applied to a document buffer.
pub mod change;
/// Edit failure types.
pub mod edit;
/// Identifier types for model entities.
pub mod ids;
/// Character-indexed text ranges.
pub mod range;

pub use change::TextChange;
pub use edit::EditError;
pub use ids::DocumentId;
pub use range::{CharIdx, CharLen, TextRange};
