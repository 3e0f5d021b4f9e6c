//! Defines the `Depth` type and its related constants.

/// Remaining search depth in half-moves.
///
/// The remaining search depth tells how many half-moves should be
/// added to the current line of play before a leaf node is
/// reached. Searches are started with some positive number as their
/// remaining search depth. This number is decreased when a move is
/// tried, and the search routine is called recursively. When the
/// remaining depth becomes zero, a leaf node has been reached and a
/// quiescence search is performed to obtain a reliable evaluation.
pub type Depth = i32;

/// The maximum allowed search depth in half-moves.
pub const DEPTH_MAX: Depth = 64;
