//! Defines the `Value` type and its related constants.

/// Evaluation value in centipawns.
///
/// Positive values mean that the position is favorable for the side
/// to move. Negative values mean the position is favorable for the
/// other side (not to move). A value of `0` means that the chances
/// are equal. For example: a value of `100` might mean that the side
/// to move is a pawn ahead.
///
/// # Constants:
///
/// * Values with absolute value close to `MATE_SCORE` designate
///   forced checkmates. A mated position evaluates to
///   `-MATE_SCORE + remaining_depth`, so that quicker mates get more
///   extreme scores.
///
/// * `INF` is larger than any attainable evaluation, and is used as
///   the initial alpha-beta window.
pub type Value = i32;

pub const MATE_SCORE: Value = 100_000;
pub const INF: Value = 1_000_000;
