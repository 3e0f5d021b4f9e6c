//! Implements the transposition table.

use crate::depth::Depth;
use crate::moves::Move;
use crate::value::Value;

/// `BOUND_EXACT`, `BOUND_LOWER`, or `BOUND_UPPER`.
pub type BoundType = u8;

/// The stored value is exact.
pub const BOUND_EXACT: BoundType = 1;

/// The stored value is a lower bound (the search failed high).
pub const BOUND_LOWER: BoundType = 2;

/// The stored value is an upper bound (the search failed low).
pub const BOUND_UPPER: BoundType = 3;

/// A record in the transposition table.
#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    /// The full Zobrist key of the stored position.
    pub key: u64,

    /// The stored evaluation.
    pub value: Value,

    /// The depth to which the stored position was searched.
    pub depth: Depth,

    /// How the stored value relates to the true evaluation.
    pub bound: BoundType,

    /// The best move found, or `Move::invalid()` if none was.
    pub best_move: Move,
}

/// A hash-keyed cache of previously searched positions.
///
/// The table remembers the score, the searched depth, the bound type,
/// and the best move of old searches, keyed by the position hash. It
/// uses an overwrite-always replacement scheme: a store to an
/// occupied slot simply replaces the old record.
pub struct Tt {
    entries: Vec<Option<TtEntry>>,
    mask: usize,
}

impl Tt {
    /// Creates a new transposition table of (at most) the given size
    /// in megabytes.
    pub fn new(size_mb: usize) -> Tt {
        use std::mem::size_of;
        // Keep the number of slots a power of two, so probing is a
        // mask instead of a division.
        let max_slots = size_mb.max(1) * 1024 * 1024 / size_of::<Option<TtEntry>>();
        let slots = 1 << (63 - (max_slots as u64).leading_zeros());
        Tt {
            entries: vec![None; slots],
            mask: slots - 1,
        }
    }

    /// Stores a record for the given key.
    #[inline]
    pub fn store(&mut self, key: u64, value: Value, depth: Depth, bound: BoundType, best_move: Move) {
        self.entries[key as usize & self.mask] = Some(TtEntry {
            key: key,
            value: value,
            depth: depth,
            bound: bound,
            best_move: best_move,
        });
    }

    /// Returns the record stored for the given key, if any.
    #[inline]
    pub fn probe(&self, key: u64) -> Option<TtEntry> {
        match self.entries[key as usize & self.mask] {
            Some(entry) if entry.key == key => Some(entry),
            _ => None,
        }
    }

    /// Forgets all stored records.
    pub fn clear(&mut self) {
        for slot in self.entries.iter_mut() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MF_QUIET;

    #[test]
    fn store_and_probe() {
        let mut tt = Tt::new(1);
        assert!(tt.probe(42).is_none());
        let m = Move::new(12, 28, MF_QUIET);
        tt.store(42, 100, 5, BOUND_EXACT, m);
        let entry = tt.probe(42).unwrap();
        assert_eq!(entry.value, 100);
        assert_eq!(entry.depth, 5);
        assert_eq!(entry.bound, BOUND_EXACT);
        assert_eq!(entry.best_move, m);

        // A colliding key with a different full hash must not match.
        let colliding = 42 + (tt.mask as u64 + 1);
        assert!(tt.probe(colliding).is_none());

        // Overwrite-always replacement.
        tt.store(colliding, -7, 1, BOUND_UPPER, Move::invalid());
        assert!(tt.probe(42).is_none());
        assert_eq!(tt.probe(colliding).unwrap().value, -7);

        tt.clear();
        assert!(tt.probe(colliding).is_none());
    }
}
