//! Implements `ZobristArrays`.

use crate::basetypes::{PIECE_NB, SQUARE_NB};

/// Tables for calculating Zobrist hashes.
///
/// Zobrist hashing is a technique to transform a board position into
/// a number of a fixed length, with an equal distribution over all
/// possible numbers, invented by Albert Zobrist. The key property of
/// this method is that two similar positions generate entirely
/// different hash numbers.
#[derive(Debug)]
pub struct ZobristArrays {
    /// Constants with which the hash value should be XOR-ed when a
    /// given piece on a given square appears/disappears.
    ///
    /// The table is indexed directly by `Piece`, so it has rows for
    /// all 15 piece encodings. Only the 12 real pieces ever
    /// participate in a hash.
    pub pieces: [[u64; SQUARE_NB]; PIECE_NB],
}

impl ZobristArrays {
    /// Creates and initializes a new instance.
    ///
    /// The random values are always generated from the same fixed
    /// seed, so the table is identical on every run. Tests and stored
    /// opening books depend on this determinism.
    fn new() -> ZobristArrays {
        let mut rng = Prng::new(ZOBRIST_SEED);
        let mut pieces = [[0; SQUARE_NB]; PIECE_NB];
        for piece in 0..PIECE_NB {
            for square in 0..SQUARE_NB {
                pieces[piece][square] = rng.rand64();
            }
        }
        ZobristArrays { pieces: pieces }
    }

    /// Returns a reference to an initialized `ZobristArrays` object.
    ///
    /// The object is created only during the first call. All next
    /// calls will return a reference to the same object. This is done
    /// in a thread-safe manner.
    pub fn get() -> &'static ZobristArrays {
        lazy_static! {
            static ref ARRAYS: ZobristArrays = ZobristArrays::new();
        }
        &ARRAYS
    }
}

/// The fixed seed for the Zobrist pseudo-random number generator.
const ZOBRIST_SEED: u64 = 70026072;

/// A xorshift-then-multiply pseudo-random number generator.
///
/// The state must be seeded with a nonzero value.
struct Prng {
    state: u64,
}

impl Prng {
    fn new(seed: u64) -> Prng {
        debug_assert!(seed != 0);
        Prng { state: seed }
    }

    fn rand64(&mut self) -> u64 {
        self.state ^= self.state >> 12;
        self.state ^= self.state << 25;
        self.state ^= self.state >> 27;
        self.state.wrapping_mul(2685821657736338717)
    }
}
