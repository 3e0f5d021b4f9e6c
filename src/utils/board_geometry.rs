//! Implements `BoardGeometry`.

use crate::basetypes::*;
use crate::bitsets::*;

/// Tables and methods useful for move generation and position
/// evaluation.
///
/// All tables are initialized once, before the first search, and are
/// read-only thereafter.
#[derive(Debug)]
pub struct BoardGeometry {
    /// Contains bitboards with the squares attacked by a knight from
    /// a given square.
    pub knight_attacks: [Bitboard; 64],

    /// Contains bitboards with the squares attacked by a king from a
    /// given square.
    pub king_attacks: [Bitboard; 64],

    /// Contains bitboards with the squares attacked by a pawn of a
    /// given color from a given square.
    ///
    /// # Examples:
    ///
    /// ```text
    /// g.pawn_attacks[WHITE][F6]
    /// . . . . . . . .
    /// . . . . 1 . 1 .
    /// . . . . . P . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// ```
    pub pawn_attacks: [[Bitboard; 64]; 2],

    /// Contains bitboards with the open squares lying strictly
    /// between two squares, for pairs that share a rank, file,
    /// diagonal, or anti-diagonal. For all other pairs the bitboard
    /// is zero.
    ///
    /// # Examples:
    ///
    /// ```text
    /// g.squares_between[B2][F6]
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . 1 . . .
    /// . . . 1 . . . .
    /// . . 1 . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// ```
    pub squares_between: [[Bitboard; 64]; 64],

    /// Contains bitboards with the entire line (rank, file, diagonal,
    /// or anti-diagonal) shared by two squares. For pairs that do not
    /// share a line the bitboard is zero.
    ///
    /// Used to clamp the destinations of pinned pieces.
    ///
    /// # Examples:
    ///
    /// ```text
    /// g.line_through[B2][F6]
    /// . . . . . . . 1
    /// . . . . . . 1 .
    /// . . . . . 1 . .
    /// . . . . 1 . . .
    /// . . . 1 . . . .
    /// . . 1 . . . . .
    /// . 1 . . . . . .
    /// 1 . . . . . . .
    /// ```
    pub line_through: [[Bitboard; 64]; 64],

    bishop_map: [AttacksMagic; 64],
    rook_map: [AttacksMagic; 64],
    slider_attacks: Vec<Bitboard>,
}

impl BoardGeometry {
    /// Creates and initializes a new instance.
    fn new() -> BoardGeometry {
        let mut bg = BoardGeometry {
            knight_attacks: [0; 64],
            king_attacks: [0; 64],
            pawn_attacks: [[0; 64]; 2],
            squares_between: [[0; 64]; 64],
            line_through: [[0; 64]; 64],
            bishop_map: [AttacksMagic::zeroed(); 64],
            rook_map: [AttacksMagic::zeroed(); 64],
            slider_attacks: Vec::with_capacity(SLIDER_ATTACKS_SIZE),
        };

        // Fill `bg.knight_attacks` and `bg.king_attacks`. The offset
        // lists are filtered with a Chebyshev-distance guard so that
        // jumps can not wrap around the board edge.
        let knight_offsets = [-17, -15, -10, -6, 6, 10, 15, 17];
        let king_offsets = [-9, -8, -7, -1, 1, 7, 8, 9];
        for a in 0..64 {
            for &offset in knight_offsets.iter() {
                let b = a as isize + offset;
                if b >= 0 && b < 64 && square_distance(a, b as Square) == 2 {
                    bg.knight_attacks[a] |= 1 << b;
                }
            }
            for &offset in king_offsets.iter() {
                let b = a as isize + offset;
                if b >= 0 && b < 64 && square_distance(a, b as Square) == 1 {
                    bg.king_attacks[a] |= 1 << b;
                }
            }
        }

        // Fill `bg.pawn_attacks`.
        for us in 0..2 {
            for a in 0..64 {
                bg.pawn_attacks[us][a] = bb_pawn_attacks(us, 1 << a);
            }
        }

        // Fill `bg.line_through`.
        for a in 0..64 {
            let lines = [bb_file(a), bb_rank(a), bb_diag(a), bb_anti_diag(a)];
            for b in a + 1..64 {
                for line in lines.iter() {
                    if *line & (1 << b) != 0 {
                        bg.line_through[a][b] = *line;
                        bg.line_through[b][a] = *line;
                        break;
                    }
                }
            }
        }

        // Fill `bg.squares_between`. A square lies strictly between
        // `a` and `b` exactly when a queen on `a` (with `b` as the
        // only blocker) and a queen on `b` (with `a` as the only
        // blocker) both attack it along their common line.
        for a in 0..64 {
            for b in 0..64 {
                let from_a = bb_rook_attacks(a, 1 << b) | bb_bishop_attacks(a, 1 << b);
                let from_b = bb_rook_attacks(b, 1 << a) | bb_bishop_attacks(b, 1 << a);
                bg.squares_between[a][b] = from_a & from_b & bg.line_through[a][b];
            }
        }

        // Initialize the magic attack tables.
        //
        // For every chess engine it is very important to be able to
        // very quickly find the attacking sets for all pieces, from
        // all possible origin squares, and all possible board
        // occupations. We use the "magic bitboards" technique to
        // access pre-calculated attacking sets of the sliding pieces
        // (bishop, rook, queen). The "magic bitboards" technique
        // consists of four steps:
        //
        // 1. Mask the relevant occupancy bits to form a key. For
        //    example if you had a rook on a1, the relevant occupancy
        //    bits will be from A2-A7 and B1-G1.
        //
        // 2. Multiply the key by a "magic number" to obtain an index
        //    mapping.
        //
        // 3. Right shift the index mapping by `64 - n` bits to create
        //    an index, where `n` is the number of bits in the mask.
        //
        // 4. Use the index to reference a preinitialized attacks
        //    database.
        bg.bishop_map = init_slider_map(BISHOP, &BISHOP_MAGICS, &mut bg.slider_attacks);
        bg.rook_map = init_slider_map(ROOK, &ROOK_MAGICS, &mut bg.slider_attacks);
        assert_eq!(bg.slider_attacks.len(), SLIDER_ATTACKS_SIZE);

        bg
    }

    /// Returns a reference to an initialized `BoardGeometry` object.
    ///
    /// The object is created only during the first call. All next
    /// calls will return a reference to the same object. This is done
    /// in a thread-safe manner.
    pub fn get() -> &'static BoardGeometry {
        lazy_static! {
            static ref GEOMETRY: BoardGeometry = BoardGeometry::new();
        }
        &GEOMETRY
    }

    /// Returns the set of squares that are attacked by a bishop from
    /// a given square, on a board occupied according to `occupied`.
    #[inline(always)]
    pub fn bishop_attacks(&self, from_square: Square, occupied: Bitboard) -> Bitboard {
        debug_assert!(from_square <= 63);
        let am = &self.bishop_map[from_square];
        self.slider_attacks[am.offset +
                            (am.magic.wrapping_mul(occupied & am.mask) >> am.shift) as usize]
    }

    /// Returns the set of squares that are attacked by a rook from a
    /// given square, on a board occupied according to `occupied`.
    #[inline(always)]
    pub fn rook_attacks(&self, from_square: Square, occupied: Bitboard) -> Bitboard {
        debug_assert!(from_square <= 63);
        let am = &self.rook_map[from_square];
        self.slider_attacks[am.offset +
                            (am.magic.wrapping_mul(occupied & am.mask) >> am.shift) as usize]
    }

    /// Returns the set of squares that are attacked by a queen from a
    /// given square, on a board occupied according to `occupied`.
    #[inline(always)]
    pub fn queen_attacks(&self, from_square: Square, occupied: Bitboard) -> Bitboard {
        self.bishop_attacks(from_square, occupied) | self.rook_attacks(from_square, occupied)
    }

    /// Returns the set of squares that are attacked by a piece from a
    /// given square.
    ///
    /// `piece_type` **must not** be `PAWN`.
    #[inline]
    pub fn attacks_from(&self,
                        piece_type: PieceType,
                        from_square: Square,
                        occupied: Bitboard)
                        -> Bitboard {
        debug_assert!(from_square <= 63);
        match piece_type {
            KNIGHT => self.knight_attacks[from_square],
            BISHOP => self.bishop_attacks(from_square, occupied),
            ROOK => self.rook_attacks(from_square, occupied),
            QUEEN => self.queen_attacks(from_square, occupied),
            KING => self.king_attacks[from_square],
            _ => panic!("invalid piece type"),
        }
    }
}

/// The total number of entries in the slider attack database.
const SLIDER_ATTACKS_SIZE: usize = 107648;

/// An object that for a particular slider (bishop or rook) at a
/// particular square, can "magically" find the corresponding attack
/// set, for all possible board occupations.
#[derive(Copy, Clone, Debug)]
struct AttacksMagic {
    offset: usize,
    mask: Bitboard,
    magic: u64,
    shift: u32,
}

impl AttacksMagic {
    const fn zeroed() -> AttacksMagic {
        AttacksMagic {
            offset: 0,
            mask: 0,
            magic: 0,
            shift: 0,
        }
    }
}

/// A helper function for `BoardGeometry::new`. It initializes the
/// look-up tables for a particular slider (bishop or rook).
fn init_slider_map(piece: PieceType,
                   magics: &[u64; 64],
                   slider_attacks: &mut Vec<Bitboard>)
                   -> [AttacksMagic; 64] {
    assert!(piece == BISHOP || piece == ROOK);
    let attacks: fn(Square, Bitboard) -> Bitboard = if piece == BISHOP {
        bb_bishop_attacks
    } else {
        bb_rook_attacks
    };
    let mut map = [AttacksMagic::zeroed(); 64];

    for (sq, entry) in map.iter_mut().enumerate() {
        let edges = ((BB_RANK_1 | BB_RANK_8) & !bb_rank(sq)) |
                    ((BB_FILE_A | BB_FILE_H) & !bb_file(sq));
        let mask = attacks(sq, 1 << sq) & !edges;
        let num_ones = mask.count_ones();
        let shift = 64 - num_ones;
        let magic = magics[sq];

        // Enumerate all relevant occupancies ("carry rippler"), and
        // fill the attack table through the magic index mapping,
        // verifying that the pre-calculated magic produces no harmful
        // collisions.
        let mut table = vec![0u64; 1 << num_ones];
        let mut occ: Bitboard = 0;
        loop {
            let reference = attacks(sq, occ | (1 << sq));
            let index = (magic.wrapping_mul(occ) >> shift) as usize;
            assert!(table[index] == 0 || table[index] == reference,
                    "precalculated magic is incorrect: square {}, {} magic",
                    sq,
                    if piece == BISHOP { "bishop" } else { "rook" });
            table[index] = reference;
            occ = occ.wrapping_sub(mask) & mask;
            if occ == 0 {
                // We have tried all relevant values for `occ`.
                break;
            }
        }

        *entry = AttacksMagic {
            offset: slider_attacks.len(),
            mask: mask,
            magic: magic,
            shift: shift,
        };
        slider_attacks.extend_from_slice(&table);
    }
    map
}

/// Pre-calculated bishop magic constants.
const BISHOP_MAGICS: [u64; 64] = [306397059236266368,
                                  6638343277122827280,
                                  10377420549504106496,
                                  9193021019258913,
                                  2306408226914042898,
                                  10379110636817760276,
                                  27167319028441088,
                                  7566153073497751552,
                                  1513227076520969216,
                                  301917653126479936,
                                  72075465430409232,
                                  2343002121441460228,
                                  36033212782477344,
                                  9223373154083475456,
                                  6935629192638251008,
                                  72621648200664064,
                                  2310506081245267984,
                                  2533291987569153,
                                  146934404644733024,
                                  1838417834950912,
                                  579856052833622016,
                                  1729946448243595776,
                                  705208029025040,
                                  2886877732040869888,
                                  10092575566416331020,
                                  5635409948247040,
                                  738739924278198804,
                                  4648849515743289408,
                                  9233786889293807616,
                                  1155253577929753088,
                                  435164712050360592,
                                  3026700562025580641,
                                  4612284839965491969,
                                  10448650511900137472,
                                  571823356120080,
                                  40569782189687936,
                                  148620986995048708,
                                  4901113822871308288,
                                  4612077461748908288,
                                  10204585674276944,
                                  2534512027246592,
                                  5766297627561820676,
                                  13809969191200768,
                                  1153062656578422784,
                                  9318235838682899712,
                                  11533824475839595776,
                                  433770548762247233,
                                  92326036501692936,
                                  9227053213059129360,
                                  577024872779350852,
                                  108087561569959936,
                                  582151826703646856,
                                  81404176367767,
                                  316415319130374273,
                                  9113856212762624,
                                  145453328103440392,
                                  441392350330618400,
                                  1126492748710916,
                                  2309220790581891072,
                                  3026423624667006980,
                                  18019391702696464,
                                  4516931289817600,
                                  1450317422841301124,
                                  9246488805123342592];

/// Pre-calculated rook magic constants.
const ROOK_MAGICS: [u64; 64] = [36028867955671040,
                                2395917338224361536,
                                936757656041832464,
                                648535942831284356,
                                36037595259731970,
                                13943151043426386048,
                                432349966580056576,
                                4683745813775001856,
                                1191624314978336800,
                                4611756662317916160,
                                4625338105090543616,
                                140806208356480,
                                1688987371057664,
                                9288708641522688,
                                153403870897537280,
                                281550411726850,
                                2401883155071024,
                                1206964838111645696,
                                166705754384925184,
                                36039792408011264,
                                10376580514281768960,
                                9148486532465664,
                                578787319189340418,
                                398007816633254020,
                                2341872150903791616,
                                2314850762536009728,
                                297238127310798880,
                                2251868801728768,
                                2594082183614301184,
                                820222482337235456,
                                37717655469424904,
                                577596144088011012,
                                1152991874030502016,
                                3171026856472219648,
                                20415869351890944,
                                4611844348286345472,
                                2455605323386324224,
                                140754676613632,
                                1740713828645089416,
                                58361257132164,
                                70370893791232,
                                9227880322828615684,
                                72092778695295040,
                                577023839834341392,
                                4723150143565660416,
                                563087661073408,
                                651083773116450,
                                72128789630550047,
                                153192758223054976,
                                869194865525653568,
                                4972009250306933248,
                                1031325449119138048,
                                1297041090863464576,
                                580401419157405824,
                                1657992643584,
                                306245066729521664,
                                15206439601351819394,
                                14143290885479661953,
                                1688988407201810,
                                18065251325837538,
                                1152927311403745429,
                                162411078742050817,
                                334255838724676,
                                27323018585852550];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basetypes::{BLACK, KING, KNIGHT, ROOK, WHITE};
    use crate::bitsets::*;
    use crate::squares::*;

    #[test]
    fn between_and_line() {
        let g = BoardGeometry::get();
        assert_eq!(g.line_through[B1][C3], 0);
        assert_eq!(g.line_through[B1][G1], 0b11111111);
        assert_eq!(g.line_through[G8][B8], 0b11111111 << 56);
        assert_eq!(g.squares_between[B1][C3], 0);
        assert_eq!(g.squares_between[B1][G1], 0b00111100);
        assert_eq!(g.squares_between[B2][F6], 1 << C3 | 1 << D4 | 1 << E5);
        assert_eq!(g.squares_between[F6][B2], 1 << C3 | 1 << D4 | 1 << E5);
        assert_eq!(g.squares_between[A1][A2], 0);
        assert_eq!(g.squares_between[D4][D4], 0);
        for a in 0..64 {
            for b in 0..64 {
                assert_eq!(g.squares_between[a][b], g.squares_between[b][a]);
                assert_eq!(g.squares_between[a][b] & (1 << a | 1 << b), 0);
                assert_eq!(g.squares_between[a][b] & !g.line_through[a][b], 0);
            }
        }
    }

    #[test]
    fn leaper_attacks() {
        let g = BoardGeometry::get();
        assert_eq!(g.knight_attacks[A1], 1 << B3 | 1 << C2);
        assert_eq!(g.king_attacks[A1], 1 << A2 | 1 << B1 | 1 << B2);
        assert_eq!(g.pawn_attacks[WHITE][A2], 1 << B3);
        assert_eq!(g.pawn_attacks[BLACK][H7], 1 << G6);
        for s in 0..64 {
            assert!(pop_count(g.king_attacks[s]) >= 3);
            assert!(pop_count(g.king_attacks[s]) <= 8);
            assert!(pop_count(g.knight_attacks[s]) >= 2);
            assert!(pop_count(g.knight_attacks[s]) <= 8);
        }
    }

    #[test]
    fn slider_attacks() {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let g = BoardGeometry::get();
        for square in 0..64 {
            let occupied = rng.gen::<u64>();
            let bishop_attacks = g.bishop_attacks(square, occupied);
            let rook_attacks = g.rook_attacks(square, occupied);
            let queen_attacks = g.queen_attacks(square, occupied);
            assert_eq!(bishop_attacks, bb_bishop_attacks(square, occupied));
            assert_eq!(rook_attacks, bb_rook_attacks(square, occupied));
            assert_eq!(bishop_attacks | rook_attacks, queen_attacks);
            assert_eq!(bishop_attacks & rook_attacks, 0);

            // The square's own occupancy must not matter.
            assert_eq!(g.rook_attacks(square, occupied | (1 << square)),
                       g.rook_attacks(square, occupied & !(1 << square)));
        }
        assert_eq!(g.rook_attacks(A1, 1 << A1), BB_FILE_A ^ BB_RANK_1);
        assert_eq!(g.attacks_from(ROOK, A1, 1 << A1), BB_FILE_A ^ BB_RANK_1);
        assert_eq!(g.attacks_from(KNIGHT, A1, 0), g.knight_attacks[A1]);
        assert_eq!(g.attacks_from(KING, E4, 0), g.king_attacks[E4]);
    }
}
