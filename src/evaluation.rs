//! Implements the static position evaluator.
//!
//! The evaluation is tapered: material, piece-square tables,
//! mobility, king attacks, pawn structure and king safety are scored
//! for the middlegame and the endgame separately, and the two scores
//! are blended according to the game phase. Positions with little
//! material left take a specialized endgame path instead.

use std::cmp::min;
use std::ops::{Add, AddAssign, Sub};
use crate::basetypes::*;
use crate::bitsets::*;
use crate::board::Position;
use crate::files::file;
use crate::pst::{EG_PST, MG_PST};
use crate::ranks::{rank, RANK_2, RANK_7};
use crate::squares::*;
use crate::value::Value;

/// The material value of each piece type, in centipawns.
pub const PIECE_VALUES: [Value; 6] = [100, 300, 300, 500, 900, 0];

// Tempo bonuses for the side to move.
const MG_TEMPO: Value = 10;
const EG_TEMPO: Value = 5;

// Pair bonuses / penalties.
const BISHOP_PAIR: Value = 30;
const P_KNIGHT_PAIR: Value = 10;
const P_ROOK_PAIR: Value = 20;

// Game-phase weights per piece type. The maximum phase (all minor
// and major pieces on the board) is 24.
const PHASE_WEIGHTS: [Value; 6] = [0, 1, 1, 2, 4, 0];
const MAX_PHASE: Value = 24;

// Below this much total non-king material the specialized endgame
// evaluation takes over.
const ENDGAME_MATERIAL_LIMIT: Value = 1500;

// A small nudge for the side that does not have to move in a
// pawnless king endgame with the kings in opposition.
const ZUGZWANG_NUDGE: Value = 10;

/// A middlegame/endgame score pair.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
struct Score {
    mg: Value,
    eg: Value,
}

impl Score {
    fn new(mg: Value, eg: Value) -> Score {
        Score { mg: mg, eg: eg }
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score::new(self.mg + other.mg, self.eg + other.eg)
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, other: Score) {
        self.mg += other.mg;
        self.eg += other.eg;
    }
}

impl Sub for Score {
    type Output = Score;

    fn sub(self, other: Score) -> Score {
        Score::new(self.mg - other.mg, self.eg - other.eg)
    }
}

/// Returns the game phase, from 0 (deep endgame) to 24 (all minor
/// and major pieces still on the board).
pub fn game_phase(position: &Position) -> Value {
    let mut phase = 0;
    for piece_type in KNIGHT..KING {
        let pieces = position.bitboard_of(WHITE, piece_type) |
                     position.bitboard_of(BLACK, piece_type);
        phase += PHASE_WEIGHTS[piece_type] * pop_count(pieces) as Value;
    }
    min(phase, MAX_PHASE)
}

/// Statically evaluates the position.
///
/// Returns the evaluation in centipawns from the side to move's
/// perspective: positive numbers favor the side that has the move.
pub fn evaluate(position: &Position) -> Value {
    let perspective = if position.side_to_move() == WHITE { 1 } else { -1 };

    let queens = position.bitboard_of(WHITE, QUEEN) | position.bitboard_of(BLACK, QUEEN);
    if queens == 0 || non_king_material(position) < ENDGAME_MATERIAL_LIMIT {
        return evaluate_endgame(position) * perspective;
    }

    let phase = game_phase(position);
    let mut white = evaluate_color(position, WHITE);
    let mut black = evaluate_color(position, BLACK);
    if position.side_to_move() == WHITE {
        white += Score::new(MG_TEMPO, EG_TEMPO);
    } else {
        black += Score::new(MG_TEMPO, EG_TEMPO);
    }

    let total = white - black;
    let blended = (total.mg * phase + total.eg * (MAX_PHASE - phase)) / MAX_PHASE;
    blended * perspective
}

/// The specialized evaluation for positions with little material
/// left. Returns a white-perspective score.
///
/// On top of the standard per-color sums, the kings are pulled toward
/// the center, and a pawnless position with the kings an even number
/// of files apart gets a small nudge when Black has to prove the
/// opposition.
fn evaluate_endgame(position: &Position) -> Value {
    let white = evaluate_color(position, WHITE);
    let black = evaluate_color(position, BLACK);
    let mut score = white.eg - black.eg;
    score += if position.side_to_move() == WHITE {
        EG_TEMPO
    } else {
        -EG_TEMPO
    };

    let white_king = position.king_square(WHITE);
    let black_king = position.king_square(BLACK);
    score += (center_distance(black_king) - center_distance(white_king)) * 10;

    let pawns = position.bitboard_of(WHITE, PAWN) | position.bitboard_of(BLACK, PAWN);
    if pawns == 0 {
        let file_diff = (file(white_king) as Value - file(black_king) as Value).abs();
        if file_diff % 2 == 0 && position.side_to_move() == BLACK {
            score += ZUGZWANG_NUDGE;
        }
    }
    score
}

/// Sums all evaluation terms for one color.
fn evaluate_color(position: &Position, color: Color) -> Score {
    let mut score = Score::default();
    let material = count_material(position, color);
    score += Score::new(material, material);
    score += eval_pawns(position, color);
    score += eval_knights(position, color);
    score += eval_bishops(position, color);
    score += eval_rooks(position, color);
    score += eval_queens(position, color);
    score += king_safety(position, color);
    score
}

/// Returns the total material of one color, kings excluded.
fn count_material(position: &Position, color: Color) -> Value {
    let mut material = 0;
    for piece_type in PAWN..KING {
        material += PIECE_VALUES[piece_type] *
                    pop_count(position.bitboard_of(color, piece_type)) as Value;
    }
    material
}

fn non_king_material(position: &Position) -> Value {
    count_material(position, WHITE) + count_material(position, BLACK)
}

/// Looks up the piece-square tables for one piece.
#[inline]
fn pst(piece_type: PieceType, color: Color, s: Square) -> Score {
    let index = if color == WHITE { s } else { s ^ 56 };
    Score::new(MG_PST[piece_type][index], EG_PST[piece_type][index])
}

fn eval_pawns(position: &Position, color: Color) -> Score {
    let mut score = Score::default();
    let mut pawns = position.bitboard_of(color, PAWN);
    while pawns != 0 {
        let s = bsf_reset(&mut pawns);
        score += pst(PAWN, color, s);
    }
    score += pawn_structure(position, color);
    score
}

/// Scores doubled, isolated and passed pawns.
fn pawn_structure(position: &Position, color: Color) -> Score {
    let mut score = Score::default();
    let own = position.bitboard_of(color, PAWN);
    let enemy = position.bitboard_of(1 ^ color, PAWN);

    for f in 0..8 {
        let n = pop_count(own & BB_MASK_FILE[f]) as Value;
        if n > 1 {
            score += Score::new(-10 * (n - 1), -20 * (n - 1));
        }
    }

    let mut b = own;
    while b != 0 {
        let s = bsf_reset(&mut b);
        if adjacent_files(file(s)) & own == 0 {
            score += Score::new(-20, -10);
        }
        if front_span(color, s) & enemy == 0 {
            // The bonus grows quadratically with the distance the
            // pawn has travelled from its starting rank.
            let r = if color == WHITE {
                rank(s) as Value - 1
            } else {
                6 - rank(s) as Value
            };
            score += Score::new(10 * (r + 1) * (r + 1), 20 * (r + 1) * (r + 1));
        }
    }
    score
}

fn eval_knights(position: &Position, color: Color) -> Score {
    let g = position.geometry;
    let mut score = Score::default();
    let knights = position.bitboard_of(color, KNIGHT);
    if pop_count(knights) > 1 {
        score += Score::new(-P_KNIGHT_PAIR, -P_KNIGHT_PAIR);
    }

    let friendly = position.all_pieces(color);
    let enemy_king_ring = g.king_attacks[position.king_square(1 ^ color)];
    let mut mobility = 0;
    let mut king_attack = 0;
    let mut b = knights;
    while b != 0 {
        let s = bsf_reset(&mut b);
        score += pst(KNIGHT, color, s);
        let reachable = g.knight_attacks[s] & !friendly;
        mobility += pop_count(reachable) as Value;
        king_attack += pop_count(reachable & enemy_king_ring) as Value;
    }

    score += Score::new(4 * (mobility - 4), 6 * (mobility - 4));
    score += Score::new(2 * king_attack, 2 * king_attack);
    score
}

fn eval_bishops(position: &Position, color: Color) -> Score {
    let g = position.geometry;
    let mut score = Score::default();
    let bishops = position.bitboard_of(color, BISHOP);
    if pop_count(bishops) > 1 {
        score += Score::new(BISHOP_PAIR, BISHOP_PAIR);
    }

    let occupied = position.occupied();
    let friendly = position.all_pieces(color);
    let enemy_king_ring = g.king_attacks[position.king_square(1 ^ color)];
    let mut mobility = 0;
    let mut king_attack = 0;
    let mut b = bishops;
    while b != 0 {
        let s = bsf_reset(&mut b);
        score += pst(BISHOP, color, s);
        let reachable = g.bishop_attacks(s, occupied) & !friendly;
        mobility += pop_count(reachable) as Value;
        king_attack += pop_count(reachable & enemy_king_ring) as Value;
    }

    score += Score::new(3 * (mobility - 7), 3 * (mobility - 7));
    score += Score::new(2 * king_attack, 2 * king_attack);
    score
}

fn eval_rooks(position: &Position, color: Color) -> Score {
    let g = position.geometry;
    let mut score = Score::default();
    let rooks = position.bitboard_of(color, ROOK);
    if pop_count(rooks) > 1 {
        score += Score::new(-P_ROOK_PAIR, -P_ROOK_PAIR);
    }

    let occupied = position.occupied();
    let friendly = position.all_pieces(color);
    let enemy_king_ring = g.king_attacks[position.king_square(1 ^ color)];
    let mut mobility = 0;
    let mut king_attack = 0;
    let mut b = rooks;
    while b != 0 {
        let s = bsf_reset(&mut b);
        score += pst(ROOK, color, s);
        let reachable = g.rook_attacks(s, occupied) & !friendly;
        mobility += pop_count(reachable) as Value;
        king_attack += pop_count(reachable & enemy_king_ring) as Value;
    }

    score += Score::new(2 * (mobility - 7), 4 * (mobility - 7));
    score += Score::new(3 * king_attack, 3 * king_attack);
    score
}

fn eval_queens(position: &Position, color: Color) -> Score {
    let g = position.geometry;
    let mut score = Score::default();

    let occupied = position.occupied();
    let friendly = position.all_pieces(color);
    let enemy_king_ring = g.king_attacks[position.king_square(1 ^ color)];
    let mut mobility = 0;
    let mut king_attack = 0;
    let mut b = position.bitboard_of(color, QUEEN);
    while b != 0 {
        let s = bsf_reset(&mut b);
        score += pst(QUEEN, color, s);

        // A queen should not be developed before the minor pieces:
        // while they still sit on their home squares, a queen that
        // has left her back two ranks pays a small toll for each of
        // them.
        let undeveloped: &[(Square, Piece)] = if color == WHITE {
            &[(B1, WHITE_KNIGHT), (C1, WHITE_BISHOP), (F1, WHITE_BISHOP), (G1, WHITE_KNIGHT)]
        } else {
            &[(B8, BLACK_KNIGHT), (C8, BLACK_BISHOP), (F8, BLACK_BISHOP), (G8, BLACK_KNIGHT)]
        };
        let queen_is_out = if color == WHITE {
            rank(s) > RANK_2
        } else {
            rank(s) < RANK_7
        };
        if queen_is_out {
            for &(home, piece) in undeveloped {
                if position.piece_on(home) == piece {
                    score += Score::new(-2, -2);
                }
            }
        }

        let reachable = g.queen_attacks(s, occupied) & !friendly;
        mobility += pop_count(reachable) as Value;
        king_attack += pop_count(reachable & enemy_king_ring) as Value;
    }

    score += Score::new(mobility - 14, 2 * (mobility - 14));
    score += Score::new(4 * king_attack, 4 * king_attack);
    score
}

/// Scores the pawn shelter around the king and the pressure the enemy
/// pieces put on its immediate surroundings.
fn king_safety(position: &Position, color: Color) -> Score {
    let g = position.geometry;
    let mut score = Score::default();
    let king_sq = position.king_square(color);
    score += pst(KING, color, king_sq);

    let ring = g.king_attacks[king_sq];
    score.mg += 10 * pop_count(ring & position.bitboard_of(color, PAWN)) as Value;

    let occupied = position.occupied();
    let them = 1 ^ color;
    let mut threat = 0;
    let mut b = position.bitboard_of(them, KNIGHT);
    while b != 0 {
        if g.knight_attacks[bsf_reset(&mut b)] & ring != 0 {
            threat += 20;
        }
    }
    let mut b = position.bitboard_of(them, BISHOP);
    while b != 0 {
        if g.bishop_attacks(bsf_reset(&mut b), occupied) & ring != 0 {
            threat += 20;
        }
    }
    let mut b = position.bitboard_of(them, ROOK);
    while b != 0 {
        if g.rook_attacks(bsf_reset(&mut b), occupied) & ring != 0 {
            threat += 40;
        }
    }
    let mut b = position.bitboard_of(them, QUEEN);
    while b != 0 {
        if g.queen_attacks(bsf_reset(&mut b), occupied) & ring != 0 {
            threat += 80;
        }
    }
    score.mg -= threat * threat / 50;
    score
}

/// Returns how far a square is from the four center squares
/// (file distance plus rank distance).
fn center_distance(s: Square) -> Value {
    let f = file(s) as Value;
    let r = rank(s) as Value;
    let fd = if f <= 3 { 3 - f } else { f - 4 };
    let rd = if r <= 3 { 3 - r } else { r - 4 };
    fd + rd
}

/// Returns the set of files adjacent to a file.
fn adjacent_files(f: usize) -> Bitboard {
    let mut mask = 0;
    if f > 0 {
        mask |= BB_MASK_FILE[f - 1];
    }
    if f < 7 {
        mask |= BB_MASK_FILE[f + 1];
    }
    mask
}

/// Returns the squares ahead of a pawn (from its color's point of
/// view) on its own file and the two adjacent files.
fn front_span(color: Color, s: Square) -> Bitboard {
    let files = bb_file(s) | adjacent_files(file(s));
    let ahead = if color == WHITE {
        BB_UNIVERSAL_SET << (8 * (rank(s) + 1))
    } else {
        (1u64 << (8 * rank(s))) - 1
    };
    files & ahead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basetypes::WHITE;
    use crate::board::{Position, START_FEN};

    #[test]
    fn starting_position_is_tempo_only() {
        let p = Position::from_fen(START_FEN).unwrap();
        assert_eq!(game_phase(&p), 24);
        // All terms cancel between the two sides, except the tempo
        // bonus for the side to move.
        assert_eq!(evaluate(&p), MG_TEMPO);
    }

    #[test]
    fn tempo_goes_to_the_side_to_move() {
        let w = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let b = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(evaluate(&w), EG_TEMPO);
        // With Black to move the tempo flips sign; the pawnless
        // opposition nudge (for White) partially offsets it. From
        // Black's perspective: -(-5 + 10) = -5.
        assert_eq!(evaluate(&b), -EG_TEMPO);
    }

    #[test]
    fn material_advantage_dominates() {
        let p = Position::from_fen("k7/8/8/8/8/8/8/QK6 w - - 0 1").unwrap();
        assert!(evaluate(&p) > 500);
        let p = Position::from_fen("k7/8/8/8/8/8/8/QK6 b - - 0 1").unwrap();
        assert!(evaluate(&p) < -500);
    }

    #[test]
    fn evaluation_is_bounded() {
        let fens = [START_FEN,
                    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
                    "k7/8/8/8/8/8/8/QK6 w - - 0 1"];
        for fen in fens.iter() {
            let p = Position::from_fen(fen).unwrap();
            let v = evaluate(&p);
            assert!(v.abs() < crate::value::INF);
        }
    }

    #[test]
    fn pawn_structure_terms() {
        // Doubled isolated pawns against a single isolated pawn, with
        // an enemy pawn in front so no passed-pawn bonus interferes.
        let doubled = pawn_structure(&Position::from_fen("k7/p7/8/8/8/P7/P7/K7 w - - 0 1")
                                         .unwrap(),
                                     WHITE);
        let single = pawn_structure(&Position::from_fen("k7/p7/8/8/8/8/P7/K7 w - - 0 1").unwrap(),
                                    WHITE);
        assert_eq!(single, Score::new(-20, -10));
        assert_eq!(doubled, Score::new(-10 - 2 * 20, -20 - 2 * 10));

        // Two connected pawns held by enemy pawns are neither
        // isolated, nor doubled, nor passed.
        let sound = pawn_structure(&Position::from_fen("k7/pp6/8/8/8/8/PP6/K7 w - - 0 1")
                                       .unwrap(),
                                   WHITE);
        assert_eq!(sound, Score::default());
    }

    #[test]
    fn passed_pawn_bonus_grows_with_rank() {
        let near = Position::from_fen("k7/8/8/8/8/8/P7/1K6 w - - 0 1").unwrap();
        let far = Position::from_fen("k7/P7/8/8/8/8/8/1K6 w - - 0 1").unwrap();
        let near_score = pawn_structure(&near, WHITE);
        let far_score = pawn_structure(&far, WHITE);
        assert!(far_score.mg > near_score.mg);
        assert!(far_score.eg > near_score.eg);
        assert_eq!(far_score.eg - near_score.eg, 20 * 36 - 20);
    }

    #[test]
    fn game_phase_shrinks_with_material() {
        let p = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&p), 0);
        let p = Position::from_fen("4k3/8/8/8/8/8/8/Q3K3 w - - 0 1").unwrap();
        assert_eq!(game_phase(&p), 4);
    }
}
