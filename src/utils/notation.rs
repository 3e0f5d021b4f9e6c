//! Implements helpers for reading and writing algebraic notation.

use regex::Regex;
use crate::basetypes::Square;
use crate::files::file;
use crate::ranks::rank;

/// Returns the algebraic notation for a given square.
pub fn notation(square: Square) -> &'static str {
    lazy_static! {
        static ref NOTATION: Vec<String> = (0..64).map(|i| format!("{}{}",
            ["a", "b", "c", "d", "e", "f", "g", "h"][file(i)],
            ["1", "2", "3", "4", "5", "6", "7", "8"][rank(i)])
        ).collect();
    }
    NOTATION[square].as_str()
}

/// Parses square's algebraic notation (lowercase only).
pub fn parse_square(s: &str) -> Option<Square> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^[a-h][1-8]$").unwrap();
    }
    if RE.is_match(s) {
        let mut chars = s.chars();
        let file = (chars.next().unwrap().to_digit(18).unwrap() - 10) as usize;
        let rank = (chars.next().unwrap().to_digit(9).unwrap() - 1) as usize;
        Some(crate::basetypes::square(file, rank))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squares::*;

    #[test]
    fn square_notation() {
        assert_eq!(notation(A1), "a1");
        assert_eq!(notation(H8), "h8");
        assert_eq!(notation(E4), "e4");
        for s in 0..64 {
            assert_eq!(parse_square(notation(s)), Some(s));
        }
        assert_eq!(parse_square("e9"), None);
        assert_eq!(parse_square("i1"), None);
        assert_eq!(parse_square("E4"), None);
        assert_eq!(parse_square("e44"), None);
    }
}
