//! Implements the opening book.
//!
//! The book maps position hashes to weighted move recommendations. On
//! disk it is a sequence of sorted 16-byte big-endian records; a
//! plain-text fallback format (`<hex-key> <move> <weight>` per line)
//! is accepted too. A missing book file is not an error -- the engine
//! simply plays without a book.

use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use rand::Rng;
use regex::Regex;
use crate::basetypes::KNIGHT;
use crate::board::Position;
use crate::moves::Move;
use crate::utils::notation::parse_square;
use crate::utils::MoveList;

/// A single opening-book record.
///
/// The packed move is laid out with the destination square in bits
/// 0..5, the origin square in bits 6..11, and the promotion piece in
/// bits 12..14 (0 none, 1 knight, 2 bishop, 3 rook, 4 queen).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BookEntry {
    pub key: u64,
    pub packed_move: u16,
    pub weight: u16,
}

/// A store of weighted opening moves, keyed by position hash.
pub struct OpeningBook {
    entries: Vec<BookEntry>,
}

impl OpeningBook {
    /// Reads an opening book from a file, accepting either the binary
    /// or the text format.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<OpeningBook> {
        let mut data = Vec::new();
        File::open(path)?.read_to_end(&mut data)?;
        match std::str::from_utf8(&data) {
            Ok(text) if looks_like_text(text) => OpeningBook::from_text(text),
            _ => OpeningBook::from_bytes(&data),
        }
    }

    /// Parses the binary book format: 16-byte records of an 8-byte
    /// big-endian key, a 2-byte packed move, a 2-byte weight, and 4
    /// reserved bytes.
    pub fn from_bytes(data: &[u8]) -> io::Result<OpeningBook> {
        if data.len() % 16 != 0 {
            return Err(invalid_data("truncated opening book record"));
        }
        let mut entries = Vec::with_capacity(data.len() / 16);
        for record in data.chunks(16) {
            entries.push(BookEntry {
                key: u64::from_be_bytes(record[0..8].try_into().unwrap()),
                packed_move: u16::from_be_bytes(record[8..10].try_into().unwrap()),
                weight: u16::from_be_bytes(record[10..12].try_into().unwrap()),
            });
        }
        Ok(OpeningBook::from_entries(entries))
    }

    /// Parses the text book format: one `<hex-key> <move> <weight>`
    /// entry per line. The weight may be omitted (it defaults to 1);
    /// blank lines and `#` comments are skipped.
    pub fn from_text(text: &str) -> io::Result<OpeningBook> {
        let mut entries = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            let bad_line = || invalid_data(format!("bad opening book entry at line {}",
                                                   line_no + 1));
            let key = fields.next()
                .and_then(|s| u64::from_str_radix(s, 16).ok())
                .ok_or_else(bad_line)?;
            let packed_move = fields.next()
                .and_then(parse_move_text)
                .ok_or_else(bad_line)?;
            let weight = match fields.next() {
                Some(s) => s.parse::<u16>().map_err(|_| bad_line())?,
                None => 1,
            };
            entries.push(BookEntry {
                key: key,
                packed_move: packed_move,
                weight: weight,
            });
        }
        Ok(OpeningBook::from_entries(entries))
    }

    fn from_entries(mut entries: Vec<BookEntry>) -> OpeningBook {
        // The records are kept sorted by key, so that probing is a
        // binary search.
        entries.sort_by_key(|e| (e.key, e.packed_move));
        OpeningBook { entries: entries }
    }

    /// Returns the number of records in the book.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the book holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all recommendations stored for a given position hash.
    pub fn probe(&self, key: u64) -> &[BookEntry] {
        let start = self.entries.partition_point(|e| e.key < key);
        let count = self.entries[start..].partition_point(|e| e.key == key);
        &self.entries[start..start + count]
    }

    /// Picks a book move for the given position, weighted at random
    /// among all matching recommendations.
    ///
    /// Only moves that are legal in the position are playable;
    /// `None` is returned when the book has nothing useful.
    pub fn pick<R: Rng>(&self, position: &Position, rng: &mut R) -> Option<Move> {
        let entries = self.probe(position.hash());
        if entries.is_empty() {
            return None;
        }
        let total: u64 = entries.iter().map(|e| e.weight.max(1) as u64).sum();
        let mut draw = rng.gen_range(0..total);
        for entry in entries {
            let weight = entry.weight.max(1) as u64;
            if draw < weight {
                return find_legal(position, entry.packed_move);
            }
            draw -= weight;
        }
        None
    }
}

/// A helper function. It matches a packed book move against the legal
/// moves of a position.
fn find_legal(position: &Position, packed: u16) -> Option<Move> {
    let to = (packed & 0x3f) as usize;
    let from = (packed >> 6 & 0x3f) as usize;
    let promotion = (packed >> 12 & 0x7) as usize;
    let mut list = MoveList::new();
    position.generate_moves(&mut list);
    list.iter().cloned().find(|m| {
        m.orig_square() == from && m.dest_square() == to &&
        if promotion == 0 {
            !m.is_promotion()
        } else {
            m.is_promotion() && m.promotion() == KNIGHT + promotion - 1
        }
    })
}

/// A helper function. It packs a move in pure long algebraic notation
/// ("e2e4", "e7e8q") into the book's move encoding.
fn parse_move_text(s: &str) -> Option<u16> {
    if s.len() < 4 || s.len() > 5 || !s.is_ascii() {
        return None;
    }
    let from = parse_square(&s[0..2])?;
    let to = parse_square(&s[2..4])?;
    let promotion: u16 = match &s[4..] {
        "" => 0,
        "n" => 1,
        "b" => 2,
        "r" => 3,
        "q" => 4,
        _ => return None,
    };
    Some(to as u16 | (from as u16) << 6 | promotion << 12)
}

/// A helper function for `OpeningBook::open`. It decides if the file
/// content is in the text format.
fn looks_like_text(text: &str) -> bool {
    lazy_static! {
        static ref RE: Regex =
            Regex::new(r"^[0-9a-fA-F]+\s+[a-h][1-8][a-h][1-8][nbrq]?(\s+\d+)?$").unwrap();
    }
    text.lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .map_or(false, |line| RE.is_match(line))
}

fn invalid_data<E>(error: E) -> io::Error
    where E: Into<Box<dyn std::error::Error + Send + Sync>>
{
    io::Error::new(ErrorKind::InvalidData, error)
}
