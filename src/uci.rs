//! This module handles the "Universal Chess Interface" protocol
//! communication.
//!
//! Only the thin command set the engine needs is spoken: `uci`,
//! `isready`, `position`, `go` (with `depth` or `movetime`), and
//! `quit`. Unrecognized input is ignored, as the protocol requires.

use regex::Regex;
use std::io::{self, BufRead, Write};
use crate::board::Position;
use crate::book::OpeningBook;
use crate::depth::Depth;
use crate::search::{Engine, SearchLimits};

const NAME: &str = "Lysander";
const AUTHOR: &str = "Evgeni Pandurski";

/// The search depth used when `go` gives no limits at all.
const DEFAULT_DEPTH: Depth = 6;

/// The book files probed at startup. A missing book is expected and
/// silent.
const BOOK_FILES: [&str; 2] = ["book.bin", "book.txt"];

/// A command from the GUI to the engine.
enum UciCommand {
    Uci,
    IsReady,
    Position(PositionParams),
    Go(GoParams),
    Quit,
}

/// Parameters for `UciCommand::Position`.
struct PositionParams {
    fen: String,
    moves: Vec<String>,
}

/// Parameters for `UciCommand::Go`.
struct GoParams {
    depth: Option<Depth>,
    movetime: Option<u64>,
}

#[derive(Debug)]
struct ParseError;

/// The main UCI serving loop.
///
/// Reads commands from the standard input and writes responses to the
/// standard output until `quit` (or end of input) is received.
pub fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut writer = stdout.lock();

    let mut engine = Engine::new(16);
    for path in BOOK_FILES {
        if let Ok(book) = OpeningBook::open(path) {
            engine.set_book(book);
            break;
        }
    }
    let mut position = Position::startpos();

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_uci_command(&line) {
            Ok(UciCommand::Uci) => {
                writeln!(writer, "id name {} {}", NAME, env!("CARGO_PKG_VERSION"))?;
                writeln!(writer, "id author {}", AUTHOR)?;
                writeln!(writer, "uciok")?;
                writer.flush()?;
            }
            Ok(UciCommand::IsReady) => {
                writeln!(writer, "readyok")?;
                writer.flush()?;
            }
            Ok(UciCommand::Position(params)) => {
                match Position::from_history(&params.fen,
                                             params.moves.iter().map(|s| s.as_str())) {
                    Ok(p) => position = p,
                    // The old position stays in place on a bad setup.
                    Err(e) => eprintln!("{}: {}", e, line.trim()),
                }
            }
            Ok(UciCommand::Go(params)) => {
                let limits = match (params.depth, params.movetime) {
                    (_, Some(milliseconds)) => SearchLimits::movetime(milliseconds),
                    (Some(depth), None) => SearchLimits::depth(depth),
                    (None, None) => SearchLimits::depth(DEFAULT_DEPTH),
                };
                match engine.best_move(&mut position, limits) {
                    Some(m) => writeln!(writer, "bestmove {}", m)?,
                    None => writeln!(writer, "bestmove 0000")?,
                }
                writer.flush()?;
            }
            Ok(UciCommand::Quit) => break,
            Err(_) => (),
        }
    }
    Ok(())
}

/// Tries to interpret a string as a UCI command.
fn parse_uci_command(s: &str) -> Result<UciCommand, ParseError> {
    lazy_static! {
        static ref RE: Regex = Regex::new(
            r"\b(uci|isready|position|go|quit)(?:\s+(.*)|$)").unwrap();
    }
    if let Some(captures) = RE.captures(s) {
        let command_str = captures.get(1).map_or("", |m| m.as_str());
        let params_str = captures.get(2).map_or("", |m| m.as_str());
        match command_str {
            "uci" => Ok(UciCommand::Uci),
            "isready" => Ok(UciCommand::IsReady),
            "quit" => Ok(UciCommand::Quit),
            "position" => Ok(UciCommand::Position(parse_position_params(params_str)?)),
            "go" => Ok(UciCommand::Go(parse_go_params(params_str))),
            _ => Err(ParseError),
        }
    } else {
        Err(ParseError)
    }
}

// A helper function for `parse_uci_command`. It parses parameters for
// the "position" command.
fn parse_position_params(s: &str) -> Result<PositionParams, ParseError> {
    lazy_static! {
        static ref RE: Regex = Regex::new(
            format!(
                r"^(?:fen\s+(?P<fen>{})|startpos)(?:\s+moves(?P<moves>{}))?\s*$",
                r"[1-8KQRBNPkqrbnp/]+(?:\s+[wb](?:\s+(?:[KQkq]{1,4}|-)(?:\s+(?:[a-h][1-8]|-)(?:\s+\d+(?:\s+\d+)?)?)?)?)?",
                r"(?:\s+[a-h][1-8][a-h][1-8][qrbn]?)*",  // a possibly empty list of moves
            ).as_str()
        ).unwrap();
    }
    if let Some(captures) = RE.captures(s) {
        Ok(PositionParams {
            fen: if let Some(fen) = captures.name("fen") {
                fen.as_str().to_string()
            } else {
                crate::board::START_FEN.to_string()
            },
            moves: captures.name("moves")
                .map_or("", |m| m.as_str())
                .split_whitespace()
                .map(|x| x.to_string())
                .collect(),
        })
    } else {
        Err(ParseError)
    }
}

// A helper function for `parse_uci_command`. It parses parameters for
// the "go" command. Unknown keywords are ignored.
fn parse_go_params(s: &str) -> GoParams {
    lazy_static! {
        static ref RE: Regex = Regex::new(
            r"\b(?P<keyword>depth|movetime)\s+(?P<number>\d+)(?:\s+|$)").unwrap();
    }
    let mut params = GoParams {
        depth: None,
        movetime: None,
    };
    for captures in RE.captures_iter(s) {
        let number = captures.name("number").and_then(|m| m.as_str().parse::<u64>().ok());
        match captures.name("keyword").map_or("", |m| m.as_str()) {
            "depth" => params.depth = number.map(|n| n as Depth),
            "movetime" => params.movetime = number,
            _ => (),
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_go_params() {
        assert_eq!(parse_go_params("depth 5").depth, Some(5));
        assert_eq!(parse_go_params("depth 5").movetime, None);
        assert_eq!(parse_go_params("  movetime  3000 ").movetime, Some(3000));
        assert_eq!(parse_go_params("movetime 3000 depth 2").depth, Some(2));
        assert_eq!(parse_go_params("movetime 3000 depth 2").movetime, Some(3000));
        assert_eq!(parse_go_params("depth5").depth, None);
        assert_eq!(parse_go_params("").depth, None);
        assert_eq!(parse_go_params("infinite").depth, None);
    }

    #[test]
    fn test_parse_position_params() {
        let params = parse_position_params("startpos").unwrap();
        assert_eq!(params.fen, crate::board::START_FEN);
        assert_eq!(params.moves.len(), 0);

        let params = parse_position_params("startpos moves e2e4 e7e5 g1f3").unwrap();
        assert_eq!(params.moves,
                   vec!["e2e4".to_string(), "e7e5".to_string(), "g1f3".to_string()]);

        let params = parse_position_params("fen k7/8/8/8/8/8/8/7K w - - 0 1 moves h1h2")
            .unwrap();
        assert_eq!(params.fen, "k7/8/8/8/8/8/8/7K w - - 0 1");
        assert_eq!(params.moves, vec!["h1h2".to_string()]);

        // Trailing FEN fields may be omitted.
        let params = parse_position_params("fen k7/8/8/8/8/8/8/7K w").unwrap();
        assert_eq!(params.fen, "k7/8/8/8/8/8/8/7K w");

        assert!(parse_position_params("fen").is_err());
        assert!(parse_position_params("startpos moves e2e9").is_err());
    }

    #[test]
    fn test_parse_uci_command() {
        assert!(matches!(parse_uci_command("uci"), Ok(UciCommand::Uci)));
        assert!(matches!(parse_uci_command("  isready  "), Ok(UciCommand::IsReady)));
        assert!(matches!(parse_uci_command("quit"), Ok(UciCommand::Quit)));
        assert!(matches!(parse_uci_command("go depth 3"), Ok(UciCommand::Go(_))));
        assert!(matches!(parse_uci_command("position startpos"),
                         Ok(UciCommand::Position(_))));
        assert!(matches!(parse_uci_command("position startpos moves e2e4"),
                         Ok(UciCommand::Position(_))));
        assert!(parse_uci_command("ucinewgame").is_err());
        assert!(parse_uci_command("xyzzy").is_err());
        assert!(parse_uci_command("position gibberish").is_err());
    }
}
