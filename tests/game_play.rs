//! End-to-end scenarios exercising the engine through its public
//! interface.

extern crate lysander;

use lysander::{evaluate, Engine, Position, SearchLimits, START_FEN, WHITE, BLACK};

#[test]
fn open_game() {
    let p = Position::from_history(START_FEN, vec!["e2e4", "e7e5", "g1f3"]).unwrap();
    assert!(!p.is_in_check(WHITE));
    assert!(!p.is_in_check(BLACK));
    assert_eq!(p.side_to_move(), BLACK);
    assert_eq!(p.fullmove_number(), 2);
}

#[test]
fn fools_mate() {
    let p = Position::from_history(START_FEN, vec!["f2f3", "e7e5", "g2g4", "d8h4"]).unwrap();
    assert!(p.is_checkmate());
    assert_eq!(p.side_to_move(), WHITE);
    assert_eq!(p.legal_moves().len(), 0);
}

#[test]
fn castling_round_trip() {
    let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
    let mut p = Position::from_fen(fen).unwrap();
    let entry_before = p.castling_entry();

    let oo = p.legal_moves()
        .into_iter()
        .find(|m| m.notation() == "e1g1")
        .unwrap();
    p.do_move(oo);
    assert_eq!(p.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");

    p.undo_move(oo);
    assert_eq!(p.to_fen(), fen);
    assert_eq!(p.castling_entry(), entry_before);
}

#[test]
fn move_text_round_trips() {
    let fens = [START_FEN,
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8"];
    for fen in fens.iter() {
        let p = Position::from_fen(fen).unwrap();
        let moves = p.legal_moves();
        for &m in moves.iter() {
            let text = m.notation();
            let matches: Vec<_> = moves.iter().filter(|x| x.notation() == text).collect();
            assert_eq!(matches.len(), 1, "ambiguous move text {}", text);
            assert_eq!(*matches[0], m);
        }
    }
}

#[test]
fn fen_round_trips_along_a_game() {
    let moves = ["e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6"];
    let mut p = Position::from_fen(START_FEN).unwrap();
    for i in 0..moves.len() {
        let played = Position::from_history(START_FEN, moves[..=i].iter().cloned()).unwrap();
        let reparsed = Position::from_fen(&played.to_fen()).unwrap();
        assert_eq!(reparsed.to_fen(), played.to_fen());
        assert_eq!(reparsed.hash(), played.hash());
    }
    assert_eq!(p.ply(), 0);
    for m in moves.iter() {
        let legal = p.legal_moves();
        let m = legal.iter().find(|x| x.notation() == *m).unwrap();
        p.do_move(*m);
    }
    assert_eq!(p.ply(), moves.len());
}

#[test]
fn engine_plays_a_short_game() {
    let mut p = Position::from_fen(START_FEN).unwrap();
    let mut engine = Engine::new(4);
    for _ in 0..20 {
        let legal = p.legal_moves();
        if legal.is_empty() {
            break;
        }
        let m = engine.best_move(&mut p, SearchLimits::depth(3)).unwrap();
        assert!(legal.contains(&m), "engine chose the illegal move {}", m);
        p.do_move(m);
        assert!(evaluate(&p).abs() < lysander::INF);
    }
    // The undo stack can unwind the whole game.
    let played = p.ply();
    for _ in 0..played {
        assert!(p.undo_last_move());
    }
    assert_eq!(p.to_fen(), START_FEN);
}
