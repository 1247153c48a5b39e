use unichess::{
    Color, Fen, Game, GameMode, Outcome, PlayError, Role, Rules as _, Square, Termination,
    VariantRules,
};

fn sq(row: u8, col: u8) -> Square {
    Square::new(row, col)
}

fn setup(mode: GameMode, fen: &str) -> Game {
    let fen: Fen = fen.parse().expect("valid fen");
    Game::from_fen(mode, &fen).expect("legal position")
}

/// Plays a deterministic pseudo random game and checks the board after
/// every request.
fn playout(mode: GameMode, seed: u64) {
    let rules = VariantRules::new(mode);
    let mut game = Game::start(mode);
    let mut pick = seed;

    for _ in 0..300 {
        if game.is_game_over() {
            break;
        }
        if game.is_waiting_for_promotion() {
            game.complete_promotion(Role::Queen).expect("pending promotion");
            continue;
        }
        let mover = game.turn();
        let moves = game.legal_moves();
        if moves.is_empty() {
            let origin = game.multi_jump_origin().expect("only a chain can stall");
            game.play(origin, origin).expect("chain can be ended");
            continue;
        }
        pick = pick.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let (from, to) = moves[(pick >> 33) as usize % moves.len()];
        game.play(from, to).expect("legal move");

        let board = game.board();
        assert!(board.is_consistent(), "{mode} after {from}{to}");
        if mode.has_chess() {
            for color in Color::ALL {
                assert_eq!(board.count(Role::King, color), 1, "{mode} after {from}{to}");
            }
            assert!(
                !rules.is_king_in_check(board, mover),
                "{mode}: {from}{to} left the {mover} king in check"
            );
        }
    }
}

#[test]
fn test_playouts_never_self_check() {
    for mode in GameMode::ALL {
        for seed in 0..8 {
            playout(mode, seed);
        }
    }
}

#[test]
fn test_pinned_piece_may_not_move() {
    // The knight on e2 shields its king from the rook on e8.
    let game = setup(GameMode::Chess, "4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1");
    let rules = VariantRules::new(GameMode::Chess);
    assert!(!rules.is_valid_move(game.board(), game.state(), sq(6, 4), sq(4, 5)));
    assert!(game.legal_moves().iter().all(|&(from, _)| from != sq(6, 4)));
}

#[test]
fn test_en_passant_capture() {
    let mut game = setup(GameMode::Chess, "4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1");
    assert!(game.request_move(sq(6, 4), sq(4, 4)));
    assert_eq!(game.state().special.en_passant, Some(sq(5, 4)));
    assert!(game.request_move(sq(4, 5), sq(5, 4)));
    assert!(game.board().piece_at(sq(4, 4)).is_none());
    assert_eq!(
        game.history().last().map(|m| m.notation.as_str()),
        Some("f4xe3 e.p.")
    );
    assert_eq!(game.halfmoves(), 0);
}

#[test]
fn test_en_passant_expires() {
    let mut game = setup(GameMode::Chess, "4k3/8/8/8/5p2/8/4P3/4K3 w - - 0 1");
    assert!(game.request_move(sq(6, 4), sq(4, 4)));
    assert!(game.request_move(sq(0, 4), sq(0, 3)));
    assert!(game.request_move(sq(7, 4), sq(7, 3)));
    assert_eq!(game.state().special.en_passant, None);
    assert_eq!(
        game.play(sq(4, 5), sq(5, 4)),
        Err(PlayError::IllegalMove {
            from: sq(4, 5),
            to: sq(5, 4)
        })
    );
}

#[test]
fn test_kingside_castling() {
    let mut game = setup(GameMode::Chess, "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    assert!(game.request_move(sq(7, 4), sq(7, 6)));
    let rook = game.board().piece_at(sq(7, 5)).expect("rook relocated");
    assert_eq!(rook.role, Role::Rook);
    assert!(rook.has_moved());
    assert!(game.board().piece_at(sq(7, 7)).is_none());
    assert_eq!(game.history()[0].notation, "O-O");
    assert_eq!(game.fen().castling(), "kq");
}

#[test]
fn test_castling_through_attack() {
    let mut game = setup(GameMode::Chess, "4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
    assert!(!game.request_move(sq(7, 4), sq(7, 6)));
    assert!(game.request_move(sq(7, 4), sq(7, 2)));
    assert!(game.board().piece_at(sq(7, 3)).is_some_and(|p| p.role == Role::Rook));
}

#[test]
fn test_castling_in_hybrid() {
    let mut game = setup(
        GameMode::Hybrid,
        "r3k2r/pppppppp/1m1m1m1m/m1m1m1m1/1M1M1M1M/M1M1M1M1/PPPPPPPP/R3K2R w KQkq - 0 1",
    );
    assert!(game.request_move(sq(7, 4), sq(7, 2)));
    assert!(game.board().piece_at(sq(7, 3)).is_some_and(|p| p.role == Role::Rook));
}

#[test]
fn test_mandatory_capture() {
    let mut game = setup(GameMode::Checkers, "8/8/8/8/3m4/4M3/1M6/8 w - - 0 1");
    assert!(!game.request_move(sq(6, 1), sq(5, 2)));
    assert!(!game.request_move(sq(5, 4), sq(4, 5)));
    assert!(game.request_move(sq(5, 4), sq(3, 2)));
    assert!(game.board().piece_at(sq(4, 3)).is_none());
    assert_eq!(game.outcome(), Some(Outcome::Decisive { winner: Color::White }));
    assert_eq!(game.termination(), Some(Termination::NoMoves));
}

#[test]
fn test_multi_jump_pin() {
    let mut game = setup(GameMode::Checkers, "7m/8/2m5/3M4/8/5M2/8/M7 b - - 0 1");
    assert!(game.request_move(sq(2, 2), sq(4, 4)));
    assert!(game.is_multi_jump());
    assert_eq!(game.multi_jump_origin(), Some(sq(4, 4)));
    assert_eq!(game.turn(), Color::Black);

    for (from, to) in [(sq(0, 7), sq(1, 6)), (sq(7, 0), sq(6, 1))] {
        assert_eq!(
            game.play(from, to),
            Err(PlayError::MultiJumpPinned { origin: sq(4, 4) })
        );
    }
    assert_eq!(game.legal_moves(), vec![(sq(4, 4), sq(6, 6))]);

    assert!(game.request_move(sq(4, 4), sq(6, 6)));
    assert!(!game.is_multi_jump());
    assert_eq!(game.turn(), Color::White);
}

#[test]
fn test_cross_family_capture_rejected() {
    let mut game = setup(GameMode::Hybrid, "4k3/8/8/3m4/8/8/8/3RK3 w - - 0 1");
    assert!(!game.request_move(sq(7, 3), sq(3, 3)));
    assert!(game.request_move(sq(7, 3), sq(4, 3)));
}

fn shuffle_knights(game: &mut Game, white_first: bool) {
    let white = [(sq(7, 6), sq(5, 5)), (sq(5, 5), sq(7, 6))];
    let black = [(sq(0, 6), sq(2, 5)), (sq(2, 5), sq(0, 6))];
    for i in 0..2 {
        let (first, second) = if white_first {
            (white[i], black[i])
        } else {
            (black[i], white[i])
        };
        assert!(game.request_move(first.0, first.1));
        assert!(game.request_move(second.0, second.1));
    }
}

#[test]
fn test_threefold_repetition() {
    let mut game = Game::start(GameMode::Chess);
    shuffle_knights(&mut game, true);
    assert_eq!(game.repetitions(), 2);
    assert!(!game.is_game_over());
    shuffle_knights(&mut game, true);
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.termination(), Some(Termination::ThreefoldRepetition));
}

#[test]
fn test_repetition_ledger_reset() {
    let mut game = Game::start(GameMode::Chess);
    shuffle_knights(&mut game, true);
    assert_eq!(game.halfmoves(), 4);

    assert!(game.request_move(sq(6, 4), sq(5, 4)));
    assert_eq!(game.repetitions(), 1);
    assert_eq!(game.halfmoves(), 0);

    shuffle_knights(&mut game, false);
    assert_eq!(game.repetitions(), 2);
    assert!(!game.is_game_over());
    shuffle_knights(&mut game, false);
    assert_eq!(game.termination(), Some(Termination::ThreefoldRepetition));
}

fn shuffle_kings(game: &mut Game) {
    for (from, to) in [
        (sq(7, 4), sq(7, 5)),
        (sq(0, 4), sq(0, 5)),
        (sq(7, 5), sq(7, 4)),
        (sq(0, 5), sq(0, 4)),
    ] {
        assert!(game.request_move(from, to), "{from}{to}");
    }
}

#[test]
fn test_capture_resets_ledger() {
    let mut game = setup(GameMode::Chess, "r3k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    shuffle_kings(&mut game);
    assert_eq!(game.repetitions(), 2);
    assert_eq!(game.halfmoves(), 4);

    assert!(game.request_move(sq(7, 0), sq(0, 0)));
    assert_eq!(game.history().last().map(|m| m.notation.as_str()), Some("Ra1xa8"));
    assert_eq!(game.repetitions(), 1);
    assert_eq!(game.halfmoves(), 0);
    assert!(!game.is_game_over());
}

#[test]
fn test_en_passant_resets_ledger() {
    let mut game = setup(GameMode::Chess, "4k3/8/8/3pP3/8/8/8/4K3 w - d6 7 20");
    assert_eq!(game.halfmoves(), 7);
    assert!(game.request_move(sq(3, 4), sq(2, 3)));
    assert!(game.board().piece_at(sq(3, 3)).is_none());
    assert_eq!(game.repetitions(), 1);
    assert_eq!(game.halfmoves(), 0);
}

#[test]
fn test_hybrid_jump_resets_ledger() {
    let mut game = setup(GameMode::Hybrid, "4k3/8/8/8/8/2m5/3M4/4K3 w - - 0 1");
    shuffle_kings(&mut game);
    assert_eq!(game.repetitions(), 2);
    assert_eq!(game.halfmoves(), 4);

    assert!(game.request_move(sq(6, 3), sq(4, 1)));
    assert!(game.board().piece_at(sq(5, 2)).is_none());
    assert!(!game.is_multi_jump());
    assert_eq!(game.turn(), Color::Black);
    assert_eq!(game.repetitions(), 1);
    assert_eq!(game.halfmoves(), 0);
}

#[test]
fn test_insufficient_material() {
    let rules = VariantRules::new(GameMode::Chess);
    for (fen, insufficient) in [
        ("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/1N2K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", false),
        ("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1", true),
        ("4k3/8/8/8/8/8/8/1NB1K3 w - - 0 1", false),
    ] {
        let fen: Fen = fen.parse().expect("valid fen");
        assert_eq!(rules.is_insufficient_material(&fen.board), insufficient, "{fen}");
    }

    let game = setup(GameMode::Chess, "4k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
    assert_eq!(game.termination(), Some(Termination::InsufficientMaterial));

    let game = setup(GameMode::Chess, "4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
    assert!(!game.is_game_over());
}

#[test]
fn test_capture_into_insufficient_material() {
    let mut game = setup(GameMode::Chess, "4k3/8/8/8/8/8/3p4/2B1K3 w - - 0 1");
    assert!(game.is_check());
    assert!(game.request_move(sq(7, 2), sq(6, 3)));
    assert_eq!(game.outcome(), Some(Outcome::Draw));
    assert_eq!(game.termination(), Some(Termination::InsufficientMaterial));
}

#[test]
fn test_stalemate() {
    let mut game = setup(GameMode::Chess, "k7/8/3Q4/8/8/8/8/4K3 w - - 0 1");
    assert!(game.request_move(sq(2, 3), sq(1, 2)));
    assert_eq!(game.termination(), Some(Termination::Stalemate));
    assert_eq!(game.outcome(), Some(Outcome::Draw));
}
