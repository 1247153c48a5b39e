#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use unichess::{Color, Game, GameMode, Role, Rules as _, Square, VariantRules};

#[derive(Debug, Arbitrary)]
struct Data {
    mode: GameMode,
    requests: Vec<(Square, Square, Option<Role>)>,
}

fuzz_target!(|data: Data| {
    let rules = VariantRules::new(data.mode);
    let mut game = Game::start(data.mode);
    for (from, to, promotion) in data.requests {
        let legal = game.legal_moves().contains(&(from, to));
        let ends_chain = game.multi_jump_origin() == Some(from) && from == to;
        let mover = game.turn();
        let played = game.request_move(from, to);
        assert!(!played || legal || ends_chain);

        if let Some(role) = promotion {
            let _ = game.complete_promotion(role);
        }

        let board = game.board();
        assert!(board.is_consistent());
        if data.mode.has_chess() {
            assert!(!rules.is_king_in_check(board, mover) || !played);
            for color in Color::ALL {
                assert_eq!(board.count(Role::King, color), 1);
            }
        }
    }
});
