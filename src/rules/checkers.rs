// This file is part of the unichess library.
// Copyright (C) 2024-2025 The unichess developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use log::trace;

use super::{any_legal, collect_legal, common_checks, Rules};
use crate::{
    board::Board,
    color::Color,
    mode::GameMode,
    piece::Piece,
    role::Role,
    square::Square,
    square_set::SquareSet,
    turn::TurnState,
};

/// Checkers with flying kings, mandatory capture and capture chains.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct CheckersRules;

impl CheckersRules {
    pub(crate) fn validate(
        &self,
        scratch: &mut Board,
        state: &TurnState,
        from: Square,
        to: Square,
    ) -> bool {
        let board: &Board = scratch;
        common_checks(board, state, from, to).is_some_and(|piece| {
            CheckersRules::validate_man(board, state, &piece, to, || {
                has_captures(board, piece.color)
            })
        })
    }

    /// Validates the shape of a move by a man: the multi-jump pin, then
    /// mandatory capture, then geometry.
    ///
    /// `must_capture` is only asked when no capture chain is active.
    pub(crate) fn validate_man<F>(
        board: &Board,
        state: &TurnState,
        piece: &Piece,
        to: Square,
        must_capture: F,
    ) -> bool
    where
        F: FnOnce() -> bool,
    {
        let from = piece.position();
        if piece.role != Role::CheckersMan {
            trace!("rejected {from}{to}: not a man");
            return false;
        }
        let chain = state.special.multi_jump;
        if let Some(origin) = chain {
            if origin != from {
                trace!("rejected {from}{to}: capture chain pinned to {origin}");
                return false;
            }
        } else if piece.jump_victim(to, board).is_none() && must_capture() {
            trace!("rejected {from}{to}: a capture is mandatory");
            return false;
        }
        let ok = piece.is_valid_move_with_multi_jump(to, board, chain.is_some());
        if !ok {
            trace!("rejected {from}{to}: not a man move");
        }
        ok
    }
}

/// Tests whether any man of `color` has a capture.
pub fn has_captures(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|p| p.has_capture(board))
}

/// Single-jump landings of the man on `from`.
pub fn capture_landings(board: &Board, from: Square) -> SquareSet {
    board
        .piece_at(from)
        .map_or(SquareSet::EMPTY, |p| p.capture_landings(board))
}

/// Every square the man on `from` can reach through a chain of one or more
/// captures.
///
/// Searches depth first on a scratch copy of the board. Each jump removes
/// the captured piece for the rest of its branch and is undone before the
/// next one is tried. A man that lands on its far row is crowned for the
/// remainder of the branch.
///
/// # Examples
///
/// ```
/// use unichess::{rules::checkers::capture_reach, Fen, Square};
///
/// let fen: Fen = "8/8/2m5/3M4/8/3M4/8/8 b".parse().unwrap();
/// let board = fen.board;
/// let reach = capture_reach(&board, Square::new(2, 2));
/// assert!(reach.contains(Square::new(4, 4)));
/// assert!(reach.contains(Square::new(6, 2)));
/// ```
pub fn capture_reach(board: &Board, from: Square) -> SquareSet {
    let mut scratch = *board;
    let mut reach = SquareSet::EMPTY;
    if let Some(piece) = scratch.piece_at(from) {
        search(&mut scratch, piece, &mut reach);
    }
    reach
}

fn search(scratch: &mut Board, piece: Piece, reach: &mut SquareSet) {
    let from = piece.position();
    for landing in piece.capture_landings(scratch) {
        let Some(victim_sq) = piece.jump_victim(landing, scratch) else {
            continue;
        };
        let victim = scratch.remove_piece_at(victim_sq);
        scratch.remove_piece_at(from);
        let mut jumped = piece;
        if landing.row() == piece.color.promotion_row() {
            jumped.crown();
        }
        scratch.set_piece_at(landing, jumped);
        reach.insert(landing);

        if let Some(jumped) = scratch.piece_at(landing) {
            search(scratch, jumped, reach);
        }

        scratch.remove_piece_at(landing);
        scratch.set_piece_at(from, piece);
        if let Some(victim) = victim {
            scratch.set_piece_at(victim_sq, victim);
        }
    }
}

impl Rules for CheckersRules {
    fn mode(&self) -> GameMode {
        GameMode::Checkers
    }

    fn is_valid_move(&self, board: &Board, state: &TurnState, from: Square, to: Square) -> bool {
        let mut scratch = *board;
        self.validate(&mut scratch, state, from, to)
    }

    fn is_king_in_check(&self, _board: &Board, _color: Color) -> bool {
        false
    }

    fn is_square_attacked(&self, board: &Board, square: Square, defender: Color) -> bool {
        board
            .pieces_of(!defender)
            .any(|p| p.attacks(square, board))
    }

    /// The side to move loses when it has no piece or no legal move.
    fn is_game_over(&self, board: &Board, state: &TurnState) -> bool {
        board.pieces_of(state.turn).next().is_none() || !self.has_legal_moves(board, state)
    }

    fn is_insufficient_material(&self, _board: &Board) -> bool {
        false
    }

    fn capture_moves(&self, board: &Board, from: Square) -> SquareSet {
        capture_landings(board, from)
    }

    fn has_captures(&self, board: &Board, color: Color) -> bool {
        has_captures(board, color)
    }

    fn has_legal_moves(&self, board: &Board, state: &TurnState) -> bool {
        any_legal(board, state, |scratch, from, to| self.validate(scratch, state, from, to))
    }

    fn legal_moves(&self, board: &Board, state: &TurnState) -> Vec<(Square, Square)> {
        collect_legal(board, state, |scratch, from, to| self.validate(scratch, state, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn man(board: &mut Board, color: Color, row: u8, col: u8) {
        let sq = Square::new(row, col);
        board.set_piece_at(sq, Piece::new(Role::CheckersMan, color, sq));
    }

    #[test]
    fn test_start_position() {
        let board = Board::new(GameMode::Checkers);
        let mut state = TurnState::new();
        assert_eq!(CheckersRules.legal_moves(&board, &state).len(), 7);
        state.pass();
        assert_eq!(CheckersRules.legal_moves(&board, &state).len(), 7);
        assert!(!CheckersRules.has_captures(&board, Color::White));
    }

    #[test]
    fn test_mandatory_capture() {
        let mut board = Board::empty();
        man(&mut board, Color::White, 5, 0);
        man(&mut board, Color::White, 5, 4);
        man(&mut board, Color::Black, 4, 5);
        let state = TurnState::new();
        assert!(CheckersRules.has_captures(&board, Color::White));
        assert!(!CheckersRules.is_valid_move(&board, &state, Square::new(5, 0), Square::new(4, 1)));
        assert!(!CheckersRules.is_valid_move(&board, &state, Square::new(5, 4), Square::new(4, 3)));
        assert!(CheckersRules.is_valid_move(&board, &state, Square::new(5, 4), Square::new(3, 6)));
        assert_eq!(
            CheckersRules.legal_moves(&board, &state),
            vec![(Square::new(5, 4), Square::new(3, 6))]
        );
    }

    #[test]
    fn test_capture_reach_chain() {
        let mut board = Board::empty();
        man(&mut board, Color::Black, 2, 2);
        man(&mut board, Color::White, 3, 3);
        man(&mut board, Color::White, 5, 5);
        let reach = capture_reach(&board, Square::new(2, 2));
        assert_eq!(
            reach,
            SquareSet::from_square(Square::new(4, 4)) | SquareSet::from_square(Square::new(6, 6))
        );
        assert_eq!(capture_landings(&board, Square::new(2, 2)).len(), 1);
        // The search leaves the board alone.
        assert_eq!(board.pieces().count(), 3);
    }

    #[test]
    fn test_capture_reach_crowns_mid_chain() {
        // Crowned on landing, the man flies on over a distant piece.
        let mut board = Board::empty();
        man(&mut board, Color::Black, 5, 1);
        man(&mut board, Color::White, 6, 2);
        man(&mut board, Color::White, 4, 6);
        let reach = capture_reach(&board, Square::new(5, 1));
        assert_eq!(
            reach,
            SquareSet::from_square(Square::new(7, 3)) | SquareSet::from_square(Square::new(3, 7))
        );
        assert!(board.piece_at(Square::new(5, 1)).is_some_and(|p| !p.is_crowned()));
    }

    #[test]
    fn test_chain_pin() {
        let mut board = Board::empty();
        man(&mut board, Color::Black, 4, 4);
        man(&mut board, Color::Black, 0, 7);
        man(&mut board, Color::White, 5, 5);
        let mut state = TurnState::with_turn(Color::Black);
        state.special.pin(Square::new(4, 4));
        assert!(!CheckersRules.is_valid_move(&board, &state, Square::new(0, 7), Square::new(1, 6)));
        assert!(CheckersRules.is_valid_move(&board, &state, Square::new(4, 4), Square::new(6, 6)));
        assert!(!CheckersRules.is_valid_move(&board, &state, Square::new(4, 4), Square::new(5, 3)));
    }

    #[test]
    fn test_no_pieces_loses() {
        let mut board = Board::empty();
        man(&mut board, Color::Black, 2, 2);
        let state = TurnState::new();
        assert!(CheckersRules.is_game_over(&board, &state));
    }
}
