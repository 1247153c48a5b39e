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

use super::{
    checkers::{self, CheckersRules},
    chess::{leaves_king_safe, ChessRules},
    any_legal, chess_attacked, chess_in_check, collect_legal, common_checks, insufficient_material,
    Rules,
};
use crate::{
    board::Board,
    color::Color,
    mode::GameMode,
    role::Family,
    square::Square,
    square_set::SquareSet,
    turn::TurnState,
};

/// Chess pieces and men on one board.
///
/// Chess pieces follow the chess rules and men the checkers rules. A piece
/// never captures a piece of the other family, and no move of either
/// family may leave the own king in check.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct HybridRules;

impl HybridRules {
    pub(crate) fn validate(
        &self,
        scratch: &mut Board,
        state: &TurnState,
        from: Square,
        to: Square,
    ) -> bool {
        let Some(piece) = common_checks(scratch, state, from, to) else {
            return false;
        };
        if scratch
            .piece_at(to)
            .is_some_and(|target| target.family() != piece.family())
        {
            trace!("rejected {from}{to}: captures across families");
            return false;
        }
        match piece.family() {
            Family::Chess => {
                if let Some(origin) = state.special.multi_jump {
                    trace!("rejected {from}{to}: capture chain pinned to {origin}");
                    return false;
                }
                ChessRules::validate_chess_piece(scratch, state, &piece, to)
            }
            Family::Checkers => {
                let board: &Board = scratch;
                if !CheckersRules::validate_man(board, state, &piece, to, || {
                    self.has_captures(board, piece.color)
                }) {
                    return false;
                }
                let victim = piece.jump_victim(to, scratch);
                if victim.is_some_and(|v| {
                    scratch
                        .piece_at(v)
                        .is_none_or(|p| p.family() != Family::Checkers)
                }) {
                    trace!("rejected {from}{to}: jumps across families");
                    return false;
                }
                let ok = leaves_king_safe(scratch, &piece, to, victim.as_slice(), None);
                if !ok {
                    trace!("rejected {from}{to}: leaves the king in check");
                }
                ok
            }
        }
    }
}

impl Rules for HybridRules {
    fn mode(&self) -> GameMode {
        GameMode::Hybrid
    }

    fn is_valid_move(&self, board: &Board, state: &TurnState, from: Square, to: Square) -> bool {
        let mut scratch = *board;
        self.validate(&mut scratch, state, from, to)
    }

    fn is_king_in_check(&self, board: &Board, color: Color) -> bool {
        chess_in_check(board, color)
    }

    fn is_square_attacked(&self, board: &Board, square: Square, defender: Color) -> bool {
        chess_attacked(board, square, defender)
    }

    fn is_insufficient_material(&self, board: &Board) -> bool {
        insufficient_material(board)
    }

    /// Only landings that leave the own king safe.
    fn capture_moves(&self, board: &Board, from: Square) -> SquareSet {
        let Some(piece) = board.piece_at(from) else {
            return SquareSet::EMPTY;
        };
        let mut scratch = *board;
        checkers::capture_landings(board, from)
            .into_iter()
            .filter(|&to| {
                piece.jump_victim(to, board).is_some_and(|victim| {
                    leaves_king_safe(&mut scratch, &piece, to, &[victim], None)
                })
            })
            .collect()
    }

    /// A capture that would expose the king does not make capturing
    /// mandatory.
    fn has_captures(&self, board: &Board, color: Color) -> bool {
        board
            .pieces_of(color)
            .filter(|p| p.family() == Family::Checkers)
            .any(|p| !self.capture_moves(board, p.position()).is_empty())
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
    use crate::{fen::Fen, piece::Piece, role::Role};

    fn put(board: &mut Board, role: Role, color: Color, row: u8, col: u8) {
        let sq = Square::new(row, col);
        board.set_piece_at(sq, Piece::new(role, color, sq));
    }

    #[test]
    fn test_start_position() {
        let board = Board::new(GameMode::Hybrid);
        let mut state = TurnState::new();
        assert_eq!(HybridRules.legal_moves(&board, &state).len(), 6);
        state.pass();
        assert_eq!(HybridRules.legal_moves(&board, &state).len(), 6);
        assert!(!HybridRules.is_insufficient_material(&board));
    }

    #[test]
    fn test_no_cross_family_capture() {
        let mut board = Board::empty();
        put(&mut board, Role::King, Color::White, 7, 4);
        put(&mut board, Role::King, Color::Black, 0, 4);
        put(&mut board, Role::Rook, Color::White, 4, 0);
        put(&mut board, Role::CheckersMan, Color::Black, 4, 3);
        let state = TurnState::new();
        assert!(!HybridRules.is_valid_move(&board, &state, Square::new(4, 0), Square::new(4, 3)));
        assert!(HybridRules.is_valid_move(&board, &state, Square::new(4, 0), Square::new(4, 2)));
        assert!(!HybridRules.is_valid_move(&board, &state, Square::new(4, 0), Square::new(4, 5)));
    }

    #[test]
    fn test_man_may_not_expose_king() {
        let mut board = Board::empty();
        put(&mut board, Role::King, Color::White, 7, 0);
        put(&mut board, Role::King, Color::Black, 0, 4);
        put(&mut board, Role::CheckersMan, Color::White, 6, 1);
        put(&mut board, Role::Bishop, Color::Black, 3, 4);
        let state = TurnState::new();
        assert!(!HybridRules.is_valid_move(&board, &state, Square::new(6, 1), Square::new(5, 0)));
        assert!(HybridRules.is_valid_move(&board, &state, Square::new(6, 1), Square::new(5, 2)));
        assert!(HybridRules.is_valid_move(&board, &state, Square::new(7, 0), Square::new(7, 1)));
    }

    #[test]
    fn test_capture_exposing_king_is_not_mandatory() {
        // The man on d2 shields the king from the bishop. Its only capture
        // would open the diagonal, so the free step with g3 stays legal.
        let fen: Fen = "4k3/8/8/8/5b2/2m3M1/3M4/2K5 w - - 0 1".parse().expect("valid fen");
        let board = fen.board;
        let state = TurnState::new();
        let (d2, b4) = (Square::new(6, 3), Square::new(4, 1));
        let (g3, h4) = (Square::new(5, 6), Square::new(4, 7));
        assert!(checkers::has_captures(&board, Color::White));
        assert!(!HybridRules.has_captures(&board, Color::White));
        assert!(HybridRules.capture_moves(&board, d2).is_empty());
        assert!(!HybridRules.is_valid_move(&board, &state, d2, b4));
        assert!(HybridRules.is_valid_move(&board, &state, g3, h4));
        assert!(HybridRules.legal_moves(&board, &state).contains(&(g3, h4)));
    }

    #[test]
    fn test_chess_piece_blocked_during_chain() {
        let board = Board::new(GameMode::Hybrid);
        let mut state = TurnState::new();
        state.special.pin(Square::new(4, 3));
        assert!(!HybridRules.is_valid_move(&board, &state, Square::new(7, 6), Square::new(5, 5)));
    }
}
