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

use arrayvec::ArrayVec;
use log::trace;

use super::{
    any_legal, castling_rook, chess_attacked, chess_in_check, collect_legal, common_checks,
    insufficient_material, is_castling_attempt, Rules,
};
use crate::{
    board::{Board, MAX_SIMULATED_EDITS},
    color::Color,
    mode::GameMode,
    piece::{MoveContext, Piece},
    role::{Family, Role},
    square::Square,
    square_set::SquareSet,
    turn::TurnState,
};

/// Standard chess.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ChessRules;

impl ChessRules {
    /// Validates on a scratch board that is restored before returning.
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
        if piece.family() != Family::Chess {
            trace!("rejected {from}{to}: not a chess piece");
            return false;
        }
        ChessRules::validate_chess_piece(scratch, state, &piece, to)
    }

    /// Validates a move of a chess piece, including castling and the check
    /// safety of the mover's king.
    pub(crate) fn validate_chess_piece(
        scratch: &mut Board,
        state: &TurnState,
        piece: &Piece,
        to: Square,
    ) -> bool {
        let from = piece.position();
        if is_castling_attempt(piece, to) {
            return validate_castling(scratch, piece, to);
        }
        let ctx = MoveContext::new(scratch).with_en_passant(state.special.en_passant);
        if !piece.is_valid_move(to, &ctx) {
            trace!("rejected {from}{to}: not a {} move", piece.role);
            return false;
        }
        let en_passant_victim = if piece.role == Role::Pawn && from.col() != to.col() {
            state.special.en_passant_victim(piece.color, to)
        } else {
            None
        };
        if !leaves_king_safe(scratch, piece, to, &[], en_passant_victim) {
            trace!("rejected {from}{to}: leaves the king in check");
            return false;
        }
        true
    }
}

/// Castling: the king shifts two columns towards an unmoved rook of its
/// color. Every square between them must be empty, the king must not be in
/// check and must not pass through or land on an attacked square.
pub(crate) fn validate_castling(board: &Board, king: &Piece, to: Square) -> bool {
    let from = king.position();
    let (rook_from, _) = castling_rook(from, to);
    let rook_ok = board
        .piece_at(rook_from)
        .is_some_and(|r| r.role == Role::Rook && r.color == king.color && !r.has_moved());
    if !rook_ok {
        trace!("rejected castling {from}{to}: no unmoved rook on {rook_from}");
        return false;
    }
    if !board.is_path_clear(from, rook_from) {
        trace!("rejected castling {from}{to}: path blocked");
        return false;
    }
    if chess_attacked(board, from, king.color) {
        trace!("rejected castling {from}{to}: king in check");
        return false;
    }
    let step = if to.col() > from.col() { 1 } else { -1 };
    let transit = from.offset(0, step);
    let safe = transit
        .into_iter()
        .chain([to])
        .all(|sq| !chess_attacked(board, sq, king.color));
    if !safe {
        trace!("rejected castling {from}{to}: king passes an attacked square");
    }
    safe
}

/// Simulates the move of `piece` to `to`, additionally clearing
/// `extra_cleared` and `en_passant_victim`, and tests that the mover's king
/// is not in check afterwards.
pub(crate) fn leaves_king_safe(
    scratch: &mut Board,
    piece: &Piece,
    to: Square,
    extra_cleared: &[Square],
    en_passant_victim: Option<Square>,
) -> bool {
    let mut edits: ArrayVec<(Square, Option<Piece>), MAX_SIMULATED_EDITS> = ArrayVec::new();
    edits.push((piece.position(), None));
    edits.push((to, Some(*piece)));
    for &sq in extra_cleared.iter().chain(en_passant_victim.iter()) {
        if edits.try_push((sq, None)).is_err() {
            return false;
        }
    }
    let color = piece.color;
    scratch.simulate(&edits, |board| {
        board.king_of(color).is_none_or(|king| !chess_attacked(board, king, color))
    })
}

impl Rules for ChessRules {
    fn mode(&self) -> GameMode {
        GameMode::Chess
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

    fn capture_moves(&self, _board: &Board, _from: Square) -> SquareSet {
        SquareSet::EMPTY
    }

    fn has_captures(&self, _board: &Board, _color: Color) -> bool {
        false
    }

    fn has_legal_moves(&self, board: &Board, state: &TurnState) -> bool {
        any_legal(board, state, |scratch, from, to| self.validate(scratch, state, from, to))
    }

    fn legal_moves(&self, board: &Board, state: &TurnState) -> Vec<(Square, Square)> {
        collect_legal(board, state, |scratch, from, to| self.validate(scratch, state, from, to))
    }
}
