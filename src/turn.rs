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

//! State carried from one move request to the next.
//!
//! All of it lives in one [`TurnState`] value that is handed to every rules
//! query, so the rules themselves stay free of hidden state.

use crate::{color::Color, role::Role, square::Square};

/// Memory of the special moves that span more than one request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct SpecialMoves {
    /// The square skipped by a two-square pawn advance on the previous
    /// move. Capturable en passant on this move only.
    pub en_passant: Option<Square>,
    /// The landing square of a capture chain that may still continue.
    /// While set, only this piece may move and only by capturing.
    pub multi_jump: Option<Square>,
}

impl SpecialMoves {
    #[inline]
    pub const fn is_multi_jump(&self) -> bool {
        self.multi_jump.is_some()
    }

    /// Forgets the en passant square. Happens on every applied move.
    pub fn clear_en_passant(&mut self) {
        self.en_passant = None;
    }

    /// Arms en passant if a pawn of `color` just advanced two squares from
    /// `from` to `to`.
    pub fn record_pawn_advance(&mut self, color: Color, from: Square, to: Square) {
        if from.col() == to.col() && from.row().abs_diff(to.row()) == 2 {
            self.en_passant = from.offset(color.forward(), 0);
        }
    }

    pub fn pin(&mut self, sq: Square) {
        self.multi_jump = Some(sq);
    }

    pub fn release(&mut self) -> Option<Square> {
        self.multi_jump.take()
    }

    /// The en passant victim when a pawn of `color` captures onto `to`.
    pub fn en_passant_victim(&self, color: Color, to: Square) -> Option<Square> {
        if self.en_passant == Some(to) {
            to.offset(-color.forward(), 0)
        } else {
            None
        }
    }
}

/// A pawn waiting on its last row for the choice of its new role.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct PendingPromotion {
    pub square: Square,
    pub color: Color,
}

/// Blocks all move requests while a pawn promotion is unresolved.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct PromotionGate {
    pub pending: Option<PendingPromotion>,
}

impl PromotionGate {
    #[inline]
    pub const fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    pub fn open(&mut self, square: Square, color: Color) {
        self.pending = Some(PendingPromotion { square, color });
    }

    /// Resolves the pending promotion with `role`. Returns the pending
    /// square, or `None` if nothing is pending or `role` is not a valid
    /// choice. The gate stays open on an invalid choice.
    pub fn resolve(&mut self, role: Role) -> Option<PendingPromotion> {
        if role.is_promotion_choice() {
            self.pending.take()
        } else {
            None
        }
    }
}

/// Everything a rules query needs to know beyond the board.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TurnState {
    pub turn: Color,
    pub special: SpecialMoves,
    pub promotion: PromotionGate,
}

impl TurnState {
    /// White to move with no special moves pending.
    pub const fn new() -> TurnState {
        TurnState::with_turn(Color::White)
    }

    pub const fn with_turn(turn: Color) -> TurnState {
        TurnState {
            turn,
            special: SpecialMoves {
                en_passant: None,
                multi_jump: None,
            },
            promotion: PromotionGate { pending: None },
        }
    }

    /// Passes the turn to the other side.
    pub fn pass(&mut self) {
        self.turn = !self.turn;
    }
}

impl Default for TurnState {
    fn default() -> TurnState {
        TurnState::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_en_passant_window() {
        let mut special = SpecialMoves::default();
        special.record_pawn_advance(Color::White, Square::new(6, 4), Square::new(5, 4));
        assert_eq!(special.en_passant, None);
        special.record_pawn_advance(Color::White, Square::new(6, 4), Square::new(4, 4));
        assert_eq!(special.en_passant, Some(Square::new(5, 4)));
        assert_eq!(
            special.en_passant_victim(Color::Black, Square::new(5, 4)),
            Some(Square::new(4, 4))
        );
        special.clear_en_passant();
        assert_eq!(special.en_passant_victim(Color::Black, Square::new(5, 4)), None);
    }

    #[test]
    fn test_promotion_gate() {
        let mut gate = PromotionGate::default();
        assert_eq!(gate.resolve(Role::Queen), None);
        gate.open(Square::new(0, 0), Color::White);
        assert!(gate.is_waiting());
        assert_eq!(gate.resolve(Role::King), None);
        assert!(gate.is_waiting());
        assert_eq!(
            gate.resolve(Role::Knight).map(|p| p.square),
            Some(Square::new(0, 0))
        );
        assert!(!gate.is_waiting());
    }

    #[test]
    fn test_pin_and_release() {
        let mut state = TurnState::new();
        state.special.pin(Square::new(4, 4));
        assert!(state.special.is_multi_jump());
        assert_eq!(state.special.release(), Some(Square::new(4, 4)));
        assert!(!state.special.is_multi_jump());
        state.pass();
        assert_eq!(state.turn, Color::Black);
    }
}
