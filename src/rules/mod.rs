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

//! Legality, check detection, terminal states and move application for
//! each [`GameMode`].
//!
//! Every mode implements [`Rules`]. [`VariantRules`] picks the
//! implementation for a mode at runtime.
//!
//! # Examples
//!
//! ```
//! use unichess::{Board, GameMode, Rules, Square, TurnState, VariantRules};
//!
//! let rules = VariantRules::new(GameMode::Chess);
//! let board = Board::new(GameMode::Chess);
//! let state = TurnState::new();
//!
//! assert!(rules.is_valid_move(&board, &state, Square::new(6, 4), Square::new(4, 4)));
//! assert!(!rules.is_valid_move(&board, &state, Square::new(1, 4), Square::new(3, 4)));
//! assert_eq!(rules.legal_moves(&board, &state).len(), 20);
//! ```

use log::trace;

use crate::{
    board::Board,
    color::{ByColor, Color},
    mode::GameMode,
    piece::Piece,
    role::{Family, Role},
    square::Square,
    square_set::SquareSet,
    turn::TurnState,
};

pub mod checkers;
pub mod chess;
pub mod hybrid;

pub use self::{checkers::CheckersRules, chess::ChessRules, hybrid::HybridRules};

/// Side effects of an applied move.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MoveEffects {
    /// Pieces removed from the board, in removal order.
    pub captured: Vec<Piece>,
    /// The move was a castling move. The rook was relocated as well.
    pub castled: bool,
    /// The move captured a pawn en passant.
    pub en_passant: bool,
}

impl MoveEffects {
    #[inline]
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

/// The rules of a game mode.
///
/// Queries never panic and never leave the board modified. Illegal input
/// is answered with `false`.
pub trait Rules {
    fn mode(&self) -> GameMode;

    /// Tests whether the side to move may move the piece on `from` to `to`.
    fn is_valid_move(&self, board: &Board, state: &TurnState, from: Square, to: Square) -> bool;

    /// Tests whether the king of `color` is attacked. Always `false` when
    /// the mode has no kings.
    fn is_king_in_check(&self, board: &Board, color: Color) -> bool;

    /// Tests whether any opposing piece of `defender` attacks `square`.
    fn is_square_attacked(&self, board: &Board, square: Square, defender: Color) -> bool;

    /// Tests whether the side to move has at least one legal move.
    fn has_legal_moves(&self, board: &Board, state: &TurnState) -> bool;

    /// Tests whether the game has ended for the side to move.
    fn is_game_over(&self, board: &Board, state: &TurnState) -> bool {
        !self.has_legal_moves(board, state)
    }

    /// Tests whether neither side can possibly win.
    fn is_insufficient_material(&self, board: &Board) -> bool;

    /// Applies a move that has already been validated.
    ///
    /// Removes the en passant victim if given, every opposing piece jumped
    /// by a man, relocates the rook when castling and marks moved pieces.
    /// Never promotes.
    fn move_piece(
        &self,
        board: &mut Board,
        from: Square,
        to: Square,
        multi_jump: bool,
        en_passant_capture: Option<Square>,
    ) -> MoveEffects {
        apply_move(board, from, to, multi_jump, en_passant_capture)
    }

    /// All `(from, to)` pairs the side to move may request.
    fn legal_moves(&self, board: &Board, state: &TurnState) -> Vec<(Square, Square)>;

    /// Squares the man on `from` may land on with a single capture.
    fn capture_moves(&self, board: &Board, from: Square) -> SquareSet;

    /// Tests whether any man of `color` has a capture.
    fn has_captures(&self, board: &Board, color: Color) -> bool;
}

/// Dynamically dispatched [`Rules`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum VariantRules {
    Chess(ChessRules),
    Checkers(CheckersRules),
    Hybrid(HybridRules),
}

impl VariantRules {
    pub const fn new(mode: GameMode) -> VariantRules {
        match mode {
            GameMode::Chess => VariantRules::Chess(ChessRules),
            GameMode::Checkers => VariantRules::Checkers(CheckersRules),
            GameMode::Hybrid => VariantRules::Hybrid(HybridRules),
        }
    }

    fn borrow(&self) -> &dyn Rules {
        match *self {
            VariantRules::Chess(ref rules) => rules,
            VariantRules::Checkers(ref rules) => rules,
            VariantRules::Hybrid(ref rules) => rules,
        }
    }
}

impl From<GameMode> for VariantRules {
    fn from(mode: GameMode) -> VariantRules {
        VariantRules::new(mode)
    }
}

impl Rules for VariantRules {
    fn mode(&self) -> GameMode {
        self.borrow().mode()
    }

    fn is_valid_move(&self, board: &Board, state: &TurnState, from: Square, to: Square) -> bool {
        self.borrow().is_valid_move(board, state, from, to)
    }

    fn is_king_in_check(&self, board: &Board, color: Color) -> bool {
        self.borrow().is_king_in_check(board, color)
    }

    fn is_square_attacked(&self, board: &Board, square: Square, defender: Color) -> bool {
        self.borrow().is_square_attacked(board, square, defender)
    }

    fn has_legal_moves(&self, board: &Board, state: &TurnState) -> bool {
        self.borrow().has_legal_moves(board, state)
    }

    fn is_game_over(&self, board: &Board, state: &TurnState) -> bool {
        self.borrow().is_game_over(board, state)
    }

    fn is_insufficient_material(&self, board: &Board) -> bool {
        self.borrow().is_insufficient_material(board)
    }

    fn move_piece(
        &self,
        board: &mut Board,
        from: Square,
        to: Square,
        multi_jump: bool,
        en_passant_capture: Option<Square>,
    ) -> MoveEffects {
        self.borrow()
            .move_piece(board, from, to, multi_jump, en_passant_capture)
    }

    fn legal_moves(&self, board: &Board, state: &TurnState) -> Vec<(Square, Square)> {
        self.borrow().legal_moves(board, state)
    }

    fn capture_moves(&self, board: &Board, from: Square) -> SquareSet {
        self.borrow().capture_moves(board, from)
    }

    fn has_captures(&self, board: &Board, color: Color) -> bool {
        self.borrow().has_captures(board, color)
    }
}

/// Checks shared by every mode. Returns the moving piece if none of them
/// rejects the request.
pub(crate) fn common_checks(
    board: &Board,
    state: &TurnState,
    from: Square,
    to: Square,
) -> Option<Piece> {
    if from == to {
        trace!("rejected {from}{to}: null move");
        return None;
    }
    let Some(piece) = board.piece_at(from) else {
        trace!("rejected {from}{to}: no piece on {from}");
        return None;
    };
    if piece.color != state.turn {
        trace!("rejected {from}{to}: not {}'s turn", piece.color);
        return None;
    }
    if board.piece_at(to).is_some_and(|t| t.role == Role::King) {
        trace!("rejected {from}{to}: kings are never captured");
        return None;
    }
    Some(piece)
}

/// Tests whether `validate` accepts any candidate move of the side to
/// move. `validate` gets a scratch board it must restore.
pub(crate) fn any_legal<F>(board: &Board, state: &TurnState, mut validate: F) -> bool
where
    F: FnMut(&mut Board, Square, Square) -> bool,
{
    let mut scratch = *board;
    candidates(board, state.turn).any(|(from, to)| validate(&mut scratch, from, to))
}

/// The candidate moves of the side to move that `validate` accepts.
pub(crate) fn collect_legal<F>(
    board: &Board,
    state: &TurnState,
    mut validate: F,
) -> Vec<(Square, Square)>
where
    F: FnMut(&mut Board, Square, Square) -> bool,
{
    let mut scratch = *board;
    candidates(board, state.turn)
        .filter(|&(from, to)| validate(&mut scratch, from, to))
        .collect()
}

/// Every `(from, to)` pair the pieces of `color` could reach by movement
/// pattern alone.
pub(crate) fn candidates(board: &Board, color: Color) -> impl Iterator<Item = (Square, Square)> + '_ {
    board.pieces_of(color).flat_map(|piece| {
        let from = piece.position();
        piece.pseudo_targets().into_iter().map(move |to| (from, to))
    })
}

/// Tests whether a chess piece of `!defender` attacks `square`.
pub(crate) fn chess_attacked(board: &Board, square: Square, defender: Color) -> bool {
    board
        .pieces_of(!defender)
        .any(|p| p.family() == Family::Chess && p.attacks(square, board))
}

/// Check detection for the chess family.
pub(crate) fn chess_in_check(board: &Board, color: Color) -> bool {
    match board.king_of(color) {
        Some(king) => chess_attacked(board, king, color),
        None => {
            debug_assert!(false, "no {color} king on the board");
            false
        }
    }
}

/// No pawns, rooks, queens or men remain and each side has at most one
/// knight or bishop.
pub(crate) fn insufficient_material(board: &Board) -> bool {
    board
        .pieces()
        .all(|p| p.role == Role::King || p.role.is_minor())
        && ByColor::new_with(|color| board.pieces_of(color).filter(|p| p.role.is_minor()).count())
            .all(|&minors| minors <= 1)
}

pub(crate) fn is_castling_attempt(piece: &Piece, to: Square) -> bool {
    let from = piece.position();
    piece.role == Role::King
        && !piece.has_moved()
        && from.row() == to.row()
        && from.col().abs_diff(to.col()) == 2
}

/// Rook origin and destination of a castling move by the king on `from`.
pub(crate) fn castling_rook(from: Square, to: Square) -> (Square, Square) {
    let row = from.row();
    if to.col() > from.col() {
        (Square::new(row, 7), Square::new(row, to.col() - 1))
    } else {
        (Square::new(row, 0), Square::new(row, to.col() + 1))
    }
}

pub(crate) fn apply_move(
    board: &mut Board,
    from: Square,
    to: Square,
    multi_jump: bool,
    en_passant_capture: Option<Square>,
) -> MoveEffects {
    let mut effects = MoveEffects::default();

    if let Some(victim) = en_passant_capture.and_then(|sq| board.remove_piece_at(sq)) {
        effects.captured.push(victim);
        effects.en_passant = true;
    }

    let Some(piece) = board.piece_at(from) else {
        return effects;
    };

    if piece.role == Role::CheckersMan && from.row().abs_diff(to.row()) >= 2 {
        for sq in board.between(from, to) {
            if board.piece_at(sq).is_some_and(|v| v.color != piece.color) {
                effects.captured.extend(board.remove_piece_at(sq));
            }
        }
    }

    if is_castling_attempt(&piece, to) {
        let (rook_from, rook_to) = castling_rook(from, to);
        board.move_piece_to(from, to);
        board.move_piece_to(rook_from, rook_to);
        for sq in [to, rook_to] {
            if let Some(p) = board.piece_mut(sq) {
                p.mark_moved();
            }
        }
        effects.castled = true;
    } else {
        effects.captured.extend(board.move_piece_to(from, to));
        if let Some(p) = board.piece_mut(to) {
            p.mark_moved();
        }
    }

    debug_assert!(
        !multi_jump || effects.is_capture(),
        "a capture chain continues only by capturing"
    );
    effects
}
