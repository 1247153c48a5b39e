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

//! Move geometry of single pieces.
//!
//! Geometry knows nothing about turn order, check or the game mode. It
//! answers whether a piece standing on a board could move to a square by
//! its own movement pattern.

use bitflags::bitflags;

use crate::{
    board::Board,
    color::Color,
    role::{Family, Role},
    square::Square,
    square_set::SquareSet,
};

bitflags! {
    /// Per-piece state that changes during the game.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct PieceFlags: u8 {
        /// The piece has moved at least once. Only consulted for kings and
        /// rooks (castling rights).
        const MOVED = 1;
        /// The man has been crowned.
        const CROWNED = 2;
    }
}

/// The four diagonal directions as `(drow, dcol)`.
pub(crate) const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Board and en passant state a geometry query runs against.
#[derive(Copy, Clone, Debug)]
pub struct MoveContext<'a> {
    pub board: &'a Board,
    /// The square a pawn may capture onto en passant, if any.
    pub en_passant: Option<Square>,
}

impl<'a> MoveContext<'a> {
    pub const fn new(board: &'a Board) -> MoveContext<'a> {
        MoveContext {
            board,
            en_passant: None,
        }
    }

    #[must_use]
    pub const fn with_en_passant(self, en_passant: Option<Square>) -> MoveContext<'a> {
        MoveContext { en_passant, ..self }
    }
}

/// A piece on the board.
///
/// The position always equals the board slot holding the piece. It is
/// written by the [`Board`] whenever the piece is placed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Piece {
    pub role: Role,
    pub color: Color,
    position: Square,
    flags: PieceFlags,
}

impl Piece {
    pub const fn new(role: Role, color: Color, position: Square) -> Piece {
        Piece {
            role,
            color,
            position,
            flags: PieceFlags::empty(),
        }
    }

    #[must_use]
    pub const fn with_flags(self, flags: PieceFlags) -> Piece {
        Piece { flags, ..self }
    }

    #[inline]
    pub const fn position(&self) -> Square {
        self.position
    }

    #[inline]
    pub(crate) fn set_position(&mut self, sq: Square) {
        self.position = sq;
    }

    #[inline]
    pub const fn flags(&self) -> PieceFlags {
        self.flags
    }

    #[inline]
    pub const fn family(&self) -> Family {
        self.role.family()
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.flags.contains(PieceFlags::MOVED)
    }

    #[inline]
    pub const fn is_crowned(&self) -> bool {
        self.flags.contains(PieceFlags::CROWNED)
    }

    pub(crate) fn mark_moved(&mut self) {
        self.flags.insert(PieceFlags::MOVED);
    }

    /// Crowns a man. Has no effect on other pieces.
    pub fn crown(&mut self) {
        if self.role == Role::CheckersMan {
            self.flags.insert(PieceFlags::CROWNED);
        }
    }

    /// The letter of the piece in board descriptions: uppercase for White,
    /// `m` for men and `c` for crowned men.
    pub fn char(&self) -> char {
        let ch = if self.is_crowned() { 'c' } else { self.role.char() };
        self.color.apply_case(ch)
    }

    /// Parses a board description letter placed on `position`.
    pub fn from_char(ch: char, position: Square) -> Option<Piece> {
        let color = Color::from_white(ch.is_ascii_uppercase());
        if ch.eq_ignore_ascii_case(&'c') {
            return Some(
                Piece::new(Role::CheckersMan, color, position)
                    .with_flags(PieceFlags::CROWNED | PieceFlags::MOVED),
            );
        }
        Role::from_char(ch).map(|role| Piece::new(role, color, position))
    }

    /// Tests whether the piece may move to `to` by its movement pattern.
    ///
    /// Checks the pattern, that sliding paths are clear and that the
    /// destination is empty or holds an opposing piece. For a king an
    /// unmoved two-column shift is admitted here and left to the rules to
    /// validate as castling.
    pub fn is_valid_move(&self, to: Square, ctx: &MoveContext<'_>) -> bool {
        let from = self.position;
        if from == to {
            return false;
        }
        let board = ctx.board;
        let target = board.piece_at(to);
        if target.is_some_and(|t| t.color == self.color) {
            return false;
        }
        let (dr, dc) = from.delta(to);

        match self.role {
            Role::Pawn => {
                let fwd = self.color.forward();
                if dc == 0 {
                    target.is_none()
                        && (dr == fwd
                            || (dr == 2 * fwd
                                && from.row() == self.color.pawn_row()
                                && board.is_path_clear(from, to)))
                } else {
                    dr == fwd
                        && dc.abs() == 1
                        && (target.is_some() || ctx.en_passant == Some(to))
                }
            }
            Role::Knight => KNIGHT_JUMPS.contains(&(dr, dc)),
            Role::Bishop => dr.abs() == dc.abs() && board.is_path_clear(from, to),
            Role::Rook => (dr == 0 || dc == 0) && board.is_path_clear(from, to),
            Role::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && board.is_path_clear(from, to)
            }
            Role::King => {
                from.distance(to) == 1 || (!self.has_moved() && dr == 0 && dc.abs() == 2)
            }
            Role::CheckersMan => {
                if target.is_some() || dr.abs() != dc.abs() {
                    false
                } else if self.is_crowned() {
                    board.is_path_clear(from, to) || self.jump_victim(to, board).is_some()
                } else if dr == self.color.forward() {
                    !self.has_capture(board)
                } else {
                    dr.abs() == 2 && self.jump_victim(to, board).is_some()
                }
            }
        }
    }

    /// Geometry of a man while a capture chain may be active: during a
    /// chain only captures are accepted.
    pub fn is_valid_move_with_multi_jump(&self, to: Square, board: &Board, multi_jump: bool) -> bool {
        if multi_jump {
            self.role == Role::CheckersMan && self.jump_victim(to, board).is_some()
        } else {
            self.is_valid_move(to, &MoveContext::new(board))
        }
    }

    /// Whether this man may jump over `victim`. Men capture opposing men
    /// only.
    #[inline]
    pub fn can_jump(&self, victim: &Piece) -> bool {
        self.role == Role::CheckersMan
            && victim.color != self.color
            && victim.family() == Family::Checkers
    }

    /// If moving this man to `to` is a capture, the square of the captured
    /// piece.
    ///
    /// An uncrowned man jumps exactly two squares diagonally in any
    /// direction over an adjacent opposing man. A crowned man flies over
    /// exactly one opposing man at any distance, with every other square
    /// on the path empty.
    pub fn jump_victim(&self, to: Square, board: &Board) -> Option<Square> {
        if self.role != Role::CheckersMan || board.piece_at(to).is_some() {
            return None;
        }
        let from = self.position;
        let (dr, dc) = from.delta(to);
        if dr == 0 || dr.abs() != dc.abs() || (!self.is_crowned() && dr.abs() != 2) {
            return None;
        }
        let mut occupied = board.between(from, to) & board.occupied();
        let victim = occupied.first()?;
        occupied.remove(victim);
        if !occupied.is_empty() {
            return None;
        }
        board
            .piece_at(victim)
            .filter(|v| self.can_jump(v))
            .map(|_| victim)
    }

    /// Squares this man may land on with a single capture.
    pub fn capture_landings(&self, board: &Board) -> SquareSet {
        let mut landings = SquareSet::EMPTY;
        if self.role != Role::CheckersMan {
            return landings;
        }
        let from = self.position;
        for (drow, dcol) in DIAGONALS {
            let mut sq = from;
            // Slide up to the first piece.
            let victim = loop {
                match sq.offset(drow, dcol) {
                    Some(next) => match board.piece_at(next) {
                        Some(piece) => break Some(piece),
                        None if self.is_crowned() => sq = next,
                        None => break None,
                    },
                    None => break None,
                }
            };
            let Some(victim) = victim.filter(|v| self.can_jump(v)) else {
                continue;
            };
            let mut land = victim.position;
            while let Some(next) = land.offset(drow, dcol) {
                if board.piece_at(next).is_some() {
                    break;
                }
                landings.insert(next);
                if !self.is_crowned() {
                    break;
                }
                land = next;
            }
        }
        landings
    }

    #[inline]
    pub fn has_capture(&self, board: &Board) -> bool {
        !self.capture_landings(board).is_empty()
    }

    /// Tests whether the piece attacks `target`, i.e. could capture a
    /// piece standing there.
    ///
    /// Pawns attack only along their capture diagonal. Men attack squares
    /// they could jump over.
    pub fn attacks(&self, target: Square, board: &Board) -> bool {
        let from = self.position;
        if from == target {
            return false;
        }
        let (dr, dc) = from.delta(target);
        match self.role {
            Role::Pawn => dr == self.color.forward() && dc.abs() == 1,
            Role::Knight => KNIGHT_JUMPS.contains(&(dr, dc)),
            Role::Bishop => dr.abs() == dc.abs() && board.is_path_clear(from, target),
            Role::Rook => (dr == 0 || dc == 0) && board.is_path_clear(from, target),
            Role::Queen => {
                (dr == 0 || dc == 0 || dr.abs() == dc.abs()) && board.is_path_clear(from, target)
            }
            Role::King => from.distance(target) == 1,
            Role::CheckersMan => {
                if dr.abs() != dc.abs() || (!self.is_crowned() && dr.abs() != 1) {
                    return false;
                }
                let beyond = target.offset(dr.signum(), dc.signum());
                board.is_path_clear(from, target)
                    && beyond.is_some_and(|sq| board.piece_at(sq).is_none())
            }
        }
    }

    /// Candidate destinations by movement pattern, before any validation.
    pub(crate) fn pseudo_targets(&self) -> SquareSet {
        let from = self.position;
        let mut targets = SquareSet::EMPTY;
        let mut ray = |dirs: &[(i8, i8)], max: i8| {
            for &(drow, dcol) in dirs {
                for step in 1..=max {
                    match from.offset(drow * step, dcol * step) {
                        Some(sq) => targets.insert(sq),
                        None => break,
                    }
                }
            }
        };
        match self.role {
            Role::Pawn => {
                let fwd = self.color.forward();
                ray(&[(fwd, -1), (fwd, 0), (fwd, 1)], 1);
                ray(&[(fwd, 0)], 2);
            }
            Role::Knight => ray(&KNIGHT_JUMPS[..], 1),
            Role::Bishop => ray(&DIAGONALS[..], 7),
            Role::Rook => ray(&ORTHOGONALS[..], 7),
            Role::Queen => {
                ray(&DIAGONALS[..], 7);
                ray(&ORTHOGONALS[..], 7);
            }
            Role::King => {
                ray(&DIAGONALS[..], 1);
                ray(&ORTHOGONALS[..], 1);
                ray(&[(0, -1), (0, 1)], 2);
            }
            Role::CheckersMan => ray(&DIAGONALS[..], if self.is_crowned() { 7 } else { 2 }),
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().expect("valid square")
    }

    fn place(board: &mut Board, role: Role, color: Color, at: &str) {
        board.set_piece_at(sq(at), Piece::new(role, color, sq(at)));
    }

    #[test]
    fn test_pawn_geometry() {
        let mut board = Board::empty();
        place(&mut board, Role::Pawn, Color::White, "e2");
        place(&mut board, Role::Knight, Color::Black, "d3");
        let pawn = board.piece_at(sq("e2")).expect("pawn");
        let ctx = MoveContext::new(&board);
        assert!(pawn.is_valid_move(sq("e3"), &ctx));
        assert!(pawn.is_valid_move(sq("e4"), &ctx));
        assert!(pawn.is_valid_move(sq("d3"), &ctx));
        assert!(!pawn.is_valid_move(sq("f3"), &ctx));
        assert!(!pawn.is_valid_move(sq("e5"), &ctx));
        assert!(!pawn.is_valid_move(sq("e1"), &ctx));

        place(&mut board, Role::Rook, Color::Black, "e3");
        let ctx = MoveContext::new(&board);
        assert!(!pawn.is_valid_move(sq("e3"), &ctx));
        assert!(!pawn.is_valid_move(sq("e4"), &ctx));
    }

    #[test]
    fn test_en_passant_geometry() {
        let mut board = Board::empty();
        place(&mut board, Role::Pawn, Color::Black, "d4");
        place(&mut board, Role::Pawn, Color::White, "e4");
        let pawn = board.piece_at(sq("d4")).expect("pawn");
        let ctx = MoveContext::new(&board);
        assert!(!pawn.is_valid_move(sq("e3"), &ctx));
        assert!(pawn.is_valid_move(sq("e3"), &ctx.with_en_passant(Some(sq("e3")))));
    }

    #[test]
    fn test_sliders_blocked() {
        let mut board = Board::empty();
        place(&mut board, Role::Queen, Color::White, "d1");
        place(&mut board, Role::Pawn, Color::White, "d2");
        let queen = board.piece_at(sq("d1")).expect("queen");
        let ctx = MoveContext::new(&board);
        assert!(!queen.is_valid_move(sq("d5"), &ctx));
        assert!(!queen.is_valid_move(sq("d2"), &ctx));
        assert!(queen.is_valid_move(sq("h5"), &ctx));
        assert!(queen.is_valid_move(sq("a1"), &ctx));
        assert!(!queen.is_valid_move(sq("e3"), &ctx));
    }

    #[test]
    fn test_man_steps_forward_only() {
        let mut board = Board::empty();
        place(&mut board, Role::CheckersMan, Color::White, "c3");
        let man = board.piece_at(sq("c3")).expect("man");
        let ctx = MoveContext::new(&board);
        assert!(man.is_valid_move(sq("b4"), &ctx));
        assert!(man.is_valid_move(sq("d4"), &ctx));
        assert!(!man.is_valid_move(sq("b2"), &ctx));
        assert!(!man.is_valid_move(sq("c4"), &ctx));
        assert!(!man.is_valid_move(sq("e5"), &ctx));
    }

    #[test]
    fn test_man_jumps_any_direction() {
        let mut board = Board::empty();
        place(&mut board, Role::CheckersMan, Color::White, "d4");
        place(&mut board, Role::CheckersMan, Color::Black, "c3");
        let man = board.piece_at(sq("d4")).expect("man");
        assert_eq!(man.jump_victim(sq("b2"), &board), Some(sq("c3")));
        assert_eq!(man.capture_landings(&board), SquareSet::from_square(sq("b2")));
        // A man with a capture may not step.
        assert!(!man.is_valid_move(sq("e5"), &MoveContext::new(&board)));
        assert!(man.is_valid_move_with_multi_jump(sq("b2"), &board, true));
        assert!(!man.is_valid_move_with_multi_jump(sq("e5"), &board, true));
    }

    #[test]
    fn test_men_do_not_jump_chess_pieces() {
        let mut board = Board::empty();
        place(&mut board, Role::CheckersMan, Color::White, "d4");
        place(&mut board, Role::Knight, Color::Black, "c5");
        let man = board.piece_at(sq("d4")).expect("man");
        assert!(man.capture_landings(&board).is_empty());
        assert_eq!(man.jump_victim(sq("b6"), &board), None);
        assert!(man.is_valid_move(sq("e5"), &MoveContext::new(&board)));
    }

    #[test]
    fn test_crowned_man_flies() {
        let mut board = Board::empty();
        board.set_piece_at(
            sq("a1"),
            Piece::new(Role::CheckersMan, Color::White, sq("a1")).with_flags(PieceFlags::CROWNED),
        );
        place(&mut board, Role::CheckersMan, Color::Black, "d4");
        let king = board.piece_at(sq("a1")).expect("crowned man");
        assert!(king.is_valid_move(sq("c3"), &MoveContext::new(&board)));
        assert_eq!(king.jump_victim(sq("f6"), &board), Some(sq("d4")));
        assert_eq!(king.capture_landings(&board).len(), 4);

        place(&mut board, Role::CheckersMan, Color::Black, "e5");
        assert_eq!(king.jump_victim(sq("f6"), &board), None);
        assert!(king.capture_landings(&board).is_empty());
    }

    #[test]
    fn test_piece_chars() {
        let sq = Square::new(0, 0);
        for ch in "PNBRQKMCpnbrqkmc".chars() {
            assert_eq!(Piece::from_char(ch, sq).map(|p| p.char()), Some(ch));
        }
        assert!(Piece::from_char('x', sq).is_none());
    }
}
