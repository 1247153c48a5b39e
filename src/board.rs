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

use std::fmt::{self, Write as _};

use arrayvec::ArrayVec;

use crate::{
    color::Color, mode::GameMode, piece::Piece, role::Role, square::Square,
    square_set::SquareSet,
};

/// Maximum number of square edits a single [`Board::simulate()`] call may
/// apply.
pub const MAX_SIMULATED_EDITS: usize = 4;

const BACKRANK: [Role; 8] = [
    Role::Rook,
    Role::Knight,
    Role::Bishop,
    Role::Queen,
    Role::King,
    Role::Bishop,
    Role::Knight,
    Role::Rook,
];

/// The 8x8 grid of pieces.
///
/// Every piece on the board knows its own square. All placement goes
/// through the board, which keeps the two in sync.
///
/// # Examples
///
/// ```
/// use unichess::{Board, Color, GameMode, Role, Square};
///
/// let board = Board::new(GameMode::Chess);
/// let king = board.piece_at(Square::new(7, 4)).unwrap();
/// assert_eq!((king.role, king.color), (Role::King, Color::White));
/// assert_eq!(board.king_of(Color::Black), Some(Square::new(0, 4)));
/// ```
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Board {
    grid: [Option<Piece>; 64],
}

impl Board {
    pub const fn empty() -> Board {
        Board { grid: [None; 64] }
    }

    /// The initial layout of a game mode.
    pub fn new(mode: GameMode) -> Board {
        let mut board = Board::empty();
        match mode {
            GameMode::Chess => board.place_chess_pieces(),
            GameMode::Checkers => {
                board.place_men(Color::Black, 0..3);
                board.place_men(Color::White, 5..8);
            }
            GameMode::Hybrid => {
                board.place_chess_pieces();
                board.place_men(Color::Black, 2..4);
                board.place_men(Color::White, 4..6);
            }
        }
        board
    }

    fn place_chess_pieces(&mut self) {
        for color in Color::ALL {
            for (col, role) in (0..8).zip(BACKRANK) {
                let sq = Square::new(color.backrank(), col);
                self.set_piece_at(sq, Piece::new(role, color, sq));
                let sq = Square::new(color.pawn_row(), col);
                self.set_piece_at(sq, Piece::new(Role::Pawn, color, sq));
            }
        }
    }

    fn place_men(&mut self, color: Color, rows: std::ops::Range<u8>) {
        for row in rows {
            for col in 0..8 {
                let sq = Square::new(row, col);
                if sq.is_dark() {
                    self.set_piece_at(sq, Piece::new(Role::CheckersMan, color, sq));
                }
            }
        }
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()]
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.grid[sq.index()].is_some()
    }

    /// Places a piece, replacing whatever stood on the square. The piece's
    /// position is updated to `sq`.
    pub fn set_piece_at(&mut self, sq: Square, mut piece: Piece) {
        piece.set_position(sq);
        self.grid[sq.index()] = Some(piece);
    }

    pub fn remove_piece_at(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.index()].take()
    }

    /// Relocates the piece on `from` to `to`. Returns the piece that was
    /// standing on `to`, if any.
    pub fn move_piece_to(&mut self, from: Square, to: Square) -> Option<Piece> {
        let piece = self.remove_piece_at(from)?;
        let captured = self.remove_piece_at(to);
        self.set_piece_at(to, piece);
        captured
    }

    pub(crate) fn piece_mut(&mut self, sq: Square) -> Option<&mut Piece> {
        self.grid[sq.index()].as_mut()
    }

    pub fn king_of(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|p| p.role == Role::King && p.color == color)
            .map(|p| p.position())
    }

    /// All pieces, row by row.
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.grid.iter().flatten().copied()
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.color == color)
    }

    pub fn count(&self, role: Role, color: Color) -> usize {
        self.pieces_of(color).filter(|p| p.role == role).count()
    }

    pub fn occupied(&self) -> SquareSet {
        self.pieces().map(|p| p.position()).collect()
    }

    /// Squares strictly between `a` and `b` if they share a row, column or
    /// diagonal. Empty otherwise.
    pub fn between(&self, a: Square, b: Square) -> SquareSet {
        let (dr, dc) = a.delta(b);
        if a == b || !(dr == 0 || dc == 0 || dr.abs() == dc.abs()) {
            return SquareSet::EMPTY;
        }
        let (sr, sc) = (dr.signum(), dc.signum());
        let mut set = SquareSet::EMPTY;
        let mut sq = a;
        while let Some(next) = sq.offset(sr, sc) {
            if next == b {
                break;
            }
            set.insert(next);
            sq = next;
        }
        set
    }

    /// Whether every square strictly between `a` and `b` is empty.
    pub fn is_path_clear(&self, a: Square, b: Square) -> bool {
        (self.between(a, b) & self.occupied()).is_empty()
    }

    /// Applies a batch of square edits, evaluates `probe` on the edited
    /// board and restores every edited square before returning.
    ///
    /// Pieces written by an edit are repositioned to their new square, and
    /// the originals are put back untouched afterwards.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_SIMULATED_EDITS`] edits are given.
    pub fn simulate<R, F>(&mut self, edits: &[(Square, Option<Piece>)], probe: F) -> R
    where
        F: FnOnce(&Board) -> R,
    {
        assert!(edits.len() <= MAX_SIMULATED_EDITS, "too many simulated edits");
        let mut undo: ArrayVec<(Square, Option<Piece>), MAX_SIMULATED_EDITS> = ArrayVec::new();
        for &(sq, piece) in edits {
            undo.push((sq, self.grid[sq.index()]));
            match piece {
                Some(piece) => self.set_piece_at(sq, piece),
                None => self.grid[sq.index()] = None,
            }
        }
        let result = probe(self);
        for (sq, piece) in undo.into_iter().rev() {
            self.grid[sq.index()] = piece;
        }
        result
    }

    /// Tests whether every piece stands on the square it believes it is on.
    pub fn is_consistent(&self) -> bool {
        Square::all().all(|sq| self.grid[sq.index()].is_none_or(|p| p.position() == sq))
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            for col in 0..8 {
                f.write_char(self.piece_at(Square::new(row, col)).map_or('.', |p| p.char()))?;
                f.write_char(if col < 7 { ' ' } else { '\n' })?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
