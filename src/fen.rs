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

//! Parse and write board descriptions in an extended Forsyth-Edwards
//! notation.
//!
//! Placement is written from row 0 (rank 8) to row 7 (rank 1). Besides the
//! usual chess letters, men are `M`/`m` and crowned men `C`/`c`. Everything
//! after the placement is optional when parsing.
//!
//! # Examples
//!
//! ```
//! use unichess::{Board, Color, Fen, GameMode};
//!
//! let fen: Fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1".parse()?;
//! assert_eq!(fen.board, Board::new(GameMode::Chess));
//! assert_eq!(fen.turn, Color::White);
//!
//! let checkers = Fen::from_board(Board::new(GameMode::Checkers), Color::White);
//! assert_eq!(checkers.to_string(), "1m1m1m1m/m1m1m1m1/1m1m1m1m/8/8/M1M1M1M1/1M1M1M1M/M1M1M1M1 w - - 0 1");
//! # Ok::<_, unichess::fen::ParseFenError>(())
//! ```

use std::{
    error::Error,
    fmt::{self, Write as _},
    str::FromStr,
};

use crate::{
    board::Board,
    color::Color,
    piece::{Piece, PieceFlags},
    role::Role,
    square::Square,
};

/// Errors that can occur when parsing a board description.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseFenError {
    InvalidFen,
    InvalidBoard,
    InvalidTurn,
    InvalidCastling,
    InvalidEnPassant,
    InvalidHalfmoveClock,
    InvalidFullmoves,
}

impl fmt::Display for ParseFenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseFenError::InvalidFen => "invalid fen",
            ParseFenError::InvalidBoard => "invalid board part in fen",
            ParseFenError::InvalidTurn => "invalid turn part in fen",
            ParseFenError::InvalidCastling => "invalid castling part in fen",
            ParseFenError::InvalidEnPassant => "invalid en passant part in fen",
            ParseFenError::InvalidHalfmoveClock => "invalid halfmove clock in fen",
            ParseFenError::InvalidFullmoves => "invalid fullmove part in fen",
        })
    }
}

impl Error for ParseFenError {}

/// A parsed board description.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fen {
    /// Placement, with the moved flags of kings and rooks set according to
    /// the castling rights.
    pub board: Board,
    pub turn: Color,
    pub en_passant: Option<Square>,
    pub halfmoves: u32,
    pub fullmoves: u32,
}

impl Fen {
    /// Describes `board` with `turn` to move at the start of a game.
    pub fn from_board(board: Board, turn: Color) -> Fen {
        Fen {
            board,
            turn,
            en_passant: None,
            halfmoves: 0,
            fullmoves: 1,
        }
    }

    pub fn from_ascii(fen: &[u8]) -> Result<Fen, ParseFenError> {
        let mut parts = fen.split(|ch| *ch == b' ');

        let mut board = parts
            .next()
            .ok_or(ParseFenError::InvalidFen)
            .and_then(parse_board)?;

        let turn = match parts.next() {
            Some(b"w") | None => Color::White,
            Some(b"b") => Color::Black,
            Some(_) => return Err(ParseFenError::InvalidTurn),
        };

        match parts.next() {
            Some(castling) => apply_castling(&mut board, castling)?,
            None => settle_castling(&mut board, &CASTLING_SLOTS),
        }

        let en_passant = match parts.next() {
            Some(b"-") | None => None,
            Some(sq) => Some(Square::from_ascii(sq).map_err(|_| ParseFenError::InvalidEnPassant)?),
        };

        let halfmoves = match parts.next() {
            Some(s) => btoi::btou(s).map_err(|_| ParseFenError::InvalidHalfmoveClock)?,
            None => 0,
        };

        let fullmoves = match parts.next() {
            Some(s) => match btoi::btou(s) {
                Ok(n) if n > 0 => n,
                _ => return Err(ParseFenError::InvalidFullmoves),
            },
            None => 1,
        };

        if parts.next().is_some() {
            return Err(ParseFenError::InvalidFen);
        }

        Ok(Fen {
            board,
            turn,
            en_passant,
            halfmoves,
            fullmoves,
        })
    }

    /// The castling field, e.g. `KQkq` or `-`.
    pub fn castling(&self) -> String {
        let mut s = String::new();
        for (color, col, letter) in CASTLING_SLOTS {
            if has_castling_right(&self.board, color, col) {
                s.push(color.apply_case(letter));
            }
        }
        if s.is_empty() {
            s.push('-');
        }
        s
    }
}

// Castling letters and the rook column they refer to, in FEN order.
const CASTLING_SLOTS: [(Color, u8, char); 4] = [
    (Color::White, 7, 'k'),
    (Color::White, 0, 'q'),
    (Color::Black, 7, 'k'),
    (Color::Black, 0, 'q'),
];

fn parse_board(s: &[u8]) -> Result<Board, ParseFenError> {
    let mut board = Board::empty();
    let mut row = 0u8;
    for line in s.split(|ch| *ch == b'/') {
        if row >= 8 {
            return Err(ParseFenError::InvalidBoard);
        }
        let mut col = 0u8;
        for &ch in line {
            if (b'1'..=b'8').contains(&ch) {
                col += ch - b'0';
            } else {
                let sq = Square::from_coords(row as i8, col as i8).ok_or(ParseFenError::InvalidBoard)?;
                let piece = Piece::from_char(char::from(ch), sq).ok_or(ParseFenError::InvalidBoard)?;
                board.set_piece_at(sq, piece);
                col += 1;
            }
            if col > 8 {
                return Err(ParseFenError::InvalidBoard);
            }
        }
        if col != 8 {
            return Err(ParseFenError::InvalidBoard);
        }
        row += 1;
    }
    if row != 8 {
        return Err(ParseFenError::InvalidBoard);
    }
    Ok(board)
}

fn has_castling_right(board: &Board, color: Color, rook_col: u8) -> bool {
    let row = color.backrank();
    let unmoved = |col: u8, role: Role| {
        board
            .piece_at(Square::new(row, col))
            .is_some_and(|p| p.role == role && p.color == color && !p.has_moved())
    };
    unmoved(4, Role::King) && unmoved(rook_col, Role::Rook)
}

fn apply_castling(board: &mut Board, s: &[u8]) -> Result<(), ParseFenError> {
    if s == b"-" {
        settle_castling(board, &[]);
        return Ok(());
    }
    let mut slots = Vec::with_capacity(4);
    for &ch in s {
        let slot = CASTLING_SLOTS
            .into_iter()
            .find(|&(color, _, letter)| color.apply_case(letter) == char::from(ch))
            .ok_or(ParseFenError::InvalidCastling)?;
        if slots.contains(&slot) {
            return Err(ParseFenError::InvalidCastling);
        }
        slots.push(slot);
    }
    settle_castling(board, &slots);
    if slots
        .iter()
        .all(|&(color, col, _)| has_castling_right(board, color, col))
    {
        Ok(())
    } else {
        Err(ParseFenError::InvalidCastling)
    }
}

/// Marks every king and rook as moved unless it takes part in one of the
/// given castling rights.
fn settle_castling(board: &mut Board, slots: &[(Color, u8, char)]) {
    for sq in Square::all() {
        let Some(piece) = board.piece_at(sq) else {
            continue;
        };
        let home = sq.row() == piece.color.backrank();
        let keeps_right = match piece.role {
            Role::King => home && sq.col() == 4 && slots.iter().any(|s| s.0 == piece.color),
            Role::Rook => home && slots.iter().any(|s| s.0 == piece.color && s.1 == sq.col()),
            _ => true,
        };
        if !keeps_right {
            board.set_piece_at(sq, piece.with_flags(piece.flags() | PieceFlags::MOVED));
        }
    }
}

impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Fen, ParseFenError> {
        Fen::from_ascii(s.as_bytes())
    }
}

/// Writes only the placement part.
#[derive(Debug)]
pub struct Placement<'a>(pub &'a Board);

impl fmt::Display for Placement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..8 {
            let mut empty = 0;
            for col in 0..8 {
                match self.0.piece_at(Square::new(row, col)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        f.write_char(piece.char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if row < 7 {
                f.write_char('/')?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            Placement(&self.board),
            self.turn.char(),
            self.castling()
        )?;
        match self.en_passant {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_char('-')?,
        }
        write!(f, " {} {}", self.halfmoves, self.fullmoves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::GameMode;

    #[test]
    fn test_start_positions() {
        for mode in GameMode::ALL {
            let board = Board::new(mode);
            let fen = Fen::from_board(board, Color::White);
            let parsed: Fen = fen.to_string().parse().expect("valid fen");
            assert_eq!(parsed.board, board);
        }
    }

    #[test]
    fn test_hybrid_placement() {
        let fen = Fen::from_board(Board::new(GameMode::Hybrid), Color::White);
        assert_eq!(
            fen.to_string(),
            "rnbqkbnr/pppppppp/1m1m1m1m/m1m1m1m1/1M1M1M1M/M1M1M1M1/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
        );
    }

    #[test]
    fn test_castling_rights() {
        let fen: Fen = "r3k2r/8/8/8/8/8/8/R3K2R b Kq - 3 20".parse().expect("valid fen");
        assert_eq!(fen.castling(), "Kq");
        assert_eq!(fen.turn, Color::Black);
        assert_eq!(fen.halfmoves, 3);
        assert_eq!(fen.fullmoves, 20);
        let rook = fen.board.piece_at(Square::new(7, 0)).expect("rook");
        assert!(rook.has_moved());
        let rook = fen.board.piece_at(Square::new(7, 7)).expect("rook");
        assert!(!rook.has_moved());

        assert_eq!(
            "4k3/8/8/8/8/8/8/4K3 w K - 0 1".parse::<Fen>(),
            Err(ParseFenError::InvalidCastling)
        );
    }

    #[test]
    fn test_crowned_men() {
        let fen: Fen = "8/8/8/3c4/8/8/8/1M6 w - - 0 1".parse().expect("valid fen");
        let crowned = fen.board.piece_at(Square::new(3, 3)).expect("crowned man");
        assert!(crowned.is_crowned());
        assert_eq!(crowned.color, Color::Black);
        assert_eq!(fen.to_string(), "8/8/8/3c4/8/8/8/1M6 w - - 0 1");
    }

    #[test]
    fn test_invalid() {
        assert_eq!("8/8/8".parse::<Fen>(), Err(ParseFenError::InvalidBoard));
        assert_eq!("9/8/8/8/8/8/8/8".parse::<Fen>(), Err(ParseFenError::InvalidBoard));
        assert_eq!("8/8/8/8/8/8/8/7x".parse::<Fen>(), Err(ParseFenError::InvalidBoard));
        assert_eq!("8/8/8/8/8/8/8/8 x".parse::<Fen>(), Err(ParseFenError::InvalidTurn));
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - e9".parse::<Fen>(),
            Err(ParseFenError::InvalidEnPassant)
        );
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - - 0 0".parse::<Fen>(),
            Err(ParseFenError::InvalidFullmoves)
        );
        assert_eq!(
            "8/8/8/8/8/8/8/8 w - - 0 1 x".parse::<Fen>(),
            Err(ParseFenError::InvalidFen)
        );
    }
}
