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


use std::{error::Error, fmt};

use crate::{color::Color, mode::GameMode, role::Role, square::Square};

/// Reason a move request was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlayError {
    /// No game has been started.
    NotStarted,
    /// The game has already ended.
    GameOver,
    /// A pawn promotion must be completed first.
    PromotionPending,
    /// A capture chain is in progress and only the piece on `origin` may
    /// move.
    MultiJumpPinned { origin: Square },
    IllegalMove { from: Square, to: Square },
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PlayError::NotStarted => f.write_str("no game in progress"),
            PlayError::GameOver => f.write_str("game over"),
            PlayError::PromotionPending => f.write_str("promotion pending"),
            PlayError::MultiJumpPinned { origin } => {
                write!(f, "continue capturing with the piece on {origin}")
            }
            PlayError::IllegalMove { .. } => f.write_str("illegal move"),
        }
    }
}

impl Error for PlayError {}

/// Reason a promotion choice was refused.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PromotionError {
    /// No pawn is waiting for promotion.
    NotPending,
    /// Pawns promote to a queen, rook, bishop or knight only.
    InvalidRole(Role),
}

impl fmt::Display for PromotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PromotionError::NotPending => f.write_str("no promotion pending"),
            PromotionError::InvalidRole(role) => write!(f, "cannot promote to {role}"),
        }
    }
}

impl Error for PromotionError {}

/// Reason a position cannot be used to set up a game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PositionError {
    MissingKing(Color),
    TooManyKings(Color),
    /// A piece on `square` does not belong in the mode.
    ForeignPiece { square: Square, mode: GameMode },
    PawnOnBackrank(Square),
    /// An uncrowned man stands on the row where it would be crowned.
    UncrownedManOnLastRow(Square),
    /// The en passant square was not skipped by a two-square pawn advance
    /// of the side that just moved.
    InvalidEnPassant(Square),
    /// The side that just moved is in check.
    OppositeCheck,
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            PositionError::MissingKing(color) => write!(f, "{color} king missing"),
            PositionError::TooManyKings(color) => write!(f, "too many {color} kings"),
            PositionError::ForeignPiece { square, mode } => {
                write!(f, "piece on {square} is not used in {mode}")
            }
            PositionError::PawnOnBackrank(square) => write!(f, "pawn on backrank {square}"),
            PositionError::UncrownedManOnLastRow(square) => {
                write!(f, "uncrowned man on last row {square}")
            }
            PositionError::InvalidEnPassant(square) => {
                write!(f, "invalid en passant square {square}")
            }
            PositionError::OppositeCheck => f.write_str("side not to move is in check"),
        }
    }
}

impl Error for PositionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            PlayError::IllegalMove {
                from: Square::new(6, 4),
                to: Square::new(3, 4)
            }
            .to_string(),
            "illegal move"
        );
        assert_eq!(
            PlayError::MultiJumpPinned {
                origin: Square::new(4, 4)
            }
            .to_string(),
            "continue capturing with the piece on e4"
        );
        assert_eq!(
            PromotionError::InvalidRole(Role::King).to_string(),
            "cannot promote to king"
        );
        assert_eq!(
            PositionError::InvalidEnPassant(Square::new(2, 3)).to_string(),
            "invalid en passant square d6"
        );
    }
}
