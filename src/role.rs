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

use std::fmt;

/// Piece types: `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King` and
/// the checkers `CheckersMan`.
///
/// # Examples
///
/// ```
/// use unichess::{Family, Role};
///
/// assert_eq!(Role::from_char('K'), Some(Role::King));
/// assert_eq!(Role::from_char('m'), Some(Role::CheckersMan));
/// assert_eq!(Role::CheckersMan.family(), Family::Checkers);
/// ```
#[allow(missing_docs)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
    CheckersMan,
}

impl Role {
    /// Gets the piece type from its letter. Men are `m`.
    pub const fn from_char(ch: char) -> Option<Role> {
        match ch {
            'P' | 'p' => Some(Role::Pawn),
            'N' | 'n' => Some(Role::Knight),
            'B' | 'b' => Some(Role::Bishop),
            'R' | 'r' => Some(Role::Rook),
            'Q' | 'q' => Some(Role::Queen),
            'K' | 'k' => Some(Role::King),
            'M' | 'm' => Some(Role::CheckersMan),
            _ => None,
        }
    }

    /// Gets the lowercase letter of the piece type.
    pub const fn char(self) -> char {
        match self {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
            Role::CheckersMan => 'm',
        }
    }

    /// Gets the uppercase letter of the piece type.
    pub const fn upper_char(self) -> char {
        self.char().to_ascii_uppercase()
    }

    pub const fn family(self) -> Family {
        match self {
            Role::CheckersMan => Family::Checkers,
            _ => Family::Chess,
        }
    }

    /// Whether a pawn may be promoted to this role.
    pub const fn is_promotion_choice(self) -> bool {
        matches!(self, Role::Queen | Role::Rook | Role::Bishop | Role::Knight)
    }

    /// Knights and bishops.
    pub const fn is_minor(self) -> bool {
        matches!(self, Role::Knight | Role::Bishop)
    }

    /// `Pawn`, `Knight`, `Bishop`, `Rook`, `Queen`, `King`, `CheckersMan`,
    /// in this order.
    pub const ALL: [Role; 7] = [
        Role::Pawn,
        Role::Knight,
        Role::Bishop,
        Role::Rook,
        Role::Queen,
        Role::King,
        Role::CheckersMan,
    ];

    /// The roles a pawn may promote to, strongest first.
    pub const PROMOTIONS: [Role; 4] = [Role::Queen, Role::Rook, Role::Bishop, Role::Knight];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Pawn => "pawn",
            Role::Knight => "knight",
            Role::Bishop => "bishop",
            Role::Rook => "rook",
            Role::Queen => "queen",
            Role::King => "king",
            Role::CheckersMan => "man",
        })
    }
}

/// The set of pieces a [`Role`] belongs to.
///
/// In hybrid games a piece may only capture pieces of its own family.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Family {
    Chess,
    Checkers,
}
