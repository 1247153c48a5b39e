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

//! Zobrist hashing of positions, used as the key of the repetition ledger.
//!
//! The key covers the piece layout (role, color and crowned flag per
//! square) and the side to move. Castling rights and en passant are not
//! part of it.
//!
//! # Examples
//!
//! ```
//! use unichess::{zobrist::zobrist_hash, Board, Color, GameMode};
//!
//! let board = Board::new(GameMode::Chess);
//! assert_ne!(zobrist_hash(&board, Color::White), zobrist_hash(&board, Color::Black));
//! ```

use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::{BitXor, BitXorAssign},
};

use crate::{board::Board, color::Color, piece::Piece, role::Role, square::Square};

/// A 64 bit Zobrist hash.
#[derive(Default, Copy, Clone, Eq, PartialEq)]
pub struct Zobrist64(pub u64);

impl Zobrist64 {
    #[inline]
    pub fn for_piece(square: Square, piece: &Piece) -> Zobrist64 {
        let kind = match piece.role {
            Role::Pawn => 0,
            Role::Knight => 1,
            Role::Bishop => 2,
            Role::Rook => 3,
            Role::Queen => 4,
            Role::King => 5,
            Role::CheckersMan if piece.is_crowned() => 7,
            Role::CheckersMan => 6,
        };
        let idx = (kind * 2 + piece.color as usize) * 64 + square.index();
        Zobrist64(PIECE_MASKS[idx])
    }

    #[inline]
    pub fn for_white_turn() -> Zobrist64 {
        Zobrist64(WHITE_TURN_MASK)
    }
}

impl BitXor for Zobrist64 {
    type Output = Zobrist64;

    #[inline]
    fn bitxor(self, other: Zobrist64) -> Zobrist64 {
        Zobrist64(self.0 ^ other.0)
    }
}

impl BitXorAssign for Zobrist64 {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Zobrist64) {
        self.0 ^= rhs.0;
    }
}

impl Hash for Zobrist64 {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        state.write_u64(self.0);
    }
}

impl nohash_hasher::IsEnabled for Zobrist64 {}

impl fmt::Debug for Zobrist64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zobrist64({:#x})", self.0)
    }
}

impl fmt::LowerHex for Zobrist64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Computes the hash of a board with `turn` to move.
pub fn zobrist_hash(board: &Board, turn: Color) -> Zobrist64 {
    let mut hash = Zobrist64::default();
    for piece in board.pieces() {
        hash ^= Zobrist64::for_piece(piece.position(), &piece);
    }
    if turn.is_white() {
        hash ^= Zobrist64::for_white_turn();
    }
    hash
}

const fn splitmix64(state: u64) -> u64 {
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

// 8 piece kinds (6 chess roles, man, crowned man) x 2 colors x 64 squares.
const PIECE_MASKS: [u64; 8 * 2 * 64] = {
    let mut table = [0; 8 * 2 * 64];
    let mut i = 0;
    while i < table.len() {
        table[i] = splitmix64(GOLDEN_GAMMA.wrapping_mul(i as u64 + 1));
        i += 1;
    }
    table
};

const WHITE_TURN_MASK: u64 = splitmix64(GOLDEN_GAMMA.wrapping_mul(8 * 2 * 64 + 1));
