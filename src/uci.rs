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

//! Moves and commands exchanged with an external engine over its line
//! based text protocol.
//!
//! The engine is sent the position and a time budget and answers with a
//! single `bestmove` line. The move is then played through
//! [`Game::play_uci()`](crate::Game::play_uci), like any move by a human.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use unichess::{uci::{parse_bestmove, SearchRequest, UciMove}, Fen, Board, Color, GameMode, Role, Square};
//!
//! let fen = Fen::from_board(Board::new(GameMode::Chess), Color::White);
//! let request = SearchRequest { fen: &fen, movetime: Duration::from_millis(500) };
//! assert_eq!(
//!     request.to_string(),
//!     "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1\ngo movetime 500"
//! );
//!
//! let uci = parse_bestmove("bestmove e7e8q ponder d8e8")?;
//! assert_eq!(uci, UciMove {
//!     from: Square::new(1, 4),
//!     to: Square::new(0, 4),
//!     promotion: Some(Role::Queen),
//! });
//! # Ok::<_, unichess::uci::ParseUciError>(())
//! ```

use std::{error::Error, fmt, str::FromStr, time::Duration};

use crate::{fen::Fen, role::Role, square::Square};

/// Error when parsing an invalid move or engine reply.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseUciError;

impl fmt::Display for ParseUciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid uci")
    }
}

impl Error for ParseUciError {}

/// A move written as origin, destination and an optional promotion letter,
/// like `e2e4` or `e7e8q`.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl UciMove {
    /// Parses a move from ASCII. The null move `0000` is rejected.
    pub fn from_ascii(s: &[u8]) -> Result<UciMove, ParseUciError> {
        if s.len() != 4 && s.len() != 5 {
            return Err(ParseUciError);
        }
        let from = Square::from_ascii(&s[0..2]).map_err(|_| ParseUciError)?;
        let to = Square::from_ascii(&s[2..4]).map_err(|_| ParseUciError)?;
        let promotion = match s.get(4) {
            Some(&ch) => Some(
                Role::from_char(char::from(ch))
                    .filter(|role| role.is_promotion_choice() && ch.is_ascii_lowercase())
                    .ok_or(ParseUciError)?,
            ),
            None => None,
        };
        if from == to {
            return Err(ParseUciError);
        }
        Ok(UciMove {
            from,
            to,
            promotion,
        })
    }
}

impl FromStr for UciMove {
    type Err = ParseUciError;

    fn from_str(s: &str) -> Result<UciMove, ParseUciError> {
        UciMove::from_ascii(s.as_bytes())
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

/// The two command lines asking the engine for a move.
#[derive(Clone, Debug)]
pub struct SearchRequest<'a> {
    pub fen: &'a Fen,
    pub movetime: Duration,
}

impl fmt::Display for SearchRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "position fen {}\ngo movetime {}",
            self.fen,
            self.movetime.as_millis()
        )
    }
}

/// Extracts the move from a `bestmove` reply line. Trailing tokens such as
/// a ponder move are ignored.
pub fn parse_bestmove(line: &str) -> Result<UciMove, ParseUciError> {
    let mut tokens = line.split_ascii_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some("bestmove"), Some(uci)) => uci.parse(),
        _ => Err(ParseUciError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uci() {
        let uci: UciMove = "e2e4".parse().expect("valid uci");
        assert_eq!(uci.from, Square::new(6, 4));
        assert_eq!(uci.to, Square::new(4, 4));
        assert_eq!(uci.promotion, None);
        assert_eq!(uci.to_string(), "e2e4");

        let uci: UciMove = "a7a8n".parse().expect("valid uci");
        assert_eq!(uci.promotion, Some(Role::Knight));
        assert_eq!(uci.to_string(), "a7a8n");
    }

    #[test]
    fn test_invalid_uci() {
        for s in ["0000", "e2e2", "e2e9", "e7e8k", "e7e8Q", "e2e4qq", "e2"] {
            assert_eq!(s.parse::<UciMove>(), Err(ParseUciError), "{s}");
        }
    }

    #[test]
    fn test_bestmove() {
        assert_eq!(
            parse_bestmove("bestmove g1f3").map(|m| m.to_string()),
            Ok("g1f3".to_owned())
        );
        assert_eq!(parse_bestmove("info depth 3"), Err(ParseUciError));
        assert_eq!(parse_bestmove("bestmove"), Err(ParseUciError));
    }
}
