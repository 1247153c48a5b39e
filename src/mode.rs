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

use std::{error::Error, fmt, str::FromStr};

/// The game played on the board. Chosen once per game.
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum GameMode {
    /// Standard chess.
    #[default]
    Chess,
    /// Checkers with flying kings and mandatory capture.
    Checkers,
    /// Chess pieces on the two back rows of each side, men on the four
    /// middle rows. Pieces only capture within their own family.
    Hybrid,
}

impl GameMode {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Chess => "chess",
            Self::Checkers => "checkers",
            Self::Hybrid => "hybrid",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Some(match s {
            "chess" => Self::Chess,
            "checkers" => Self::Checkers,
            "hybrid" | "unified" => Self::Hybrid,
            _ => return None,
        })
    }

    /// Whether chess pieces take part, which brings in check, castling and
    /// promotion choices.
    pub const fn has_chess(self) -> bool {
        matches!(self, Self::Chess | Self::Hybrid)
    }

    /// Whether men take part, which brings in jumps and multi-jump chains.
    pub const fn has_checkers(self) -> bool {
        matches!(self, Self::Checkers | Self::Hybrid)
    }

    pub const ALL: [Self; 3] = [Self::Chess, Self::Checkers, Self::Hybrid];
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when parsing an unknown game mode name.
#[derive(Clone, Debug)]
pub struct ParseGameModeError;

impl fmt::Display for ParseGameModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown game mode")
    }
}

impl Error for ParseGameModeError {}

impl FromStr for GameMode {
    type Err = ParseGameModeError;

    fn from_str(s: &str) -> Result<Self, ParseGameModeError> {
        Self::from_name(s).ok_or(ParseGameModeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        for mode in GameMode::ALL {
            assert_eq!(mode.to_string().parse::<GameMode>().ok(), Some(mode));
        }
        assert_eq!("unified".parse::<GameMode>().ok(), Some(GameMode::Hybrid));
        assert!("draughts".parse::<GameMode>().is_err());
    }

    #[test]
    fn test_families() {
        assert!(GameMode::Hybrid.has_chess() && GameMode::Hybrid.has_checkers());
        assert!(!GameMode::Checkers.has_chess());
        assert!(!GameMode::Chess.has_checkers());
    }
}
