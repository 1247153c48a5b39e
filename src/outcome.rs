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

use crate::color::Color;

/// How a finished game ended.
///
/// # Examples
///
/// ```
/// use unichess::{Color, Outcome};
///
/// let outcome: Outcome = "0-1".parse()?;
/// assert_eq!(outcome.winner(), Some(Color::Black));
/// assert_eq!(Outcome::Draw.to_string(), "1/2-1/2");
/// # Ok::<_, unichess::ParseOutcomeError>(())
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }

    pub const fn from_winner(winner: Option<Color>) -> Outcome {
        match winner {
            Some(winner) => Outcome::Decisive { winner },
            None => Outcome::Draw,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Decisive {
                winner: Color::White,
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an [`Outcome`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseOutcomeError;

impl fmt::Display for ParseOutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid outcome")
    }
}

impl Error for ParseOutcomeError {}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Outcome, ParseOutcomeError> {
        match s {
            "1-0" => Ok(Outcome::Decisive {
                winner: Color::White,
            }),
            "0-1" => Ok(Outcome::Decisive {
                winner: Color::Black,
            }),
            "1/2-1/2" => Ok(Outcome::Draw),
            _ => Err(ParseOutcomeError),
        }
    }
}

/// The rule that ended a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    ThreefoldRepetition,
    /// The side to move has no piece or no legal move in checkers.
    NoMoves,
}

impl Termination {
    /// The status line reported to observers.
    pub const fn message(self) -> &'static str {
        match self {
            Termination::Checkmate => "checkmate",
            Termination::Stalemate => "stalemate",
            Termination::InsufficientMaterial => "draw by insufficient material",
            Termination::ThreefoldRepetition => "draw by threefold repetition",
            Termination::NoMoves => "no legal moves",
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_str() {
        for outcome in [
            Outcome::Draw,
            Outcome::from_winner(Some(Color::White)),
            Outcome::from_winner(Some(Color::Black)),
        ] {
            assert_eq!(outcome.as_str().parse(), Ok(outcome));
        }
        assert_eq!("1-1".parse::<Outcome>(), Err(ParseOutcomeError));
    }
}
