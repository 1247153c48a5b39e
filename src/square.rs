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

use std::{cmp::max, error::Error, fmt, str::FromStr};

/// A square of the 8x8 grid, stored as `row * 8 + col`.
///
/// Row 0 is the top of the board (rank 8, Black's home side) and column 0
/// is the a-file.
///
/// # Examples
///
/// ```
/// use unichess::Square;
///
/// let sq = Square::new(6, 4);
/// assert_eq!(sq.to_string(), "e2");
/// assert_eq!("e2".parse::<Square>().ok(), Some(sq));
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Square(u8);

impl Square {
    /// Creates a square from row and column.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if either coordinate is out of range.
    #[inline]
    pub const fn new(row: u8, col: u8) -> Square {
        debug_assert!(row < 8 && col < 8);
        Square((row << 3) | col)
    }

    /// Creates a square from signed coordinates, or `None` when they fall
    /// off the board.
    #[inline]
    pub const fn from_coords(row: i8, col: i8) -> Option<Square> {
        if 0 <= row && row < 8 && 0 <= col && col < 8 {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// Creates a square from its index `0..64`.
    #[inline]
    pub const fn from_index(index: usize) -> Option<Square> {
        if index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Parses a square name like `e4`.
    pub fn from_ascii(s: &[u8]) -> Result<Square, ParseSquareError> {
        match *s {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Ok(Square::new(b'8' - rank, file - b'a'))
            }
            _ => Err(ParseSquareError),
        }
    }

    #[inline]
    pub const fn row(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub const fn col(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The square `(row + drow, col + dcol)`, if it is on the board.
    #[inline]
    pub const fn offset(self, drow: i8, dcol: i8) -> Option<Square> {
        Square::from_coords(self.row() as i8 + drow, self.col() as i8 + dcol)
    }

    /// Dark squares are those where `row + col` is odd. Checkers men only
    /// ever stand on them.
    #[inline]
    pub const fn is_dark(self) -> bool {
        (self.row() + self.col()) % 2 == 1
    }

    pub fn file_char(self) -> char {
        char::from(b'a' + self.col())
    }

    pub fn rank_char(self) -> char {
        char::from(b'8' - self.row())
    }

    /// Signed row and column deltas from `self` to `other`.
    #[inline]
    pub const fn delta(self, other: Square) -> (i8, i8) {
        (
            other.row() as i8 - self.row() as i8,
            other.col() as i8 - self.col() as i8,
        )
    }

    /// Chebyshev distance.
    pub fn distance(self, other: Square) -> u8 {
        max(self.row().abs_diff(other.row()), self.col().abs_diff(other.col()))
    }

    /// Iterates over all squares, row by row.
    pub fn all() -> impl DoubleEndedIterator<Item = Square> + ExactSizeIterator {
        (0..64u8).map(Square)
    }
}

impl From<Square> for usize {
    #[inline]
    fn from(sq: Square) -> usize {
        sq.index()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self, self.row(), self.col())
    }
}

/// Error when parsing an invalid square name.
#[derive(Clone, Debug)]
pub struct ParseSquareError;

impl fmt::Display for ParseSquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid square name")
    }
}

impl Error for ParseSquareError {}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Square, ParseSquareError> {
        Square::from_ascii(s.as_bytes())
    }
}

#[cfg(feature = "arbitrary")]
impl<'a> arbitrary::Arbitrary<'a> for Square {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Square(u.int_in_range(0..=63)?))
    }

    fn size_hint(_depth: usize) -> (usize, Option<usize>) {
        (1, Some(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square() {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::new(row, col);
                assert_eq!(sq.row(), row);
                assert_eq!(sq.col(), col);
                assert_eq!(sq.to_string().parse::<Square>().ok(), Some(sq));
            }
        }
    }

    #[test]
    fn test_algebraic() {
        assert_eq!(Square::new(0, 0).to_string(), "a8");
        assert_eq!(Square::new(7, 7).to_string(), "h1");
        assert_eq!(Square::new(6, 4).to_string(), "e2");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn test_offset() {
        let sq = Square::new(0, 7);
        assert_eq!(sq.offset(-1, 0), None);
        assert_eq!(sq.offset(0, 1), None);
        assert_eq!(sq.offset(1, -1), Some(Square::new(1, 6)));
        assert_eq!(Square::new(2, 2).delta(Square::new(4, 4)), (2, 2));
    }

    #[test]
    fn test_distance() {
        assert_eq!(Square::new(6, 3).distance(Square::new(5, 6)), 3);
        assert!(Square::new(0, 1).is_dark());
        assert!(!Square::new(7, 7).is_dark());
    }
}
