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


use crate::{board::Board, color::Color, outcome::Outcome, square::Square};

/// Receives notifications from a [`Game`](crate::Game).
///
/// Every method has an empty default, so observers implement only what
/// they display.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
/// use unichess::{Game, GameMode, GameObserver, Square};
///
/// struct Statuses(Rc<RefCell<Vec<String>>>);
///
/// impl GameObserver for Statuses {
///     fn status(&mut self, message: &str) {
///         self.0.borrow_mut().push(message.to_owned());
///     }
/// }
///
/// let log = Rc::new(RefCell::new(Vec::new()));
/// let mut game = Game::start(GameMode::Chess);
/// game.add_observer(Box::new(Statuses(Rc::clone(&log))));
/// assert!(!game.request_move(Square::new(6, 4), Square::new(3, 4)));
/// assert_eq!(log.borrow().last().map(String::as_str), Some("illegal move"));
/// ```
pub trait GameObserver {
    /// Called after every change of the board.
    fn board_changed(&mut self, board: &Board) {
        let _board = board;
    }

    /// Called with a human readable status line.
    fn status(&mut self, message: &str) {
        let _message = message;
    }

    /// Called when the pawn on `square` waits for
    /// [`Game::complete_promotion()`](crate::Game::complete_promotion).
    fn promotion_requested(&mut self, square: Square, color: Color) {
        let _square = square;
        let _color = color;
    }

    /// Called once when the game ends.
    fn game_over(&mut self, outcome: Outcome) {
        let _outcome = outcome;
    }
}
