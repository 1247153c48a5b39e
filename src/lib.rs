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


//! A rules engine for chess, checkers and a hybrid of the two played on
//! one 8x8 board.
//!
//! # Examples
//!
//! Count legal moves in the starting position:
//!
//! ```
//! use unichess::{Board, GameMode, Rules, TurnState, VariantRules};
//!
//! let rules = VariantRules::new(GameMode::Hybrid);
//! let moves = rules.legal_moves(&Board::new(GameMode::Hybrid), &TurnState::new());
//! assert_eq!(moves.len(), 6);
//! ```
//!
//! Play a game:
//!
//! ```
//! use unichess::{Game, GameMode, Square};
//!
//! let mut game = Game::start(GameMode::Checkers);
//! game.play(Square::new(5, 0), Square::new(4, 1))?;
//! assert!(!game.is_game_over());
//! assert_eq!(game.outcome(), None); // no winner yet
//! # Ok::<_, unichess::PlayError>(())
//! ```
//!
//! Squares are addressed by row and column. Row 0 is the far side of the
//! board as seen by White, so `Square::new(6, 4)` is `e2`. Positions and
//! moves can also be written in an extended [FEN](fen) and in [UCI](uci)
//! notation.
//!
//! # Feature flags
//!
//! * `serde`: Implements [`serde::Serialize`](https://docs.rs/serde/1/serde/trait.Serialize.html)
//!   and [`serde::Deserialize`](https://docs.rs/serde/1/serde/trait.Deserialize.html) for
//!   types with unique natural representations.
//! * `arbitrary`: Implements
//!   [`arbitrary::Arbitrary`](https://docs.rs/arbitrary/1/arbitrary/trait.Arbitrary.html)
//!   for fuzzing.

#![doc(html_root_url = "https://docs.rs/unichess/0.3.0")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]
#![cfg_attr(docs_rs, feature(doc_auto_cfg))]

mod color;
mod errors;
mod game;
mod mode;
mod observer;
mod outcome;
mod piece;
mod role;
mod square;
mod square_set;
mod turn;

pub mod board;
pub mod fen;
pub mod rules;
pub mod uci;
pub mod zobrist;

pub use board::Board;
pub use color::{ByColor, Color, ParseColorError};
pub use errors::{PlayError, PositionError, PromotionError};
pub use fen::{Fen, ParseFenError};
pub use game::{Game, MoveRecord};
pub use mode::{GameMode, ParseGameModeError};
pub use observer::GameObserver;
pub use outcome::{Outcome, ParseOutcomeError, Termination};
pub use piece::{MoveContext, Piece, PieceFlags};
pub use role::{Family, Role};
pub use rules::{MoveEffects, Rules, VariantRules};
pub use square::{ParseSquareError, Square};
pub use square_set::SquareSet;
pub use turn::{PendingPromotion, PromotionGate, SpecialMoves, TurnState};
pub use uci::{ParseUciError, UciMove};
