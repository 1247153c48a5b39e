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


//! The game coordinator.
//!
//! [`Game`] sequences turns, keeps the move history and the repetition
//! ledger, and reports what happens to its [`GameObserver`]s.
//!
//! # Examples
//!
//! ```
//! use unichess::{Color, Game, GameMode, Square};
//!
//! let mut game = Game::start(GameMode::Chess);
//! assert!(game.request_move(Square::new(6, 4), Square::new(4, 4)));
//! assert_eq!(game.turn(), Color::Black);
//! assert_eq!(game.history()[0].notation, "e2-e4");
//! assert_eq!(
//!     game.fen().to_string(),
//!     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
//! );
//! ```

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
    time::{Duration, Instant},
};

use log::{debug, info};
use nohash_hasher::BuildNoHashHasher;

use crate::{
    board::Board,
    color::Color,
    errors::{PlayError, PositionError, PromotionError},
    fen::Fen,
    mode::GameMode,
    observer::GameObserver,
    outcome::{Outcome, Termination},
    piece::Piece,
    role::{Family, Role},
    rules::{MoveEffects, Rules, VariantRules},
    square::Square,
    turn::TurnState,
    uci::UciMove,
    zobrist::{zobrist_hash, Zobrist64},
};

const CONTINUE_CAPTURING: &str = "continue capturing or select the piece again to end the turn";

/// A move in the history of a game.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MoveRecord {
    /// Long algebraic notation like `Ng1-f3`, `e5xd6` or `O-O`. A completed
    /// promotion appends `=Q`.
    pub notation: String,
    pub color: Color,
    /// Time since the previous move.
    pub elapsed: Duration,
}

/// A game in progress.
pub struct Game {
    board: Board,
    mode: GameMode,
    rules: VariantRules,
    state: TurnState,
    started: bool,
    history: Vec<MoveRecord>,
    ledger: HashMap<Zobrist64, u32, BuildNoHashHasher<Zobrist64>>,
    halfmoves: u32,
    fullmoves: u32,
    end: Option<(Outcome, Termination)>,
    last_move_at: Instant,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Game {
    /// No game in progress. Every move request is refused until a game is
    /// started.
    pub fn new() -> Game {
        Game::with_board(GameMode::default(), Board::empty(), TurnState::new(), false)
    }

    /// Starts a game of `mode` from its initial layout.
    pub fn start(mode: GameMode) -> Game {
        info!("starting a game of {mode}");
        let mut game = Game::with_board(mode, Board::new(mode), TurnState::new(), true);
        game.evaluate();
        game
    }

    /// Sets up a game of `mode` from a board description.
    ///
    /// # Errors
    ///
    /// Errors if the position has pieces that do not belong in `mode`, a
    /// wrong number of kings, pawns on a backrank, uncrowned men on their
    /// crowning row, an en passant square that no pawn just skipped, or if
    /// the side that is not to move is in check.
    ///
    /// # Examples
    ///
    /// ```
    /// use unichess::{Fen, Game, GameMode, PositionError};
    ///
    /// let fen: Fen = "4k3/8/8/8/8/8/8/8 w".parse()?;
    /// assert!(matches!(Game::from_fen(GameMode::Chess, &fen), Err(PositionError::MissingKing(_))));
    /// # Ok::<_, Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_fen(mode: GameMode, fen: &Fen) -> Result<Game, PositionError> {
        validate_position(mode, fen)?;
        let mut state = TurnState::with_turn(fen.turn);
        state.special.en_passant = fen.en_passant;
        let mut game = Game::with_board(mode, fen.board, state, true);
        game.halfmoves = fen.halfmoves;
        game.fullmoves = fen.fullmoves;
        info!("set up a game of {mode} from {fen}");
        game.evaluate();
        Ok(game)
    }

    fn with_board(mode: GameMode, board: Board, state: TurnState, started: bool) -> Game {
        Game {
            board,
            mode,
            rules: VariantRules::new(mode),
            state,
            started,
            history: Vec::new(),
            ledger: HashMap::default(),
            halfmoves: 0,
            fullmoves: 1,
            end: None,
            last_move_at: Instant::now(),
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    /// Requests a move and reports a refusal as a status message.
    ///
    /// Returns whether the move was played.
    pub fn request_move(&mut self, from: Square, to: Square) -> bool {
        match self.play(from, to) {
            Ok(()) => true,
            Err(err) => {
                debug!("refused {from}{to}: {err}");
                self.notify_status(&err.to_string());
                false
            }
        }
    }

    /// Plays a move.
    ///
    /// While a capture chain is in progress, requesting the pinned square
    /// as both origin and destination ends the turn.
    ///
    /// # Errors
    ///
    /// Errors if no game is in progress, the game is over, a promotion is
    /// pending, another piece is pinned by a capture chain, or the move is
    /// illegal. The game is unchanged in each case.
    pub fn play(&mut self, from: Square, to: Square) -> Result<(), PlayError> {
        if !self.started {
            return Err(PlayError::NotStarted);
        }
        if self.end.is_some() {
            return Err(PlayError::GameOver);
        }
        if self.state.promotion.is_waiting() {
            return Err(PlayError::PromotionPending);
        }
        if let Some(origin) = self.state.special.multi_jump {
            if from != origin {
                return Err(PlayError::MultiJumpPinned { origin });
            }
            if to == origin {
                self.state.special.release();
                debug!("capture chain ended on {origin}");
                self.finish_turn();
                return Ok(());
            }
        }
        let piece = match self.board.piece_at(from) {
            Some(piece) if self.rules.is_valid_move(&self.board, &self.state, from, to) => piece,
            _ => return Err(PlayError::IllegalMove { from, to }),
        };

        let en_passant_capture = match piece.role {
            Role::Pawn if from.col() != to.col() => {
                self.state.special.en_passant_victim(piece.color, to)
            }
            _ => None,
        };
        let effects = self.rules.move_piece(
            &mut self.board,
            from,
            to,
            self.state.special.is_multi_jump(),
            en_passant_capture,
        );
        self.state.special.clear_en_passant();
        debug!("{} played {from}{to}", piece.color);

        let irreversible = piece.role == Role::Pawn
            || effects.is_capture()
            || (piece.role == Role::CheckersMan && !piece.is_crowned());
        if irreversible {
            self.reset_ledger();
        } else {
            self.halfmoves += 1;
        }
        self.record(notation(&piece, to, &effects));
        self.notify_board();
        if effects.en_passant {
            self.notify_status("en passant");
        }

        match piece.role {
            Role::Pawn => {
                self.state
                    .special
                    .record_pawn_advance(piece.color, from, to);
                if to.row() == piece.color.promotion_row() {
                    self.state.promotion.open(to, piece.color);
                    debug!("{} pawn on {to} waits for promotion", piece.color);
                    self.notify_status("promotion pending");
                    for observer in &mut self.observers {
                        observer.promotion_requested(to, piece.color);
                    }
                    return Ok(());
                }
            }
            Role::CheckersMan => {
                if !piece.is_crowned() && to.row() == piece.color.promotion_row() {
                    if let Some(man) = self.board.piece_mut(to) {
                        man.crown();
                    }
                    debug!("{} man crowned on {to}", piece.color);
                    self.notify_board();
                }
                if effects.is_capture() && !self.rules.capture_moves(&self.board, to).is_empty() {
                    self.state.special.pin(to);
                    debug!("capture chain continues from {to}");
                    self.notify_status(CONTINUE_CAPTURING);
                    return Ok(());
                }
                self.state.special.release();
            }
            _ => (),
        }

        self.finish_turn();
        Ok(())
    }

    /// Replaces the pawn waiting on its last row with `role` and passes the
    /// turn.
    ///
    /// # Errors
    ///
    /// Errors if no promotion is pending or `role` is not a queen, rook,
    /// bishop or knight. The promotion stays pending in the latter case.
    pub fn complete_promotion(&mut self, role: Role) -> Result<(), PromotionError> {
        if !self.state.promotion.is_waiting() {
            return Err(PromotionError::NotPending);
        }
        let pending = self
            .state
            .promotion
            .resolve(role)
            .ok_or(PromotionError::InvalidRole(role))?;
        if let Some(pawn) = self.board.piece_mut(pending.square) {
            pawn.role = role;
        }
        debug!("{} pawn on {} promoted to {role}", pending.color, pending.square);
        self.reset_ledger();
        if let Some(last) = self.history.last_mut() {
            let _ = write!(last.notation, "={}", role.upper_char());
        }
        self.notify_board();
        self.finish_turn();
        Ok(())
    }

    /// Plays a move received from an external engine.
    ///
    /// A promotion letter completes the promotion in the same call. A
    /// promoting move without one leaves the promotion pending.
    ///
    /// # Errors
    ///
    /// Errors like [`Game::play()`], and with [`PlayError::IllegalMove`] if a
    /// promotion letter is attached to a move that does not promote.
    pub fn play_uci(&mut self, uci: &UciMove) -> Result<(), PlayError> {
        if let Some(role) = uci.promotion {
            let promotes = self.board.piece_at(uci.from).is_some_and(|p| {
                p.role == Role::Pawn && uci.to.row() == p.color.promotion_row()
            });
            if !promotes || !role.is_promotion_choice() {
                return Err(PlayError::IllegalMove {
                    from: uci.from,
                    to: uci.to,
                });
            }
        }
        self.play(uci.from, uci.to)?;
        if let Some(role) = uci.promotion {
            self.complete_promotion(role)
                .map_err(|_| PlayError::PromotionPending)?;
        }
        Ok(())
    }

    fn reset_ledger(&mut self) {
        if !self.ledger.is_empty() {
            debug!("irreversible move, clearing {} ledger entries", self.ledger.len());
        }
        self.ledger.clear();
        self.halfmoves = 0;
    }

    fn record(&mut self, notation: String) {
        let now = Instant::now();
        self.history.push(MoveRecord {
            notation,
            color: self.state.turn,
            elapsed: now.duration_since(self.last_move_at),
        });
        self.last_move_at = now;
    }

    fn finish_turn(&mut self) {
        if self.state.turn.is_black() {
            self.fullmoves += 1;
        }
        self.state.pass();
        self.evaluate();
    }

    /// Detects the end of the game for the side to move, in order:
    /// repetition, insufficient material, no legal moves.
    fn evaluate(&mut self) {
        let turn = self.state.turn;
        if self.mode.has_chess() {
            let count = self
                .ledger
                .entry(zobrist_hash(&self.board, turn))
                .or_insert(0);
            *count += 1;
            if *count >= 3 {
                return self.finish(Outcome::Draw, Termination::ThreefoldRepetition);
            }
            if self.rules.is_insufficient_material(&self.board) {
                return self.finish(Outcome::Draw, Termination::InsufficientMaterial);
            }
        }
        if self.rules.is_game_over(&self.board, &self.state) {
            let winner = Outcome::Decisive { winner: !turn };
            return if !self.mode.has_chess() {
                self.finish(winner, Termination::NoMoves)
            } else if self.rules.is_king_in_check(&self.board, turn) {
                self.finish(winner, Termination::Checkmate)
            } else {
                self.finish(Outcome::Draw, Termination::Stalemate)
            };
        }
        if self.is_check() {
            self.notify_status("check");
        }
    }

    fn finish(&mut self, outcome: Outcome, termination: Termination) {
        info!("game over: {outcome} by {termination}");
        self.end = Some((outcome, termination));
        self.notify_status(termination.message());
        for observer in &mut self.observers {
            observer.game_over(outcome);
        }
    }

    fn notify_board(&mut self) {
        for observer in &mut self.observers {
            observer.board_changed(&self.board);
        }
    }

    fn notify_status(&mut self, message: &str) {
        for observer in &mut self.observers {
            observer.status(message);
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.state.turn
    }

    #[inline]
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    pub fn is_multi_jump(&self) -> bool {
        self.state.special.is_multi_jump()
    }

    /// The square of the piece that must continue its capture chain.
    pub fn multi_jump_origin(&self) -> Option<Square> {
        self.state.special.multi_jump
    }

    pub fn is_waiting_for_promotion(&self) -> bool {
        self.state.promotion.is_waiting()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.end.map(|(outcome, _)| outcome)
    }

    pub fn termination(&self) -> Option<Termination> {
        self.end.map(|(_, termination)| termination)
    }

    pub fn is_game_over(&self) -> bool {
        self.end.is_some()
    }

    /// Tests whether the king of the side to move is in check.
    pub fn is_check(&self) -> bool {
        self.started
            && self.mode.has_chess()
            && self.rules.is_king_in_check(&self.board, self.state.turn)
    }

    /// How often the current position occurred since the last irreversible
    /// move.
    pub fn repetitions(&self) -> u32 {
        self.ledger
            .get(&zobrist_hash(&self.board, self.state.turn))
            .copied()
            .unwrap_or(0)
    }

    /// Every move the side to move may request.
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        if !self.started || self.end.is_some() || self.state.promotion.is_waiting() {
            return Vec::new();
        }
        self.rules.legal_moves(&self.board, &self.state)
    }

    pub fn halfmoves(&self) -> u32 {
        self.halfmoves
    }

    pub fn fullmoves(&self) -> u32 {
        self.fullmoves
    }

    /// Describes the current position.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            turn: self.state.turn,
            en_passant: self.state.special.en_passant,
            halfmoves: self.halfmoves,
            fullmoves: self.fullmoves,
        }
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("mode", &self.mode)
            .field("fen", &self.fen().to_string())
            .field("state", &self.state)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

fn notation(piece: &Piece, to: Square, effects: &MoveEffects) -> String {
    let from = piece.position();
    if effects.castled {
        return if to.col() > from.col() { "O-O" } else { "O-O-O" }.to_owned();
    }
    let mut s = String::new();
    if piece.role != Role::Pawn {
        s.push(piece.char().to_ascii_uppercase());
    }
    let _ = write!(s, "{from}{}{to}", if effects.is_capture() { 'x' } else { '-' });
    if effects.en_passant {
        s.push_str(" e.p.");
    }
    s
}

fn validate_position(mode: GameMode, fen: &Fen) -> Result<(), PositionError> {
    for piece in fen.board.pieces() {
        let square = piece.position();
        let allowed = match piece.family() {
            Family::Chess => mode.has_chess(),
            Family::Checkers => mode.has_checkers(),
        };
        if !allowed {
            return Err(PositionError::ForeignPiece { square, mode });
        }
        if piece.role == Role::Pawn && (square.row() == 0 || square.row() == 7) {
            return Err(PositionError::PawnOnBackrank(square));
        }
        if piece.role == Role::CheckersMan
            && !piece.is_crowned()
            && square.row() == piece.color.promotion_row()
        {
            return Err(PositionError::UncrownedManOnLastRow(square));
        }
    }
    if let Some(ep) = fen.en_passant {
        if !is_valid_en_passant(&fen.board, fen.turn, ep) {
            return Err(PositionError::InvalidEnPassant(ep));
        }
    }
    if mode.has_chess() {
        for color in Color::ALL {
            match fen.board.count(Role::King, color) {
                0 => return Err(PositionError::MissingKing(color)),
                1 => (),
                _ => return Err(PositionError::TooManyKings(color)),
            }
        }
        if VariantRules::new(mode).is_king_in_check(&fen.board, !fen.turn) {
            return Err(PositionError::OppositeCheck);
        }
    }
    Ok(())
}

/// The square must have been skipped by a pawn of the side that just
/// moved: empty, with that pawn right behind it and its origin empty.
fn is_valid_en_passant(board: &Board, turn: Color, ep: Square) -> bool {
    if ep.row() != turn.fold(2, 5) || board.is_occupied(ep) {
        return false;
    }
    let forward = turn.forward();
    let pushed = ep
        .offset(-forward, 0)
        .and_then(|sq| board.piece_at(sq))
        .is_some_and(|p| p.role == Role::Pawn && p.color != turn);
    let origin_empty = ep
        .offset(forward, 0)
        .is_some_and(|sq| !board.is_occupied(sq));
    pushed && origin_empty
}
