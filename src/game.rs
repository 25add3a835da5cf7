//! Moves, legality and the turn engine.
//!
//! A [`Game`] owns its [`Board`] and mutates it in place as moves are applied.
//! Whose turn it is and whether the game is over are both derived from the
//! board, never stored. Search code copies the whole game before trying a
//! hypothetical move, so the original position is never touched by lookahead.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::board::{Board, Color, Field, neighbors};
use crate::constants::FIELDS;
use crate::player::Player;

/// A stone of `color` placed at `field`.
///
/// Carries no validity guarantee; legality is decided by [`Game::is_valid_move`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    field: Field,
    color: Color,
}

impl Move {
    pub fn new(field: Field, color: Color) -> Self {
        Self { field, color }
    }

    pub fn from_xy(x: usize, y: usize, color: Color) -> Self {
        Self::new(Board::index_of(x, y), color)
    }

    #[inline]
    pub fn field(&self) -> Field {
        self.field
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Row of the target field.
    pub fn x(&self) -> usize {
        Board::row(self.field)
    }

    /// Column of the target field.
    pub fn y(&self) -> usize {
        Board::col(self.field)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Move: {} ({},{}) to {}",
            self.field,
            self.x(),
            self.y(),
            self.color
        )
    }
}

/// Errors surfaced to callers applying moves.
#[derive(Debug, Error)]
pub enum GameError {
    /// The move failed the legality check. Nothing was changed.
    #[error("illegal move: {mv}\n{board}")]
    IllegalMove { mv: Move, board: String },
}

/// A game between two players on a single board.
///
/// `p1` plays Black, `p2` plays White. Cloning copies the board and shares
/// the player handles.
#[derive(Clone)]
pub struct Game {
    board: Board,
    p1: Arc<dyn Player>,
    p2: Arc<dyn Player>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("black", &self.p1.name())
            .field("white", &self.p2.name())
            .field("board", &self.board)
            .finish()
    }
}

impl Game {
    /// Start a game on an empty board.
    pub fn new(p1: Arc<dyn Player>, p2: Arc<dyn Player>) -> Self {
        Self::with_board(p1, p2, Board::new())
    }

    /// Start a game from a caller-supplied position.
    pub fn with_board(p1: Arc<dyn Player>, p2: Arc<dyn Player>, board: Board) -> Self {
        Self { board, p1, p2 }
    }

    /// Independent copy for lookahead.
    #[inline]
    pub fn deep_copy(&self) -> Game {
        self.clone()
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct access to the fields, bypassing legality. Used to set up positions.
    #[inline]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn p1(&self) -> &Arc<dyn Player> {
        &self.p1
    }

    pub fn p2(&self) -> &Arc<dyn Player> {
        &self.p2
    }

    /// Color to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.board.turn()
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Arc<dyn Player> {
        match self.turn() {
            Color::Black => &self.p1,
            _ => &self.p2,
        }
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.board.is_game_over()
    }

    #[inline]
    pub fn winner(&self) -> Option<Color> {
        self.board.winner()
    }

    /// In range, on an empty field, and by the side to move.
    ///
    /// Suicide is allowed: it ends the game with the mover losing.
    pub fn is_valid_move(&self, mv: &Move) -> bool {
        Board::is_valid_field(mv.field)
            && self.board.is_empty(mv.field)
            && mv.color == self.turn()
    }

    /// Place the stone if the move is legal.
    ///
    /// # Errors
    /// [`GameError::IllegalMove`] with the move and the rendered board when
    /// the move fails [`Game::is_valid_move`].
    pub fn do_move(&mut self, mv: Move) -> Result<(), GameError> {
        if !self.is_valid_move(&mv) {
            return Err(GameError::IllegalMove {
                mv,
                board: self.board.to_string(),
            });
        }
        self.board.set_field(mv.field, mv.color);
        Ok(())
    }

    /// Every legal move for the side to move, in field order.
    pub fn valid_moves(&self) -> Vec<Move> {
        let color = self.turn();
        (0..FIELDS)
            .filter(|&f| self.board.is_empty(f))
            .map(|f| Move::new(f, color))
            .collect()
    }

    /// Whether `mv` takes the last liberty of an adjacent opposing group.
    pub fn captures(&self, mv: &Move) -> bool {
        let opponent = mv.color.other();
        neighbors(mv.field).any(|n| {
            self.board.get(n) == opponent && self.board.group_liberties(n).len() == 1
        })
    }

    /// Valid moves sorted ascending by a cheap tactical score.
    ///
    /// Capturing moves score `+inf`. Other moves score 1 per same-colored
    /// neighbor and 2 per opposing neighbor. The sort is stable, so equal
    /// scores keep field order, and capturing moves come last.
    pub fn ordered_moves(&self) -> Vec<Move> {
        let mut scored: Vec<(f64, Move)> = self
            .valid_moves()
            .into_iter()
            .map(|mv| (self.move_score(&mv), mv))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, mv)| mv).collect()
    }

    fn move_score(&self, mv: &Move) -> f64 {
        if self.captures(mv) {
            return f64::INFINITY;
        }
        neighbors(mv.field)
            .map(|n| match self.board.get(n) {
                c if c == mv.color => 1.0,
                c if c == mv.color.other() => 2.0,
                _ => 0.0,
            })
            .sum()
    }
}
