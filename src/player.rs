//! Players and the turn loop that drives them.
//!
//! A [`Player`] is anything that can pick a move for one color. The engine
//! ships [`ComputerPlayer`], which delegates to a [`Strategy`]; front ends
//! implement the trait for human input.

use tracing::info;

use crate::board::Color;
use crate::game::{Game, GameError, Move};
use crate::strategy::Strategy;

/// A participant in a [`Game`].
pub trait Player: Send + Sync {
    /// Color this player places.
    fn color(&self) -> Color;

    /// Display name, used in logs.
    fn name(&self) -> String;

    /// Pick the next move, or `None` when no legal move exists.
    fn determine_move(&self, game: &Game) -> Option<Move>;
}

/// A player backed by a search or heuristic [`Strategy`].
#[derive(Clone, Debug)]
pub struct ComputerPlayer {
    strategy: Strategy,
    color: Color,
}

impl ComputerPlayer {
    pub fn new(strategy: Strategy, color: Color) -> Self {
        Self { strategy, color }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }
}

impl Player for ComputerPlayer {
    fn color(&self) -> Color {
        self.color
    }

    /// Format: `<strategy>-<color>`.
    fn name(&self) -> String {
        format!("{}-{}", self.strategy, self.color)
    }

    fn determine_move(&self, game: &Game) -> Option<Move> {
        self.strategy.determine_move(game)
    }
}

/// Play `game` to the end, or until `max_moves` moves have been made.
///
/// Returns the winner, or `None` if the game stopped without one (move cap
/// reached or a player had no move).
///
/// # Errors
/// Propagates [`GameError::IllegalMove`] if a player returns an illegal move.
pub fn run_match(game: &mut Game, max_moves: usize) -> Result<Option<Color>, GameError> {
    let mut played = 0;
    while !game.is_game_over() && played < max_moves {
        let player = game.current_player().clone();
        let Some(mv) = player.determine_move(game) else {
            info!(player = %player.name(), "no move available");
            break;
        };
        game.do_move(mv)?;
        played += 1;
        info!(player = %player.name(), field = mv.field(), x = mv.x(), y = mv.y(), "move played");
    }
    Ok(game.winner())
}
