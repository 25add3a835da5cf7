//! Move-selection strategies.
//!
//! [`Strategy`] is a closed set of variants chosen by configuration:
//! - `Naive`: uniformly random legal move
//! - `Simple`: win at once if possible, else save an own group in atari,
//!   else a random move that avoids self-atari when it can
//! - `Minimax`: iterative-deepening alpha-beta under a time budget
//! - `Mcts`: Monte Carlo Tree Search under a time budget
//! - `Bruteforce`: exhaustive forced-win search to a fixed depth, falling back
//!   to `Simple`

use std::fmt;

use crate::board::{Board, Color};
use crate::game::{Game, Move};
use crate::mcts::{MctsConfig, timed_search};
use crate::minimax::{MinimaxConfig, timed_best_move};
use crate::playout::{winning_move, winning_moves};

/// How a computer player picks its moves.
#[derive(Clone, Debug, PartialEq)]
pub enum Strategy {
    Naive,
    Simple,
    Minimax(MinimaxConfig),
    Mcts(MctsConfig),
    Bruteforce { depth: u32 },
}

impl Strategy {
    /// Pick a move for the side to move, or `None` when there is no legal move
    /// (or the game is already over).
    pub fn determine_move(&self, game: &Game) -> Option<Move> {
        if game.is_game_over() {
            return None;
        }
        match self {
            Strategy::Naive => naive_move(game),
            Strategy::Simple => simple_move(game),
            Strategy::Minimax(config) => timed_best_move(game, config),
            Strategy::Mcts(config) => timed_search(game.board(), config),
            Strategy::Bruteforce { depth } => {
                forced_win(game, *depth).or_else(|| simple_move(game))
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Naive => write!(f, "Naive"),
            Strategy::Simple => write!(f, "Simple"),
            Strategy::Minimax(config) => write!(f, "Minimax, depth = {}", config.max_depth),
            Strategy::Mcts(_) => write!(f, "MCTS"),
            Strategy::Bruteforce { depth } => write!(f, "Bruteforce, depth = {depth}"),
        }
    }
}

fn naive_move(game: &Game) -> Option<Move> {
    let moves = game.valid_moves();
    if moves.is_empty() {
        return None;
    }
    Some(moves[fastrand::usize(..moves.len())])
}

/// Extend an own group in atari at its last liberty.
pub fn saving_move(board: &Board) -> Option<Move> {
    let turn = board.turn();
    board
        .groups(turn)
        .iter()
        .find_map(|group| {
            let libs = board.liberties(group);
            if libs.len() == 1 {
                libs.first().copied()
            } else {
                None
            }
        })
        .map(|field| Move::new(field, turn))
}

/// Whether playing `mv` leaves the new stone's group with at most one liberty.
pub fn is_self_atari(board: &Board, mv: &Move) -> bool {
    let mut after = board.deep_copy();
    after.set_field(mv.field(), mv.color());
    after.group_liberties(mv.field()).len() <= 1
}

/// Valid moves that do not put the mover's own stone in atari.
pub fn find_non_losing_moves(game: &Game) -> Vec<Move> {
    game.valid_moves()
        .into_iter()
        .filter(|mv| !is_self_atari(game.board(), mv))
        .collect()
}

fn simple_move(game: &Game) -> Option<Move> {
    let moves = game.valid_moves();
    if moves.is_empty() {
        return None;
    }
    let board = game.board();
    if let Some(mv) = winning_move(board).or_else(|| saving_move(board)) {
        return Some(mv);
    }

    let mv = moves[fastrand::usize(..moves.len())];
    if is_self_atari(board, &mv) {
        // One redraw; the second pick stands.
        return Some(moves[fastrand::usize(..moves.len())]);
    }
    Some(mv)
}

/// A move that forces a win within `depth` of the mover's own moves.
///
/// Depth 1 looks for a move that wins at once. Deeper levels only try moves
/// that put an opposing group in atari, and accept one when every reply
/// still leaves a forced win one level shallower.
pub fn forced_win(game: &Game, depth: u32) -> Option<Move> {
    if depth == 0 || game.is_game_over() {
        return None;
    }
    let me = game.turn();

    for mv in winning_moves(game.board()) {
        if wins_for(game, mv, me) {
            return Some(mv);
        }
    }
    if depth == 1 {
        return None;
    }

    for mv in find_non_losing_moves(game) {
        let mut after = game.deep_copy();
        if after.do_move(mv).is_err() || after.is_game_over() {
            continue;
        }
        // Only threats can force anything.
        if !threatens(after.board(), me) {
            continue;
        }
        if every_reply_loses(&after, me, depth - 1) {
            return Some(mv);
        }
    }
    None
}

fn wins_for(game: &Game, mv: Move, me: Color) -> bool {
    let mut after = game.deep_copy();
    after.do_move(mv).is_ok() && after.winner() == Some(me)
}

/// Some group of `me`'s opponent is down to one liberty.
fn threatens(board: &Board, me: Color) -> bool {
    board
        .groups(me.other())
        .iter()
        .any(|group| board.liberties(group).len() == 1)
}

fn every_reply_loses(game: &Game, me: Color, depth: u32) -> bool {
    let replies = game.valid_moves();
    !replies.is_empty()
        && replies.into_iter().all(|reply| {
            let mut after = game.deep_copy();
            if after.do_move(reply).is_err() {
                return false;
            }
            match after.winner() {
                Some(winner) => winner == me,
                None => forced_win(&after, depth).is_some(),
            }
        })
}
