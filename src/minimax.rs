//! Depth-limited minimax with alpha-beta pruning.
//!
//! Black maximizes, White minimizes. Finished games score `+inf` or `-inf`.
//! Other leaves get a static liberty count (see [`evaluate_leaf`]). Every
//! child position is searched on its own copy of the game.
//!
//! The cutoffs are fail-soft with strict comparisons: a maximizing node stops
//! once a child exceeds `beta`, a minimizing node once a child drops below
//! `alpha`. The value at the root equals plain minimax over the same tree.
//!
//! [`timed_best_move`] runs iterative deepening on a worker thread and keeps
//! the move of the deepest depth that finished within the time budget.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Color};
use crate::constants::{
    ATARI_GROUP_WEIGHT, ATARI_PENALTY, DEFAULT_MINIMAX_DEPTH, MINIMAX_TIME_LIMIT_MS,
};
use crate::game::{Game, Move};
use crate::search::{CancellationToken, run_cancellable};

/// Parameters for one minimax decision.
#[derive(Clone, Debug, PartialEq)]
pub struct MinimaxConfig {
    /// Deepest iterative-deepening depth to attempt.
    pub max_depth: u32,
    /// Wall-clock budget; the deepest finished depth before it wins.
    pub time_limit: Duration,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MINIMAX_DEPTH,
            time_limit: Duration::from_millis(MINIMAX_TIME_LIMIT_MS),
        }
    }
}

/// Static score of a position from Black's point of view.
///
/// Finished games: `+inf` if Black won, `-inf` if White won. Otherwise each
/// stone contributes its own liberty count, or `-ATARI_PENALTY` when it has
/// exactly one; Black's total minus White's, plus `ATARI_GROUP_WEIGHT` per
/// White group in atari, minus the same per Black group in atari.
pub fn evaluate_leaf(game: &Game) -> f64 {
    let board = game.board();
    if let Some(winner) = board.winner() {
        return if winner == Color::Black {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        };
    }

    liberty_score(board, Color::Black) - liberty_score(board, Color::White)
        + ATARI_GROUP_WEIGHT * groups_in_atari(board, Color::White) as f64
        - ATARI_GROUP_WEIGHT * groups_in_atari(board, Color::Black) as f64
}

fn liberty_score(board: &Board, color: Color) -> f64 {
    board
        .fields(color)
        .into_iter()
        .map(|f| match board.field_liberties(f).len() {
            1 => -ATARI_PENALTY,
            n => n as f64,
        })
        .sum()
}

fn groups_in_atari(board: &Board, color: Color) -> usize {
    board
        .groups(color)
        .iter()
        .filter(|group| board.liberties(group).len() == 1)
        .count()
}

/// Minimax value of `game` searched `depth` plies deep.
pub fn search(game: &Game, depth: u32, maximizing: bool, alpha: f64, beta: f64) -> f64 {
    search_with(game, depth, maximizing, alpha, beta, &CancellationToken::new())
}

/// Like [`search`], but returns early once `token` is cancelled. The value
/// of a cancelled search is meaningless and must be discarded.
pub fn search_with(
    game: &Game,
    depth: u32,
    maximizing: bool,
    mut alpha: f64,
    mut beta: f64,
    token: &CancellationToken,
) -> f64 {
    if token.is_cancelled() {
        return 0.0;
    }
    if depth == 0 || game.is_game_over() {
        return evaluate_leaf(game);
    }

    let moves = game.ordered_moves();
    if moves.is_empty() {
        return evaluate_leaf(game);
    }

    if maximizing {
        let mut best = f64::NEG_INFINITY;
        for mv in moves {
            let mut child = game.deep_copy();
            if child.do_move(mv).is_err() {
                continue;
            }
            let eval = search_with(&child, depth - 1, false, alpha, beta, token);
            best = best.max(eval);
            if beta < eval {
                break;
            }
            alpha = alpha.max(eval);
        }
        best
    } else {
        let mut best = f64::INFINITY;
        for mv in moves {
            let mut child = game.deep_copy();
            if child.do_move(mv).is_err() {
                continue;
            }
            let eval = search_with(&child, depth - 1, true, alpha, beta, token);
            best = best.min(eval);
            if eval < alpha {
                break;
            }
            beta = beta.min(eval);
        }
        best
    }
}

/// The move with the best minimax value for the side to move.
///
/// Ties go to the first move in [`Game::ordered_moves`] order. `None` when
/// `depth` is zero, the game is over, or no move exists.
pub fn best_move(game: &Game, depth: u32) -> Option<Move> {
    best_move_with(game, depth, &CancellationToken::new())
}

/// Cancellable form of [`best_move`].
pub fn best_move_with(game: &Game, depth: u32, token: &CancellationToken) -> Option<Move> {
    if depth == 0 || game.is_game_over() {
        return None;
    }

    let maximizing = game.turn() == Color::Black;
    let mut alpha = f64::NEG_INFINITY;
    let mut beta = f64::INFINITY;
    let mut best: Option<(Move, f64)> = None;

    for mv in game.ordered_moves() {
        let mut child = game.deep_copy();
        if child.do_move(mv).is_err() {
            continue;
        }
        let eval = search_with(&child, depth - 1, !maximizing, alpha, beta, token);
        let improves = match best {
            None => true,
            Some((_, value)) if maximizing => eval > value,
            Some((_, value)) => eval < value,
        };
        if improves {
            best = Some((mv, eval));
        }
        if maximizing {
            alpha = alpha.max(eval);
        } else {
            beta = beta.min(eval);
        }
    }
    best.map(|(mv, _)| mv)
}

/// Run [`best_move`] for depth 1, 2, ... `max_depth`.
///
/// After each finished depth `on_depth(depth, move)` is called; returning
/// `false` stops the deepening. Polls `token` at every depth boundary and
/// drops a depth that was cut short. Returns the move of the deepest
/// finished depth.
pub fn iterative_deepening(
    game: &Game,
    max_depth: u32,
    token: &CancellationToken,
    mut on_depth: impl FnMut(u32, Move) -> bool,
) -> Option<Move> {
    let start = Instant::now();
    let mut last = None;
    for depth in 1..=max_depth {
        if token.is_cancelled() {
            break;
        }
        let found = best_move_with(game, depth, token);
        if token.is_cancelled() {
            break;
        }
        let Some(mv) = found else {
            break;
        };
        debug!(depth, field = mv.field(), elapsed = ?start.elapsed(), "minimax depth finished");
        last = Some(mv);
        if !on_depth(depth, mv) {
            break;
        }
    }
    last
}

/// Iterative deepening under a wall-clock budget on a worker thread.
///
/// Returns the move of the deepest depth finished in time.
pub fn timed_best_move(game: &Game, config: &MinimaxConfig) -> Option<Move> {
    let game = game.deep_copy();
    let max_depth = config.max_depth;
    run_cancellable(config.time_limit, move |publisher| {
        iterative_deepening(&game, max_depth, publisher.token(), |_, mv| {
            publisher.publish(mv)
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{DIM, FIELDS};
    use crate::player::ComputerPlayer;
    use crate::strategy::Strategy;
    use std::sync::Arc;

    fn game_with(board: Board) -> Game {
        Game::with_board(
            Arc::new(ComputerPlayer::new(Strategy::Naive, Color::Black)),
            Arc::new(ComputerPlayer::new(Strategy::Naive, Color::White)),
            board,
        )
    }

    /// Plain minimax without pruning.
    fn minimax(game: &Game, depth: u32, maximizing: bool) -> f64 {
        if depth == 0 || game.is_game_over() {
            return evaluate_leaf(game);
        }
        let values = game.ordered_moves().into_iter().map(|mv| {
            let mut child = game.deep_copy();
            child.do_move(mv).unwrap();
            minimax(&child, depth - 1, !maximizing)
        });
        if maximizing {
            values.fold(f64::NEG_INFINITY, f64::max)
        } else {
            values.fold(f64::INFINITY, f64::min)
        }
    }

    /// Rows `0..DIM - 1` alternate Black/White over every column but the
    /// last; the bottom row and the last column are empty. Counts are equal,
    /// Black to move, and both colors have rows in atari.
    fn striped_board() -> Board {
        let mut board = Board::new();
        for x in 0..DIM - 1 {
            let color = if x % 2 == 0 { Color::Black } else { Color::White };
            for y in 0..DIM - 1 {
                board.set_field(Board::index_of(x, y), color);
            }
        }
        board
    }

    /// Center start plus two moves; reachable, nowhere near finished.
    fn opening_game() -> Game {
        let mut game = game_with(Board::with_center_stones());
        game.do_move(Move::from_xy(1, 1, Color::Black)).unwrap();
        game.do_move(Move::from_xy(DIM - 2, DIM - 2, Color::White)).unwrap();
        game
    }

    #[test]
    fn test_evaluate_finished_game() {
        let mut board = Board::new();
        board.set_field(0, Color::White);
        board.set_field(1, Color::Black);
        board.set_field(DIM, Color::Black);
        assert_eq!(evaluate_leaf(&game_with(board)), f64::INFINITY);

        let mut board = Board::new();
        board.set_field(0, Color::Black);
        board.set_field(1, Color::White);
        board.set_field(DIM, Color::White);
        assert_eq!(evaluate_leaf(&game_with(board)), f64::NEG_INFINITY);
    }

    #[test]
    fn test_evaluate_static_score() {
        // Lone black stone in the center: 4 liberties.
        let mut board = Board::new();
        board.set_field(Board::index_of(DIM / 2, DIM / 2), Color::Black);
        assert_eq!(evaluate_leaf(&game_with(board)), 4.0);

        // White stone in atari next to a black corner stone.
        let mut board = Board::new();
        board.set_field(0, Color::White);
        board.set_field(1, Color::Black);
        // Black at 1: liberties 2 and DIM + 1 -> 2.
        // White at 0: one liberty -> -50, and one white group in atari.
        assert_eq!(evaluate_leaf(&game_with(board)), 2.0 + 50.0 + 100.0);
    }

    #[test]
    fn test_depth_zero_is_leaf() {
        let game = game_with(striped_board());
        let leaf = evaluate_leaf(&game);
        assert_eq!(
            search(&game, 0, true, f64::NEG_INFINITY, f64::INFINITY),
            leaf
        );
        assert_eq!(best_move(&game, 0), None);
    }

    #[test]
    fn test_best_move_captures_when_possible() {
        let game = game_with(striped_board());
        assert_eq!(game.turn(), Color::Black);
        let mv = best_move(&game, 1).unwrap();
        let mut after = game.deep_copy();
        after.do_move(mv).unwrap();
        assert_eq!(after.winner(), Some(Color::Black));
    }

    #[test]
    fn test_alpha_beta_matches_plain_minimax() {
        let game = game_with(striped_board());
        assert!(!game.is_game_over());
        for depth in 1..=3 {
            let maximizing = game.turn() == Color::Black;
            let full = minimax(&game, depth, maximizing);
            let pruned = search(&game, depth, maximizing, f64::NEG_INFINITY, f64::INFINITY);
            assert_eq!(full, pruned, "depth {depth}");

            let mv = best_move(&game, depth).unwrap();
            let mut child = game.deep_copy();
            child.do_move(mv).unwrap();
            assert_eq!(minimax(&child, depth - 1, !maximizing), full, "depth {depth}");
        }
    }

    #[test]
    fn test_alpha_beta_matches_on_random_positions() {
        fastrand::seed(3);
        for _ in 0..4 {
            let mut game = game_with(Board::new());
            for _ in 0..(FIELDS / 2) {
                let moves = game.valid_moves();
                let mv = moves[fastrand::usize(..moves.len())];
                let mut next = game.deep_copy();
                next.do_move(mv).unwrap();
                if next.is_game_over() {
                    break;
                }
                game = next;
            }
            let maximizing = game.turn() == Color::Black;
            let full = minimax(&game, 2, maximizing);
            let pruned = search(&game, 2, maximizing, f64::NEG_INFINITY, f64::INFINITY);
            assert_eq!(full, pruned);

            let mv = best_move(&game, 2).unwrap();
            let mut child = game.deep_copy();
            child.do_move(mv).unwrap();
            assert_eq!(minimax(&child, 1, !maximizing), full);
        }
    }

    #[test]
    fn test_best_move_is_deterministic() {
        let game = game_with(striped_board());
        assert_eq!(best_move(&game, 2), best_move(&game, 2));
    }

    #[test]
    fn test_iterative_deepening_reports_each_depth() {
        let game = game_with(striped_board());
        let token = CancellationToken::new();
        let mut depths = Vec::new();
        let mv = iterative_deepening(&game, 3, &token, |depth, _| {
            depths.push(depth);
            true
        });
        assert_eq!(depths, vec![1, 2, 3]);
        assert_eq!(mv, best_move(&game, 3));
    }

    #[test]
    fn test_iterative_deepening_stops_when_cancelled() {
        let game = game_with(striped_board());
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(iterative_deepening(&game, 3, &token, |_, _| true), None);
    }

    #[test]
    fn test_timed_best_move_returns_completed_depth() {
        let game = game_with(striped_board());
        let config = MinimaxConfig {
            max_depth: 2,
            time_limit: Duration::from_secs(30),
        };
        assert_eq!(timed_best_move(&game, &config), best_move(&game, 2));
    }

    #[test]
    fn test_timed_best_move_keeps_deepest_finished_depth_on_timeout() {
        let game = opening_game();
        assert!(!game.is_game_over());
        let config = MinimaxConfig {
            max_depth: 20,
            time_limit: Duration::from_millis(300),
        };

        let start = Instant::now();
        let mv = timed_best_move(&game, &config).expect("depth 1 finishes in time");
        let elapsed = start.elapsed();
        // Depth 20 cannot finish, so the caller waits out the budget and no more.
        assert!(elapsed >= config.time_limit, "returned after {elapsed:?}");
        assert!(elapsed < config.time_limit + Duration::from_secs(2), "returned after {elapsed:?}");

        assert!(game.is_valid_move(&mv));
        // Every depth up to the deepest finished one ran within the budget, so
        // recomputing them stops at the matching depth.
        assert!((1..=config.max_depth).any(|depth| best_move(&game, depth) == Some(mv)));
    }

    #[test]
    fn test_iterative_deepening_cancelled_mid_search_keeps_last_depth() {
        let game = opening_game();
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            canceller.cancel();
        });

        let mut reported = Vec::new();
        let mv = iterative_deepening(&game, 20, &token, |depth, mv| {
            reported.push((depth, mv));
            true
        });
        handle.join().unwrap();

        let &(deepest, last) = reported.last().expect("depth 1 finishes before cancel");
        assert!(deepest < 20);
        let depths: Vec<u32> = reported.iter().map(|&(d, _)| d).collect();
        assert_eq!(depths, (1..=deepest).collect::<Vec<_>>());
        assert_eq!(mv, Some(last));
        assert_eq!(best_move(&game, deepest), Some(last));
    }
}
