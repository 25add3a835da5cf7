//! Monte Carlo playouts (fast game simulation).
//!
//! A playout plays the default policy until some group runs out of
//! liberties, then reports the winner. The policy takes the last liberty of
//! an opposing group in atari when one exists, and otherwise plays a
//! uniformly random empty field.

use crate::board::{Board, Color};
use crate::constants::FIELDS;
use crate::game::Move;

/// A move for the side to move that ends the game at once by filling the
/// last liberty of an opposing group.
///
/// Groups are tried in order of their lowest field.
pub fn winning_move(board: &Board) -> Option<Move> {
    let turn = board.turn();
    board
        .groups(turn.other())
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

/// Every distinct field that fills the last liberty of an opposing group,
/// ascending.
pub fn winning_moves(board: &Board) -> Vec<Move> {
    let turn = board.turn();
    let mut fields: Vec<usize> = board
        .groups(turn.other())
        .iter()
        .filter_map(|group| {
            let libs = board.liberties(group);
            if libs.len() == 1 {
                libs.first().copied()
            } else {
                None
            }
        })
        .collect();
    fields.sort_unstable();
    fields.dedup();
    fields.into_iter().map(|f| Move::new(f, turn)).collect()
}

/// A uniformly random empty field for the side to move.
pub fn random_move(board: &Board) -> Option<Move> {
    let empty: Vec<usize> = (0..FIELDS).filter(|&f| board.is_empty(f)).collect();
    if empty.is_empty() {
        return None;
    }
    let field = empty[fastrand::usize(..empty.len())];
    Some(Move::new(field, board.turn()))
}

/// The playout policy: a winning move if there is one, else a random move.
#[inline]
pub fn default_policy(board: &Board) -> Option<Move> {
    winning_move(board).or_else(|| random_move(board))
}

/// Play the default policy on `board` until the game is over.
///
/// Returns the winner. `None` only if the board runs out of empty fields
/// without a dead group, which the liberty rules make impossible.
pub fn playout(board: &mut Board) -> Option<Color> {
    while !board.is_game_over() {
        let mv = default_policy(board)?;
        board.set_field(mv.field(), mv.color());
    }
    board.winner()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DIM;

    #[test]
    fn test_winning_move_takes_last_liberty() {
        let mut board = Board::new();
        board.set_field(0, Color::White);
        board.set_field(1, Color::Black);
        // Equal counts: Black to move.
        assert_eq!(winning_move(&board), Some(Move::new(DIM, Color::Black)));
        assert_eq!(winning_moves(&board), vec![Move::new(DIM, Color::Black)]);
    }

    #[test]
    fn test_no_winning_move_on_open_board() {
        let mut board = Board::new();
        board.set_field(24, Color::Black);
        assert_eq!(winning_move(&board), None);
        assert!(winning_moves(&board).is_empty());
    }

    #[test]
    fn test_random_move_is_empty_field() {
        fastrand::seed(7);
        let mut board = Board::new();
        board.set_field(0, Color::Black);
        for _ in 0..50 {
            let mv = random_move(&board).unwrap();
            assert!(board.is_empty(mv.field()));
            assert_eq!(mv.color(), Color::White);
        }
    }

    #[test]
    fn test_playout_reaches_game_over() {
        fastrand::seed(11);
        for _ in 0..20 {
            let mut board = Board::new();
            let winner = playout(&mut board);
            assert!(board.is_game_over());
            assert_eq!(winner, board.winner());
            assert!(winner.is_some());
        }
    }

    #[test]
    fn test_playout_of_finished_game_is_immediate() {
        let mut board = Board::new();
        board.set_field(0, Color::White);
        board.set_field(1, Color::Black);
        board.set_field(DIM, Color::Black);
        let before = board.clone();
        assert_eq!(playout(&mut board), Some(Color::Black));
        assert_eq!(board, before);
    }
}
