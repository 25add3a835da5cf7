//! Go-Search: adversarial search on a small capture-ends-the-game Go board.
//!
//! The board is `DIM`×`DIM` (7×7 by default, 9×9 with the `board9x9`
//! feature). Black moves first, turns alternate by stone parity, and the
//! game ends as soon as any group has no liberties left: the owner of that
//! group loses. Computer players pick moves with one of several strategies,
//! from uniformly random up to time-bounded minimax and MCTS.
//!
//! ## Modules
//!
//! - [`constants`] - Board dimensions and search parameters
//! - [`board`] - Fields, colors, groups and liberties, game-over detection
//! - [`game`] - Moves, turn handling and legal-move generation
//! - [`player`] - The player abstraction and a match driver
//! - [`strategy`] - Move-selection strategies
//! - [`minimax`] - Alpha-beta search with iterative deepening
//! - [`mcts`] - Monte Carlo Tree Search over an arena of nodes
//! - [`playout`] - Random game simulation for MCTS
//! - [`search`] - Running a search on a worker thread under a deadline
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use go_search::board::Color;
//! use go_search::game::Game;
//! use go_search::player::{ComputerPlayer, run_match};
//! use go_search::strategy::Strategy;
//!
//! let black = Arc::new(ComputerPlayer::new(Strategy::Simple, Color::Black));
//! let white = Arc::new(ComputerPlayer::new(Strategy::Naive, Color::White));
//! let mut game = Game::new(black, white);
//!
//! let winner = run_match(&mut game, 1_000).unwrap();
//! assert!(game.is_game_over());
//! assert_eq!(winner, game.winner());
//! ```

pub mod board;
pub mod constants;
pub mod game;
pub mod mcts;
pub mod minimax;
pub mod player;
pub mod playout;
pub mod search;
pub mod strategy;
