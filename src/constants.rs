//! Constants for board dimensions and search parameters.
//!
//! The board is a flat array of `DIM * DIM` fields indexed row-major
//! (`index = x * DIM + y`). There is no padding: neighbor lookups clip at
//! the grid edge.
//!
//! # Board Size Configuration
//!
//! The board size is controlled by Cargo features:
//! - `board7x7` (default): 7x7 board
//! - `board9x9`: 9x9 board
//!
//! To compile for a specific board size:
//! ```sh
//! cargo build                                              # 7x7 (default)
//! cargo build --no-default-features --features board9x9   # 9x9
//! ```

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (DIM x DIM).
#[cfg(feature = "board7x7")]
pub const DIM: usize = 7;

#[cfg(feature = "board9x9")]
pub const DIM: usize = 9;

// Compile-time check: exactly one board size feature must be enabled
#[cfg(all(feature = "board7x7", feature = "board9x9"))]
compile_error!("Cannot enable both 'board7x7' and 'board9x9' features at the same time");

#[cfg(not(any(feature = "board7x7", feature = "board9x9")))]
compile_error!("Must enable exactly one board size feature: 'board7x7' or 'board9x9'");

/// Number of fields on the board.
pub const FIELDS: usize = DIM * DIM;

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default iterative-deepening limit.
pub const DEFAULT_MINIMAX_DEPTH: u32 = 4;

/// Wall-clock budget for one minimax decision.
pub const MINIMAX_TIME_LIMIT_MS: u64 = 10_000;

/// Score per stone standing in atari (subtracted instead of its liberty count).
pub const ATARI_PENALTY: f64 = 50.0;

/// Weight of each opposing group in atari.
pub const ATARI_GROUP_WEIGHT: f64 = 100.0;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Wall-clock budget for one MCTS decision.
pub const DEFAULT_SEARCH_TIME_MS: u64 = 5_000;

/// UCT exploration constant. Higher means more exploration.
pub const UCT_CONSTANT: f64 = 6.0;

/// Score added to a node for each playout won from its perspective.
pub const WIN_SCORE: u32 = 10;

/// Playouts between published intermediate MCTS results.
pub const REPORT_PERIOD: usize = 200;

/// Extra time the caller grants a worker beyond its own budget before cancelling.
pub const WORKER_GRACE_MS: u64 = 250;
