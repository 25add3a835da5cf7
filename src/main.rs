//! Go-Search: play a computer-vs-computer game on the command line.
//!
//! ## Usage
//!
//! - `go-search` - Simple (Black) against Naive (White)
//! - `go-search --black minimax --depth 3 --white mcts --time-ms 2000`
//! - `RUST_LOG=debug go-search ...` - per-depth and per-playout progress

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use go_search::board::{Board, Color};
use go_search::constants::{DEFAULT_MINIMAX_DEPTH, DEFAULT_SEARCH_TIME_MS, DIM, UCT_CONSTANT};
use go_search::game::Game;
use go_search::mcts::MctsConfig;
use go_search::minimax::MinimaxConfig;
use go_search::player::{ComputerPlayer, Player, run_match};
use go_search::strategy::Strategy;

/// Go-Search: capture-ends-the-game Go between two computer players
#[derive(Parser)]
#[command(name = "go-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Strategy for Black
    #[arg(long, value_enum, default_value_t = StrategyKind::Simple)]
    black: StrategyKind,

    /// Strategy for White
    #[arg(long, value_enum, default_value_t = StrategyKind::Naive)]
    white: StrategyKind,

    /// Search depth for minimax and bruteforce
    #[arg(long, default_value_t = DEFAULT_MINIMAX_DEPTH)]
    depth: u32,

    /// Time budget per move for minimax and MCTS, in milliseconds
    #[arg(long, default_value_t = DEFAULT_SEARCH_TIME_MS)]
    time_ms: u64,

    /// UCT exploration constant
    #[arg(long, default_value_t = UCT_CONSTANT)]
    exploration: f64,

    /// Starting position
    #[arg(long, value_enum, default_value_t = Start::Empty)]
    start: Start,

    /// Stop after this many moves
    #[arg(long, default_value_t = 2 * DIM * DIM)]
    max_moves: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyKind {
    Naive,
    Simple,
    Minimax,
    Mcts,
    Bruteforce,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Start {
    /// Empty board
    Empty,
    /// Two stones of each color around the center
    Center,
}

impl Cli {
    fn strategy(&self, kind: StrategyKind) -> Strategy {
        let time_limit = Duration::from_millis(self.time_ms);
        match kind {
            StrategyKind::Naive => Strategy::Naive,
            StrategyKind::Simple => Strategy::Simple,
            StrategyKind::Minimax => Strategy::Minimax(MinimaxConfig {
                max_depth: self.depth,
                time_limit,
            }),
            StrategyKind::Mcts => Strategy::Mcts(MctsConfig {
                time_limit,
                exploration: self.exploration,
            }),
            StrategyKind::Bruteforce => Strategy::Bruteforce { depth: self.depth },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.depth == 0 {
        bail!("--depth must be at least 1");
    }

    let black: Arc<dyn Player> =
        Arc::new(ComputerPlayer::new(cli.strategy(cli.black), Color::Black));
    let white: Arc<dyn Player> =
        Arc::new(ComputerPlayer::new(cli.strategy(cli.white), Color::White));
    let board = match cli.start {
        Start::Empty => Board::new(),
        Start::Center => Board::with_center_stones(),
    };
    info!(black = %black.name(), white = %white.name(), dim = DIM, "starting game");

    let mut game = Game::with_board(black, white, board);
    let winner = run_match(&mut game, cli.max_moves).context("game aborted")?;

    println!("{}", game.board());
    match winner {
        Some(color) => println!("Winner: {color}"),
        None => println!("No winner after {} moves", game.board().stones().len()),
    }
    Ok(())
}
