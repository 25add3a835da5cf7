//! Monte Carlo Tree Search (MCTS) with UCT selection.
//!
//! The tree lives in an arena: nodes are stored in one `Vec` and refer to
//! each other by [`NodeId`]. Children are owned by the arena; the parent link
//! is only used to walk back up during backpropagation.
//!
//! One iteration:
//! - select: descend from the root, taking any unvisited child at once,
//!   otherwise the child with the highest UCT value
//! - expand the selected node if it has no children yet
//! - simulate a playout from the selected node's board
//! - backpropagate: every node on the path gets a visit, and a win bonus when
//!   the playout was won by the color that moved into that node
//!
//! The chosen move is the root child with the highest accumulated score.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::board::{Board, Color};
use crate::constants::{
    DEFAULT_SEARCH_TIME_MS, FIELDS, REPORT_PERIOD, UCT_CONSTANT, WIN_SCORE, WORKER_GRACE_MS,
};
use crate::game::Move;
use crate::playout::playout;
use crate::search::{CancellationToken, run_cancellable};

/// Parameters for one MCTS decision.
///
/// Every iteration expands its leaf into one child per empty field, each
/// holding its own board. Node count grows with the time limit: a 5 s search
/// on an empty 7x7 board builds a few million nodes and several hundred MB.
#[derive(Clone, Debug, PartialEq)]
pub struct MctsConfig {
    /// Wall-clock budget for the search loop.
    pub time_limit: Duration,
    /// UCT exploration constant.
    pub exploration: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_millis(DEFAULT_SEARCH_TIME_MS),
            exploration: UCT_CONSTANT,
        }
    }
}

/// Handle of a node inside a [`SearchTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A node in the MCTS search tree.
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Position at this node
    pub board: Board,
    /// Move that led here from the parent (`None` at the root)
    pub mv: Option<Move>,
    /// Back-reference for backpropagation
    pub parent: Option<NodeId>,
    /// Children in field order
    pub children: Vec<NodeId>,
    /// Number of playouts through this node
    pub visits: u32,
    /// Accumulated win bonus
    pub score: u32,
    /// Color whose wins this node counts; flips at every level
    pub perspective: Color,
}

impl SearchNode {
    fn new(board: Board, mv: Option<Move>, parent: Option<NodeId>, perspective: Color) -> Self {
        Self {
            board,
            mv,
            parent,
            children: Vec::new(),
            visits: 0,
            score: 0,
            perspective,
        }
    }

    /// Average score per visit; 0 for unvisited nodes.
    pub fn average(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.score as f64 / self.visits as f64
        }
    }
}

/// Arena-backed MCTS tree for a single decision.
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// The root is always the first node.
    pub const ROOT: NodeId = NodeId(0);

    /// A tree holding only the root position.
    ///
    /// The root's perspective is the side not to move, so its children count
    /// wins for the side choosing at the root.
    pub fn new(board: Board) -> Self {
        let perspective = board.turn().other();
        Self {
            nodes: vec![SearchNode::new(board, None, None, perspective)],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> &SearchNode {
        self.node(Self::ROOT)
    }

    /// Number of nodes, root included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Add one child per empty field, each with the side to move's stone
    /// placed there. Finished positions and already expanded nodes are left
    /// alone.
    pub fn expand(&mut self, id: NodeId) {
        let node = &self.nodes[id.0];
        if !node.children.is_empty() || node.board.is_game_over() {
            return;
        }
        let board = node.board.clone();
        let turn = board.turn();
        let perspective = node.perspective.other();

        let mut children = Vec::with_capacity(FIELDS);
        for field in (0..FIELDS).filter(|&f| board.is_empty(f)) {
            let mut child_board = board.deep_copy();
            child_board.set_field(field, turn);
            let child = NodeId(self.nodes.len());
            self.nodes.push(SearchNode::new(
                child_board,
                Some(Move::new(field, turn)),
                Some(id),
                perspective,
            ));
            children.push(child);
        }
        self.nodes[id.0].children = children;
    }

    /// UCT value of a visited child.
    fn uct(&self, child: NodeId, parent_visits: f64, exploration: f64) -> f64 {
        let node = &self.nodes[child.0];
        let visits = node.visits as f64;
        node.average() + exploration * (parent_visits.ln() / visits).sqrt()
    }

    /// Descend from the root to the node to simulate next.
    ///
    /// Stops at the first unvisited child or at a node without children.
    /// Between visited children the highest UCT value wins, with exact ties
    /// settled by a coin flip.
    pub fn select(&self, exploration: f64) -> NodeId {
        let mut current = Self::ROOT;
        loop {
            let node = &self.nodes[current.0];
            if node.children.is_empty() {
                return current;
            }
            if let Some(&unvisited) = node
                .children
                .iter()
                .find(|&&c| self.nodes[c.0].visits == 0)
            {
                return unvisited;
            }

            let parent_visits = node.visits as f64;
            let mut best = node.children[0];
            let mut best_uct = f64::NEG_INFINITY;
            for &child in &node.children {
                let uct = self.uct(child, parent_visits, exploration);
                if uct > best_uct || (uct == best_uct && fastrand::bool()) {
                    best = child;
                    best_uct = uct;
                }
            }
            current = best;
        }
    }

    /// Play the node's position out and return the winner.
    pub fn simulate(&self, id: NodeId) -> Option<Color> {
        let mut board = self.nodes[id.0].board.clone();
        playout(&mut board)
    }

    /// Credit a playout to `id` and all its ancestors.
    pub fn backpropagate(&mut self, id: NodeId, winner: Option<Color>) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &mut self.nodes[node_id.0];
            node.visits += 1;
            if winner == Some(node.perspective) {
                node.score += WIN_SCORE;
            }
            current = node.parent;
        }
    }

    /// One select / expand / simulate / backpropagate cycle.
    pub fn iterate(&mut self, exploration: f64) {
        let leaf = self.select(exploration);
        if self.nodes[leaf.0].children.is_empty() {
            self.expand(leaf);
        }
        let winner = self.simulate(leaf);
        self.backpropagate(leaf, winner);
    }

    /// Root child with the highest accumulated score; the first one on ties.
    pub fn best_child(&self) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in &self.root().children {
            let better = match best {
                None => true,
                Some(b) => self.nodes[child.0].score > self.nodes[b.0].score,
            };
            if better {
                best = Some(child);
            }
        }
        best
    }

    /// Move of [`SearchTree::best_child`].
    pub fn best_move(&self) -> Option<Move> {
        self.best_child().and_then(|id| self.nodes[id.0].mv)
    }

    /// Iterate until `time_limit` passes or `token` is cancelled.
    ///
    /// Every `REPORT_PERIOD` playouts the current best move is handed to
    /// `report`; returning `false` ends the search early. Returns the best
    /// move at the end, `None` if the root position is already finished.
    pub fn run_search(
        &mut self,
        config: &MctsConfig,
        token: &CancellationToken,
        mut report: impl FnMut(Move) -> bool,
    ) -> Option<Move> {
        let start = Instant::now();
        let deadline = start + config.time_limit;
        self.expand(Self::ROOT);
        if self.root().children.is_empty() {
            return None;
        }

        let mut playouts = 0usize;
        while Instant::now() < deadline && !token.is_cancelled() {
            self.iterate(config.exploration);
            playouts += 1;

            if playouts % REPORT_PERIOD == 0 {
                if let Some(id) = self.best_child() {
                    let node = self.node(id);
                    debug!(playouts, score = node.score, visits = node.visits, "mcts progress");
                    if let Some(mv) = node.mv {
                        if !report(mv) {
                            break;
                        }
                    }
                }
            }
        }

        debug!(playouts, nodes = self.len(), elapsed = ?start.elapsed(), "mcts finished");
        self.best_move()
    }
}

/// Run MCTS from `board` on a worker thread under `config.time_limit`.
///
/// The caller waits a short grace period beyond the budget, then cancels and
/// keeps the last published best move.
pub fn timed_search(board: &Board, config: &MctsConfig) -> Option<Move> {
    let board = board.clone();
    let worker_config = config.clone();
    let budget = config.time_limit + Duration::from_millis(WORKER_GRACE_MS);
    run_cancellable(budget, move |publisher| {
        let mut tree = SearchTree::new(board);
        let best = tree.run_search(&worker_config, publisher.token(), |mv| publisher.publish(mv));
        dump_children(&tree);
        if let Some(mv) = best {
            publisher.publish(mv);
        }
    })
}

/// Log statistics for the root's children.
pub fn dump_children(tree: &SearchTree) {
    for &child in &tree.root().children {
        let node = tree.node(child);
        if let Some(mv) = node.mv {
            debug!(
                field = mv.field(),
                visits = node.visits,
                score = node.score,
                average = node.average(),
                "root child"
            );
        }
    }
}
