//! The select/expand/simulate/backpropagate loop and its budgeting policy.

use crate::eval::{simple_eval, win_probability};
use crate::mcts::node::{NodeId, Tree, ROOT};
use crate::mcts::{MctsConfig, SearchResult};
use log::debug;
use rand::Rng;
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

// Tuned budgeting constants; strategy intensity scales all of them.
const BASE_EXPLORATION: f64 = 0.85;
const EXPLORATION_SCALE: f64 = 0.0125;
const BASE_ITERATIONS: usize = 400;
const ITERATION_SCALE: usize = 18;
const MAX_PLAYOUT_DEPTH: usize = 12;
const BASE_TIME_MS: u64 = 40;
const TIME_PER_LEVEL_MS: u64 = 4;

/// One Monte Carlo search invocation. Owns nothing shared beyond the
/// caller's stop flag; the root position is captured as FEN so the loop
/// never aliases the caller's live position.
pub(crate) struct MctsSearch<'a> {
    root_color: Color,
    config: &'a MctsConfig,
    stop: &'a AtomicBool,
    root_fen: String,
}

impl<'a> MctsSearch<'a> {
    pub(crate) fn new(
        root: &Chess,
        config: &'a MctsConfig,
        stop: &'a AtomicBool,
        perspective: Color,
    ) -> Self {
        MctsSearch {
            root_color: perspective,
            config,
            stop,
            root_fen: Fen::from_position(root.clone(), EnPassantMode::Legal).to_string(),
        }
    }

    pub(crate) fn run(&self) -> Option<SearchResult> {
        let root_pos = self.rebuild_root()?;
        if root_pos.legal_moves().is_empty() {
            return None;
        }

        let mut tree = Tree::new(&root_pos);
        let iterations = self.sample(&root_pos, &mut tree);
        self.extract_result(&tree, iterations)
    }

    fn rebuild_root(&self) -> Option<Chess> {
        let fen: Fen = self.root_fen.parse().ok()?;
        fen.into_position(CastlingMode::Standard).ok()
    }

    /// Runs the main loop until the stop flag, the hard iteration floor, or
    /// (once past the soft limit) the wall-clock budget ends it. Returns the
    /// number of iterations executed.
    fn sample(&self, root_pos: &Chess, tree: &mut Tree) -> u64 {
        let helper_count = (self.config.helper_threads + 1).max(1);
        let exploration = BASE_EXPLORATION + EXPLORATION_SCALE * self.config.strategy as f64;
        let iteration_limit =
            (BASE_ITERATIONS + ITERATION_SCALE * self.config.strategy) * helper_count;
        // A zero visit floor is defaulted to 1 rather than rejected.
        let target_visits = iteration_limit
            .max(self.config.min_visits.max(1) * tree[ROOT].untried_moves.len().max(1))
            as u64;
        let iteration_limit = iteration_limit as u64;
        let time_budget =
            Duration::from_millis(BASE_TIME_MS + TIME_PER_LEVEL_MS * self.config.strategy as u64);

        debug!(
            "mcts budget: exploration={:.4} soft_limit={} floor={} time={:?}",
            exploration, iteration_limit, target_visits, time_budget
        );

        let mut rng = rand::thread_rng();
        let start = Instant::now();
        let mut iterations: u64 = 0;
        let mut path: Vec<NodeId> = Vec::with_capacity(32);

        // The stop flag is polled once per full iteration; an in-flight
        // iteration always finishes its backpropagation.
        while !self.stop.load(Ordering::Relaxed) {
            if iterations >= target_visits {
                break;
            }

            // Time is a secondary stopping signal below the soft limit.
            if iterations >= iteration_limit && start.elapsed() >= time_budget {
                break;
            }

            let mut pos = root_pos.clone();
            let mut node = ROOT;
            let mut ply = 0usize;
            path.clear();
            path.push(node);

            // Selection: descend into the best UCT child until a node with
            // untried moves, a leaf, or the depth cutoff.
            while !tree[node].has_untried_moves() && tree[node].has_children() {
                node = self.select_child(tree, node, exploration);
                path.push(node);

                if let Some(mv) = tree[node].mv.clone() {
                    pos.play_unchecked(&mv);
                }
                ply += 1;

                if ply >= MAX_PLAYOUT_DEPTH {
                    break;
                }
            }

            // Expansion: materialize one random untried move.
            if tree[node].has_untried_moves() && ply < MAX_PLAYOUT_DEPTH {
                let mv = tree.pop_random_untried(node, &mut rng);
                pos.play_unchecked(&mv);
                node = tree.add_child(node, mv, &pos);
                path.push(node);
            }

            let reward = self.playout(&mut pos, &mut rng);

            // Backpropagation, root to leaf.
            for &visited in &path {
                let n = &mut tree[visited];
                n.visits += 1;
                n.total_value += reward;
            }

            iterations += 1;
        }

        debug!(
            "mcts sampled {} iterations over {} nodes in {:?}",
            iterations,
            tree.len(),
            start.elapsed()
        );

        iterations
    }

    /// UCT child selection over children with at least one visit; falls back
    /// to the first child when none qualify.
    fn select_child(&self, tree: &Tree, id: NodeId, exploration: f64) -> NodeId {
        let node = &tree[id];
        let log_parent = (node.visits as f64 + 1.0).ln();

        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for &child_id in &node.children {
            let child = &tree[child_id];
            if child.visits == 0 {
                continue;
            }

            let exploitation = child.total_value / child.visits as f64;
            let score = exploitation + exploration * (log_parent / child.visits as f64).sqrt();
            if score > best_score {
                best = Some(child_id);
                best_score = score;
            }
        }

        best.unwrap_or(node.children[0])
    }

    /// Plays uniformly random moves until a draw, a terminal position, or
    /// the depth cutoff. The reward is in [0, 1] from the root perspective.
    fn playout(&self, pos: &mut Chess, rng: &mut impl Rng) -> f64 {
        for _ in 0..MAX_PLAYOUT_DEPTH {
            if pos.halfmoves() >= 100 || pos.is_insufficient_material() {
                return 0.5;
            }

            let moves = pos.legal_moves();
            if moves.is_empty() {
                if pos.is_check() {
                    // Checkmate against the side to move.
                    return if pos.turn() == self.root_color { 0.0 } else { 1.0 };
                }
                return 0.5;
            }

            let mv = moves[rng.gen_range(0..moves.len())].clone();
            pos.play_unchecked(&mv);
        }

        let mut eval = simple_eval(pos);
        if pos.turn() != self.root_color {
            eval = -eval;
        }
        win_probability(eval)
    }

    /// Picks the most-visited root child, first encountered winning ties.
    fn extract_result(&self, tree: &Tree, iterations: u64) -> Option<SearchResult> {
        let children = &tree[ROOT].children;
        let mut best = *children.first()?;
        for &child in &children[1..] {
            if tree[child].visits > tree[best].visits {
                best = child;
            }
        }

        let chosen = &tree[best];
        if chosen.visits == 0 {
            return None;
        }

        Some(SearchResult {
            best_move: chosen.mv.clone()?,
            win_rate: chosen.mean_value(),
            visits: chosen.visits,
            iterations,
        })
    }
}
