//! Monte Carlo Tree Search strategy module.
//!
//! Two pieces: the archetype classifier, which gates whether sampling-based
//! search should run at all, and the tree engine, which runs a bounded
//! select/expand/simulate/backpropagate loop and reports the most-visited
//! root move. The caller supplies the position, a configuration, and a
//! shared cancellation flag; everything else is private to one invocation.

pub mod classifier;
pub mod node;
pub mod search;

pub use self::classifier::{collect_metrics, king_in_danger, Archetype, PositionMetrics};
pub use self::node::{Node, NodeId, Tree, ROOT};

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color};
use std::sync::atomic::AtomicBool;

/// Caller-supplied configuration, immutable for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MctsConfig {
    /// Cooperating helper search workers; scales the sampling budget.
    pub helper_threads: usize,
    /// Strategy intensity level; raises exploration and all budgets.
    pub strategy: usize,
    /// Minimum visits per root move. A zero is defaulted to 1.
    pub min_visits: usize,
    /// Also sample sharp-tactical and simplified-quiet archetypes, not just
    /// the maneuvering ones.
    pub explore: bool,
}

impl Default for MctsConfig {
    fn default() -> Self {
        MctsConfig {
            helper_threads: 0,
            strategy: 0,
            min_visits: 1,
            explore: false,
        }
    }
}

/// Outcome of one search invocation, detached from the internal tree.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: shakmaty::Move,
    /// Mean reward of the chosen subtree, in [0, 1] from the searched
    /// perspective.
    pub win_rate: f64,
    /// Visit count of the chosen root child.
    pub visits: u64,
    /// Total loop iterations executed.
    pub iterations: u64,
}

/// Entry gate: decides whether the position is worth sampling for `us`.
///
/// Positions flagged as likely draws, or with at most one legal move, are
/// never sampled. Maneuvering archetypes always are; the sharper and
/// quieter shapes only when `cfg.explore` is set.
pub fn should_use_mcts(
    pos: &Chess,
    cfg: &MctsConfig,
    maybe_draw: bool,
    legal_move_count: usize,
    us: Color,
) -> bool {
    if maybe_draw || legal_move_count <= 1 {
        return false;
    }

    match collect_metrics(pos, us).classify() {
        Some(Archetype::ManeuveringHigh) | Some(Archetype::ManeuveringMid) => true,
        Some(Archetype::SharpTactical) | Some(Archetype::SimplifiedQuiet) => cfg.explore,
        None => false,
    }
}

/// Runs a Monte Carlo search from `root` and reports the empirically best
/// move, or `None` when the position yields nothing to choose from.
///
/// The search is synchronous and owns its tree exclusively; `stop` is the
/// caller's cooperative cancellation flag, polled once per iteration.
pub fn search(
    root: &Chess,
    cfg: &MctsConfig,
    stop: &AtomicBool,
    perspective: Color,
) -> Option<SearchResult> {
    search::MctsSearch::new(root, cfg, stop, perspective).run()
}
