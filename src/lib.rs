//! Supplementary Monte Carlo move search for a chess engine.
//!
//! The primary alpha-beta search delegates to this module when the current
//! position matches one of a few strategic archetypes (quiet, maneuvering,
//! or sharply tactical) where sampling-based search tends to pay off. Each
//! invocation builds a private tree, runs a bounded UCT loop, and reports
//! the most-visited root move; nothing is persisted between calls.

pub mod eval;
pub mod mcts;

pub use crate::mcts::{search, should_use_mcts, MctsConfig, SearchResult};
