mod astar;
mod mst;

pub(crate) use astar::{best_first_search, SearchOutcome};
pub use mst::{kruskal, Edge, SpanningTree, UnionFind};

use clap::ValueEnum;
use serde::Deserialize;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One problem variant as seen by the best-first engine.
pub trait SearchProblem {
    type State: Clone + Eq + Hash + Debug;

    fn initial_state(&self) -> Self::State;

    /// Appends `(successor, step cost)` pairs into `buf`. The caller clears
    /// `buf` before calling.
    fn successors(&self, state: &Self::State, buf: &mut Vec<(Self::State, usize)>);

    /// Admissible estimate of the remaining cost. Errors abort the search.
    fn heuristic(&self, state: &Self::State) -> anyhow::Result<usize>;

    fn is_goal(&self, state: &Self::State) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Frontier ordered by `g + h`.
    #[default]
    #[value(name = "astar")]
    #[serde(rename = "astar")]
    AStar,
    /// Frontier ordered by `h` alone.
    Greedy,
}

impl Strategy {
    pub(crate) fn priority(self, g_cost: usize, h_cost: usize) -> usize {
        match self {
            Strategy::AStar => g_cost + h_cost,
            Strategy::Greedy => h_cost,
        }
    }
}

/// Shared flag a caller raises to stop a running search at its next expansion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub cancel: Option<CancelToken>,
}

impl SearchLimits {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}
