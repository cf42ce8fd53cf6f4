use super::SearchContext;
use crate::algorithm::SearchProblem;
use crate::common::Position;
use crate::heuristic::multi_goal_lower_bound;

use std::collections::BTreeSet;

/// Agent cell plus the goals not yet visited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MultiGoalState {
    pub(crate) position: Position,
    pub(crate) remaining: BTreeSet<Position>,
}

/// Unit-cost walk through every goal, searched over the position x
/// goal-subset graph with a minimum spanning tree bound.
pub(super) struct MultiGoalProblem<'a> {
    context: SearchContext<'a>,
}

impl<'a> MultiGoalProblem<'a> {
    pub(super) fn new(context: SearchContext<'a>) -> Self {
        MultiGoalProblem { context }
    }
}

impl SearchProblem for MultiGoalProblem<'_> {
    type State = MultiGoalState;

    fn initial_state(&self) -> MultiGoalState {
        let start = self.context.task.start;
        MultiGoalState {
            position: start,
            remaining: self
                .context
                .task
                .goals
                .iter()
                .copied()
                .filter(|goal| *goal != start)
                .collect(),
        }
    }

    fn successors(&self, state: &MultiGoalState, buf: &mut Vec<(MultiGoalState, usize)>) {
        for &(_, next) in self.context.map.neighbors(state.position) {
            let mut remaining = state.remaining.clone();
            remaining.remove(&next);
            buf.push((
                MultiGoalState {
                    position: next,
                    remaining,
                },
                1,
            ));
        }
    }

    // Rebuilt per call. The engine only asks for states it is about to
    // file on the frontier.
    fn heuristic(&self, state: &MultiGoalState) -> anyhow::Result<usize> {
        multi_goal_lower_bound(state.position, &state.remaining)
    }

    fn is_goal(&self, state: &MultiGoalState) -> bool {
        state.remaining.is_empty()
    }
}
