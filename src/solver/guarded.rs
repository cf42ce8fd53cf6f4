use super::SearchContext;
use crate::adversary::{is_danger, Adversary};
use crate::algorithm::SearchProblem;
use crate::common::Position;
use crate::heuristic::manhattan;

use tracing::trace;

/// Agent cell together with the adversary it shares the maze with at the
/// same moment. The same cell at a different adversary phase is a
/// different state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct GuardedState {
    pub(crate) agent: Position,
    pub(crate) adversary: Adversary,
}

/// Unit-cost path to the goal that never meets the moving adversary.
pub(super) struct GuardedProblem<'a> {
    context: SearchContext<'a>,
    goal: Position,
    adversary: Adversary,
}

impl<'a> GuardedProblem<'a> {
    pub(super) fn new(context: SearchContext<'a>, goal: Position, adversary: Adversary) -> Self {
        GuardedProblem {
            context,
            goal,
            adversary,
        }
    }
}

impl SearchProblem for GuardedProblem<'_> {
    type State = GuardedState;

    fn initial_state(&self) -> GuardedState {
        GuardedState {
            agent: self.context.task.start,
            adversary: self.adversary,
        }
    }

    fn successors(&self, state: &GuardedState, buf: &mut Vec<(GuardedState, usize)>) {
        let adversary = state.adversary.advance(self.context.map);
        for &(_, next) in self.context.map.neighbors(state.agent) {
            if is_danger(next, &state.adversary, &adversary) {
                trace!(
                    "reject move {} -> {next}, adversary {} -> {}",
                    state.agent,
                    state.adversary.position,
                    adversary.position
                );
                continue;
            }
            buf.push((
                GuardedState {
                    agent: next,
                    adversary,
                },
                1,
            ));
        }
    }

    fn heuristic(&self, state: &GuardedState) -> anyhow::Result<usize> {
        Ok(manhattan(state.agent, self.goal))
    }

    fn is_goal(&self, state: &GuardedState) -> bool {
        state.agent == self.goal
    }
}
