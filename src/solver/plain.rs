use super::SearchContext;
use crate::algorithm::SearchProblem;
use crate::common::Position;
use crate::heuristic::manhattan;

/// Unit-cost shortest path to a single goal.
pub(super) struct PlainProblem<'a> {
    context: SearchContext<'a>,
    goal: Position,
}

impl<'a> PlainProblem<'a> {
    pub(super) fn new(context: SearchContext<'a>, goal: Position) -> Self {
        PlainProblem { context, goal }
    }
}

impl SearchProblem for PlainProblem<'_> {
    type State = Position;

    fn initial_state(&self) -> Position {
        self.context.task.start
    }

    fn successors(&self, state: &Position, buf: &mut Vec<(Position, usize)>) {
        buf.extend(
            self.context
                .map
                .neighbors(*state)
                .iter()
                .map(|&(_, next)| (next, 1)),
        );
    }

    fn heuristic(&self, state: &Position) -> anyhow::Result<usize> {
        Ok(manhattan(*state, self.goal))
    }

    fn is_goal(&self, state: &Position) -> bool {
        *state == self.goal
    }
}
