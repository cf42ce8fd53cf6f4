use super::SearchContext;
use crate::algorithm::SearchProblem;
use crate::common::{Direction, Position};
use crate::heuristic::manhattan;

/// Cell plus the direction the agent faces after arriving there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FacingState {
    pub(crate) position: Position,
    pub(crate) facing: Direction,
}

/// Shortest path where every move costs `forward_cost` and changing
/// direction adds `turn_cost`.
pub(super) struct PenaltyProblem<'a> {
    context: SearchContext<'a>,
    goal: Position,
    forward_cost: usize,
    turn_cost: usize,
    initial_facing: Direction,
}

impl<'a> PenaltyProblem<'a> {
    pub(super) fn new(
        context: SearchContext<'a>,
        goal: Position,
        forward_cost: usize,
        turn_cost: usize,
        initial_facing: Direction,
    ) -> Self {
        PenaltyProblem {
            context,
            goal,
            forward_cost,
            turn_cost,
            initial_facing,
        }
    }

    fn step_cost(&self, facing: Direction, direction: Direction) -> usize {
        if direction == facing {
            self.forward_cost
        } else {
            self.turn_cost + self.forward_cost
        }
    }
}

impl SearchProblem for PenaltyProblem<'_> {
    type State = FacingState;

    fn initial_state(&self) -> FacingState {
        FacingState {
            position: self.context.task.start,
            facing: self.initial_facing,
        }
    }

    fn successors(&self, state: &FacingState, buf: &mut Vec<(FacingState, usize)>) {
        for &(direction, next) in self.context.map.neighbors(state.position) {
            buf.push((
                FacingState {
                    position: next,
                    facing: direction,
                },
                self.step_cost(state.facing, direction),
            ));
        }
    }

    // Every remaining move costs at least `forward_cost`.
    fn heuristic(&self, state: &FacingState) -> anyhow::Result<usize> {
        Ok(manhattan(state.position, self.goal) * self.forward_cost)
    }

    fn is_goal(&self, state: &FacingState) -> bool {
        state.position == self.goal
    }
}
