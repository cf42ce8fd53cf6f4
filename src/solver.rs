mod guarded;
mod multigoal;
mod penalty;
mod plain;

use guarded::GuardedProblem;
use multigoal::MultiGoalProblem;
use penalty::PenaltyProblem;
use plain::PlainProblem;

use crate::algorithm::{best_first_search, SearchLimits, SearchOutcome, SearchProblem, Strategy};
use crate::common::{Direction, Position, Solution, Termination};
use crate::map::Map;
use crate::scenario::Task;
use crate::stat::Stats;

use anyhow::{anyhow, bail, Result};
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Problem variant to solve. Each one runs the same best-first engine over
/// its own state shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Plain,
    Penalty {
        forward_cost: usize,
        turn_cost: usize,
    },
    Guarded,
    MultiGoal,
}

impl Variant {
    fn name(&self) -> &'static str {
        match self {
            Variant::Plain => "plain",
            Variant::Penalty { .. } => "penalty",
            Variant::Guarded => "guarded",
            Variant::MultiGoal => "multi-goal",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub strategy: Strategy,
    pub limits: SearchLimits,
    /// Facing of the agent before its first move, used by the penalty variant.
    pub initial_facing: Direction,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            strategy: Strategy::AStar,
            limits: SearchLimits::default(),
            initial_facing: Direction::Right,
        }
    }
}

/// Read-only inputs handed to every successor generator.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchContext<'a> {
    pub(crate) map: &'a Map,
    pub(crate) task: &'a Task,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(map: &'a Map, task: &'a Task) -> Self {
        SearchContext { map, task }
    }

    fn single_goal(&self, variant: &Variant) -> Result<Position> {
        match self.task.goals.as_slice() {
            [goal] => Ok(*goal),
            goals => bail!(
                "{} variant expects exactly one goal, found {}",
                variant.name(),
                goals.len()
            ),
        }
    }

    /// Start, goals and adversary must sit on walkable cells of the map.
    fn check_placement(&self) -> Result<()> {
        let task = self.task;
        if !self.map.is_walkable(task.start) {
            bail!("start {} is not a walkable cell of the maze", task.start);
        }
        if let Some(goal) = task.goals.iter().find(|goal| !self.map.is_walkable(**goal)) {
            bail!("goal {goal} is not a walkable cell of the maze");
        }
        if let Some(adversary) = task
            .adversary
            .filter(|adversary| !self.map.is_walkable(adversary.position))
        {
            bail!(
                "adversary {} is not a walkable cell of the maze",
                adversary.position
            );
        }
        Ok(())
    }

    // Goals cut off from the start by walls, ignoring any adversary.
    fn unreachable_goal(&self) -> Option<Position> {
        let distance = self.map.distance_field(self.task.start);
        self.task.goals.iter().copied().find(|goal| {
            distance
                .get(goal.row)
                .and_then(|row| row.get(goal.col))
                .map_or(true, |cost| *cost == usize::MAX)
        })
    }
}

pub struct Solver<'a> {
    context: SearchContext<'a>,
    options: SearchOptions,
    stats: Stats,
}

impl<'a> Solver<'a> {
    pub fn new(map: &'a Map, task: &'a Task, options: SearchOptions) -> Self {
        Solver {
            context: SearchContext::new(map, task),
            options,
            stats: Stats::default(),
        }
    }

    /// Statistics of the most recent `solve` call.
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[instrument(skip_all, name = "solve", fields(variant = variant.name(), start = %self.context.task.start), level = "debug")]
    pub fn solve(&mut self, variant: &Variant) -> Result<Solution> {
        let solve_start_time = Instant::now();
        self.stats = Stats::default();
        self.context.check_placement()?;

        let solution = match *variant {
            Variant::Plain => {
                let goal = self.context.single_goal(variant)?;
                self.run(&PlainProblem::new(self.context, goal), |state| *state)?
            }
            Variant::Penalty {
                forward_cost,
                turn_cost,
            } => {
                let goal = self.context.single_goal(variant)?;
                let problem = PenaltyProblem::new(
                    self.context,
                    goal,
                    forward_cost,
                    turn_cost,
                    self.options.initial_facing,
                );
                self.run(&problem, |state| state.position)?
            }
            Variant::Guarded => {
                let goal = self.context.single_goal(variant)?;
                let adversary = self
                    .context
                    .task
                    .adversary
                    .ok_or_else(|| anyhow!("guarded variant needs an adversary"))?;
                let problem = GuardedProblem::new(self.context, goal, adversary);
                self.run(&problem, |state| state.agent)?
            }
            Variant::MultiGoal => {
                if self.context.task.goals.is_empty() {
                    bail!("multi-goal variant needs at least one goal");
                }
                self.run(&MultiGoalProblem::new(self.context), |state| state.position)?
            }
        };

        self.stats.time_micros = solve_start_time.elapsed().as_micros() as usize;
        self.stats.costs = solution.solution_cost;
        self.stats.print();

        Ok(solution)
    }

    fn run<P, F>(&mut self, problem: &P, position_of: F) -> Result<Solution>
    where
        P: SearchProblem,
        F: Fn(&P::State) -> Position,
    {
        if let Some(goal) = self.context.unreachable_goal() {
            warn!("goal {goal} is walled off from the start");
            return Ok(Solution::unsolved(Termination::NoPath, 0));
        }

        let outcome = best_first_search(
            problem,
            self.options.strategy,
            &self.options.limits,
            &mut self.stats,
        )?;

        Ok(match outcome {
            SearchOutcome::Found { nodes, goal } => {
                let solution = Solution::reconstruct(
                    &nodes,
                    goal,
                    position_of,
                    &self.context.task.goals,
                    self.stats.nodes_expanded,
                );
                info!(
                    "solved: {} steps, cost {}",
                    solution.step_cost, solution.solution_cost
                );
                solution
            }
            SearchOutcome::Unsolved(termination) => {
                warn!("no solution: {termination:?}");
                Solution::unsolved(termination, self.stats.nodes_expanded)
            }
        })
    }
}

/// Solves one variant on `map` for `task`.
pub fn solve(variant: &Variant, map: &Map, task: &Task, options: &SearchOptions) -> Result<Solution> {
    Solver::new(map, task, options.clone()).solve(variant)
}
