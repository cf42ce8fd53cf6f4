use super::{SearchLimits, SearchProblem, Strategy};
use crate::common::{NodeArena, NodeHandle, SearchNode, Termination};
use crate::stat::Stats;

use anyhow::Result;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, instrument, trace, warn};

// Ordered by priority, then by insertion sequence so ties pop FIFO.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OpenEntry {
    priority: usize,
    sequence: usize,
    handle: NodeHandle,
}

pub(crate) enum SearchOutcome<S> {
    Found {
        nodes: NodeArena<S>,
        goal: NodeHandle,
    },
    Unsolved(Termination),
}

#[instrument(skip_all, name = "best_first", fields(strategy = ?strategy), level = "debug")]
pub(crate) fn best_first_search<P: SearchProblem>(
    problem: &P,
    strategy: Strategy,
    limits: &SearchLimits,
    stats: &mut Stats,
) -> Result<SearchOutcome<P::State>> {
    let mut nodes = NodeArena::default();
    let mut open_list = BTreeSet::new();
    // States currently on the frontier, with the key they are filed under.
    let mut open_index: HashMap<P::State, OpenEntry> = HashMap::new();
    // Expanded states and their g cost at closing time.
    let mut closed_list: HashMap<P::State, usize> = HashMap::new();
    let mut sequence = 0;

    let start = problem.initial_state();
    let start_h_cost = problem.heuristic(&start)?;
    let root = nodes.push(SearchNode::root(start.clone(), start_h_cost));
    let root_entry = OpenEntry {
        priority: strategy.priority(0, start_h_cost),
        sequence,
        handle: root,
    };
    sequence += 1;
    open_list.insert(root_entry);
    open_index.insert(start, root_entry);
    stats.nodes_generated += 1;

    let mut successors = Vec::new();

    while let Some(current) = open_list.pop_first() {
        let state = nodes[current.handle].state.clone();
        open_index.remove(&state);
        trace!(
            "expand node: {state:?}, g {} f {}",
            nodes[current.handle].g_cost,
            nodes[current.handle].f_cost
        );

        if problem.is_goal(&state) {
            debug!(
                "goal reached with g cost {}, {} nodes expanded",
                nodes[current.handle].g_cost, stats.nodes_expanded
            );
            return Ok(SearchOutcome::Found {
                nodes,
                goal: current.handle,
            });
        }

        if limits.is_cancelled() {
            warn!("search cancelled after {} expansions", stats.nodes_expanded);
            return Ok(SearchOutcome::Unsolved(Termination::Cancelled));
        }
        if limits
            .max_expansions
            .is_some_and(|budget| stats.nodes_expanded >= budget)
        {
            warn!("expansion budget of {} exhausted", stats.nodes_expanded);
            return Ok(SearchOutcome::Unsolved(Termination::BudgetExhausted));
        }

        let g_cost = nodes[current.handle].g_cost;
        closed_list.insert(state.clone(), g_cost);
        stats.nodes_expanded += 1;

        successors.clear();
        problem.successors(&state, &mut successors);

        for (next, step_cost) in successors.drain(..) {
            if closed_list.contains_key(&next) {
                continue;
            }

            let tentative_g_cost = g_cost + step_cost;
            let existing = open_index.get(&next).copied();
            if let Some(entry) = existing {
                if nodes[entry.handle].g_cost <= tentative_g_cost {
                    continue;
                }
            }

            let h_cost = problem.heuristic(&next)?;
            let entry = OpenEntry {
                priority: strategy.priority(tentative_g_cost, h_cost),
                sequence,
                handle: match existing {
                    // Decrease-key: rewrite the frontier node in place.
                    Some(entry) => {
                        open_list.remove(&entry);
                        let node = &mut nodes[entry.handle];
                        node.g_cost = tentative_g_cost;
                        node.f_cost = tentative_g_cost + h_cost;
                        node.step_cost = step_cost;
                        node.parent = Some(current.handle);
                        entry.handle
                    }
                    None => {
                        stats.nodes_generated += 1;
                        nodes.push(SearchNode {
                            state: next.clone(),
                            g_cost: tentative_g_cost,
                            f_cost: tentative_g_cost + h_cost,
                            step_cost,
                            parent: Some(current.handle),
                        })
                    }
                },
            };
            sequence += 1;
            open_list.insert(entry);
            open_index.insert(next, entry);
        }

        stats.max_frontier = stats.max_frontier.max(open_list.len());
    }

    debug!(
        "frontier exhausted, {} nodes in arena, cannot find solution",
        nodes.len()
    );
    Ok(SearchOutcome::Unsolved(Termination::NoPath))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::CancelToken;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    // Integers on a line; moving right costs 1, jumping +3 costs `jump_cost`.
    struct NumberLine {
        target: usize,
        jump_cost: usize,
        dead_end: Option<usize>,
    }

    impl SearchProblem for NumberLine {
        type State = usize;

        fn initial_state(&self) -> usize {
            0
        }

        fn successors(&self, state: &usize, buf: &mut Vec<(usize, usize)>) {
            if Some(*state) == self.dead_end {
                return;
            }
            if *state < self.target + 3 {
                buf.push((state + 1, 1));
                buf.push((state + 3, self.jump_cost));
            }
        }

        fn heuristic(&self, state: &usize) -> Result<usize> {
            Ok(self.target.saturating_sub(*state) / 3)
        }

        fn is_goal(&self, state: &usize) -> bool {
            *state == self.target
        }
    }

    fn path_of(outcome: SearchOutcome<usize>) -> (Vec<usize>, usize) {
        match outcome {
            SearchOutcome::Found { nodes, goal } => {
                let states = nodes.lineage(goal).iter().map(|n| n.state).collect();
                (states, nodes[goal].g_cost)
            }
            SearchOutcome::Unsolved(termination) => panic!("unsolved: {termination:?}"),
        }
    }

    #[test]
    fn test_finds_cheapest_mix_of_moves() {
        init_tracing();
        let problem = NumberLine {
            target: 7,
            jump_cost: 2,
            dead_end: None,
        };
        let mut stats = Stats::default();
        let outcome =
            best_first_search(&problem, Strategy::AStar, &SearchLimits::default(), &mut stats)
                .unwrap();
        let (states, cost) = path_of(outcome);
        // Two jumps and one step.
        assert_eq!(cost, 5);
        assert_eq!(states.first(), Some(&0));
        assert_eq!(states.last(), Some(&7));
        assert!(stats.nodes_expanded > 0);
    }

    #[test]
    fn test_decrease_key_replaces_parent() {
        init_tracing();
        // Jumping is dearer than three single steps, so the first route found
        // to 3 (a jump, cost 4) must be replaced by the stepped one (cost 3).
        let problem = NumberLine {
            target: 3,
            jump_cost: 4,
            dead_end: None,
        };
        let mut stats = Stats::default();
        let outcome =
            best_first_search(&problem, Strategy::AStar, &SearchLimits::default(), &mut stats)
                .unwrap();
        let (states, cost) = path_of(outcome);
        assert_eq!(cost, 3);
        assert_eq!(states, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exhausted_frontier_reports_no_path() {
        init_tracing();
        let problem = NumberLine {
            target: 5,
            jump_cost: 1,
            dead_end: Some(0),
        };
        let mut stats = Stats::default();
        let outcome =
            best_first_search(&problem, Strategy::AStar, &SearchLimits::default(), &mut stats)
                .unwrap();
        assert!(matches!(
            outcome,
            SearchOutcome::Unsolved(Termination::NoPath)
        ));
        assert_eq!(stats.nodes_expanded, 1);
    }

    #[test]
    fn test_expansion_budget() {
        init_tracing();
        let problem = NumberLine {
            target: 50,
            jump_cost: 2,
            dead_end: None,
        };
        let limits = SearchLimits {
            max_expansions: Some(3),
            cancel: None,
        };
        let mut stats = Stats::default();
        let outcome = best_first_search(&problem, Strategy::AStar, &limits, &mut stats).unwrap();
        assert!(matches!(
            outcome,
            SearchOutcome::Unsolved(Termination::BudgetExhausted)
        ));
        assert_eq!(stats.nodes_expanded, 3);
    }

    #[test]
    fn test_cancelled_before_first_expansion() {
        init_tracing();
        let problem = NumberLine {
            target: 4,
            jump_cost: 2,
            dead_end: None,
        };
        let token = CancelToken::new();
        token.cancel();
        let limits = SearchLimits {
            max_expansions: None,
            cancel: Some(token),
        };
        let mut stats = Stats::default();
        let outcome = best_first_search(&problem, Strategy::AStar, &limits, &mut stats).unwrap();
        assert!(matches!(
            outcome,
            SearchOutcome::Unsolved(Termination::Cancelled)
        ));
        assert_eq!(stats.nodes_expanded, 0);
    }

    #[test]
    fn test_greedy_reaches_goal() {
        init_tracing();
        let problem = NumberLine {
            target: 9,
            jump_cost: 2,
            dead_end: None,
        };
        let mut stats = Stats::default();
        let outcome =
            best_first_search(&problem, Strategy::Greedy, &SearchLimits::default(), &mut stats)
                .unwrap();
        let (states, _) = path_of(outcome);
        assert_eq!(states.last(), Some(&9));
    }

    // Endless chain that raises the cancel flag on its `cancel_after`-th
    // expansion.
    struct CancelMidRun {
        token: CancelToken,
        cancel_after: usize,
        calls: std::cell::Cell<usize>,
    }

    impl SearchProblem for CancelMidRun {
        type State = usize;

        fn initial_state(&self) -> usize {
            0
        }

        fn successors(&self, state: &usize, buf: &mut Vec<(usize, usize)>) {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() == self.cancel_after {
                self.token.cancel();
            }
            buf.push((state + 1, 1));
        }

        fn heuristic(&self, _state: &usize) -> Result<usize> {
            Ok(0)
        }

        fn is_goal(&self, _state: &usize) -> bool {
            false
        }
    }

    #[test]
    fn test_cancelled_during_search() {
        init_tracing();
        let token = CancelToken::new();
        let problem = CancelMidRun {
            token: token.clone(),
            cancel_after: 4,
            calls: std::cell::Cell::new(0),
        };
        let limits = SearchLimits {
            max_expansions: None,
            cancel: Some(token),
        };
        let mut stats = Stats::default();
        let outcome = best_first_search(&problem, Strategy::AStar, &limits, &mut stats).unwrap();
        assert!(matches!(
            outcome,
            SearchOutcome::Unsolved(Termination::Cancelled)
        ));
        // The flag is seen before the very next expansion.
        assert_eq!(stats.nodes_expanded, 4);
        assert_eq!(problem.calls.get(), 4);
    }
}
