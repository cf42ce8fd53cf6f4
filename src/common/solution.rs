use super::node::{NodeArena, NodeHandle};
use super::Position;

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Solved,
    // Frontier emptied without meeting the goal test.
    NoPath,
    BudgetExhausted,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub success: bool,
    pub termination: Termination,
    /// Cells from start to the final goal, both included.
    pub path: Vec<Position>,
    /// Number of moves on `path`.
    pub step_cost: usize,
    /// Sum of the per-move costs under the variant's cost model.
    pub solution_cost: usize,
    pub nodes_expanded: usize,
    /// Goals in the order the path first reaches them.
    pub visit_order: Vec<Position>,
}

impl Solution {
    pub(crate) fn unsolved(termination: Termination, nodes_expanded: usize) -> Self {
        Solution {
            success: false,
            termination,
            path: Vec::new(),
            step_cost: 0,
            solution_cost: 0,
            nodes_expanded,
            visit_order: Vec::new(),
        }
    }

    /// Walks back-pointers from `goal` to the root and collects the metrics
    /// of the path.
    pub(crate) fn reconstruct<S, F>(
        nodes: &NodeArena<S>,
        goal: NodeHandle,
        position_of: F,
        goals: &[Position],
        nodes_expanded: usize,
    ) -> Self
    where
        F: Fn(&S) -> Position,
    {
        let lineage = nodes.lineage(goal);
        let path: Vec<Position> = lineage.iter().map(|node| position_of(&node.state)).collect();
        let solution_cost = lineage.iter().map(|node| node.step_cost).sum();

        let mut outstanding: HashSet<Position> = goals.iter().copied().collect();
        let visit_order = path
            .iter()
            .filter(|position| outstanding.remove(*position))
            .copied()
            .collect();

        Solution {
            success: true,
            termination: Termination::Solved,
            step_cost: path.len().saturating_sub(1),
            path,
            solution_cost,
            nodes_expanded,
            visit_order,
        }
    }

    /// Writes the solution as JSON when `path` ends in `.json`, YAML otherwise.
    pub fn write_to_file(&self, path: &str) -> Result<()> {
        let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
        let mut writer = io::BufWriter::new(file);
        let is_json = Path::new(path)
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));
        let data = if is_json {
            serde_json::to_string_pretty(self)?
        } else {
            serde_yaml::to_string(self)?
        };
        writer.write_all(data.as_bytes())?;
        writer.flush()?;

        Ok(())
    }
}
