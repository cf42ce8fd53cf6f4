use crate::algorithm::kruskal;
use crate::common::Position;

use anyhow::Result;

/// `|a.row - b.row| + |a.col - b.col|`. Admissible and consistent for
/// four-directional moves of cost at least one.
pub fn manhattan(a: Position, b: Position) -> usize {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

/// Weight of the minimum spanning tree over `{position} ∪ remaining`, a lower
/// bound on the length of any walk from `position` through every remaining
/// goal.
pub fn multi_goal_lower_bound<'a, I>(position: Position, remaining: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a Position>,
{
    Ok(kruskal(position, remaining)?.total_weight)
}
