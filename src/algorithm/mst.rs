use crate::common::Position;
use crate::heuristic::manhattan;

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: Position,
    pub destination: Position,
    pub weight: usize,
}

#[derive(Debug, Clone)]
struct Subset {
    parent: Position,
    rank: usize,
}

/// Disjoint sets keyed by position, with path compression and union by rank.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    subsets: HashMap<Position, Subset>,
}

impl UnionFind {
    pub fn new<I: IntoIterator<Item = Position>>(positions: I) -> Self {
        let subsets = positions
            .into_iter()
            .map(|position| {
                (
                    position,
                    Subset {
                        parent: position,
                        rank: 0,
                    },
                )
            })
            .collect();
        UnionFind { subsets }
    }

    fn subset(&self, position: Position) -> Result<&Subset> {
        self.subsets
            .get(&position)
            .ok_or_else(|| anyhow!("{position} is not registered in the union-find table"))
    }

    pub fn find(&mut self, position: Position) -> Result<Position> {
        let mut root = position;
        loop {
            let parent = self.subset(root)?.parent;
            if parent == root {
                break;
            }
            root = parent;
        }

        // Point every node on the walk straight at the root.
        let mut current = position;
        while current != root {
            let subset = self
                .subsets
                .get_mut(&current)
                .ok_or_else(|| anyhow!("{current} vanished during path compression"))?;
            current = std::mem::replace(&mut subset.parent, root);
        }

        Ok(root)
    }

    /// Merges the sets holding `a` and `b`. Returns `false` when they already
    /// share a root.
    pub fn union(&mut self, a: Position, b: Position) -> Result<bool> {
        let a_root = self.find(a)?;
        let b_root = self.find(b)?;
        if a_root == b_root {
            return Ok(false);
        }

        let a_rank = self.subset(a_root)?.rank;
        let b_rank = self.subset(b_root)?.rank;
        let (child, parent) = if a_rank < b_rank {
            (a_root, b_root)
        } else {
            (b_root, a_root)
        };
        if let Some(subset) = self.subsets.get_mut(&child) {
            subset.parent = parent;
        }
        if a_rank == b_rank {
            if let Some(subset) = self.subsets.get_mut(&parent) {
                subset.rank += 1;
            }
        }

        Ok(true)
    }

    pub fn root_count(&self) -> usize {
        self.subsets
            .iter()
            .filter(|(position, subset)| **position == subset.parent)
            .count()
    }
}

#[derive(Debug, Clone)]
pub struct SpanningTree {
    pub total_weight: usize,
    pub edges: Vec<Edge>,
    pub components: usize,
}

/// Every unordered pair of vertices once, start paired first, weighted by
/// Manhattan distance.
fn complete_graph(vertices: &[Position]) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(vertices.len() * vertices.len().saturating_sub(1) / 2);
    for (i, &source) in vertices.iter().enumerate() {
        for &destination in &vertices[i + 1..] {
            edges.push(Edge {
                source,
                destination,
                weight: manhattan(source, destination),
            });
        }
    }
    edges
}

/// Kruskal's algorithm over the complete Manhattan graph on
/// `{start} ∪ goals`.
pub fn kruskal<'a, I>(start: Position, goals: I) -> Result<SpanningTree>
where
    I: IntoIterator<Item = &'a Position>,
{
    let mut vertices = vec![start];
    for goal in goals {
        if !vertices.contains(goal) {
            vertices.push(*goal);
        }
    }
    let required = vertices.len() - 1;

    let mut edges = complete_graph(&vertices);
    edges.sort_by_key(|edge| edge.weight);

    let mut union_find = UnionFind::new(vertices.iter().copied());
    let mut accepted = Vec::with_capacity(required);
    let mut total_weight = 0;

    for edge in edges {
        if accepted.len() == required {
            break;
        }
        if union_find.union(edge.source, edge.destination)? {
            total_weight += edge.weight;
            accepted.push(edge);
        }
    }
    trace!("mst from {start}: {} vertices, weight {total_weight}", vertices.len());

    Ok(SpanningTree {
        total_weight,
        edges: accepted,
        components: union_find.root_count(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn p(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn random_points(rng: &mut StdRng, count: usize) -> Vec<Position> {
        let mut points = Vec::new();
        while points.len() < count {
            let point = p(rng.gen_range(0..12), rng.gen_range(0..12));
            if !points.contains(&point) {
                points.push(point);
            }
        }
        points
    }

    // Cheapest walk that starts at `current` and visits every point in `rest`.
    fn brute_force_path(current: Position, rest: &mut Vec<Position>) -> usize {
        if rest.is_empty() {
            return 0;
        }
        let mut best = usize::MAX;
        for i in 0..rest.len() {
            let next = rest.swap_remove(i);
            let cost = manhattan(current, next) + brute_force_path(next, rest);
            best = best.min(cost);
            rest.push(next);
            let last = rest.len() - 1;
            rest.swap(i, last);
        }
        best
    }

    #[test]
    fn test_three_points_drop_longest_edge() {
        let tree = kruskal(p(1, 1), &[p(1, 3), p(3, 3)]).unwrap();
        // Pairwise distances 2, 4 and 2.
        assert_eq!(tree.total_weight, 4);
        assert_eq!(tree.edges.len(), 2);
        assert_eq!(tree.components, 1);
    }

    #[test]
    fn test_empty_goal_set() {
        let tree = kruskal(p(4, 4), &[]).unwrap();
        assert_eq!(tree.total_weight, 0);
        assert!(tree.edges.is_empty());
        assert_eq!(tree.components, 1);
    }

    #[test]
    fn test_start_listed_as_goal() {
        let tree = kruskal(p(1, 1), &[p(1, 1), p(1, 4)]).unwrap();
        assert_eq!(tree.total_weight, 3);
        assert_eq!(tree.edges.len(), 1);
    }

    #[test]
    fn test_spanning_tree_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 2..=9 {
            let points = random_points(&mut rng, count);
            let tree = kruskal(points[0], &points[1..]).unwrap();
            assert_eq!(tree.edges.len(), count - 1);
            assert_eq!(tree.components, 1);
            assert_eq!(
                tree.total_weight,
                tree.edges.iter().map(|edge| edge.weight).sum::<usize>()
            );
        }
    }

    #[test]
    fn test_lower_bounds_every_hamiltonian_path() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let goals_count = rng.gen_range(1..=6);
            let points = random_points(&mut rng, goals_count + 1);
            let start = points[0];
            let mut goals = points[1..].to_vec();

            let bound = kruskal(start, &goals).unwrap().total_weight;
            let best_path = brute_force_path(start, &mut goals);
            assert!(bound <= best_path, "mst {bound} exceeds path {best_path}");
        }
    }

    #[test]
    fn test_union_find() {
        let mut union_find = UnionFind::new([p(0, 0), p(0, 1), p(0, 2), p(0, 3)]);
        assert_eq!(union_find.root_count(), 4);

        assert!(union_find.union(p(0, 0), p(0, 1)).unwrap());
        assert!(union_find.union(p(0, 2), p(0, 3)).unwrap());
        assert!(!union_find.union(p(0, 1), p(0, 0)).unwrap());
        assert_eq!(union_find.root_count(), 2);

        assert!(union_find.union(p(0, 3), p(0, 1)).unwrap());
        assert_eq!(union_find.root_count(), 1);
        let root = union_find.find(p(0, 0)).unwrap();
        for col in 1..4 {
            assert_eq!(union_find.find(p(0, col)).unwrap(), root);
        }
    }

    #[test]
    fn test_unregistered_position_is_an_error() {
        let mut union_find = UnionFind::new([p(0, 0)]);
        assert!(union_find.find(p(9, 9)).is_err());
        assert!(union_find.union(p(0, 0), p(9, 9)).is_err());
    }
}
