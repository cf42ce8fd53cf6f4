use anyhow::{bail, Result};
use rand::prelude::*;
use std::collections::HashSet;
use tracing::info;

use crate::adversary::Adversary;
use crate::common::{Direction, Position};
use crate::map::Map;

/// Start, goals and optional adversary of one search run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub start: Position,
    pub goals: Vec<Position>,
    pub adversary: Option<Adversary>,
}

impl Task {
    pub fn from_map(map: &Map, adversary_facing: Direction) -> Self {
        Task {
            start: map.start(),
            goals: map.goals().to_vec(),
            adversary: map
                .adversary()
                .map(|position| Adversary::new(position, adversary_facing)),
        }
    }

    /// Adds `count` goals on distinct open cells that are neither the start
    /// nor an existing goal.
    pub fn scatter_goals<R: Rng + ?Sized>(
        &mut self,
        map: &Map,
        count: usize,
        rng: &mut R,
    ) -> Result<()> {
        let taken: HashSet<Position> = self.goals.iter().copied().chain([self.start]).collect();
        let mut available: Vec<Position> = map
            .open_cells()
            .filter(|position| !taken.contains(position))
            .collect();

        if available.len() < count {
            bail!(
                "cannot scatter {count} goals, only {} free cells",
                available.len()
            );
        }

        available.shuffle(rng);
        self.goals.extend(available.into_iter().take(count));

        info!("Generate goals: {:?}", self.goals);
        Ok(())
    }
}
