use crate::common::{Direction, Position};
use crate::map::Map;

use serde::Serialize;

/// A moving obstacle that walks one cell per agent step and reverses when
/// the cell ahead is a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Adversary {
    pub position: Position,
    pub facing: Direction,
}

impl Adversary {
    pub fn new(position: Position, facing: Direction) -> Self {
        Adversary { position, facing }
    }

    /// State after one step. An adversary boxed in on both sides stays put.
    pub fn advance(&self, map: &Map) -> Adversary {
        let ahead = |facing: Direction| {
            self.position
                .step(facing)
                .filter(|next| map.is_walkable(*next))
        };

        if let Some(next) = ahead(self.facing) {
            return Adversary::new(next, self.facing);
        }
        let reversed = self.facing.opposite();
        match ahead(reversed) {
            Some(next) => Adversary::new(next, reversed),
            None => Adversary::new(self.position, reversed),
        }
    }

    pub fn after(&self, map: &Map, steps: usize) -> Adversary {
        (0..steps).fold(*self, |adversary, _| adversary.advance(map))
    }
}

/// True when a move puts the agent on the adversary's cell after the step,
/// or into the cell the adversary is leaving. The latter covers a head-on
/// swap of cells.
pub fn is_danger(agent_to: Position, adversary_from: &Adversary, adversary_to: &Adversary) -> bool {
    agent_to == adversary_to.position || agent_to == adversary_from.position
}
