mod node;
mod position;
mod solution;

pub(crate) use node::{NodeArena, NodeHandle, SearchNode};
pub use position::{Direction, Position};
pub use solution::{Solution, Termination};
