pub mod adversary;
pub mod algorithm;
pub mod common;
pub mod config;
pub mod heuristic;
pub mod map;
pub mod scenario;
pub mod solver;
pub mod stat;

pub use adversary::{is_danger, Adversary};
pub use algorithm::{CancelToken, SearchLimits, Strategy};
pub use common::{Direction, Position, Solution, Termination};
pub use map::{CellKind, Map, Overlay};
pub use scenario::Task;
pub use solver::{solve, SearchOptions, Solver, Variant};
