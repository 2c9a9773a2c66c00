pub mod utils;
pub mod state;
pub mod moves;
pub mod heuristic;
pub mod pattern;

pub use state::State;
pub use moves::{Board, Direction};
