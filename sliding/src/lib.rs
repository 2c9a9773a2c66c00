#![doc = include_str!("../README.md")]

pub mod error;
pub mod puzzle_sliding;
pub mod pattern_db;
pub mod heuristic;
pub mod solver;
pub mod stats;
