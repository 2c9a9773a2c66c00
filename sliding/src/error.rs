use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported while configuring, building, storing or loading pattern databases.
#[derive(Debug, Error)]
pub enum PuzzleError {
    #[error("board side {side} is not supported (supported sides: {min}..={max})")]
    UnsupportedBoardSize { side: u8, min: u8, max: u8 },

    #[error("tile group {group} is empty")]
    EmptyGroup { group: usize },

    #[error("tile group {group} has {len} tiles, but at most {max} are supported")]
    GroupTooLarge { group: usize, len: usize, max: usize },

    #[error("tile {tile} of group {group} does not exist on the board with {board_size} cells")]
    TileOutOfRange { group: usize, tile: u8, board_size: u8 },

    #[error("tile group {group} contains the blank (tile {tile})")]
    BlankInGroup { group: usize, tile: u8 },

    #[error("tile {tile} belongs to both group {first} and group {second}")]
    OverlappingGroups { tile: u8, first: usize, second: usize },

    #[error("pattern database is not initialized")]
    NotInitialized,

    #[error("I/O error on {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: io::Error },

    #[error("malformed pattern database snapshot {}: {source}", path.display())]
    Snapshot { path: PathBuf, #[source] source: serde_json::Error },

    #[error("pattern database snapshot {} does not match the configuration: {reason}", path.display())]
    SnapshotMismatch { path: PathBuf, reason: String },
}

/// Errors reported by the solvers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolverError {
    #[error("start state is not a permutation of tiles 0..{board_size}")]
    InvalidState { board_size: u8 },

    #[error("search cancelled in iteration {iteration} (bound {bound})")]
    Cancelled { iteration: u32, bound: u16 },

    #[error("search space exhausted in iteration {iteration} (bound {bound}), the goal is unreachable")]
    Exhausted { iteration: u32, bound: u16 },
}
