use crate::error::PuzzleError;
use crate::puzzle_sliding::moves::Board;
use crate::puzzle_sliding::pattern::{build_distance_table, PatternManipulator, MAX_PATTERN_TILES};
use crate::puzzle_sliding::state::State;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Instant;

pub use crate::puzzle_sliding::pattern::DistanceTable;

/// Configuration of disjoint pattern database: the board and the groups of tracked tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternDBConf {
    /// The board has `side` x `side` cells.
    pub side: u8,
    /// Disjoint groups of tiles, each one gives a separate distance table.
    pub groups: Vec<Vec<u8>>,
    /// Directory of the snapshot. If `None`, the database is always built and never stored.
    pub cache_dir: Option<PathBuf>
}

impl PatternDBConf {
    pub fn new(side: u8, groups: Vec<Vec<u8>>) -> Self {
        Self { side, groups, cache_dir: None }
    }

    /// Returns the 5-5-5 partition of the 15-puzzle:
    /// ```text
    ///  A  A  A  A
    ///  B  B  A  C
    ///  B  B  C  C
    ///  B  C  C  _
    /// ```
    pub fn standard() -> Self {
        Self::new(4, vec![vec![0, 1, 2, 3, 6], vec![4, 5, 8, 9, 12], vec![7, 10, 11, 13, 14]])
    }

    /// Returns the 6-6-3 partition of the 15-puzzle:
    /// ```text
    ///  A  C  C  C
    ///  A  A  B  B
    ///  A  A  B  B
    ///  A  B  B  _
    /// ```
    pub fn six_six_three() -> Self {
        Self::new(4, vec![vec![0, 4, 5, 8, 9, 12], vec![6, 7, 10, 11, 13, 14], vec![1, 2, 3]])
    }

    /// Sets directory in which the snapshot is looked for and stored.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Returns name of the snapshot file, which depends on the board size and the (sorted) tiles of each group,
    /// e.g. `pattern_db_n3_0-1-2_3-4-5-6-7.json`.
    pub fn snapshot_file_name(&self) -> String {
        let groups: Vec<String> = self.groups.iter().map(|tiles| {
            let mut tiles = tiles.clone();
            tiles.sort_unstable();
            tiles.iter().map(|t| t.to_string()).collect::<Vec<_>>().join("-")
        }).collect();
        format!("pattern_db_n{}_{}.json", self.side, groups.join("_"))
    }

    /// Returns path of the snapshot or `None` if no cache directory is configured.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.cache_dir.as_ref().map(|dir| dir.join(self.snapshot_file_name()))
    }

    /// Checks the configuration and returns the board it describes.
    pub fn validate(&self) -> Result<Board, PuzzleError> {
        let board = Board::new(self.side)?;
        let board_size = board.board_size();
        let mut owner = [None; crate::puzzle_sliding::utils::MAX_BOARD_SIZE];
        for (group, tiles) in self.groups.iter().enumerate() {
            if tiles.is_empty() {
                return Err(PuzzleError::EmptyGroup { group });
            }
            if tiles.len() > MAX_PATTERN_TILES {
                return Err(PuzzleError::GroupTooLarge { group, len: tiles.len(), max: MAX_PATTERN_TILES });
            }
            for &tile in tiles {
                if tile >= board_size {
                    return Err(PuzzleError::TileOutOfRange { group, tile, board_size });
                }
                if tile == board.blank() {
                    return Err(PuzzleError::BlankInGroup { group, tile });
                }
                if let Some(first) = owner[tile as usize] {
                    return Err(PuzzleError::OverlappingGroups { tile, first, second: group });
                }
                owner[tile as usize] = Some(group);
            }
        }
        Ok(board)
    }
}

#[derive(Serialize, Deserialize)]
struct GroupSnapshot {
    tiles: Vec<u8>,
    /// (closed key, distance) pairs sorted by keys.
    table: Vec<(u32, u8)>
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    /// Side of the board.
    size: u8,
    groups: Vec<GroupSnapshot>
}

/// Disjoint pattern database.
///
/// Holds one distance table per group of tiles. The heuristic value of a state is the sum of the values
/// found for this state in all tables. It is admissible since each move changes the position of a tile
/// from at most one group.
///
/// The tables are set once, by [`PatternDatabase::initialize`] or [`PatternDatabase::load`],
/// and are read-only afterwards, so the database can be shared (e.g. by `Arc`) among many solvers.
pub struct PatternDatabase {
    conf: PatternDBConf,
    board: Board,
    manipulators: Vec<PatternManipulator>,
    tables: OnceLock<Vec<DistanceTable>>
}

impl PatternDatabase {
    /// Constructs uninitialized database for `conf`, which is validated.
    pub fn new(conf: PatternDBConf) -> Result<Self, PuzzleError> {
        let board = conf.validate()?;
        let manipulators = conf.groups.iter()
            .map(|tiles| PatternManipulator::new(tiles.iter().cloned(), board.board_size()).0)
            .collect();
        Ok(Self { conf, board, manipulators, tables: OnceLock::new() })
    }

    #[inline] pub fn conf(&self) -> &PatternDBConf { &self.conf }

    #[inline] pub fn board(&self) -> &Board { &self.board }

    /// Returns `true` if the tables are ready.
    #[inline] pub fn is_initialized(&self) -> bool { self.tables.get().is_some() }

    /// Returns the tables, or `None` if `self` is not initialized.
    #[inline] pub fn tables(&self) -> Option<&[DistanceTable]> { self.tables.get().map(|t| t.as_slice()) }

    /// Returns the total number of entries in all tables.
    pub fn len(&self) -> usize {
        self.tables().map_or(0, |tables| tables.iter().map(|t| t.len()).sum())
    }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the number of entries in the table of each group.
    pub fn table_sizes(&self) -> Vec<usize> {
        self.tables().map_or_else(Vec::new, |tables| tables.iter().map(|t| t.len()).collect())
    }

    /// Makes the database ready to use.
    ///
    /// Loads the snapshot if it exists. Otherwise builds the tables and, if the cache directory is configured, stores them.
    /// Does nothing if `self` is already initialized.
    pub fn initialize(&self) -> Result<(), PuzzleError> {
        if self.is_initialized() { return Ok(()); }
        match self.conf.snapshot_path() {
            Some(path) if path.exists() => self.load(&path),
            Some(path) => {
                self.set_tables(self.build());
                self.store(&path)
            }
            None => {
                self.set_tables(self.build());
                Ok(())
            }
        }
    }

    /// Builds tables of all groups, in parallel.
    pub fn build(&self) -> Vec<DistanceTable> {
        let start_moment = Instant::now();
        info!("building pattern database for {}x{} board, groups {:?}", self.board.side(), self.board.side(), self.conf.groups);
        let tables: Vec<DistanceTable> = self.conf.groups.par_iter()
            .map(|tiles| build_distance_table(&self.board, tiles).0)
            .collect();
        info!("pattern database built in {:.1?}, table sizes {:?}",
              start_moment.elapsed(), tables.iter().map(|t| t.len()).collect::<Vec<_>>());
        tables
    }

    fn set_tables(&self, tables: Vec<DistanceTable>) {
        // if another thread has initialized the database meanwhile, its tables are equal to these
        let _ = self.tables.set(tables);
    }

    /// Writes the snapshot of initialized database to the file with given `path`.
    pub fn store(&self, path: &Path) -> Result<(), PuzzleError> {
        let tables = self.tables().ok_or(PuzzleError::NotInitialized)?;
        let snapshot = Snapshot {
            size: self.board.side(),
            groups: self.conf.groups.iter().zip(tables).map(|(tiles, table)| {
                let mut entries: Vec<(u32, u8)> = table.iter().map(|(k, v)| (*k, *v)).collect();
                entries.sort_unstable();
                GroupSnapshot { tiles: tiles.clone(), table: entries }
            }).collect()
        };
        let io_error = |source| PuzzleError::Io { path: path.to_owned(), source };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        serde_json::to_writer(&mut writer, &snapshot)
            .map_err(|source| PuzzleError::Snapshot { path: path.to_owned(), source })?;
        writer.flush().map_err(io_error)?;
        info!("pattern database stored in {}", path.display());
        Ok(())
    }

    /// Reads the tables from the snapshot file with given `path`, which must match the configuration of `self`.
    pub fn load(&self, path: &Path) -> Result<(), PuzzleError> {
        let file = File::open(path).map_err(|source| PuzzleError::Io { path: path.to_owned(), source })?;
        let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| PuzzleError::Snapshot { path: path.to_owned(), source })?;
        let mismatch = |reason: String| PuzzleError::SnapshotMismatch { path: path.to_owned(), reason };
        if snapshot.size != self.board.side() {
            return Err(mismatch(format!("board side is {}, expected {}", snapshot.size, self.board.side())));
        }
        if snapshot.groups.len() != self.conf.groups.len() {
            return Err(mismatch(format!("{} groups stored, expected {}", snapshot.groups.len(), self.conf.groups.len())));
        }
        let mut tables = Vec::with_capacity(snapshot.groups.len());
        for (index, (stored, expected)) in snapshot.groups.into_iter().zip(self.conf.groups.iter()).enumerate() {
            let (mut stored_tiles, mut expected_tiles) = (stored.tiles, expected.clone());
            stored_tiles.sort_unstable();
            expected_tiles.sort_unstable();
            if stored_tiles != expected_tiles {
                return Err(mismatch(format!("group {} has tiles {:?}, expected {:?}", index, stored_tiles, expected_tiles)));
            }
            tables.push(stored.table.into_iter().collect::<DistanceTable>());
        }
        info!("pattern database loaded from {}, table sizes {:?}", path.display(),
              tables.iter().map(|t| t.len()).collect::<Vec<_>>());
        self.set_tables(tables);
        Ok(())
    }

    /// Returns the value looked up for `state` in the table of the group with given `index`, `0` if there is no such entry.
    #[inline] fn group_heuristic(&self, tables: &[DistanceTable], index: usize, state: State) -> u8 {
        tables[index].get(&self.manipulators[index].closed_key_for(state)).copied().unwrap_or(0)
    }

    /// Returns the sum of values looked up for `state` in all tables, or `0` if `self` is not initialized.
    pub fn heuristic(&self, state: State) -> u16 {
        match self.tables() {
            Some(tables) => (0..tables.len()).map(|i| self.group_heuristic(tables, i, state) as u16).sum(),
            None => 0
        }
    }
}
