use crate::puzzle_sliding::utils::{DENIED, MAX_BOARD_SIZE, BITS_PER_CELL, BITS_PER_CELL_MASK32, permutations};
use crate::puzzle_sliding::moves::{Board, Direction};
use crate::puzzle_sliding::state::State;
use bitm::{BitAccess, BitVec};
use log::{debug, info};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of tiles tracked by a single pattern (without the blank).
pub const MAX_PATTERN_TILES: usize = 6;

/// Number of expanded abstract states between two progress messages.
const PROGRESS_INTERVAL: usize = 100_000;

/// Maps closed keys to numbers of moves of tracked tiles needed to reach the goal.
pub type DistanceTable = FxHashMap<u32, u8>;

/// Manipulate patterns.
///
/// Pattern (open key) is a vector of positions of tiles tracked by the pattern followed by the position of the blank.
/// Tracked tiles are sorted in ascending order of their numbers and the index in this order is the index of the tile in the pattern.
/// Pattern is encoded in u32 and uses BITS_PER_CELL bits per tile to store its position.
///
/// Closed key is the pattern without the field of the blank.
#[derive(Clone, Copy, Debug)]
pub struct PatternManipulator {
    /// Convert: tile number (index) -> BITS_PER_CELL * index of tile in pattern or DENIED if the tile is not tracked.
    /// The blank is always tracked and its field is the last one.
    index_of_tile_in_pattern: [u8; MAX_BOARD_SIZE],

    /// Number of tracked tiles in pattern (without blank).
    pattern_len: u8,

    /// Number of cells in board.
    board_size: u8
}

impl PatternManipulator {
    /// Returns pattern manipulator and the goal pattern for given numbers of tracked tiles and the board with `board_size` cells.
    /// The tile `board_size-1` is the blank and it must not be among `tracked_tiles`.
    pub fn new(tracked_tiles: impl IntoIterator<Item=u8>, board_size: u8) -> (Self, u32) {
        let mut tiles: Vec<u8> = tracked_tiles.into_iter().collect();
        tiles.sort_unstable();
        tiles.push(board_size - 1);
        let mut goal_pattern = 0u32;
        let mut index_of_tile_in_pattern = [DENIED; MAX_BOARD_SIZE];
        let mut index_in_pattern = 0u8;
        for tile_nr in tiles {
            goal_pattern |= (tile_nr as u32) << index_in_pattern;   // in the goal, tile i occupies cell i
            index_of_tile_in_pattern[tile_nr as usize] = index_in_pattern;
            index_in_pattern += BITS_PER_CELL;
        }
        (Self { index_of_tile_in_pattern, pattern_len: index_in_pattern/BITS_PER_CELL - 1, board_size }, goal_pattern)
    }

    /// Returns number of tracked tiles (without blank).
    #[inline(always)] pub fn pattern_len(&self) -> u8 { self.pattern_len }

    /// Returns index of the first bit of the blank field.
    #[inline(always)] fn blank_shift(&self) -> u8 { self.pattern_len * BITS_PER_CELL }

    /// Returns number of different values of patterns (some of them are not valid).
    #[inline] pub fn pattern_space(&self) -> usize {
        1usize << ((self.pattern_len as usize + 1) * BITS_PER_CELL as usize)
    }

    /// Returns closed key of `pattern`, i.e. `pattern` with the field of blank removed.
    #[inline(always)] pub fn closed_key(&self, pattern: u32) -> u32 {
        pattern & ((1u32 << self.blank_shift()) - 1)
    }

    /// Returns position of blank in given `pattern`.
    #[inline(always)] pub fn blank_position(&self, pattern: u32) -> u8 {
        ((pattern >> self.blank_shift()) & BITS_PER_CELL_MASK32) as u8
    }

    /// Modifies `pattern` by setting position of blank to `new_blank_position`.
    #[inline(always)] pub fn set_blank_position(&self, pattern: &mut u32, new_blank_position: u8) {
        *pattern &= !(BITS_PER_CELL_MASK32 << self.blank_shift());
        *pattern |= (new_blank_position as u32) << self.blank_shift();
    }

    /// Returns the position (field number) of tile with given number `tile_nr` in `pattern`, or DENIED if the tile is not tracked.
    pub fn position_of(&self, pattern: u32, tile_nr: u8) -> u8 {
        let index = self.index_of_tile_in_pattern[tile_nr as usize];
        if index == DENIED {
            DENIED
        } else {
            ((pattern >> index) & BITS_PER_CELL_MASK32) as u8
        }
    }

    /// Modifies `pattern` by setting position (which must be `0` before this call) of tile with given number `tile_nr` to `new_position`.
    /// Does nothing if tile_nr is not tracked by pattern.
    #[inline] pub fn init_position(&self, pattern: &mut u32, tile_nr: u8, new_position: u8) {
        let index = self.index_of_tile_in_pattern[tile_nr as usize];
        if index != DENIED {
            *pattern |= (new_position as u32) << index;
        }
    }

    /// Returns the pattern (open key) which the given `state` matches to.
    pub fn pattern_for(&self, state: State) -> u32 {
        let mut pattern = 0;
        for (position, tile_nr) in state.iter(self.board_size).enumerate() {
            self.init_position(&mut pattern, tile_nr, position as u8);
        }
        pattern
    }

    /// Returns the closed key which the given `state` matches to.
    #[inline] pub fn closed_key_for(&self, state: State) -> u32 {
        self.closed_key(self.pattern_for(state))
    }

    /// Returns a copy of `pattern` with blank swapped with the tile that occupies `new_blank_position`,
    /// together with the information whether this tile is tracked by the pattern.
    pub fn moved_blank(&self, mut pattern: u32, new_blank_position: u8) -> (u32, bool) {
        let old_blank_pos = self.blank_position(pattern);
        let mut tracked_moved = false;
        let mut index = 0;
        while index < self.blank_shift() {
            if (pattern >> index) & BITS_PER_CELL_MASK32 == new_blank_position as u32 {
                pattern &= !(BITS_PER_CELL_MASK32 << index);
                pattern |= (old_blank_pos as u32) << index;
                tracked_moved = true;
                break;
            }
            index += BITS_PER_CELL;
        }
        self.set_blank_position(&mut pattern, new_blank_position);
        (pattern, tracked_moved)
    }
}

/// Abstract state waiting for expansion.
#[derive(Clone, Copy)]
struct PatternNode {
    pattern: u32,
    distance: u8,
    /// Direction of the move that produced the node.
    direction: Option<Direction>
}

/// Returns the distance table for the given `tracked_tiles` on the `board` and the manipulator which computes its keys.
///
/// The table is built by the uniform-cost search that starts from the goal pattern.
/// A move costs `1` if it moves a tracked tile and `0` if it moves any other tile,
/// so the nodes with equal cost are expanded from the front of the queue before more expensive ones (0-1 BFS).
/// Each pattern (open key) is expanded once, the first time it leaves the queue, when its distance is already minimal.
/// The table stores, for each closed key, the minimum distance over all positions of the blank.
pub fn build_distance_table(board: &Board, tracked_tiles: &[u8]) -> (DistanceTable, PatternManipulator) {
    let board_size = board.board_size() as usize;
    let (pattern_manipulator, goal) = PatternManipulator::new(tracked_tiles.iter().cloned(), board.board_size());
    let pattern_len = pattern_manipulator.pattern_len() as usize;
    let expected_patterns = permutations(board_size, pattern_len + 1);
    let mut table = DistanceTable::with_capacity_and_hasher(permutations(board_size, pattern_len), Default::default());
    let mut visited = Box::<[u64]>::with_zeroed_bits(pattern_manipulator.pattern_space());
    let mut queue = VecDeque::with_capacity(expected_patterns.min(1<<16));
    queue.push_back(PatternNode { pattern: goal, distance: 0, direction: None });
    let mut expanded = 0usize;
    let start_moment = Instant::now();
    while let Some(node) = queue.pop_front() {
        if visited.get_bit(node.pattern as usize) { continue; }
        visited.set_bit(node.pattern as usize);
        expanded += 1;
        if expanded % PROGRESS_INTERVAL == 0 {
            info!("pattern {:?}: expanded {} of {}, queue {}, table {}, elapsed {:.1?}",
                  tracked_tiles, expanded, expected_patterns, queue.len(), table.len(), start_moment.elapsed());
        }
        // nodes leave the queue in nondecreasing order of distance, so the first one is the closest
        table.entry(pattern_manipulator.closed_key(node.pattern)).or_insert(node.distance);
        for (direction, cell) in board.moves_from(pattern_manipulator.blank_position(node.pattern), node.direction) {
            let (pattern, tracked_moved) = pattern_manipulator.moved_blank(node.pattern, cell);
            if visited.get_bit(pattern as usize) { continue; }
            if tracked_moved {
                queue.push_back(PatternNode { pattern, distance: node.distance + 1, direction: Some(direction) });
            } else {
                queue.push_front(PatternNode { pattern, distance: node.distance, direction: Some(direction) });
            }
        }
    }
    debug!("pattern {:?}: {} patterns expanded, {} closed keys, built in {:.1?}",
           tracked_tiles, expanded, table.len(), start_moment.elapsed());
    (table, pattern_manipulator)
}
