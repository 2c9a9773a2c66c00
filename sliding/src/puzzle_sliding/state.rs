use crate::puzzle_sliding::utils::{BITS_PER_CELL, BITS_PER_CELL_MASK64, DENIED, MAX_BOARD_SIZE};
use std::fmt;
use std::iter::{FromIterator, FusedIterator};

/// Board state.
///
/// Cells are indexed row by row. In the goal state the cell `i` holds the tile `i`,
/// so the blank, which is the tile with the greatest number (`board_size-1`), occupies the bottom-right corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct State {
    /// Indexed by board indices, gives tiles numbers that occupy given board cell.
    pub board: u64,
}

/// Tiles beyond the first `MAX_BOARD_SIZE` are ignored.
impl FromIterator<u8> for State {
    fn from_iter<T: IntoIterator<Item=u8>>(tiles: T) -> Self {
        let mut board = 0u64;
        let mut index = 0;
        for t in tiles.into_iter().take(MAX_BOARD_SIZE) {
            board |= (t as u64) << index;
            index += BITS_PER_CELL;
        }
        Self { board }
    }
}

/// Translate `tile` number from the format in which `0` denotes the blank and tiles are numbered from `1`.
#[inline] pub fn from_blank_zero_format(tile: u8, board_size: u8) -> u8 {
    if tile == 0 { board_size-1 } else { tile-1 }
}

impl State {

    /// Constructs goal state for the board with board_size cells.
    pub fn goal(board_size: u8) -> Self {
        (0..board_size).collect()
    }

    /// Constructs `State` from data given in format in which `0` denotes the blank
    /// and the goal state is `1, 2, ..., board_size-1, 0`.
    pub fn from_blank_zero_format(tiles: &[u8]) -> Self {
        let s = tiles.len().min(MAX_BOARD_SIZE) as u8;
        tiles.iter().map(|t| from_blank_zero_format(*t, s)).collect()
    }

    /// Swap blank with the tile that occupy new_blank_position.
    /// Returns number of this tile.
    pub fn move_blank(&mut self, current_blank_position: u8, new_blank_position: u8) -> u8 {
        let blank_index = current_blank_position * BITS_PER_CELL;
        let new_blank_index = new_blank_position * BITS_PER_CELL;
        let result = (self.board >> new_blank_index) & BITS_PER_CELL_MASK64;
        let blank = (self.board >> blank_index) & BITS_PER_CELL_MASK64;
        let diff = result ^ blank;
        self.board ^= (diff << blank_index) | (diff << new_blank_index);
        result as u8
    }

    // Tile at position.
    #[inline] pub fn tile_at(&self, position: u8) -> u8 {
        ((self.board >> (position * BITS_PER_CELL)) & BITS_PER_CELL_MASK64) as u8
    }

    /// Returns position of the given `tile` or `DENIED` if there is no such tile among `board_size` cells.
    pub fn position_of(&self, tile: u8, board_size: u8) -> u8 {
        self.iter(board_size).position(|t| t == tile).map_or(DENIED, |p| p as u8)
    }

    /// Returns `true` if the first `board_size` cells contain each of tiles `0..board_size` exactly once.
    pub fn is_permutation(&self, board_size: u8) -> bool {
        if board_size as u32 * BITS_PER_CELL as u32 != 64 && (self.board >> (board_size * BITS_PER_CELL)) != 0 {
            return false;
        }
        let mut seen = 0u32;
        for t in self.iter(board_size) {
            if t >= board_size || seen & (1 << t) != 0 { return false; }
            seen |= 1 << t;
        }
        true
    }

    /// Checks whether the goal state can be reached from `self` on the board with `side` x `side` cells.
    ///
    /// For odd `side` the number of inversions (among tiles other than blank) must be even.
    /// For even `side` the number of inversions plus the row of the blank counted from the bottom (from 1) must be odd.
    pub fn is_solvable(&self, side: u8) -> bool {
        let board_size = side * side;
        let blank = board_size - 1;
        let tiles: Vec<u8> = self.iter(board_size).filter(|t| *t != blank).collect();
        let mut inversions = 0u32;
        for (i, a) in tiles.iter().enumerate() {
            inversions += tiles[i+1..].iter().filter(|b| *b < a).count() as u32;
        }
        if side % 2 == 1 {
            inversions % 2 == 0
        } else {
            let blank_row_from_bottom = (side - self.position_of(blank, board_size) / side) as u32;
            (inversions + blank_row_from_bottom) % 2 == 1
        }
    }

    /// Returns iterator over the tiles that occupy the first `board_size` cells.
    #[inline] pub fn iter(&self, board_size: u8) -> TilesIterator {
        TilesIterator::new(self.board, board_size)
    }

    /// Returns object that displays `self` as the board with `side` columns.
    pub fn display(&self, side: u8) -> StateDisplay {
        StateDisplay { state: *self, side }
    }
}

#[derive(Copy, Clone)]
pub struct TilesIterator {
    rest: u64,
    remaining: u8
}

impl TilesIterator {
    #[inline] pub fn new(board: u64, board_size: u8) -> Self {
        Self { rest: board, remaining: board_size }
    }
}

impl Iterator for TilesIterator {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 { return None; }
        self.remaining -= 1;
        let result = (self.rest & BITS_PER_CELL_MASK64) as u8;
        self.rest >>= BITS_PER_CELL;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for TilesIterator {}

impl FusedIterator for TilesIterator {}

/// Displays state row by row, the blank is printed as `_`.
pub struct StateDisplay {
    state: State,
    side: u8
}

impl fmt::Display for StateDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board_size = self.side * self.side;
        for (i, t) in self.state.iter(board_size).enumerate() {
            if i as u8 % self.side != 0 { write!(f, " ")?; }
            if t == board_size-1 { write!(f, " _")?; } else { write!(f, "{:2}", t)?; }
            if i as u8 % self.side == self.side-1 && (i as u8) < board_size-1 { writeln!(f)?; }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_and_move_blank_22() {
        let tiles = [2, 3, 1, 0];
        let mut state: State = tiles.iter().cloned().collect();
        assert!(state.is_permutation(4));
        assert_eq!(state.tile_at(0), 2);
        assert_eq!(state.tile_at(1), 3);
        assert_eq!(state.tile_at(2), 1);
        assert_eq!(state.tile_at(3), 0);
        assert_eq!(state.iter(4).collect::<Vec<_>>(), &tiles);
        assert_eq!(state.move_blank(1, 0), 2);
        assert_eq!(state.iter(4).collect::<Vec<_>>(), &[3, 2, 1, 0]);
        assert_eq!(state.move_blank(0, 2), 1);
        assert_eq!(state.iter(4).collect::<Vec<_>>(), &[1, 2, 3, 0]);
    }

    #[test]
    fn test_from_and_move_blank_33() {
        let mut state: State = [4, 7, 8,   2, 3, 6,   0, 1, 5].iter().cloned().collect();
        assert!(state.is_permutation(9));
        assert_eq!(state.position_of(8, 9), 2);
        assert_eq!(state.move_blank(2, 5), 6);
        assert_eq!(state.tile_at(0), 4);
        assert_eq!(state.tile_at(1), 7);
        assert_eq!(state.tile_at(2), 6);    //<
        assert_eq!(state.tile_at(3), 2);
        assert_eq!(state.tile_at(4), 3);
        assert_eq!(state.tile_at(5), 8);    //<
        assert_eq!(state.tile_at(6), 0);
        assert_eq!(state.tile_at(7), 1);
        assert_eq!(state.tile_at(8), 5);
        assert_eq!(state.move_blank(5, 4), 3);
        assert_eq!(state.tile_at(4), 8);    //<
        assert_eq!(state.tile_at(5), 3);    //<
        assert_eq!(state.position_of(8, 9), 4);
        assert!(state.is_permutation(9));
    }

    #[test]
    fn test_goal_44() {
        let state = State::goal(4*4);
        for i in 0..16 {
            assert_eq!(state.tile_at(i), i);
        }
        assert!(state.is_permutation(16));
        assert_eq!(state.position_of(15, 16), 15);
    }

    #[test]
    fn test_is_permutation() {
        assert!(!State::from_iter([0, 0, 1, 2]).is_permutation(4));
        assert!(!State::from_iter([0, 1, 2, 4]).is_permutation(4));
        assert!(!State::from_iter([0, 1, 2, 3, 1]).is_permutation(4));
    }

    #[test]
    fn test_too_many_tiles() {
        let state: State = (0..20).map(|t| t % 16).collect();
        assert_eq!(state, State::goal(16));
        let state = State::from_blank_zero_format(&[1; 17]);
        assert!(!state.is_permutation(16));
        let state = State::from_blank_zero_format(&[0; 300]);
        assert_eq!(state.tile_at(0), 15);
    }

    #[test]
    fn test_from_blank_zero_format() {
        assert_eq!(from_blank_zero_format(0, 9), 8);
        assert_eq!(from_blank_zero_format(1, 9), 0);
        assert_eq!(State::from_blank_zero_format(&[1, 2, 3, 4, 5, 6, 7, 8, 0]), State::goal(9));
        assert_eq!(State::from_blank_zero_format(&[1, 2, 3, 4, 5, 6, 7, 0, 8]).iter(9).collect::<Vec<_>>(),
                   &[0, 1, 2, 3, 4, 5, 6, 8, 7]);
    }

    #[test]
    fn test_is_solvable() {
        assert!(State::goal(9).is_solvable(3));
        assert!(State::goal(16).is_solvable(4));
        // two tiles swapped
        assert!(!State::from_iter([1, 0, 2, 3, 4, 5, 6, 7, 8]).is_solvable(3));
        assert!(!State::from_iter([1, 0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]).is_solvable(4));
        // blank moved up in the 4x4 board
        assert!(State::from_iter([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15, 12, 13, 14, 11]).is_solvable(4));
        // blank moved up and two tiles swapped
        assert!(!State::from_iter([1, 0, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15, 12, 13, 14, 11]).is_solvable(4));
    }

    #[test]
    fn test_display() {
        assert_eq!(State::goal(4).display(2).to_string(), " 0  1\n 2  _");
    }
}
