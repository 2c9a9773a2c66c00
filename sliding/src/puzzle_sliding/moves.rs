use crate::error::PuzzleError;
use crate::puzzle_sliding::state::State;
use crate::puzzle_sliding::utils::{MAX_BOARD_SIZE, DENIED, MIN_SIDE, MAX_SIDE};
use arrayvec::ArrayVec;
use std::fmt;

pub const LEFT: usize = 0;
pub const UP: usize  = 1;
pub const RIGHT: usize  = 2;
pub const DOWN: usize  = 3;

/// Direction in which the blank moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Left = LEFT as isize,
    Up = UP as isize,
    Right = RIGHT as isize,
    Down = DOWN as isize
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Up, Direction::Right, Direction::Down];

    /// Returns the direction that undoes the move in `self` direction.
    #[inline] pub fn reverse(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up
        }
    }

    #[inline(always)] pub fn index(self) -> usize { self as usize }

    pub fn to_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D'
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Stores indices of neighbors (or DENIED in the case of no neighbor) and is indexed by (in order): index of the cell and the direction.
pub type Neighbors = [[u8; 4]; MAX_BOARD_SIZE];

/// Returns tile number = index of cell with given (c, r) coordinates in the board with given number of cols.
#[inline(always)] pub fn cell_nr(cols: u8, c: u8, r: u8) -> u8 { r * cols + c }

/// Constructs neighbors matrix for the board of the size `cols` x `rows`.
pub fn construct_neighbors(cols: u8, rows: u8) -> Neighbors {
    let mut neighbors = [[DENIED; 4]; MAX_BOARD_SIZE];
    for r in 0..rows {
        for c in 0..cols {
            let cell = &mut neighbors[cell_nr(cols, c, r) as usize];
            if c != 0 { cell[LEFT] = cell_nr(cols, c-1, r); }
            if r != 0 { cell[UP] = cell_nr(cols, c, r-1); }
            if c+1 != cols { cell[RIGHT] = cell_nr(cols, c+1, r); }
            if r+1 != rows { cell[DOWN] = cell_nr(cols, c, r+1); }
        }
    }
    neighbors
}

/// Square board with `side` x `side` cells and the moves of its blank.
///
/// The blank is the tile `board_size()-1`, in the goal state the cell `i` holds the tile `i`.
#[derive(Clone, Copy)]
pub struct Board {
    side: u8,
    /// Stores indices of neighbors (or DENIED in the case of no neighbor) and is indexed by (in order): index of the cell and the direction.
    neighbors: Neighbors
}

impl Board {
    /// Constructs the board with `side` x `side` cells or returns an error if such board is not supported.
    pub fn new(side: u8) -> Result<Self, PuzzleError> {
        if !(MIN_SIDE..=MAX_SIDE).contains(&side) {
            return Err(PuzzleError::UnsupportedBoardSize { side, min: MIN_SIDE, max: MAX_SIDE });
        }
        Ok(Self { side, neighbors: construct_neighbors(side, side) })
    }

    #[inline(always)] pub fn side(&self) -> u8 { self.side }

    /// Returns number of cells in board.
    #[inline(always)] pub fn board_size(&self) -> u8 { self.side * self.side }

    /// Returns the number of the blank tile.
    #[inline(always)] pub fn blank(&self) -> u8 { self.board_size() - 1 }

    #[inline] pub fn goal(&self) -> State { State::goal(self.board_size()) }

    #[inline] pub fn neighbors(&self) -> &Neighbors { &self.neighbors }

    /// Returns `true` if moving the blank from `blank_position` in the given `direction` leaves the board.
    pub fn is_out_of_bounds(&self, blank_position: u8, direction: Direction) -> bool {
        let side = self.side as i16;
        let mut column = blank_position as i16 % side;
        let mut row = blank_position as i16 / side;
        match direction {
            Direction::Left => column -= 1,
            Direction::Right => column += 1,
            Direction::Up => row -= 1,
            Direction::Down => row += 1,
        }
        column < 0 || column >= side || row < 0 || row >= side
    }

    /// Returns the cell the blank enters when it moves from `blank_position` in the given `direction`,
    /// or `None` if there is no such cell (also when `blank_position` is `DENIED`).
    #[inline] pub fn target(&self, blank_position: u8, direction: Direction) -> Option<u8> {
        let cell = self.neighbors.get(blank_position as usize)?[direction.index()];
        (cell != DENIED).then_some(cell)
    }

    /// Returns the position of the blank in `state`.
    #[inline] pub fn locate_blank(&self, state: &State) -> u8 {
        state.position_of(self.blank(), self.board_size())
    }

    /// Returns `state` with the blank moved in the given `direction`,
    /// or `None` if such move leaves the board or `state` has no blank.
    pub fn apply_move(&self, mut state: State, direction: Direction) -> Option<State> {
        let blank_position = self.locate_blank(&state);
        let target = self.target(blank_position, direction)?;
        state.move_blank(blank_position, target);
        Some(state)
    }

    /// Applies all `moves` to `state` in order. Returns `None` if any of them leaves the board.
    pub fn apply_moves(&self, state: State, moves: &[Direction]) -> Option<State> {
        moves.iter().try_fold(state, |s, d| self.apply_move(s, *d))
    }

    /// Returns legal moves (directions and cells entered by the blank) from `blank_position`,
    /// without the move that reverts `previous` one.
    pub fn moves_from(&self, blank_position: u8, previous: Option<Direction>) -> ArrayVec<(Direction, u8), 4> {
        let forbidden = previous.map(Direction::reverse);
        let mut result = ArrayVec::new();
        for direction in Direction::ALL {
            if Some(direction) == forbidden { continue; }
            if let Some(cell) = self.target(blank_position, direction) {
                result.push((direction, cell));
            }
        }
        result
    }

    /// Returns `true` if `state` is a permutation of the tiles of `self`.
    #[inline] pub fn is_valid(&self, state: &State) -> bool {
        state.is_permutation(self.board_size())
    }
}

/// Returns the number of moves to the goal of each state from which the goal is reachable (breadth-first search).
#[cfg(test)]
pub(crate) fn goal_distances(board: &Board) -> std::collections::HashMap<State, u8> {
    let mut distances = std::collections::HashMap::new();
    let mut queue = std::collections::VecDeque::new();
    distances.insert(board.goal(), 0u8);
    queue.push_back(board.goal());
    while let Some(state) = queue.pop_front() {
        let distance = distances[&state];
        for direction in Direction::ALL {
            if let Some(next) = board.apply_move(state, direction) {
                distances.entry(next).or_insert_with(|| {
                    queue.push_back(next);
                    distance + 1
                });
            }
        }
    }
    distances
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::iter::FromIterator;
    use rand::{Rng, SeedableRng, seq::SliceRandom};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_cell_nrs() {
        assert_eq!(cell_nr(2, 0, 0), 0);
        assert_eq!(cell_nr(2, 1, 0), 1);
        assert_eq!(cell_nr(2, 0, 1), 2);
        assert_eq!(cell_nr(2, 1, 1), 3);
        assert_eq!(cell_nr(3, 2, 2), 8);
    }

    #[test]
    fn test_neighbors_3x3() {
        let neighbors = construct_neighbors(3, 3);
        assert_eq!(neighbors[cell_nr(3, 0, 0) as usize][LEFT], DENIED);
        assert_eq!(neighbors[cell_nr(3, 0, 0) as usize][UP], DENIED);
        assert_eq!(neighbors[cell_nr(3, 0, 0) as usize][RIGHT], cell_nr(3, 1, 0));
        assert_eq!(neighbors[cell_nr(3, 0, 0) as usize][DOWN], cell_nr(3, 0, 1));
        let board = Board::new(3).unwrap();
        let neighbors_of_00 = board.moves_from(cell_nr(3, 0, 0), None).into_iter().map(|(_, cell)| cell);
        assert_eq!(HashSet::<u8>::from_iter([1, 3]), HashSet::from_iter(neighbors_of_00));

        assert_eq!(neighbors[cell_nr(3, 1, 1) as usize][LEFT], cell_nr(3, 0, 1));
        assert_eq!(neighbors[cell_nr(3, 1, 1) as usize][UP], cell_nr(3, 1, 0));
        assert_eq!(neighbors[cell_nr(3, 1, 1) as usize][RIGHT], cell_nr(3, 2, 1));
        assert_eq!(neighbors[cell_nr(3, 1, 1) as usize][DOWN], cell_nr(3, 1, 2));
        assert_eq!(board.moves_from(cell_nr(3, 1, 1), None).len(), 4);

        assert_eq!(neighbors[cell_nr(3, 2, 2) as usize][RIGHT], DENIED);
        assert_eq!(neighbors[cell_nr(3, 2, 2) as usize][DOWN], DENIED);
        assert_eq!(board.moves_from(cell_nr(3, 2, 2), None).len(), 2);
        assert_eq!(board.neighbors(), &neighbors);
    }

    #[test]
    fn test_unsupported_side() {
        assert!(matches!(Board::new(1), Err(PuzzleError::UnsupportedBoardSize { side: 1, .. })));
        assert!(matches!(Board::new(5), Err(PuzzleError::UnsupportedBoardSize { side: 5, .. })));
        assert!(Board::new(4).is_ok());
    }

    #[test]
    fn test_bounds_agree_with_neighbors() {
        for side in MIN_SIDE..=MAX_SIDE {
            let board = Board::new(side).unwrap();
            for cell in 0..board.board_size() {
                for d in Direction::ALL {
                    assert_eq!(board.is_out_of_bounds(cell, d), board.target(cell, d).is_none(),
                               "side {} cell {} direction {}", side, cell, d);
                }
            }
        }
    }

    #[test]
    fn test_apply_move_44() {
        let board = Board::new(4).unwrap();
        let goal = board.goal();
        assert_eq!(board.locate_blank(&goal), 15);
        assert_eq!(board.apply_move(goal, Direction::Right), None);
        assert_eq!(board.apply_move(goal, Direction::Down), None);
        let up = board.apply_move(goal, Direction::Up).unwrap();
        assert_eq!(board.locate_blank(&up), 11);
        assert_eq!(up.tile_at(15), 11);
        let left = board.apply_move(goal, Direction::Left).unwrap();
        assert_eq!(board.locate_blank(&left), 14);
        assert_eq!(left.tile_at(15), 14);
    }

    #[test]
    fn test_moves_from() {
        let board = Board::new(3).unwrap();
        let all: Vec<_> = board.moves_from(4, None).into_iter().map(|(d, _)| d).collect();
        assert_eq!(all, Direction::ALL);
        let without_return: Vec<_> = board.moves_from(4, Some(Direction::Left)).into_iter().collect();
        assert_eq!(without_return, [(Direction::Left, 3), (Direction::Up, 1), (Direction::Down, 7)]);
        assert_eq!(board.moves_from(8, Some(Direction::Down)).len(), 1);
    }

    #[test]
    fn test_move_and_reverse_restore_state() {
        let mut rng = ChaCha8Rng::seed_from_u64(1234);
        for side in MIN_SIDE..=MAX_SIDE {
            let board = Board::new(side).unwrap();
            let mut tiles: Vec<u8> = (0..board.board_size()).collect();
            for _ in 0..500 {
                tiles.shuffle(&mut rng);
                let state: State = tiles.iter().cloned().collect();
                let direction = Direction::ALL[rng.gen_range(0..4)];
                let blank = board.locate_blank(&state);
                match board.apply_move(state, direction) {
                    Some(moved) => {
                        assert!(!board.is_out_of_bounds(blank, direction));
                        assert!(board.is_valid(&moved));
                        let new_blank = board.locate_blank(&moved);
                        let (dr, dc) = ((new_blank / side) as i16 - (blank / side) as i16, (new_blank % side) as i16 - (blank % side) as i16);
                        assert_eq!(dr.abs() + dc.abs(), 1);
                        assert_eq!(board.apply_move(moved, direction.reverse()), Some(state));
                    }
                    None => assert!(board.is_out_of_bounds(blank, direction))
                }
            }
        }
    }

    #[test]
    fn test_apply_move_without_blank() {
        let board = Board::new(3).unwrap();
        let state = State::from_iter([0, 0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(board.locate_blank(&state), DENIED);
        assert_eq!(board.target(DENIED, Direction::Up), None);
        for direction in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(board.apply_move(state, direction), None);
        }
        assert_eq!(board.apply_moves(state, &[Direction::Up]), None);
        assert_eq!(board.apply_moves(state, &[]), Some(state));
    }

    #[test]
    fn test_apply_moves() {
        let board = Board::new(3).unwrap();
        let goal = board.goal();
        let moves = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        let moved = board.apply_moves(goal, &moves).unwrap();
        assert_ne!(moved, goal);
        let back: Vec<_> = moves.iter().rev().map(|d| d.reverse()).collect();
        assert_eq!(board.apply_moves(moved, &back), Some(goal));
        assert_eq!(board.apply_moves(goal, &[Direction::Down]), None);
    }
}
