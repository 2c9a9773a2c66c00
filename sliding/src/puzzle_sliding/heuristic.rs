use crate::puzzle_sliding::utils::{MAX_BOARD_SIZE, MAX_SIDE};
use crate::puzzle_sliding::moves::cell_nr;
use crate::puzzle_sliding::state::State;
use arrayvec::ArrayVec;

/// Distances between all pair of cells.
pub type CellMetric = [[u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];

/// Returns Manhattan metric for the board of given size.
pub fn manhattan_metric(cols: u8, rows: u8) -> CellMetric {
    let mut cell_distances = [[0u8; MAX_BOARD_SIZE]; MAX_BOARD_SIZE];
    for first_r in 0..rows {
        for first_c in 0..cols {
            let first_cell = cell_nr(cols, first_c, first_r) as usize;
            for second_r in 0..rows {
                let row_dist = if second_r >= first_r { second_r - first_r } else { first_r - second_r };
                for second_c in first_c..cols {
                    let second_cell = cell_nr(cols, second_c, second_r) as usize;
                    let distance = row_dist + second_c - first_c;
                    cell_distances[first_cell][second_cell] = distance;
                    cell_distances[second_cell][first_cell] = distance;
                }
            }
        }
    }
    cell_distances
}

/// Returns sum of distances between current and goal cells of all tiles except the blank (`board_size-1`).
pub fn calc_manhattan_heuristic(metric: &CellMetric, state: State, board_size: u8) -> u8 {
    let blank = board_size - 1;
    state.iter(board_size).enumerate().map(|(i, t)| if t == blank { 0 } else { metric[i][t as usize] }).sum()
}

/// Returns the minimum number of tiles that have to leave the line to resolve all conflicts in it.
///
/// `goals` lists, in order of current positions along the line, the goal positions (along the same line)
/// of tiles whose goal is in that line. Two tiles are in conflict if their goal positions are in reversed order.
/// The tile involved in the most conflicts is removed until no conflict remains.
pub fn line_conflicts(goals: &[u8]) -> u8 {
    let mut goals: ArrayVec<u8, {MAX_SIDE as usize}> = goals.iter().cloned().collect();
    let mut removed = 0;
    loop {
        let conflicts_of = |i: usize| goals.iter().enumerate()
            .filter(|(j, g)| (*j < i && **g > goals[i]) || (*j > i && **g < goals[i]))
            .count();
        let worst = (0..goals.len()).map(|i| (conflicts_of(i), i)).max();
        match worst {
            Some((conflicts, i)) if conflicts > 0 => {
                goals.remove(i);
                removed += 1;
            }
            _ => return removed
        }
    }
}

/// Returns the linear conflicts correction of Manhattan distance for `state` on the board with `side` x `side` cells.
///
/// Each tile that has to leave its goal row (or column) to let other tiles pass needs at least two extra moves.
pub fn calc_linear_conflicts(side: u8, state: State) -> u8 {
    let board_size = side * side;
    let blank = board_size - 1;
    let mut lines = 0;
    for line in 0..side {
        let mut in_row = ArrayVec::<u8, {MAX_SIDE as usize}>::new();
        let mut in_col = ArrayVec::<u8, {MAX_SIDE as usize}>::new();
        for along in 0..side {
            let t = state.tile_at(cell_nr(side, along, line));
            if t != blank && t / side == line { in_row.push(t % side); }
            let t = state.tile_at(cell_nr(side, line, along));
            if t != blank && t % side == line { in_col.push(t / side); }
        }
        lines += line_conflicts(&in_row) + line_conflicts(&in_col);
    }
    2 * lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_32() {
        // 0, 1, 2
        // 3, 4, 5
        let metric = manhattan_metric(3, 2);
        assert_eq!(metric[0][0], 0);
        assert_eq!(metric[0][1], 1);    assert_eq!(metric[1][0], 1);
        assert_eq!(metric[0][2], 2);    assert_eq!(metric[2][0], 2);
        assert_eq!(metric[0][3], 1);    assert_eq!(metric[3][0], 1);
        assert_eq!(metric[0][4], 2);    assert_eq!(metric[4][0], 2);
        assert_eq!(metric[0][5], 3);    assert_eq!(metric[5][0], 3);
        assert_eq!(metric[1][1], 0);
        assert_eq!(metric[1][2], 1);    assert_eq!(metric[2][1], 1);
        assert_eq!(metric[1][3], 2);    assert_eq!(metric[3][1], 2);
        assert_eq!(metric[1][4], 1);    assert_eq!(metric[4][1], 1);
        assert_eq!(metric[1][5], 2);    assert_eq!(metric[5][1], 2);
        assert_eq!(metric[2][2], 0);
        assert_eq!(metric[2][3], 3);    assert_eq!(metric[3][2], 3);
        assert_eq!(metric[2][4], 2);    assert_eq!(metric[4][2], 2);
        assert_eq!(metric[2][5], 1);    assert_eq!(metric[5][2], 1);
        assert_eq!(metric[3][3], 0);
        assert_eq!(metric[3][4], 1);    assert_eq!(metric[4][3], 1);
        assert_eq!(metric[3][5], 2);    assert_eq!(metric[5][3], 2);
        assert_eq!(metric[4][4], 0);
        assert_eq!(metric[4][5], 1);    assert_eq!(metric[5][4], 1);
        assert_eq!(metric[5][5], 0);
    }

    #[test]
    fn test_manhattan_33() {
        let metric = manhattan_metric(3, 3);
        assert_eq!(calc_manhattan_heuristic(&metric, State::goal(9), 9), 0);
        // 1 8 2
        // 0 4 3
        // 6 7 5
        let state: State = [1, 8, 2,  0, 4, 3,  6, 7, 5].iter().cloned().collect();
        assert_eq!(calc_manhattan_heuristic(&metric, state, 9), 1 + 0 + 0 + 1 + 0 + 2 + 0 + 0 + 1); // blank skipped
    }

    #[test]
    fn test_line_conflicts() {
        assert_eq!(line_conflicts(&[]), 0);
        assert_eq!(line_conflicts(&[0, 1, 2, 3]), 0);
        assert_eq!(line_conflicts(&[1, 0]), 1);
        assert_eq!(line_conflicts(&[2, 1, 3]), 1);
        assert_eq!(line_conflicts(&[2, 1, 0]), 2);  // 3 conflicting pairs, but moving out 2 tiles is enough
        assert_eq!(line_conflicts(&[3, 2, 1, 0]), 3);
        assert_eq!(line_conflicts(&[3, 0, 1, 2]), 1);
    }

    #[test]
    fn test_linear_conflicts_row_with_blank() {
        // first row: 2 1 _ 3
        let state: State = [2, 1, 15, 3,  4, 5, 6, 7,  8, 9, 10, 11,  12, 13, 14, 0].iter().cloned().collect();
        assert_eq!(calc_linear_conflicts(4, state), 2);
    }

    #[test]
    fn test_linear_conflicts_column() {
        // 3 1 2
        // 0 4 5
        // 6 7 _
        let state: State = [3, 1, 2,  0, 4, 5,  6, 7, 8].iter().cloned().collect();
        assert_eq!(calc_linear_conflicts(3, state), 2);
        assert_eq!(calc_linear_conflicts(3, State::goal(9)), 0);
    }
}
