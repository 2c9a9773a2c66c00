use crate::pattern_db::PatternDatabase;
use crate::puzzle_sliding::heuristic::{CellMetric, manhattan_metric, calc_manhattan_heuristic, calc_linear_conflicts};
use crate::puzzle_sliding::moves::Board;
use crate::puzzle_sliding::state::State;
use std::sync::Arc;

/// Lower bound of the number of moves needed to solve a state.
///
/// Combines the value of the disjoint pattern database (if it is present and initialized)
/// with Manhattan distance increased by the linear conflicts correction.
/// Both are admissible, so their maximum is admissible too.
#[derive(Clone)]
pub struct HeuristicEvaluator {
    board: Board,
    metric: CellMetric,
    pattern_db: Option<Arc<PatternDatabase>>
}

impl HeuristicEvaluator {
    /// Constructs evaluator that uses only Manhattan distance and linear conflicts.
    pub fn new(board: Board) -> Self {
        Self { board, metric: manhattan_metric(board.side(), board.side()), pattern_db: None }
    }

    /// Constructs evaluator that uses `pattern_db` and the board described by its configuration.
    pub fn with_pattern_db(pattern_db: Arc<PatternDatabase>) -> Self {
        let board = *pattern_db.board();
        Self { board, metric: manhattan_metric(board.side(), board.side()), pattern_db: Some(pattern_db) }
    }

    #[inline] pub fn board(&self) -> &Board { &self.board }

    #[inline] pub fn pattern_db(&self) -> Option<&Arc<PatternDatabase>> { self.pattern_db.as_ref() }

    #[inline] pub fn manhattan(&self, state: State) -> u16 {
        calc_manhattan_heuristic(&self.metric, state, self.board.board_size()) as u16
    }

    #[inline] pub fn linear_conflicts(&self, state: State) -> u16 {
        calc_linear_conflicts(self.board.side(), state) as u16
    }

    /// Returns value of the pattern database, `0` if it is absent or uninitialized.
    #[inline] pub fn from_pattern_db(&self, state: State) -> u16 {
        self.pattern_db.as_ref().map_or(0, |db| db.heuristic(state))
    }

    pub fn evaluate(&self, state: State) -> u16 {
        self.from_pattern_db(state).max(self.manhattan(state) + self.linear_conflicts(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern_db::PatternDBConf;
    use crate::puzzle_sliding::moves::goal_distances;

    #[test]
    fn goal_is_zero() {
        let evaluator = HeuristicEvaluator::new(Board::new(4).unwrap());
        assert_eq!(evaluator.evaluate(State::goal(16)), 0);
        let evaluator = HeuristicEvaluator::new(Board::new(3).unwrap());
        assert_eq!(evaluator.evaluate(State::goal(9)), 0);
    }

    #[test]
    fn row_conflict_with_blank() {
        let evaluator = HeuristicEvaluator::new(Board::new(4).unwrap());
        // first row: 2 1 _ 3 (0 is the blank), tile 4 is out of both its goal row and goal column
        let state = State::from_blank_zero_format(&[2, 1, 0, 3,  5, 6, 7, 8,  9, 10, 11, 12,  4, 13, 14, 15]);
        assert!(state.is_permutation(16));
        assert_eq!(evaluator.linear_conflicts(state), 2);
        // tile 4 in the last column joins tiles 8 and 12 in the wrong order, which adds another conflict
        let state = State::from_blank_zero_format(&[2, 1, 0, 3,  5, 6, 7, 8,  9, 10, 11, 12,  13, 14, 15, 4]);
        assert_eq!(evaluator.linear_conflicts(state), 4);
    }

    #[test]
    fn without_pattern_db_is_admissible_on_33() {
        let board = Board::new(3).unwrap();
        let evaluator = HeuristicEvaluator::new(board);
        for (state, distance) in goal_distances(&board) {
            let h = evaluator.evaluate(state);
            assert!(h <= distance as u16, "{}\nh = {} > {}", state.display(3), h, distance);
            assert_eq!(h == 0, distance == 0);
        }
    }

    #[test]
    fn combined_is_admissible_on_33() {
        let db = Arc::new(PatternDatabase::new(PatternDBConf::new(3, vec![vec![0, 1, 2], vec![3, 4, 5, 6, 7]])).unwrap());
        let evaluator = HeuristicEvaluator::with_pattern_db(Arc::clone(&db));
        let state = State::from_iter([4, 0, 2, 1, 8, 3, 6, 7, 5]);
        let before = evaluator.evaluate(state);
        assert_eq!(before, evaluator.manhattan(state) + evaluator.linear_conflicts(state));
        db.initialize().unwrap();
        assert!(evaluator.from_pattern_db(state) > 0);
        assert!(evaluator.evaluate(state) >= before);
        for (state, distance) in goal_distances(evaluator.board()) {
            assert!(evaluator.evaluate(state) <= distance as u16);
        }
    }
}
