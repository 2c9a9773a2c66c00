pub mod ida_star;
pub mod a_star;

pub use ida_star::IdaStarSolver;
pub use a_star::AStarSolver;

use crate::error::{PuzzleError, SolverError};
use crate::heuristic::HeuristicEvaluator;
use crate::puzzle_sliding::moves::{Board, Direction};
use crate::puzzle_sliding::state::State;
use crate::stats::SearchStatsCollector;
use arrayvec::ArrayVec;

/// Shortest sequence of moves found by a solver.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    /// States from the start (included) to the goal (included).
    pub path: Vec<State>,
    /// Directions of the blank moves, `moves.len() + 1 == path.len()`.
    pub moves: Vec<Direction>
}

impl Solution {
    /// Returns the number of moves.
    #[inline] pub fn len(&self) -> usize { self.moves.len() }

    /// Returns `true` if the start state is the goal.
    #[inline] pub fn is_empty(&self) -> bool { self.moves.is_empty() }
}

/// Search engine that finds the shortest sequence of moves leading to the goal state.
///
/// Solvability of the start state is not checked, see [`State::is_solvable`].
pub trait Solver {
    fn evaluator(&self) -> &HeuristicEvaluator;

    #[inline] fn board(&self) -> &Board { self.evaluator().board() }

    /// Makes the pattern database (if used) ready.
    fn initialize(&self) -> Result<(), PuzzleError> {
        match self.evaluator().pattern_db() {
            Some(db) => db.initialize(),
            None => Ok(())
        }
    }

    /// Returns the solution for the `start` state, collecting statistics during search.
    fn solve_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Solution, SolverError>;

    #[inline] fn solve(&self, start: State) -> Result<Solution, SolverError> {
        self.solve_stats(start, &mut ())
    }

    /// Returns the moves that lead from `start` to the goal state.
    #[inline] fn find_path(&self, start: State) -> Result<Vec<Direction>, SolverError> {
        self.solve(start).map(|solution| solution.moves)
    }
}

/// State reached by the search with data needed to expand it.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SearchNode {
    pub state: State,
    pub blank: u8,
    /// Direction of the move that produced the node.
    pub direction: Option<Direction>,
    pub heuristic: u16
}

impl SearchNode {
    /// Returns the node of `start` or an error if `start` is not a valid state of the board.
    pub fn root(evaluator: &HeuristicEvaluator, start: State) -> Result<Self, SolverError> {
        let board = evaluator.board();
        if !board.is_valid(&start) {
            return Err(SolverError::InvalidState { board_size: board.board_size() });
        }
        Ok(Self { state: start, blank: board.locate_blank(&start), direction: None, heuristic: evaluator.evaluate(start) })
    }

    /// Returns the neighbors of `self` for which `skip` returns `false`, sorted by heuristic values.
    /// The move that reverts the move that produced `self` is never generated.
    pub fn successors<SkipF>(&self, evaluator: &HeuristicEvaluator, skip: SkipF) -> ArrayVec<SearchNode, 4>
        where SkipF: Fn(&State) -> bool
    {
        let mut result = ArrayVec::<SearchNode, 4>::new();
        for (direction, cell) in evaluator.board().moves_from(self.blank, self.direction) {
            let mut state = self.state;
            state.move_blank(self.blank, cell);
            if skip(&state) { continue; }
            result.push(SearchNode { state, blank: cell, direction: Some(direction), heuristic: evaluator.evaluate(state) });
        }
        result.sort_by_key(|neighbor| neighbor.heuristic);
        result
    }
}
