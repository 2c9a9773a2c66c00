use crate::error::SolverError;
use crate::heuristic::HeuristicEvaluator;
use crate::pattern_db::PatternDatabase;
use crate::puzzle_sliding::moves::Direction;
use crate::puzzle_sliding::state::State;
use crate::solver::{SearchNode, Solution, Solver};
use crate::stats::SearchStatsCollector;
use log::debug;
use std::sync::Arc;

/// Result of a single depth-limited search.
enum Outcome {
    /// The goal is found, the path leading to it is stored.
    Found,
    /// The goal is not found, the value is the minimum cost that exceeds the bound
    /// or `u16::MAX` if no state exceeds the bound.
    Bound(u16),
    /// The statistic collector has cancelled the search.
    Cancelled
}

/// Iterative deepening A*.
///
/// Uses memory proportional to the length of the solution,
/// since only the states of the current path are stored.
#[derive(Clone)]
pub struct IdaStarSolver {
    evaluator: HeuristicEvaluator
}

impl IdaStarSolver {
    pub fn new(evaluator: HeuristicEvaluator) -> Self { Self { evaluator } }

    pub fn with_pattern_db(pattern_db: Arc<PatternDatabase>) -> Self {
        Self::new(HeuristicEvaluator::with_pattern_db(pattern_db))
    }

    /// Implementation of DFS with limited cost that is a part of IDA*.
    ///
    /// # Arguments
    /// * `node` - state to evaluate,
    /// * `path` - states from the initial one (included) to `node` (excluded), empty if `node` is the initial state
    /// * `moves` - directions of moves along `path` and the move that produced `node`
    /// * `bound` - limit to the number of moves from the initial to the goal state
    /// * `stats` - collects search statistics
    ///
    /// If the goal is found, `path` and `moves` lead to it when this method returns.
    fn search_rec(&self, node: SearchNode, path: &mut Vec<State>, moves: &mut Vec<Direction>, bound: u16, stats: &mut impl SearchStatsCollector) -> Outcome {
        let depth = path.len() as u16;
        if node.state == self.evaluator.board().goal() {
            stats.leaf();
            return Outcome::Found;
        }
        // Note about "max(1)": we know that node is not the goal state, so we can correct potential heuristic=0
        let min_cost = depth + node.heuristic.max(1);
        if min_cost > bound {
            if !stats.leaf() { return Outcome::Cancelled; }
            return Outcome::Bound(min_cost);
        }
        if !stats.internal() { return Outcome::Cancelled; }
        let neighbors = node.successors(&self.evaluator, |n| path.contains(n));
        path.push(node.state);
        let mut min_cost = u16::MAX;
        for neighbor in neighbors {
            if let Some(direction) = neighbor.direction { moves.push(direction); }
            match self.search_rec(neighbor, path, moves, bound, stats) {
                Outcome::Found => return Outcome::Found,
                Outcome::Cancelled => return Outcome::Cancelled,
                Outcome::Bound(cost) => if cost < min_cost { min_cost = cost; }
            }
            moves.pop();
        }
        path.pop();
        Outcome::Bound(min_cost)
    }
}

impl Solver for IdaStarSolver {
    #[inline] fn evaluator(&self) -> &HeuristicEvaluator { &self.evaluator }

    fn solve_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Solution, SolverError> {
        let root = SearchNode::root(&self.evaluator, start)?;
        let mut bound = root.heuristic;
        let mut path = Vec::with_capacity(128);
        let mut moves = Vec::with_capacity(128);
        let mut iteration = 0u32;
        loop {
            iteration += 1;
            stats.iteration(bound);
            debug!("IDA* iteration {}: bound {}", iteration, bound);
            path.clear();
            moves.clear();
            match self.search_rec(root, &mut path, &mut moves, bound, stats) {
                Outcome::Found => {
                    path.push(self.evaluator.board().goal());
                    debug!("IDA* found solution with {} moves in iteration {}", moves.len(), iteration);
                    return Ok(Solution { path, moves });
                }
                Outcome::Cancelled => return Err(SolverError::Cancelled { iteration, bound }),
                Outcome::Bound(u16::MAX) => return Err(SolverError::Exhausted { iteration, bound }),
                Outcome::Bound(next) => bound = next
            }
        }
    }
}
