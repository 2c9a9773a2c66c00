use crate::error::SolverError;
use crate::heuristic::HeuristicEvaluator;
use crate::pattern_db::PatternDatabase;
use crate::puzzle_sliding::state::State;
use crate::solver::{SearchNode, Solution, Solver};
use crate::stats::SearchStatsCollector;
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;

/// Node of the search tree, stored in the arena.
struct Node {
    search: SearchNode,
    cost: u16,
    /// Index of the parent node in the arena, `None` for the start.
    parent: Option<usize>
}

/// A* search.
///
/// Stores all generated states, so it needs much more memory than [`super::IdaStarSolver`].
/// Suitable for small boards and easy states.
#[derive(Clone)]
pub struct AStarSolver {
    evaluator: HeuristicEvaluator
}

impl AStarSolver {
    pub fn new(evaluator: HeuristicEvaluator) -> Self { Self { evaluator } }

    pub fn with_pattern_db(pattern_db: Arc<PatternDatabase>) -> Self {
        Self::new(HeuristicEvaluator::with_pattern_db(pattern_db))
    }

    /// Returns the solution that ends in the arena node with given `index`.
    fn solution(arena: &[Node], mut index: usize) -> Solution {
        let mut solution = Solution::default();
        loop {
            let node = &arena[index];
            solution.path.push(node.search.state);
            if let Some(direction) = node.search.direction { solution.moves.push(direction); }
            match node.parent {
                Some(parent) => index = parent,
                None => break
            }
        }
        solution.path.reverse();
        solution.moves.reverse();
        solution
    }
}

impl Solver for AStarSolver {
    #[inline] fn evaluator(&self) -> &HeuristicEvaluator { &self.evaluator }

    fn solve_stats(&self, start: State, stats: &mut impl SearchStatsCollector) -> Result<Solution, SolverError> {
        let root = SearchNode::root(&self.evaluator, start)?;
        let goal = self.evaluator.board().goal();
        stats.iteration(root.heuristic);
        let mut arena = vec![Node { search: root, cost: 0, parent: None }];
        // the best known cost of each generated state, a node is stale if its cost is greater
        let mut best_cost = FxHashMap::default();
        best_cost.insert(start, 0u16);
        // (f, h, index) with ties broken in favor of lower heuristic
        let mut open = BinaryHeap::new();
        open.push(Reverse((root.heuristic, root.heuristic, 0usize)));
        let mut max_f = root.heuristic;
        while let Some(Reverse((f, _, index))) = open.pop() {
            let (search, cost) = (arena[index].search, arena[index].cost);
            if best_cost.get(&search.state).map_or(false, |best| *best < cost) { continue; }
            if search.state == goal {
                stats.leaf();
                debug!("A* found solution with {} moves, {} nodes generated", cost, arena.len());
                return Ok(Self::solution(&arena, index));
            }
            if f > max_f { max_f = f; }
            if !stats.internal() {
                return Err(SolverError::Cancelled { iteration: 1, bound: max_f });
            }
            let child_cost = cost + 1;
            let children = search.successors(&self.evaluator, |s| best_cost.get(s).map_or(false, |best| *best <= child_cost));
            for child in children {
                best_cost.insert(child.state, child_cost);
                open.push(Reverse((child_cost + child.heuristic, child.heuristic, arena.len())));
                arena.push(Node { search: child, cost: child_cost, parent: Some(index) });
            }
        }
        Err(SolverError::Exhausted { iteration: 1, bound: max_f })
    }
}
