#![doc = include_str!("../README.md")]

use sliding::heuristic::HeuristicEvaluator;
use sliding::pattern_db::{PatternDatabase, PatternDBConf};
use sliding::puzzle_sliding::{Board, State};
use sliding::solver::{AStarSolver, IdaStarSolver, Solver};
use sliding::stats::SearchAllStats;
use anyhow::{bail, Context};
use cpu_time::ProcessTime;
use fsum::FSum;
use log::{info, warn};
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::sync::Arc;

struct TestStateSolution {
    who_solved: String,
    moves_to_solve: usize
}

/// State to be tested.
struct TestState {
    state: State,
    solution: Option<TestStateSolution>
}

impl TestState {
    pub fn new(state: State) -> Self { Self{ state, solution: None } }
}

struct Test {
    pattern_db: Arc<PatternDatabase>,
    board: Board,
    test_states: Vec<TestState>,
    store_details: bool
}

// https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance
fn sdev(sum: u64, sqrsum: u64, n: u64) -> f64 {
    ((sqrsum as f64 - (sum * sum) as f64 / n as f64) / (n-1) as f64).sqrt()
}

impl Test {
    /// Builds or loads the pattern database described by `conf`.
    fn new(conf: PatternDBConf) -> anyhow::Result<Self> {
        let pattern_db = PatternDatabase::new(conf)?;
        let start_moment = ProcessTime::try_now().context("getting process time failed")?;
        pattern_db.initialize()?;
        println!("pattern database ready in {:.2} sec of process time.",
                 start_moment.try_elapsed().context("getting process time failed")?.as_secs_f64());
        let board = *pattern_db.board();
        Ok(Self { pattern_db: Arc::new(pattern_db), board, test_states: Vec::new(), store_details: false })
    }

    fn print_pattern_db_stats(&self) {
        let Some(tables) = self.pattern_db.tables() else { return };
        for (tiles, table) in self.pattern_db.conf().groups.iter().zip(tables) {
            let mut lens = Vec::<usize>::new();
            for distance in table.values() {
                let distance = *distance as usize;
                if lens.len() <= distance { lens.resize(distance + 1, 0); }
                lens[distance] += 1;
            }
            let total_len = table.len() as f64;
            let mut distance_sum = 0;
            let mut len_sum = 0;
            println!("group {:?}:", tiles);
            for (distance_to_goal, len) in lens.iter().enumerate() {
                len_sum += len;
                distance_sum += distance_to_goal * len;
                println!("{}\t{} {:.2}%\t{} {:.2}%", distance_to_goal, len, *len as f64 * 100.0 / total_len, len_sum, len_sum as f64 * 100.0 / total_len);
            }
            let entropy = - FSum::with_all(lens.iter().filter(|len| **len != 0).map(|len| {
                let p = *len as f64 / total_len;
                p * p.log2()
            })).value();
            println!("{} abstract states with average distance to goal {:.2}, value entropy {:.2}.",
                     table.len(), distance_sum as f64 / total_len, entropy);
        }
        println!("pattern database: {} entries in total.", self.pattern_db.len());
    }

    /// Prints average values of heuristics for random states.
    fn print_heuristic_stats(&self) {
        const SAMPLE_SIZE: u64 = 100000;
        let evaluator = HeuristicEvaluator::with_pattern_db(Arc::clone(&self.pattern_db));
        let mut rng = ChaCha8Rng::seed_from_u64(314);
        let (mut db, mut db_sqr) = (0u64, 0u64);
        let (mut manhattan, mut manhattan_sqr) = (0u64, 0u64);
        let (mut combined, mut combined_sqr) = (0u64, 0u64);
        for _ in 0..SAMPLE_SIZE {
            let state = self.rand_state(&mut rng);
            let db_dist = evaluator.from_pattern_db(state) as u64;
            let manhattan_dist = (evaluator.manhattan(state) + evaluator.linear_conflicts(state)) as u64;
            let max_dist = db_dist.max(manhattan_dist);
            db += db_dist; db_sqr += db_dist * db_dist;
            manhattan += manhattan_dist; manhattan_sqr += manhattan_dist * manhattan_dist;
            combined += max_dist; combined_sqr += max_dist * max_dist;
        }
        println!("heuristic values of {} random states (average and standard deviation):", SAMPLE_SIZE);
        println!("  pattern database: {:.2} {:.2}", db as f64 / SAMPLE_SIZE as f64, sdev(db, db_sqr, SAMPLE_SIZE));
        println!("  manhattan + linear conflicts: {:.2} {:.2}", manhattan as f64 / SAMPLE_SIZE as f64, sdev(manhattan, manhattan_sqr, SAMPLE_SIZE));
        println!("  maximum: {:.2} {:.2}", combined as f64 / SAMPLE_SIZE as f64, sdev(combined, combined_sqr, SAMPLE_SIZE));
    }

    /// Returns random puzzle state.
    fn rand_state(&self, rng: &mut ChaCha8Rng) -> State {
        let mut state = self.board.goal();
        let mut blank_pos = self.board.blank();
        let mut previous = None;    // do not undo moves
        for _ in 0..1000 {
            if let Some(&(direction, new_blank_pos)) = self.board.moves_from(blank_pos, previous).choose(rng) {
                state.move_blank(blank_pos, new_blank_pos);
                blank_pos = new_blank_pos;
                previous = Some(direction);
            }
        }
        state
    }

    fn add_test_state(&mut self, state: State) {
        self.test_states.push(TestState::new(state));
    }

    fn add_random_test_states(&mut self, rng: &mut ChaCha8Rng, how_many: usize) {
        for _ in 0..how_many { let state = self.rand_state(rng); self.add_test_state(state); }
    }

    /// Reads states from the file whose each line consists of the index of a state followed by its tiles (`0` denotes the blank).
    /// Unsolvable states are skipped.
    fn add_test_states_from_file(&mut self, file_name: &str) -> anyhow::Result<()> {
        let f = BufReader::new(File::open(file_name).with_context(|| format!("cannot open {}", file_name))?);
        for (line_nr, line) in f.lines().enumerate() {
            let line = line?;
            let tiles = line.split_whitespace().skip(1).map(|s| s.parse::<u8>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("{}:{}: malformed tile", file_name, line_nr + 1))?;
            if tiles.is_empty() { continue; }
            if tiles.len() != self.board.board_size() as usize || tiles.iter().any(|t| *t >= self.board.board_size()) {
                bail!("{}:{}: expected {} tiles", file_name, line_nr + 1, self.board.board_size());
            }
            let state = State::from_blank_zero_format(&tiles);
            if !self.board.is_valid(&state) {
                bail!("{}:{}: tiles do not form a permutation", file_name, line_nr + 1);
            }
            if !state.is_solvable(self.board.side()) {
                warn!("{}:{}: state is not solvable, skipped", file_name, line_nr + 1);
                continue;
            }
            self.add_test_state(state);
        }
        Ok(())
    }

    fn create_file(&self, name: &str) -> anyhow::Result<(File, Option<File>)> {
        let side = self.board.side();
        let file_name = format!("{}x{}_groups_{}__{}.csv", side, side,
                                self.pattern_db.conf().groups.iter().map(|g| g.len().to_string()).collect::<Vec<_>>().join("_"),
                                name.replace(' ', "_").replace('*', "star"));
        println!("{}", file_name);
        let mut file = File::create(&file_name)?;
        writeln!(file, "method,states,moves_per_state,\
                        nodes,nodes_per_state,nodes_per_state_sdev,\
                        internal,leaves,iterations_per_state,time_per_state")?;
        if self.store_details {
            let mut file_details = File::create(format!("details_{}", file_name))?;
            writeln!(file_details, "state_index,moves,internal,leaves,iterations,time")?;
            Ok((file, Some(file_details)))
        } else {
            Ok((file, None))
        }
    }

    fn test_solver<S: Solver>(&mut self, name: &str, solver: &S) -> anyhow::Result<()> {
        let (mut file, mut file_details) = self.create_file(name)?;
        let mut total_visits = SearchAllStats::default();
        let mut total_visits_sqr = 0;
        let mut total_moves = 0;
        let mut total_seconds = 0f64;
        for (state_idx, test) in self.test_states.iter_mut().enumerate() {
            let mut visits = SearchAllStats::default();
            let start_moment = ProcessTime::try_now().context("getting process time failed")?;
            let solution = solver.solve_stats(test.state, &mut visits)?;
            let seconds = start_moment.try_elapsed().context("getting process time failed")?.as_secs_f64();
            total_visits += visits;
            total_visits_sqr += { let v = visits.visits(); v*v };
            total_moves += solution.len();
            total_seconds += seconds;
            if self.board.apply_moves(test.state, &solution.moves) != Some(self.board.goal()) {
                eprintln!("{}: moves given for state {:x} do not lead to the goal", name, test.state.board);
            }
            if let Some(ref known) = test.solution {
                if solution.len() != known.moves_to_solve {
                    eprintln!("{}: wrong answer given for state {:x}: {} (got) != {} (by {})",
                              name, test.state.board, solution.len(), known.moves_to_solve, known.who_solved);
                }
            } else {
                test.solution = Some(TestStateSolution{ who_solved: name.to_owned(), moves_to_solve: solution.len() });
            }
            if let Some(ref mut file_details) = file_details {
                writeln!(file_details, "{},{},{},{},{},{}", state_idx, solution.len(), visits.internal, visits.leaves, visits.iterations, seconds)?;
            }
        }
        let n = self.test_states.len().max(1);
        let v = total_visits.visits();
        println!("  {:.2} moves/case, {:.0} nodes/case expanded, {} sec/case.",
                 total_moves as f64 / n as f64, v as f64 / n as f64, total_seconds / n as f64);
        writeln!(file, "{},{},{},{},{},{},{},{},{},{}",
                 name, self.test_states.len(), total_moves as f64 / n as f64,
                 v, v as f64 / n as f64,
                 sdev(v, total_visits_sqr, n as _),
                 total_visits.internal, total_visits.leaves,
                 total_visits.iterations as f64 / n as f64,
                 total_seconds / n as f64)?;
        Ok(())
    }
}

enum Args {
    Run(HashMap<String, bool>),
    Help(Vec<String>)
}

impl Args {
    fn new() -> Self {
        let args: HashMap<String, bool> = env::args().skip(1).map(|s| (s, false)).collect();
        if args.is_empty() { Self::Help(Vec::new()) } else { Self::Run(args) }
    }

    fn case(&mut self, s: &str) -> bool {
        match self {
            Self::Run(set) => {
                if let Some(used) = set.get_mut(s) {
                    *used = true;
                    println!("---=== run {} ===---", s);
                    true
                } else { false }
            }
            Self::Help(v) => { v.push(s.to_string()); false }
        }
    }
}

impl Drop for Args {
    fn drop(&mut self) {
        match self {
            Self::Run(set) => {
                for (k, used) in set {
                    if !*used { eprintln!("Unrecognized argument: {}", k); }
                }
            }
            Self::Help(v) => {
                println!("Acceptable arguments:");
                for a in v { println!(" {}", a); }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let mut args = Args::new();

    let small = args.case("3x3");
    let six_six_three = args.case("6-6-3");
    let from_file = args.case("korf100");
    let stats = args.case("stats");
    let ida = args.case("IDA*");
    let ida_manhattan = args.case("IDA* manhattan");
    let a_star = args.case("A*");
    if !(stats || ida || ida_manhattan || a_star) { return Ok(()); }

    let conf = if small {
        PatternDBConf::new(3, vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]])
    } else if six_six_three {
        PatternDBConf::six_six_three()
    } else {
        PatternDBConf::standard()
    };
    let mut test = Test::new(conf.with_cache_dir("pattern_db"))?;
    if from_file {
        test.add_test_states_from_file("korf100.txt")?;
    } else {
        test.add_random_test_states(&mut ChaCha8Rng::seed_from_u64(123), if small { 10000 } else { 100 });
    }
    info!("{} test states", test.test_states.len());
    test.store_details = test.board.side() == 4;

    if stats {
        test.print_pattern_db_stats();
        test.print_heuristic_stats();
    }
    if ida {
        let solver = IdaStarSolver::with_pattern_db(Arc::clone(&test.pattern_db));
        test.test_solver("IDA*", &solver)?;
    }
    if ida_manhattan {
        let solver = IdaStarSolver::new(HeuristicEvaluator::new(test.board));
        test.test_solver("IDA* manhattan", &solver)?;
    }
    if a_star {
        let solver = AStarSolver::with_pattern_db(Arc::clone(&test.pattern_db));
        test.test_solver("A*", &solver)?;
    }
    Ok(())
}
