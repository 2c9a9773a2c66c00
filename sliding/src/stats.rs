use std::ops::AddAssign;
use std::time::{Duration, Instant};

/// Search statistic collector.
/// It collects data during IDA* and A* search and can cancel the search.
pub trait SearchStatsCollector {
    /// Called for each state visited but not expanded, can return false to cancel search process.
    #[inline(always)] fn leaf(&mut self) -> bool { true }

    /// Called for each state expanded, can return false to cancel search process.
    #[inline(always)] fn internal(&mut self) -> bool { true }

    /// Called at the beginning of each iteration with the bound of the cost.
    #[inline(always)] fn iteration(&mut self, _bound: u16) { }
}

/// Search statistic collector that ignore all events.
impl SearchStatsCollector for () {}

#[derive(Default, Copy, Clone, Debug)]
pub struct SearchAllStats {
    pub internal: u64,
    pub leaves: u64,
    pub iterations: u32
}

impl SearchAllStats {
    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl AddAssign for SearchAllStats {
    fn add_assign(&mut self, rhs: Self) {
        self.internal += rhs.internal;
        self.leaves += rhs.leaves;
        self.iterations += rhs.iterations;
    }
}

impl SearchStatsCollector for SearchAllStats {
    #[inline(always)] fn leaf(&mut self) -> bool { self.leaves += 1; true }
    #[inline(always)] fn internal(&mut self) -> bool { self.internal += 1; true }
    #[inline(always)] fn iteration(&mut self, _bound: u16) { self.iterations += 1; }
}

/// Cancels the search after `limit` visits.
pub struct Limited {
    pub internal: u64,
    pub leaves: u64,
    pub limit: u64
}

impl Limited {
    pub fn with_limit(limit: u64) -> Self { Self{internal: 0, leaves: 0, limit} }

    /// Clears the counters and sets new `limit`.
    pub fn reset_limit(&mut self, limit: u64) { *self = Self::with_limit(limit); }

    pub fn visits(&self) -> u64 { self.internal + self.leaves }
}

impl SearchStatsCollector for Limited {
    #[inline(always)] fn leaf(&mut self) -> bool {
        if self.visits() >= self.limit { return false; }
        self.leaves += 1;
        true
    }

    #[inline(always)] fn internal(&mut self) -> bool {
        if self.visits() >= self.limit { return false; }
        self.internal += 1;
        true
    }
}

/// Cancels the search when the deadline passes. The clock is read once per expansion.
pub struct Deadline {
    pub deadline: Instant,
    pub expanded: u64
}

impl Deadline {
    pub fn at(deadline: Instant) -> Self { Self { deadline, expanded: 0 } }

    pub fn after(timeout: Duration) -> Self { Self::at(Instant::now() + timeout) }

    pub fn is_expired(&self) -> bool { Instant::now() >= self.deadline }
}

impl SearchStatsCollector for Deadline {
    #[inline] fn internal(&mut self) -> bool {
        self.expanded += 1;
        !self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_cancels_after_limit() {
        let mut limited = Limited::with_limit(3);
        assert!(limited.internal());
        assert!(limited.leaf());
        assert!(limited.leaf());
        assert!(!limited.leaf());
        assert!(!limited.internal());
        assert_eq!(limited.visits(), 3);
        limited.reset_limit(4);
        assert_eq!(limited.visits(), 0);
        assert!(limited.leaf());
    }

    #[test]
    fn all_stats_counts_separately() {
        let mut stats = SearchAllStats::default();
        stats.iteration(5);
        stats.internal();
        stats.leaf();
        stats.leaf();
        assert_eq!((stats.internal, stats.leaves, stats.iterations), (1, 2, 1));
        let mut total = SearchAllStats::default();
        total += stats;
        total += stats;
        assert_eq!(total.visits(), 6);
    }

    #[test]
    fn deadline() {
        let mut passed = Deadline::at(Instant::now());
        assert!(!passed.internal());
        assert!(passed.leaf());
        let mut distant = Deadline::after(Duration::from_secs(3600));
        assert!(distant.internal());
        assert_eq!(distant.expanded, 1);
    }
}
