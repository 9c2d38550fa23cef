//! The strategy runner.

use tracing::info;

use crate::error::BenchResult;
use crate::pool::InsertPool;
use crate::report::BenchReport;
use crate::strategy::{InsertStrategy, StrategyKind};

/// Runs strategies one after another against a single pool.
///
/// Strategies run strictly in sequence and the first failure ends the run.
/// Pool state is not reset between strategies.
pub struct Runner<P: InsertPool> {
    strategies: Vec<Box<dyn InsertStrategy<P>>>,
}

impl<P: InsertPool + 'static> Runner<P> {
    /// All four built-in strategies in their fixed order.
    pub fn standard() -> Self {
        Self::from_kinds(&StrategyKind::ALL)
    }

    /// The selected built-in strategies, in fixed order without repeats.
    pub fn from_kinds(kinds: &[StrategyKind]) -> Self {
        let mut kinds = kinds.to_vec();
        kinds.sort_unstable();
        kinds.dedup();
        Self::new(kinds.into_iter().map(StrategyKind::build).collect())
    }
}

impl<P: InsertPool> Runner<P> {
    /// Run exactly `strategies`, in the given order.
    pub fn new(strategies: Vec<Box<dyn InsertStrategy<P>>>) -> Self {
        Self { strategies }
    }

    /// Names of the strategies in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run every strategy over `rows` rows.
    ///
    /// Returns the first error without starting later strategies. Results
    /// of strategies that finished before it have already been logged.
    pub async fn run(&self, pool: &P, rows: u64, pool_size: u32) -> BenchResult<BenchReport> {
        info!("Starting benchmark with {} inserts per strategy", rows);
        let mut report = BenchReport::new(rows, pool_size);

        for strategy in &self.strategies {
            let result = strategy.run(pool, rows).await?;
            info!(
                strategy = result.strategy,
                rows = result.rows,
                elapsed_ms = result.elapsed.as_secs_f64() * 1000.0,
                "{}: inserted {} rows in {:?} ({:.0} rows/s)",
                result.strategy,
                result.rows,
                result.elapsed,
                result.rows_per_sec()
            );
            report.push(result);
        }

        info!("Benchmark completed");
        Ok(report)
    }
}
