//! Benchmark results and their rendering.

use std::time::Duration;

use chrono::{DateTime, Utc};
use colored::*;
use serde::{Serialize, Serializer};

/// Timing of one completed strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyResult {
    pub strategy: &'static str,
    pub rows: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl StrategyResult {
    pub fn new(strategy: &'static str, rows: u64, elapsed: Duration) -> Self {
        Self {
            strategy,
            rows,
            elapsed,
        }
    }

    /// Rows inserted per second. Zero when nothing was inserted.
    pub fn rows_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if self.rows == 0 || secs == 0.0 {
            return 0.0;
        }
        self.rows as f64 / secs
    }
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1000.0)
}

/// Results of a full run, in strategy order.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub started_at: DateTime<Utc>,
    pub rows: u64,
    pub pool_size: u32,
    pub results: Vec<StrategyResult>,
}

impl BenchReport {
    pub fn new(rows: u64, pool_size: u32) -> Self {
        Self {
            started_at: Utc::now(),
            rows,
            pool_size,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: StrategyResult) {
        self.results.push(result);
    }

    /// Sum of all strategy timings.
    pub fn total_elapsed(&self) -> Duration {
        self.results.iter().map(|r| r.elapsed).sum()
    }

    /// The strategy with the shortest elapsed time.
    pub fn fastest(&self) -> Option<&StrategyResult> {
        self.results.iter().min_by_key(|r| r.elapsed)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render a boxed summary table.
    pub fn to_table(&self) -> String {
        let fastest = self.fastest().map(|r| r.strategy);
        let mut out = String::new();

        out.push_str(&format!("{}\n", "📈 BENCHMARK RESULTS".green().bold()));
        out.push_str("┌──────────────────────────┬────────────┬──────────────┬──────────────┐\n");
        out.push_str(&format!(
            "│ {:<24} │ {:>10} │ {:>12} │ {:>12} │\n",
            "Strategy", "Rows", "Elapsed", "Rows/sec"
        ));
        out.push_str("├──────────────────────────┼────────────┼──────────────┼──────────────┤\n");

        for r in &self.results {
            let name = format!("{:<24}", r.strategy);
            let name = if Some(r.strategy) == fastest && self.results.len() > 1 {
                name.cyan().bold().to_string()
            } else {
                name
            };
            out.push_str(&format!(
                "│ {} │ {:>10} │ {:>10.1}ms │ {:>12.0} │\n",
                name,
                r.rows,
                r.elapsed.as_secs_f64() * 1000.0,
                r.rows_per_sec()
            ));
        }

        out.push_str("└──────────────────────────┴────────────┴──────────────┴──────────────┘\n");
        out.push_str(&format!(
            "Pool size: {}  Total: {:.1}ms\n",
            self.pool_size,
            self.total_elapsed().as_secs_f64() * 1000.0
        ));
        out
    }
}
