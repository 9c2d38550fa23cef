//! Insertion strategies.
//!
//! Every strategy inserts the same number of single-row statements and
//! differs only in how it reaches the database:
//!
//! | Strategy                | Acquisition                  | Per row             |
//! |-------------------------|------------------------------|---------------------|
//! | [`PoolQuery`]           | implicit checkout per row    | query, rows dropped |
//! | [`DedicatedConnection`] | one connection for the loop  | exec on that conn   |
//! | [`PoolExec`]            | implicit checkout per row    | exec                |
//! | [`Transactional`]       | one transaction for the loop | exec in the tx      |
//!
//! None of them retries. Rows inserted before a failing row stay in place,
//! except for [`Transactional`], which rolls its batch back.

use std::fmt;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{BenchError, BenchResult, TxStage};
use crate::pool::{InsertPool, RowWriter, TxWriter};
use crate::report::StrategyResult;
use crate::row::SyntheticRow;

/// One way of inserting `rows` synthetic rows through a pool.
#[async_trait]
pub trait InsertStrategy<P: InsertPool>: Send + Sync {
    /// Human readable name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Tag mixed into every generated row.
    fn tag(&self) -> &'static str;

    /// Insert rows `0..rows`, stopping at the first error.
    async fn insert(&self, pool: &P, rows: u64) -> BenchResult<()>;

    /// Insert and time the whole run, acquisition included.
    async fn run(&self, pool: &P, rows: u64) -> BenchResult<StrategyResult> {
        debug!(strategy = self.name(), rows, "Starting strategy");
        let start = Instant::now();
        self.insert(pool, rows).await?;
        Ok(StrategyResult::new(self.name(), rows, start.elapsed()))
    }
}

/// One implicit pool checkout per row via a query-style call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolQuery;

impl PoolQuery {
    pub const NAME: &'static str = "Pool Query";
    pub const TAG: &'static str = "Pool";
}

#[async_trait]
impl<P: InsertPool> InsertStrategy<P> for PoolQuery {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    async fn insert(&self, pool: &P, rows: u64) -> BenchResult<()> {
        for i in 0..rows {
            let row = SyntheticRow::new(Self::TAG, i);
            pool.query_row(&row)
                .await
                .map_err(|source| BenchError::Insert {
                    strategy: Self::NAME,
                    row: i,
                    source,
                })?;
        }
        Ok(())
    }
}

/// One connection checked out for the whole loop.
///
/// The connection goes back to the pool when it drops, on success and on
/// failure alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedicatedConnection;

impl DedicatedConnection {
    pub const NAME: &'static str = "Dedicated Connection";
    pub const TAG: &'static str = "Conn";
}

#[async_trait]
impl<P: InsertPool> InsertStrategy<P> for DedicatedConnection {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    async fn insert(&self, pool: &P, rows: u64) -> BenchResult<()> {
        let mut conn = pool
            .acquire()
            .await
            .map_err(|source| BenchError::Acquire {
                strategy: Self::NAME,
                source,
            })?;

        for i in 0..rows {
            let row = SyntheticRow::new(Self::TAG, i);
            conn.exec_row(&row)
                .await
                .map_err(|source| BenchError::Insert {
                    strategy: Self::NAME,
                    row: i,
                    source,
                })?;
        }
        Ok(())
    }
}

/// One implicit pool checkout per row via an exec-style call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolExec;

impl PoolExec {
    pub const NAME: &'static str = "Pool Exec";
    pub const TAG: &'static str = "Exec";
}

#[async_trait]
impl<P: InsertPool> InsertStrategy<P> for PoolExec {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    async fn insert(&self, pool: &P, rows: u64) -> BenchResult<()> {
        for i in 0..rows {
            let row = SyntheticRow::new(Self::TAG, i);
            pool.exec_row(&row)
                .await
                .map_err(|source| BenchError::Insert {
                    strategy: Self::NAME,
                    row: i,
                    source,
                })?;
        }
        Ok(())
    }
}

/// All rows inside a single transaction, committed once at the end.
///
/// The first failing row rolls the whole batch back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transactional;

impl Transactional {
    pub const NAME: &'static str = "Transaction";
    pub const TAG: &'static str = "Tx";
}

#[async_trait]
impl<P: InsertPool> InsertStrategy<P> for Transactional {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn tag(&self) -> &'static str {
        Self::TAG
    }

    async fn insert(&self, pool: &P, rows: u64) -> BenchResult<()> {
        let mut tx = pool.begin().await.map_err(|source| BenchError::Transaction {
            stage: TxStage::Begin,
            source,
        })?;

        for i in 0..rows {
            let row = SyntheticRow::new(Self::TAG, i);
            let inserted = tx.exec_row(&row).await;
            if let Err(source) = inserted {
                if let Err(e) = tx.rollback().await {
                    warn!("Rollback after failed insert of row {} failed: {}", i, e);
                }
                return Err(BenchError::Transaction {
                    stage: TxStage::Exec { row: i },
                    source,
                });
            }
        }

        tx.commit().await.map_err(|source| BenchError::Transaction {
            stage: TxStage::Commit,
            source,
        })
    }
}

/// Selector for the built-in strategies, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum StrategyKind {
    PoolQuery,
    DedicatedConnection,
    PoolExec,
    Transaction,
}

impl StrategyKind {
    /// Every strategy in the fixed run order.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::PoolQuery,
        StrategyKind::DedicatedConnection,
        StrategyKind::PoolExec,
        StrategyKind::Transaction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StrategyKind::PoolQuery => PoolQuery::NAME,
            StrategyKind::DedicatedConnection => DedicatedConnection::NAME,
            StrategyKind::PoolExec => PoolExec::NAME,
            StrategyKind::Transaction => Transactional::NAME,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            StrategyKind::PoolQuery => PoolQuery::TAG,
            StrategyKind::DedicatedConnection => DedicatedConnection::TAG,
            StrategyKind::PoolExec => PoolExec::TAG,
            StrategyKind::Transaction => Transactional::TAG,
        }
    }

    /// Build the strategy for this kind.
    pub fn build<P: InsertPool + 'static>(self) -> Box<dyn InsertStrategy<P>> {
        match self {
            StrategyKind::PoolQuery => Box::new(PoolQuery),
            StrategyKind::DedicatedConnection => Box::new(DedicatedConnection),
            StrategyKind::PoolExec => Box::new(PoolExec),
            StrategyKind::Transaction => Box::new(Transactional),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
