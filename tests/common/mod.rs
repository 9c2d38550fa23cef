//! In-memory pool used by the integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use poolbench::pool::{InsertPool, RowWriter, TxWriter};
use poolbench::row::SyntheticRow;

#[derive(Debug, Default)]
pub struct MockState {
    /// Rows that reached the table.
    pub committed: Vec<SyntheticRow>,
    /// Insert attempts that succeeded, committed or not.
    pub submitted: usize,
    /// Fail the insert attempt with this 0-based index.
    pub fail_at: Option<usize>,
    pub fail_commit: bool,
    pub attempts: usize,
    pub open_conns: usize,
    pub max_open: usize,
    pub checkouts: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub closed: bool,
}

impl MockState {
    fn check_out(&mut self) {
        self.open_conns += 1;
        self.checkouts += 1;
        self.max_open = self.max_open.max(self.open_conns);
    }

    /// Count an attempt and decide whether it fails.
    fn attempt(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        let index = self.attempts;
        self.attempts += 1;
        if self.closed {
            return Err(sqlx::Error::PoolClosed);
        }
        if self.fail_at == Some(index) {
            return Err(sqlx::Error::Protocol(format!("injected failure at {}", row.name)));
        }
        self.submitted += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MockPool {
    state: Arc<Mutex<MockState>>,
}

impl MockPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(index: usize) -> Self {
        let pool = Self::new();
        pool.state().fail_at = Some(index);
        pool
    }

    pub fn failing_commit() -> Self {
        let pool = Self::new();
        pool.state().fail_commit = true;
        pool
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn committed_names(&self) -> Vec<String> {
        self.state().committed.iter().map(|r| r.name.clone()).collect()
    }

    pub fn committed_with_prefix(&self, prefix: &str) -> usize {
        self.state()
            .committed
            .iter()
            .filter(|r| r.name.starts_with(prefix))
            .count()
    }

    fn implicit(&self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        let mut state = self.state();
        state.check_out();
        let result = state.attempt(row);
        if result.is_ok() {
            state.committed.push(row.clone());
        }
        state.open_conns -= 1;
        result
    }
}

#[async_trait]
impl InsertPool for MockPool {
    type Conn = MockConn;
    type Tx = MockTx;

    async fn query_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        self.implicit(row)
    }

    async fn exec_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        self.implicit(row)
    }

    async fn acquire(&self) -> Result<MockConn, sqlx::Error> {
        let mut state = self.state();
        if state.closed {
            return Err(sqlx::Error::PoolClosed);
        }
        state.check_out();
        Ok(MockConn { pool: self.clone() })
    }

    async fn begin(&self) -> Result<MockTx, sqlx::Error> {
        let mut state = self.state();
        if state.closed {
            return Err(sqlx::Error::PoolClosed);
        }
        state.check_out();
        Ok(MockTx {
            pool: self.clone(),
            pending: Vec::new(),
        })
    }

    async fn close(&self) {
        self.state().closed = true;
    }
}

pub struct MockConn {
    pool: MockPool,
}

#[async_trait]
impl RowWriter for MockConn {
    async fn exec_row(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        let mut state = self.pool.state();
        state.attempt(row)?;
        state.committed.push(row.clone());
        Ok(())
    }
}

impl Drop for MockConn {
    fn drop(&mut self) {
        self.pool.state().open_conns -= 1;
    }
}

/// Buffers rows until commit. Dropping it discards them.
pub struct MockTx {
    pool: MockPool,
    pending: Vec<SyntheticRow>,
}

#[async_trait]
impl RowWriter for MockTx {
    async fn exec_row(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        self.pool.state().attempt(row)?;
        self.pending.push(row.clone());
        Ok(())
    }
}

#[async_trait]
impl TxWriter for MockTx {
    async fn commit(mut self) -> Result<(), sqlx::Error> {
        let pending = std::mem::take(&mut self.pending);
        let mut state = self.pool.state();
        if state.fail_commit {
            return Err(sqlx::Error::Protocol("injected commit failure".into()));
        }
        state.committed.extend(pending);
        state.commits += 1;
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), sqlx::Error> {
        self.pending.clear();
        self.pool.state().rollbacks += 1;
        Ok(())
    }
}

impl Drop for MockTx {
    fn drop(&mut self) {
        self.pool.state().open_conns -= 1;
    }
}
