//! The pool seam the strategies run against.
//!
//! [`InsertPool`] captures the four ways a strategy can reach the database:
//! an implicit checkout per query, an implicit checkout per exec, a
//! connection held for a whole loop, and a transaction. [`MySqlTarget`]
//! implements it over a `sqlx` MySQL pool.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlPool};
use sqlx::pool::PoolConnection;

use crate::row::SyntheticRow;

/// A pool that can insert synthetic rows.
#[async_trait]
pub trait InsertPool: Send + Sync {
    /// Connection held across a loop. Dropping it returns it to the pool.
    type Conn: RowWriter;
    /// Open transaction. Dropping it without commit rolls back.
    type Tx: TxWriter;

    /// Insert one row through a query-style call, discarding any result rows.
    async fn query_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error>;

    /// Insert one row through an exec-style call.
    async fn exec_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error>;

    /// Check out a dedicated connection.
    async fn acquire(&self) -> Result<Self::Conn, sqlx::Error>;

    /// Begin a transaction on a freshly checked out connection.
    async fn begin(&self) -> Result<Self::Tx, sqlx::Error>;

    /// Close every connection. Further calls fail.
    async fn close(&self);
}

/// Something a row can be executed on.
#[async_trait]
pub trait RowWriter: Send {
    async fn exec_row(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error>;
}

/// A transaction that can be finished explicitly.
#[async_trait]
pub trait TxWriter: RowWriter {
    async fn commit(self) -> Result<(), sqlx::Error>;
    async fn rollback(self) -> Result<(), sqlx::Error>;
}

/// The MySQL pool used by the benchmark.
#[derive(Clone)]
pub struct MySqlTarget {
    pool: MySqlPool,
    insert_sql: Arc<str>,
}

impl MySqlTarget {
    /// Wrap an open pool, inserting into `table`.
    pub fn new(pool: MySqlPool, table: &str) -> Self {
        Self {
            pool,
            insert_sql: insert_statement(table).into(),
        }
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// The single-row insert statement in use.
    pub fn insert_sql(&self) -> &str {
        &self.insert_sql
    }
}

/// Single-row insert into `table`.
pub fn insert_statement(table: &str) -> String {
    format!("INSERT INTO {} (name, email) VALUES (?, ?)", table)
}

#[async_trait]
impl InsertPool for MySqlTarget {
    type Conn = MySqlSession;
    type Tx = MySqlTx;

    async fn query_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        sqlx::query(&self.insert_sql)
            .bind(row.name.as_str())
            .bind(row.email.as_str())
            .fetch_all(&self.pool)
            .await?;
        Ok(())
    }

    async fn exec_row(&self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        sqlx::query(&self.insert_sql)
            .bind(row.name.as_str())
            .bind(row.email.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn acquire(&self) -> Result<MySqlSession, sqlx::Error> {
        let conn = self.pool.acquire().await?;
        Ok(MySqlSession {
            conn,
            insert_sql: Arc::clone(&self.insert_sql),
        })
    }

    async fn begin(&self) -> Result<MySqlTx, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(MySqlTx {
            tx,
            insert_sql: Arc::clone(&self.insert_sql),
        })
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// A connection checked out of a [`MySqlTarget`].
pub struct MySqlSession {
    conn: PoolConnection<MySql>,
    insert_sql: Arc<str>,
}

#[async_trait]
impl RowWriter for MySqlSession {
    async fn exec_row(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        sqlx::query(&self.insert_sql)
            .bind(row.name.as_str())
            .bind(row.email.as_str())
            .execute(&mut *self.conn)
            .await?;
        Ok(())
    }
}

/// A transaction opened on a [`MySqlTarget`].
pub struct MySqlTx {
    tx: sqlx::Transaction<'static, MySql>,
    insert_sql: Arc<str>,
}

#[async_trait]
impl RowWriter for MySqlTx {
    async fn exec_row(&mut self, row: &SyntheticRow) -> Result<(), sqlx::Error> {
        sqlx::query(&self.insert_sql)
            .bind(row.name.as_str())
            .bind(row.email.as_str())
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl TxWriter for MySqlTx {
    async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}
