//! # poolbench: connection pool insertion benchmark
//!
//! Measures how long it takes to insert the same number of rows through one
//! connection pool using four acquisition patterns:
//!
//! | Strategy             | Pattern                                          |
//! |----------------------|--------------------------------------------------|
//! | Pool Query           | implicit checkout per row, query-style call      |
//! | Dedicated Connection | one connection held for the whole loop           |
//! | Pool Exec            | implicit checkout per row, exec-style call       |
//! | Transaction          | one transaction, committed once at the end       |
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use poolbench::prelude::*;
//!
//! let config = Config::from_env();
//! let target = open_pool(&config).await?;
//!
//! let report = Runner::standard()
//!     .run(&target, config.insert_count, config.pool_size)
//!     .await;
//! target.close().await;
//! println!("{}", report?.to_table());
//! ```
//!
//! Strategies run strictly one after another; the first failure stops the
//! run.

pub mod config;
pub mod error;
pub mod pool;
pub mod provision;
pub mod report;
pub mod row;
pub mod runner;
pub mod strategy;

pub mod prelude {
    pub use crate::config::{Config, load_env_file};
    pub use crate::error::*;
    pub use crate::pool::{InsertPool, MySqlTarget, RowWriter, TxWriter};
    pub use crate::provision::open_pool;
    pub use crate::report::{BenchReport, StrategyResult};
    pub use crate::row::SyntheticRow;
    pub use crate::runner::Runner;
    pub use crate::strategy::{
        DedicatedConnection, InsertStrategy, PoolExec, PoolQuery, StrategyKind, Transactional,
    };
}
