//! Error types for poolbench.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Where inside the transaction strategy a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStage {
    /// Opening the transaction.
    Begin,
    /// Executing the insert for the given 0-based row.
    Exec { row: u64 },
    /// Committing the batch.
    Commit,
}

impl fmt::Display for TxStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxStage::Begin => write!(f, "begin"),
            TxStage::Exec { row } => write!(f, "insert of row {}", row),
            TxStage::Commit => write!(f, "commit"),
        }
    }
}

/// The main error type for benchmark operations.
#[derive(Debug, Error)]
pub enum BenchError {
    /// The pool could not be opened or the liveness probe failed.
    #[error("Database ping failed for {target}: {source}")]
    Probe {
        target: String,
        #[source]
        source: sqlx::Error,
    },

    /// The liveness probe did not answer in time.
    #[error("Database ping timed out for {target} after {}s", .timeout.as_secs())]
    ProbeTimeout { target: String, timeout: Duration },

    /// A strategy could not check out its connection.
    #[error("{strategy}: failed to acquire connection: {source}")]
    Acquire {
        strategy: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A single-row insert failed.
    #[error("{strategy}: insert of row {row} failed: {source}")]
    Insert {
        strategy: &'static str,
        row: u64,
        #[source]
        source: sqlx::Error,
    },

    /// The transaction strategy failed at `stage`.
    #[error("Transaction {stage} failed: {source}")]
    Transaction {
        stage: TxStage,
        #[source]
        source: sqlx::Error,
    },
}

impl BenchError {
    /// Name of the strategy that raised this error, if any.
    pub fn strategy(&self) -> Option<&'static str> {
        match self {
            Self::Acquire { strategy, .. } | Self::Insert { strategy, .. } => Some(*strategy),
            Self::Transaction { .. } => Some(crate::strategy::Transactional::NAME),
            Self::Probe { .. } | Self::ProbeTimeout { .. } => None,
        }
    }

    /// True for errors raised before any strategy ran.
    pub fn is_provisioning(&self) -> bool {
        matches!(self, Self::Probe { .. } | Self::ProbeTimeout { .. })
    }
}

/// Result type alias for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BenchError::Insert {
            strategy: "Pool Exec",
            row: 3,
            source: sqlx::Error::Protocol("boom".into()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("Pool Exec: insert of row 3 failed: "));
        assert!(msg.ends_with("boom"));
        assert_eq!(err.strategy(), Some("Pool Exec"));
        assert!(!err.is_provisioning());
    }

    #[test]
    fn test_commit_distinct_from_exec() {
        let commit = BenchError::Transaction {
            stage: TxStage::Commit,
            source: sqlx::Error::PoolClosed,
        };
        let exec = BenchError::Transaction {
            stage: TxStage::Exec { row: 1 },
            source: sqlx::Error::PoolClosed,
        };
        assert!(commit.to_string().starts_with("Transaction commit failed"));
        assert!(exec.to_string().starts_with("Transaction insert of row 1 failed"));
        assert_eq!(commit.strategy(), Some("Transaction"));
    }

    #[test]
    fn test_timeout_display() {
        let err = BenchError::ProbeTimeout {
            target: "mysql://bench:***@db:3306/bench".into(),
            timeout: Duration::from_secs(10),
        };
        assert_eq!(
            err.to_string(),
            "Database ping timed out for mysql://bench:***@db:3306/bench after 10s"
        );
        assert!(err.is_provisioning());
        assert_eq!(err.strategy(), None);
    }
}
