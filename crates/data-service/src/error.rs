use rollup_core_primitives::BatchSeries;
use rollup_db::{DatabaseError, DbErr};

/// The error type for the rollup data service.
#[derive(Debug, thiserror::Error)]
pub enum DataServiceError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    /// Every batch number proposed for the series was taken by a concurrent writer.
    #[error("failed to allocate a {series} batch number after {attempts} attempts")]
    BatchAllocationExhausted {
        /// The batch series.
        series: BatchSeries,
        /// The number of attempts made.
        attempts: usize,
    },
    /// The unbatched L2 transactions cannot form the L2 batch matching an L1 batch.
    ///
    /// The oldest timestamp group holds fewer transactions than the L1 batch while newer groups
    /// exist, which leaves the L1 and L2 histories irreconcilable.
    #[error(
        "L2 transactions do not match L1 batch {l1_batch_number}: expected {expected}, found {found}"
    )]
    ReconciliationMismatch {
        /// The L1 batch number.
        l1_batch_number: u64,
        /// The number of transactions in the L1 batch.
        expected: u64,
        /// The number of unbatched L2 transactions at the oldest timestamp.
        found: u64,
    },
    /// An L1 batch without transactions was handed to the L2 batch builder.
    #[error("L1 batch {0} is empty")]
    EmptyL1Batch(u64),
    /// The state root batch was not found in the database.
    #[error("state root batch {0} not found in database")]
    StateRootBatchNotFound(u64),
    /// The batch verifier failed.
    #[error("verifier error: {0}")]
    Verifier(String),
}

impl From<DbErr> for DataServiceError {
    fn from(value: DbErr) -> Self {
        Self::Database(value.into())
    }
}
