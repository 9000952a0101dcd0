//! Primitive types for the rollup batch sequencing and reconciliation core.

pub use batch::{
    BatchSeries, BlockBatches, L1BatchRecord, L1RollupTxBatchStatus, L1StateRootBatchStatus,
};
mod batch;

pub use block::L1Block;
mod block;

pub use transaction::{
    L1Transaction, L2Transaction, L2TransactionEntry, L2TransactionStatus, QueueOrigin,
    RollupTransaction,
};
mod transaction;

pub use verification::{StateRootPair, VerificationCandidate};
mod verification;

/// An error returned when a stored status or tag cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// The kind of value that failed to decode.
    pub kind: &'static str,
    /// The raw value.
    pub value: String,
}

impl core::error::Error for UnknownVariant {}
