use crate::{RollupTransaction, UnknownVariant};
use alloy_primitives::BlockNumber;

/// The independent batch number series.
///
/// Batch numbers are unique and contiguous from 1 within a series, the series do not share a
/// counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BatchSeries {
    /// Batches of rollup transactions submitted to L1.
    #[display("l1_rollup_tx")]
    L1RollupTx,
    /// Batches of state roots submitted to L1.
    #[display("l1_state_root")]
    L1StateRoot,
    /// Batches of transactions executed on L2.
    #[display("l2_tx")]
    L2Tx,
}

/// The submission status of an L1 rollup transaction batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L1RollupTxBatchStatus {
    /// The batch has been recorded but not submitted to L2.
    #[default]
    #[display("QUEUED")]
    Queued,
    /// The batch has been submitted to L2.
    #[display("SUBMITTED_TO_L2")]
    SubmittedToL2,
}

impl L1RollupTxBatchStatus {
    /// Returns the str representation of the [`L1RollupTxBatchStatus`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::SubmittedToL2 => "SUBMITTED_TO_L2",
        }
    }
}

impl core::str::FromStr for L1RollupTxBatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "QUEUED" => Ok(Self::Queued),
            "SUBMITTED_TO_L2" => Ok(Self::SubmittedToL2),
            x => Err(UnknownVariant { kind: "l1 rollup tx batch status", value: x.to_owned() }),
        }
    }
}

/// The verification status of an L1 state root batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L1StateRootBatchStatus {
    /// The batch has not been verified against L2.
    #[default]
    #[display("UNVERIFIED")]
    Unverified,
    /// The batch has been verified against L2.
    #[display("VERIFIED")]
    Verified,
}

impl L1StateRootBatchStatus {
    /// Returns the str representation of the [`L1StateRootBatchStatus`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "UNVERIFIED",
            Self::Verified => "VERIFIED",
        }
    }
}

impl core::str::FromStr for L1StateRootBatchStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNVERIFIED" => Ok(Self::Unverified),
            "VERIFIED" => Ok(Self::Verified),
            x => Err(UnknownVariant { kind: "l1 state root batch status", value: x.to_owned() }),
        }
    }
}

/// Size, number and timestamp of an L1 rollup transaction batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct L1BatchRecord {
    /// The number of transactions in the batch.
    pub batch_size: u64,
    /// The batch number.
    pub batch_number: u64,
    /// The timestamp of the L1 block the batch was submitted in.
    pub block_timestamp: u64,
}

/// An L1 rollup transaction batch ready to be submitted to L2.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BlockBatches {
    /// The batch number.
    pub batch_number: u64,
    /// The timestamp of the L1 block the batch was submitted in.
    pub timestamp: u64,
    /// The number of the L1 block the batch was submitted in.
    pub block_number: BlockNumber,
    /// The batches of rollup transactions, ordered by batch index.
    pub batches: Vec<Vec<RollupTransaction>>,
}

impl BlockBatches {
    /// Returns the total number of transactions across all batches.
    pub fn transaction_count(&self) -> usize {
        self.batches.iter().map(Vec::len).sum()
    }
}
