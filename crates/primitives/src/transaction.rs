use crate::UnknownVariant;
use alloy_primitives::{Address, BlockNumber, Bytes, B256};

/// A raw L1 transaction included in an L1 block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct L1Transaction {
    /// The transaction hash.
    pub hash: B256,
    /// The hash of the block the transaction was included in.
    pub block_hash: B256,
    /// The number of the block the transaction was included in.
    pub block_number: BlockNumber,
    /// The index of the transaction in the block.
    pub transaction_index: u64,
    /// The sender of the transaction.
    pub from: Address,
    /// The recipient of the transaction, `None` for contract creations.
    pub to: Option<Address>,
    /// The sender nonce.
    pub nonce: u64,
    /// The gas limit.
    pub gas_limit: u64,
    /// The gas price.
    pub gas_price: u128,
    /// The transaction input.
    pub input: Bytes,
}

/// Describes how a rollup transaction entered the rollup queue.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum QueueOrigin {
    /// Forced through the safety queue on L1.
    #[display("safety_queue")]
    SafetyQueue = 0,
    /// Submitted by the sequencer.
    #[default]
    #[display("sequencer")]
    Sequencer = 1,
    /// Enqueued through the L1 to L2 message queue.
    #[display("l1_to_l2_queue")]
    L1ToL2Queue = 2,
}

impl From<QueueOrigin> for u8 {
    fn from(value: QueueOrigin) -> Self {
        value as Self
    }
}

impl TryFrom<u8> for QueueOrigin {
    type Error = UnknownVariant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::SafetyQueue),
            1 => Ok(Self::Sequencer),
            2 => Ok(Self::L1ToL2Queue),
            x => Err(UnknownVariant { kind: "queue origin", value: x.to_string() }),
        }
    }
}

/// A rollup transaction extracted from an L1 transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RollupTransaction {
    /// The position of the transaction within its batch.
    pub batch_index: u64,
    /// The target of the transaction.
    pub target: Address,
    /// The transaction calldata.
    pub calldata: Bytes,
    /// The timestamp of the L1 block the transaction was submitted in.
    pub l1_timestamp: u64,
    /// The number of the L1 block the transaction was submitted in.
    pub l1_block_number: BlockNumber,
    /// The hash of the L1 transaction that carried this rollup transaction.
    pub l1_tx_hash: B256,
    /// How the transaction entered the rollup queue.
    pub queue_origin: QueueOrigin,
    /// The sender, if known.
    pub sender: Option<Address>,
    /// The L1 message sender for L1 to L2 messages.
    pub l1_message_sender: Option<Address>,
    /// The gas limit.
    pub gas_limit: Option<u64>,
    /// The sender nonce.
    pub nonce: Option<u64>,
    /// The raw signature, if the transaction is signed.
    pub signature: Option<Bytes>,
}

/// The batching status of an [`L2Transaction`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum L2TransactionStatus {
    /// The transaction is not part of a batch yet.
    #[default]
    #[display("UNBATCHED")]
    Unbatched,
    /// The transaction has been assigned to a batch.
    #[display("BATCHED")]
    Batched,
}

impl L2TransactionStatus {
    /// Returns the str representation of the [`L2TransactionStatus`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unbatched => "UNBATCHED",
            Self::Batched => "BATCHED",
        }
    }
}

impl core::str::FromStr for L2TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNBATCHED" => Ok(Self::Unbatched),
            "BATCHED" => Ok(Self::Batched),
            x => Err(UnknownVariant { kind: "l2 transaction status", value: x.to_owned() }),
        }
    }
}

/// A transaction executed by the L2 node together with the state root it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct L2Transaction {
    /// The transaction hash.
    pub tx_hash: B256,
    /// The number of the L2 block the transaction was executed in.
    pub block_number: BlockNumber,
    /// The timestamp of the L2 block the transaction was executed in.
    pub block_timestamp: u64,
    /// The state root after executing the transaction.
    pub state_root: B256,
    /// The target of the transaction.
    pub target: Address,
    /// The transaction calldata.
    pub calldata: Bytes,
    /// The sender, if known.
    pub sender: Option<Address>,
    /// The gas limit.
    pub gas_limit: Option<u64>,
    /// The sender nonce.
    pub nonce: Option<u64>,
    /// The raw signature, if the transaction is signed.
    pub signature: Option<Bytes>,
}

/// A stored [`L2Transaction`] with its batching state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2TransactionEntry {
    /// The transaction.
    pub transaction: L2Transaction,
    /// The batching status.
    pub status: L2TransactionStatus,
    /// The batch the transaction belongs to, once batched.
    pub batch_number: Option<u64>,
    /// The position of the transaction within its batch, once batched.
    pub batch_index: Option<u64>,
}

#[cfg(feature = "arbitrary")]
mod arbitrary_impl {
    use super::*;

    // Stored integers are drawn from the `u32` range so they fit the signed database columns.
    fn small_u64(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<u64> {
        Ok(u.arbitrary::<u32>()? as u64)
    }

    fn small_u64_opt(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Option<u64>> {
        Ok(u.arbitrary::<Option<u32>>()?.map(u64::from))
    }

    impl arbitrary::Arbitrary<'_> for L1Transaction {
        fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
            Ok(Self {
                hash: u.arbitrary()?,
                block_hash: u.arbitrary()?,
                block_number: small_u64(u)?,
                transaction_index: small_u64(u)?,
                from: u.arbitrary()?,
                to: u.arbitrary()?,
                nonce: small_u64(u)?,
                gas_limit: small_u64(u)?,
                gas_price: u.arbitrary()?,
                input: u.arbitrary()?,
            })
        }
    }

    impl arbitrary::Arbitrary<'_> for RollupTransaction {
        fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
            Ok(Self {
                batch_index: small_u64(u)?,
                target: u.arbitrary()?,
                calldata: u.arbitrary()?,
                l1_timestamp: small_u64(u)?,
                l1_block_number: small_u64(u)?,
                l1_tx_hash: u.arbitrary()?,
                queue_origin: u.arbitrary()?,
                sender: u.arbitrary()?,
                l1_message_sender: u.arbitrary()?,
                gas_limit: small_u64_opt(u)?,
                nonce: small_u64_opt(u)?,
                signature: u.arbitrary()?,
            })
        }
    }

    impl arbitrary::Arbitrary<'_> for L2Transaction {
        fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
            Ok(Self {
                tx_hash: u.arbitrary()?,
                block_number: small_u64(u)?,
                block_timestamp: small_u64(u)?,
                state_root: u.arbitrary()?,
                target: u.arbitrary()?,
                calldata: u.arbitrary()?,
                sender: u.arbitrary()?,
                gas_limit: small_u64_opt(u)?,
                nonce: small_u64_opt(u)?,
                signature: u.arbitrary()?,
            })
        }
    }
}
