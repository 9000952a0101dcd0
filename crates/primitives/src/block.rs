use alloy_primitives::{BlockNumber, B256};

/// An L1 block as observed by the chain listener.
///
/// The `processed` flag of a block is owned by the storage layer and is not part of this type: a
/// block is ingested unprocessed and flipped once all rollup data it carries has been extracted.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct L1Block {
    /// The block hash.
    pub hash: B256,
    /// The parent block hash.
    pub parent_hash: B256,
    /// The block number.
    pub number: BlockNumber,
    /// The block timestamp.
    pub timestamp: u64,
}

impl L1Block {
    /// Returns a new instance of [`L1Block`].
    pub const fn new(hash: B256, parent_hash: B256, number: BlockNumber, timestamp: u64) -> Self {
        Self { hash, parent_hash, number, timestamp }
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for L1Block {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        Ok(Self {
            hash: u.arbitrary()?,
            parent_hash: u.arbitrary()?,
            number: u.arbitrary::<u32>()? as u64,
            timestamp: u.arbitrary::<u32>()? as u64,
        })
    }
}
