use alloy_primitives::B256;

/// The L1 and L2 state roots recorded at the same position of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct StateRootPair {
    /// The state root recorded on L1.
    pub l1_root: B256,
    /// The state root produced on L2, `None` if L2 has not produced it yet.
    pub l2_root: Option<B256>,
}

impl StateRootPair {
    /// Returns true if the L2 root is available.
    pub const fn is_ready(&self) -> bool {
        self.l2_root.is_some()
    }
}

/// The L1 state roots of a batch paired with the L2 state roots at the same positions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct VerificationCandidate {
    /// The L1 state root batch number.
    pub l1_batch_number: u64,
    /// The matching L2 batch number, `None` if L2 has not built the batch yet.
    pub l2_batch_number: Option<u64>,
    /// The state root pairs ordered by batch index.
    pub roots: Vec<StateRootPair>,
}

impl VerificationCandidate {
    /// Returns true if every L1 root has an L2 counterpart.
    pub fn is_ready(&self) -> bool {
        self.l2_batch_number.is_some() && self.roots.iter().all(StateRootPair::is_ready)
    }
}
