//! Test fixtures for the data service.

use crate::DataService;

use alloy_primitives::B256;
use arbitrary::{Arbitrary, Unstructured};
use rand::Rng;
use rollup_core_primitives::{L1Block, L2Transaction, RollupTransaction};
use rollup_db::test_utils::setup_test_db;
use std::sync::Arc;

/// Returns a [`DataService`] backed by a fresh in-memory database.
pub(crate) async fn setup_test_service() -> DataService {
    DataService::new(Arc::new(setup_test_db().await))
}

/// Returns a random hash.
pub(crate) fn random_hash() -> B256 {
    B256::from(rand::random::<[u8; 32]>())
}

/// Returns random bytes to feed [`Unstructured`].
pub(crate) fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill(bytes.as_mut_slice());
    bytes
}

/// Returns an L1 block with the provided number.
pub(crate) fn l1_block(number: u64) -> L1Block {
    L1Block::new(random_hash(), random_hash(), number, 1_000 + number * 12)
}

/// Returns `count` random rollup transactions submitted in the provided L1 block.
pub(crate) fn rollup_transactions(count: usize, block: &L1Block) -> Vec<RollupTransaction> {
    let bytes = random_bytes(1024 * count.max(1));
    let mut u = Unstructured::new(&bytes);
    (0..count)
        .map(|_| RollupTransaction {
            l1_block_number: block.number,
            l1_timestamp: block.timestamp,
            ..RollupTransaction::arbitrary(&mut u).unwrap()
        })
        .collect()
}

/// Returns a random L2 transaction executed in a block with the provided timestamp.
pub(crate) fn l2_transaction(block_timestamp: u64) -> L2Transaction {
    let bytes = random_bytes(1024);
    let mut u = Unstructured::new(&bytes);
    L2Transaction {
        tx_hash: random_hash(),
        block_timestamp,
        ..L2Transaction::arbitrary(&mut u).unwrap()
    }
}
