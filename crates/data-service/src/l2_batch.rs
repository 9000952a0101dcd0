//! Building of L2 transaction batches.
//!
//! L2 transactions are batched by block timestamp in insertion order. A batch is either built
//! independently from the oldest timestamp group, or built to mirror an L1 rollup transaction
//! batch of known size and number.

use crate::{allocator::allocate_batch_number, DataService, DataServiceError};

use alloy_primitives::B256;
use rollup_core_primitives::{BatchSeries, L2Transaction, L2TransactionEntry};
use rollup_db::{
    DatabaseReadOperations, DatabaseTransactionProvider, DatabaseWriteOperations, NewBatch,
};

/// The outcome of an attempt to build an L2 batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchBuildOutcome {
    /// A batch with the provided number was built.
    Built(u64),
    /// Not enough unbatched transactions are available yet.
    NotReady,
    /// The L2 batch series already reached the requested batch number.
    UpToDate {
        /// The highest L2 batch number.
        max_l2_batch_number: u64,
    },
    /// The next L2 batch number differs from the requested one. Nothing was written.
    BatchNumberSkew {
        /// The batch number the allocator produced.
        allocated: u64,
        /// The batch number that was requested.
        expected: u64,
    },
}

impl BatchBuildOutcome {
    /// Returns the number of the built batch, if any.
    pub const fn batch_number(&self) -> Option<u64> {
        match self {
            Self::Built(batch_number) => Some(*batch_number),
            _ => None,
        }
    }
}

impl DataService {
    /// Inserts an executed, unbatched [`L2Transaction`].
    pub async fn insert_l2_transaction(
        &self,
        l2_tx: L2Transaction,
    ) -> Result<(), DataServiceError> {
        let tx = self.db.tx_mut().await?;
        let res = tx.insert_l2_transaction(l2_tx).await.map_err(Into::into);
        tx.finish(res).await
    }

    /// Returns the stored [`L2TransactionEntry`] for the provided transaction hash.
    pub async fn get_l2_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<L2TransactionEntry>, DataServiceError> {
        Ok(self.db.get_l2_transaction(tx_hash).await?)
    }

    /// Builds an L2 batch from every unbatched transaction with the oldest block timestamp.
    ///
    /// The oldest group is only closed once a newer timestamp has been observed, since more
    /// transactions for the newest timestamp may still arrive.
    pub async fn try_build_l2_only_batch(&self) -> Result<BatchBuildOutcome, DataServiceError> {
        let timestamps = self.db.get_unbatched_l2_timestamps(2).await?;
        let &[oldest_timestamp, _, ..] = timestamps.as_slice() else {
            tracing::trace!(target: "rollup::data_service", timestamps = timestamps.len(), "Not enough L2 timestamps to build a batch");
            return Ok(BatchBuildOutcome::NotReady);
        };

        let tx = self.db.tx_mut().await?;
        let res: Result<Option<(u64, u64)>, DataServiceError> = async {
            let batch_number = allocate_batch_number(&tx, NewBatch::L2Tx, &self.metrics).await?;
            let batched =
                tx.batch_l2_transactions_at_timestamp(batch_number, oldest_timestamp).await?;
            Ok((batched > 0).then_some((batch_number, batched)))
        }
        .await;

        match res {
            Ok(Some((batch_number, batched))) => {
                tx.commit().await?;
                self.metrics.record_batch_created(BatchSeries::L2Tx);
                tracing::debug!(target: "rollup::data_service", batch_number, batched, block_timestamp = oldest_timestamp, "Built L2 batch");
                Ok(BatchBuildOutcome::Built(batch_number))
            }
            Ok(None) => {
                // A concurrent builder batched the group first.
                tx.rollback().await?;
                Ok(BatchBuildOutcome::NotReady)
            }
            Err(err) => {
                tracing::error!(target: "rollup::data_service", block_timestamp = oldest_timestamp, ?err, "Failed to build L2 batch");
                tx.finish(Err(err)).await
            }
        }
    }

    /// Builds the L2 batch mirroring the L1 rollup transaction batch `l1_batch_number` of
    /// `l1_batch_size` transactions.
    ///
    /// Errors with [`DataServiceError::ReconciliationMismatch`] if the oldest timestamp group
    /// holds fewer transactions than the L1 batch while newer groups exist. That state cannot be
    /// recovered from and is never retried. An `l1_batch_size` of zero is rejected with
    /// [`DataServiceError::EmptyL1Batch`], L1 batches always hold at least one transaction.
    pub async fn try_build_l2_batch_to_match_l1(
        &self,
        l1_batch_size: u64,
        l1_batch_number: u64,
    ) -> Result<BatchBuildOutcome, DataServiceError> {
        if l1_batch_size == 0 {
            tracing::error!(target: "rollup::data_service", l1_batch_number, "Cannot match an empty L1 batch");
            return Err(DataServiceError::EmptyL1Batch(l1_batch_number));
        }

        let max_l2_batch_number = self.db.get_max_batch_number(BatchSeries::L2Tx).await?;
        if max_l2_batch_number >= l1_batch_number {
            tracing::trace!(target: "rollup::data_service", l1_batch_number, max_l2_batch_number, "L2 batches up to date");
            return Ok(BatchBuildOutcome::UpToDate { max_l2_batch_number });
        }

        let groups = self.db.get_unbatched_l2_tx_counts_by_timestamp(2).await?;
        let Some(&(oldest_timestamp, oldest_count)) = groups.first() else {
            return Ok(BatchBuildOutcome::NotReady);
        };
        if oldest_count < l1_batch_size {
            if groups.len() > 1 {
                self.metrics.reconciliation_mismatches.increment(1);
                tracing::error!(
                    target: "rollup::data_service",
                    l1_batch_number,
                    l1_batch_size,
                    oldest_count,
                    block_timestamp = oldest_timestamp,
                    "L2 transactions cannot match L1 batch"
                );
                return Err(DataServiceError::ReconciliationMismatch {
                    l1_batch_number,
                    expected: l1_batch_size,
                    found: oldest_count,
                });
            }
            tracing::trace!(target: "rollup::data_service", l1_batch_number, l1_batch_size, oldest_count, "Waiting for more L2 transactions");
            return Ok(BatchBuildOutcome::NotReady);
        }

        let tx = self.db.tx_mut().await?;
        let res: Result<BatchBuildOutcome, DataServiceError> = async {
            let allocated = allocate_batch_number(&tx, NewBatch::L2Tx, &self.metrics).await?;
            if allocated != l1_batch_number {
                return Ok(BatchBuildOutcome::BatchNumberSkew {
                    allocated,
                    expected: l1_batch_number,
                });
            }
            let batched = tx.batch_oldest_l2_transactions(allocated, l1_batch_size).await?;
            if batched < l1_batch_size {
                return Ok(BatchBuildOutcome::NotReady);
            }
            Ok(BatchBuildOutcome::Built(allocated))
        }
        .await;

        match res {
            Ok(outcome @ BatchBuildOutcome::Built(batch_number)) => {
                tx.commit().await?;
                self.metrics.record_batch_created(BatchSeries::L2Tx);
                tracing::debug!(target: "rollup::data_service", batch_number, l1_batch_size, "Built L2 batch matching L1 batch");
                Ok(outcome)
            }
            Ok(outcome) => {
                tx.rollback().await?;
                if let BatchBuildOutcome::BatchNumberSkew { allocated, expected } = outcome {
                    self.metrics.batch_number_skews.increment(1);
                    tracing::warn!(target: "rollup::data_service", allocated, expected, "L2 batch number skewed from L1 batch number");
                }
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(target: "rollup::data_service", l1_batch_number, l1_batch_size, ?err, "Failed to build L2 batch matching L1 batch");
                tx.finish(Err(err)).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{l2_transaction, setup_test_service};

    use rollup_core_primitives::L2TransactionStatus;

    async fn insert_l2_transactions(service: &DataService, timestamps: &[u64]) -> Vec<B256> {
        let mut hashes = Vec::with_capacity(timestamps.len());
        for &timestamp in timestamps {
            let l2_tx = l2_transaction(timestamp);
            hashes.push(l2_tx.tx_hash);
            service.insert_l2_transaction(l2_tx).await.unwrap();
        }
        hashes
    }

    async fn batch_of(service: &DataService, tx_hash: B256) -> (Option<u64>, Option<u64>) {
        let entry = service.get_l2_transaction(tx_hash).await.unwrap().unwrap();
        (entry.batch_number, entry.batch_index)
    }

    #[tokio::test]
    async fn test_l2_only_batch_closes_oldest_timestamp() {
        let service = setup_test_service().await;
        let hashes = insert_l2_transactions(&service, &[100, 100, 200]).await;

        let outcome = service.try_build_l2_only_batch().await.unwrap();
        assert_eq!(outcome, BatchBuildOutcome::Built(1));
        assert_eq!(batch_of(&service, hashes[0]).await, (Some(1), Some(0)));
        assert_eq!(batch_of(&service, hashes[1]).await, (Some(1), Some(1)));

        // The newest timestamp group stays open.
        let outcome = service.try_build_l2_only_batch().await.unwrap();
        assert_eq!(outcome, BatchBuildOutcome::NotReady);
        let entry = service.get_l2_transaction(hashes[2]).await.unwrap().unwrap();
        assert_eq!(entry.status, L2TransactionStatus::Unbatched);
        assert_eq!(entry.batch_number, None);
    }

    #[tokio::test]
    async fn test_l2_only_batch_without_transactions() {
        let service = setup_test_service().await;
        let outcome = service.try_build_l2_only_batch().await.unwrap();
        assert_eq!(outcome, BatchBuildOutcome::NotReady);
    }

    #[tokio::test]
    async fn test_match_l1_batch() {
        let service = setup_test_service().await;
        let hashes = insert_l2_transactions(&service, &[100, 100, 100]).await;

        let outcome = service.try_build_l2_batch_to_match_l1(3, 1).await.unwrap();
        assert_eq!(outcome, BatchBuildOutcome::Built(1));
        assert_eq!(outcome.batch_number(), Some(1));
        for (index, hash) in hashes.into_iter().enumerate() {
            let entry = service.get_l2_transaction(hash).await.unwrap().unwrap();
            assert_eq!(entry.status, L2TransactionStatus::Batched);
            assert_eq!((entry.batch_number, entry.batch_index), (Some(1), Some(index as u64)));
        }

        // The L2 series already holds batch 1.
        assert_eq!(
            service.try_build_l2_batch_to_match_l1(3, 1).await.unwrap(),
            BatchBuildOutcome::UpToDate { max_l2_batch_number: 1 }
        );
    }

    #[tokio::test]
    async fn test_match_l1_batch_mismatch() {
        let service = setup_test_service().await;
        let hashes = insert_l2_transactions(&service, &[100, 100, 200]).await;

        let err = service.try_build_l2_batch_to_match_l1(5, 1).await.unwrap_err();
        assert!(matches!(
            err,
            DataServiceError::ReconciliationMismatch { l1_batch_number: 1, expected: 5, found: 2 }
        ));

        // Nothing was batched.
        for hash in hashes {
            assert_eq!(batch_of(&service, hash).await, (None, None));
        }
        assert_eq!(service.db.get_max_batch_number(BatchSeries::L2Tx).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_match_l1_batch_waits_for_transactions() {
        let service = setup_test_service().await;
        assert_eq!(
            service.try_build_l2_batch_to_match_l1(2, 1).await.unwrap(),
            BatchBuildOutcome::NotReady
        );

        insert_l2_transactions(&service, &[100]).await;
        assert_eq!(
            service.try_build_l2_batch_to_match_l1(2, 1).await.unwrap(),
            BatchBuildOutcome::NotReady
        );

        insert_l2_transactions(&service, &[100]).await;
        assert_eq!(
            service.try_build_l2_batch_to_match_l1(2, 1).await.unwrap(),
            BatchBuildOutcome::Built(1)
        );
    }

    #[tokio::test]
    async fn test_match_l1_batch_number_skew_rolls_back() {
        let service = setup_test_service().await;
        let hashes = insert_l2_transactions(&service, &[100, 100]).await;

        // The next L2 batch number is 1, the L1 batch is 2.
        assert_eq!(
            service.try_build_l2_batch_to_match_l1(2, 2).await.unwrap(),
            BatchBuildOutcome::BatchNumberSkew { allocated: 1, expected: 2 }
        );
        assert_eq!(service.db.get_max_batch_number(BatchSeries::L2Tx).await.unwrap(), 0);
        for hash in hashes {
            assert_eq!(batch_of(&service, hash).await, (None, None));
        }
    }

    #[tokio::test]
    async fn test_match_empty_l1_batch_errors() {
        let service = setup_test_service().await;
        let hashes = insert_l2_transactions(&service, &[100, 200]).await;

        let err = service.try_build_l2_batch_to_match_l1(0, 1).await.unwrap_err();
        assert!(matches!(err, DataServiceError::EmptyL1Batch(1)));

        // No batch was allocated.
        assert_eq!(service.db.get_max_batch_number(BatchSeries::L2Tx).await.unwrap(), 0);
        for hash in hashes {
            assert_eq!(batch_of(&service, hash).await, (None, None));
        }
    }
}
