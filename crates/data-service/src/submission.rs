//! Tracking of L1 rollup transaction batches submitted to L2.

use crate::{DataService, DataServiceError};

use rollup_core_primitives::{BlockBatches, L1RollupTxBatchStatus};
use rollup_db::{DatabaseReadOperations, DatabaseTransactionProvider, DatabaseWriteOperations};

impl DataService {
    /// Marks the L1 rollup transaction batch as submitted to L2. Marking a submitted batch again
    /// is a no-op.
    pub async fn mark_l1_batch_submitted_to_l2(
        &self,
        batch_number: u64,
    ) -> Result<(), DataServiceError> {
        let tx = self.db.tx_mut().await?;
        let res = tx
            .set_l1_rollup_tx_batch_status(batch_number, L1RollupTxBatchStatus::SubmittedToL2)
            .await;
        let updated = tx.finish(res).await?;
        tracing::debug!(target: "rollup::data_service", batch_number, updated, "Marked L1 batch as submitted to L2");
        Ok(())
    }

    /// Returns the lowest queued L1 rollup transaction batch if the L1 block it was submitted in
    /// has been processed.
    ///
    /// Batches are handed out strictly in order: while the lowest queued batch is not ready, no
    /// later batch is returned.
    pub async fn get_next_batch_for_l2_submission(
        &self,
    ) -> Result<Option<BlockBatches>, DataServiceError> {
        let tx = self.db.tx().await?;
        let Some(batch_number) = tx.get_oldest_queued_l1_rollup_tx_batch_number().await? else {
            return Ok(None);
        };

        let txs = tx.get_l1_rollup_transactions(batch_number).await?;
        let Some((block_number, timestamp)) =
            txs.first().map(|first| (first.l1_block_number, first.l1_timestamp))
        else {
            tracing::warn!(target: "rollup::data_service", batch_number, "Queued L1 batch has no transactions");
            return Ok(None);
        };

        if !tx.is_l1_block_number_processed(block_number).await? {
            tracing::trace!(target: "rollup::data_service", batch_number, block_number, "L1 block of next batch not processed");
            return Ok(None);
        }

        Ok(Some(BlockBatches { batch_number, timestamp, block_number, batches: vec![txs] }))
    }
}
