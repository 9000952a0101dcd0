//! Recording of blocks, transactions and batches observed on L1.

use crate::{allocator::allocate_batch_number, DataService, DataServiceError};

use alloy_primitives::B256;
use rollup_core_primitives::{BatchSeries, L1Block, L1Transaction, RollupTransaction};
use rollup_db::{
    DatabaseReadOperations, DatabaseTransactionProvider, DatabaseWriteOperations, NewBatch,
};

impl DataService {
    /// Inserts an [`L1Block`] with the provided processed flag.
    ///
    /// Errors if a block with the same hash exists.
    pub async fn insert_l1_block(
        &self,
        block: L1Block,
        processed: bool,
    ) -> Result<(), DataServiceError> {
        let tx = self.db.tx_mut().await?;
        let res = tx.insert_l1_block(block, processed).await.map_err(Into::into);
        tx.finish(res).await
    }

    /// Inserts [`L1Transaction`]s with a single statement. An empty list is a no-op.
    pub async fn insert_l1_transactions(
        &self,
        txs: Vec<L1Transaction>,
    ) -> Result<(), DataServiceError> {
        if txs.is_empty() {
            return Ok(());
        }
        let tx = self.db.tx_mut().await?;
        let res = tx.insert_l1_transactions(txs).await.map_err(Into::into);
        tx.finish(res).await
    }

    /// Inserts an [`L1Block`] and its [`L1Transaction`]s atomically.
    pub async fn insert_l1_block_and_transactions(
        &self,
        block: L1Block,
        txs: Vec<L1Transaction>,
        processed: bool,
    ) -> Result<(), DataServiceError> {
        tracing::debug!(target: "rollup::data_service", block_hash = ?block.hash, block_number = block.number, tx_count = txs.len(), "Recording L1 block");
        let tx = self.db.tx_mut().await?;
        let res: Result<(), DataServiceError> = async {
            tx.insert_l1_block(block, processed).await?;
            tx.insert_l1_transactions(txs).await?;
            Ok(())
        }
        .await;

        tx.finish(res).await.inspect_err(|err| {
            tracing::error!(target: "rollup::data_service", block_hash = ?block.hash, block_number = block.number, ?err, "Failed to record L1 block");
        })
    }

    /// Records a batch of [`RollupTransaction`]s submitted in the L1 transaction `l1_tx_hash`.
    ///
    /// Allocates the next L1 rollup transaction batch number and stores every transaction with
    /// its position in `txs` as batch index. Returns `None` without touching the database if
    /// `txs` is empty.
    pub async fn insert_l1_rollup_transactions(
        &self,
        l1_tx_hash: B256,
        txs: Vec<RollupTransaction>,
    ) -> Result<Option<u64>, DataServiceError> {
        if txs.is_empty() {
            tracing::debug!(target: "rollup::data_service", ?l1_tx_hash, "No rollup transactions to record");
            return Ok(None);
        }

        let batch_size = txs.len();
        let tx = self.db.tx_mut().await?;
        let res: Result<u64, DataServiceError> = async {
            let batch_number =
                allocate_batch_number(&tx, NewBatch::L1RollupTx { l1_tx_hash }, &self.metrics)
                    .await?;
            tx.insert_l1_rollup_transactions(batch_number, txs).await.inspect_err(|err| {
                tracing::error!(target: "rollup::data_service", batch_number, ?l1_tx_hash, batch_size, ?err, "Failed to insert rollup transactions");
            })?;
            Ok(batch_number)
        }
        .await;

        let batch_number = tx.finish(res).await.inspect_err(|err| {
            tracing::error!(target: "rollup::data_service", ?l1_tx_hash, batch_size, ?err, "Failed to record rollup transaction batch");
        })?;
        self.metrics.record_batch_created(BatchSeries::L1RollupTx);
        tracing::debug!(target: "rollup::data_service", batch_number, ?l1_tx_hash, batch_size, "Recorded rollup transaction batch");

        Ok(Some(batch_number))
    }

    /// Records a batch of state roots submitted in the L1 transaction `l1_tx_hash`.
    ///
    /// Allocates the next L1 state root batch number and stores every root with its position in
    /// `roots` as batch index. Returns `None` without touching the database if `roots` is empty.
    pub async fn insert_l1_rollup_state_roots(
        &self,
        l1_tx_hash: B256,
        roots: Vec<B256>,
    ) -> Result<Option<u64>, DataServiceError> {
        if roots.is_empty() {
            tracing::debug!(target: "rollup::data_service", ?l1_tx_hash, "No state roots to record");
            return Ok(None);
        }

        let batch_size = roots.len();
        let tx = self.db.tx_mut().await?;
        let res: Result<u64, DataServiceError> = async {
            let batch_number =
                allocate_batch_number(&tx, NewBatch::L1StateRoot { l1_tx_hash }, &self.metrics)
                    .await?;
            tx.insert_l1_state_roots(batch_number, roots).await.inspect_err(|err| {
                tracing::error!(target: "rollup::data_service", batch_number, ?l1_tx_hash, batch_size, ?err, "Failed to insert state roots");
            })?;
            Ok(batch_number)
        }
        .await;

        let batch_number = tx.finish(res).await.inspect_err(|err| {
            tracing::error!(target: "rollup::data_service", ?l1_tx_hash, batch_size, ?err, "Failed to record state root batch");
        })?;
        self.metrics.record_batch_created(BatchSeries::L1StateRoot);
        tracing::debug!(target: "rollup::data_service", batch_number, ?l1_tx_hash, batch_size, "Recorded state root batch");

        Ok(Some(batch_number))
    }

    /// Marks the L1 block with the provided hash as processed. Marking a processed block again
    /// is a no-op.
    pub async fn update_block_to_processed(
        &self,
        block_hash: B256,
    ) -> Result<(), DataServiceError> {
        let tx = self.db.tx_mut().await?;
        let res = tx.set_l1_block_processed(block_hash).await;
        let updated = tx.finish(res).await?;
        if updated == 0 {
            tracing::debug!(target: "rollup::data_service", ?block_hash, "No L1 block to mark as processed");
        }
        Ok(())
    }

    /// Returns the [`L1Block`] with the provided hash and its processed flag.
    pub async fn get_l1_block(
        &self,
        block_hash: B256,
    ) -> Result<Option<(L1Block, bool)>, DataServiceError> {
        Ok(self.db.get_l1_block(block_hash).await?)
    }

    /// Returns true if the L1 block with the provided hash exists and is processed.
    pub async fn is_l1_block_processed(&self, block_hash: B256) -> Result<bool, DataServiceError> {
        Ok(self.db.is_l1_block_processed(block_hash).await?)
    }

    /// Returns the [`L1Transaction`] with the provided hash.
    pub async fn get_l1_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<L1Transaction>, DataServiceError> {
        Ok(self.db.get_l1_transaction(tx_hash).await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{
        l1_block, random_bytes, random_hash, rollup_transactions, setup_test_service,
    };

    use arbitrary::{Arbitrary, Unstructured};
    use futures::future::join_all;
    use rollup_core_primitives::{BatchSeries, L1Transaction};
    use rollup_db::DatabaseReadOperations;

    #[tokio::test]
    async fn test_concurrent_batch_allocation_is_contiguous() {
        let service = setup_test_service().await;
        let block = l1_block(1);

        let inserts = (0..8).map(|_| {
            let service = service.clone();
            let txs = rollup_transactions(2, &block);
            async move { service.insert_l1_rollup_transactions(random_hash(), txs).await }
        });
        let mut batch_numbers = join_all(inserts)
            .await
            .into_iter()
            .map(|res| res.unwrap().unwrap())
            .collect::<Vec<_>>();
        batch_numbers.sort_unstable();

        assert_eq!(batch_numbers, (1..=8).collect::<Vec<_>>());
        for batch_number in batch_numbers {
            let stored = service.db.get_l1_rollup_transactions(batch_number).await.unwrap();
            assert_eq!(stored.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_empty_rollup_transactions_allocate_nothing() {
        let service = setup_test_service().await;

        let batch = service.insert_l1_rollup_transactions(random_hash(), vec![]).await.unwrap();
        assert_eq!(batch, None);
        let batch = service.insert_l1_rollup_state_roots(random_hash(), vec![]).await.unwrap();
        assert_eq!(batch, None);
        assert_eq!(service.db.get_max_batch_number(BatchSeries::L1RollupTx).await.unwrap(), 0);
        assert_eq!(service.db.get_max_batch_number(BatchSeries::L1StateRoot).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rollup_batches_record_position_and_series() {
        let service = setup_test_service().await;
        let block = l1_block(3);

        let txs = rollup_transactions(3, &block);
        let first =
            service.insert_l1_rollup_transactions(random_hash(), txs.clone()).await.unwrap();
        let second = service
            .insert_l1_rollup_transactions(random_hash(), rollup_transactions(1, &block))
            .await
            .unwrap();
        let roots = service
            .insert_l1_rollup_state_roots(random_hash(), vec![random_hash(), random_hash()])
            .await
            .unwrap();

        // The state root series has its own counter.
        assert_eq!((first, second, roots), (Some(1), Some(2), Some(1)));

        let stored = service.db.get_l1_rollup_transactions(1).await.unwrap();
        let indexes = stored.iter().map(|tx| tx.batch_index).collect::<Vec<_>>();
        assert_eq!(indexes, vec![0, 1, 2]);
        assert_eq!(stored[2].calldata, txs[2].calldata);
        assert_eq!(service.db.get_l1_state_roots(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_l1_block_and_transactions_is_atomic() {
        let service = setup_test_service().await;

        let bytes = random_bytes(4096);
        let mut u = Unstructured::new(&bytes);
        let block = l1_block(10);
        let l1_tx = L1Transaction {
            hash: random_hash(),
            block_hash: block.hash,
            block_number: block.number,
            ..L1Transaction::arbitrary(&mut u).unwrap()
        };

        // A duplicate transaction hash fails the whole insert.
        let res = service
            .insert_l1_block_and_transactions(block, vec![l1_tx.clone(), l1_tx.clone()], false)
            .await;
        assert!(res.is_err());
        assert_eq!(service.get_l1_block(block.hash).await.unwrap(), None);
        assert_eq!(service.get_l1_transaction(l1_tx.hash).await.unwrap(), None);

        service.insert_l1_block_and_transactions(block, vec![l1_tx.clone()], false).await.unwrap();
        assert_eq!(service.get_l1_block(block.hash).await.unwrap(), Some((block, false)));
        assert_eq!(service.get_l1_transaction(l1_tx.hash).await.unwrap(), Some(l1_tx));

        // The block hash is unique.
        assert!(service.insert_l1_block(block, true).await.is_err());
    }

    #[tokio::test]
    async fn test_update_block_to_processed_is_idempotent() {
        let service = setup_test_service().await;
        let block = l1_block(4);

        service.insert_l1_block(block, false).await.unwrap();
        assert!(!service.is_l1_block_processed(block.hash).await.unwrap());

        service.update_block_to_processed(block.hash).await.unwrap();
        service.update_block_to_processed(block.hash).await.unwrap();
        assert!(service.is_l1_block_processed(block.hash).await.unwrap());

        // Unknown blocks are ignored.
        service.update_block_to_processed(random_hash()).await.unwrap();
    }
}
