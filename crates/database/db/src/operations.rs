use super::{models, DatabaseError, ReadConnectionProvider, WriteConnectionProvider};

use alloy_primitives::B256;
use rollup_core_primitives::{
    BatchSeries, L1BatchRecord, L1Block, L1RollupTxBatchStatus, L1StateRootBatchStatus,
    L1Transaction, L2Transaction, L2TransactionEntry, L2TransactionStatus, RollupTransaction,
};
use sea_orm::{
    sea_query::{Expr, OnConflict, Query},
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

/// A new batch row for one of the [`BatchSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewBatch {
    /// An L1 rollup transaction batch submitted in the provided L1 transaction.
    L1RollupTx {
        /// The hash of the L1 transaction that carried the batch.
        l1_tx_hash: B256,
    },
    /// An L1 state root batch submitted in the provided L1 transaction.
    L1StateRoot {
        /// The hash of the L1 transaction that carried the batch.
        l1_tx_hash: B256,
    },
    /// An L2 transaction batch.
    L2Tx,
}

impl NewBatch {
    /// Returns the [`BatchSeries`] the batch belongs to.
    pub const fn series(&self) -> BatchSeries {
        match self {
            Self::L1RollupTx { .. } => BatchSeries::L1RollupTx,
            Self::L1StateRoot { .. } => BatchSeries::L1StateRoot,
            Self::L2Tx => BatchSeries::L2Tx,
        }
    }
}

/// The [`DatabaseReadOperations`] trait provides read methods for interacting with the database.
#[async_trait::async_trait]
pub trait DatabaseReadOperations: ReadConnectionProvider + Sync {
    /// Get the highest batch number of the provided [`BatchSeries`], 0 if the series is empty.
    async fn get_max_batch_number(&self, series: BatchSeries) -> Result<u64, DatabaseError> {
        let conn = self.get_connection();
        let max = match series {
            BatchSeries::L1RollupTx => {
                models::l1_rollup_tx_batch::Entity::find()
                    .select_only()
                    .column_as(
                        models::l1_rollup_tx_batch::Column::BatchNumber.max(),
                        "max_batch_number",
                    )
                    .into_tuple::<Option<i64>>()
                    .one(conn)
                    .await?
            }
            BatchSeries::L1StateRoot => {
                models::l1_state_root_batch::Entity::find()
                    .select_only()
                    .column_as(
                        models::l1_state_root_batch::Column::BatchNumber.max(),
                        "max_batch_number",
                    )
                    .into_tuple::<Option<i64>>()
                    .one(conn)
                    .await?
            }
            BatchSeries::L2Tx => {
                models::l2_tx_batch::Entity::find()
                    .select_only()
                    .column_as(
                        models::l2_tx_batch::Column::BatchNumber.max(),
                        "max_batch_number",
                    )
                    .into_tuple::<Option<i64>>()
                    .one(conn)
                    .await?
            }
        };
        Ok(max.flatten().map(|n| n as u64).unwrap_or_default())
    }

    /// Get an [`L1Block`] and its processed flag by block hash.
    async fn get_l1_block(
        &self,
        block_hash: B256,
    ) -> Result<Option<(L1Block, bool)>, DatabaseError> {
        Ok(models::l1_block::Entity::find_by_id(block_hash.to_vec())
            .one(self.get_connection())
            .await?
            .map(|block| {
                let processed = block.processed;
                (block.into(), processed)
            }))
    }

    /// Returns true if the L1 block with the provided hash exists and is processed.
    async fn is_l1_block_processed(&self, block_hash: B256) -> Result<bool, DatabaseError> {
        Ok(self.get_l1_block(block_hash).await?.is_some_and(|(_, processed)| processed))
    }

    /// Returns true if a processed L1 block with the provided number exists.
    async fn is_l1_block_number_processed(&self, block_number: u64) -> Result<bool, DatabaseError> {
        let count = models::l1_block::Entity::find()
            .filter(models::l1_block::Column::BlockNumber.eq(block_number as i64))
            .filter(models::l1_block::Column::Processed.eq(true))
            .count(self.get_connection())
            .await?;
        Ok(count > 0)
    }

    /// Get an [`L1Transaction`] by hash.
    async fn get_l1_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<L1Transaction>, DatabaseError> {
        Ok(models::l1_transaction::Entity::find_by_id(tx_hash.to_vec())
            .one(self.get_connection())
            .await?
            .map(Into::into))
    }

    /// Get the status of the L1 rollup transaction batch with the provided number.
    async fn get_l1_rollup_tx_batch_status(
        &self,
        batch_number: u64,
    ) -> Result<Option<L1RollupTxBatchStatus>, DatabaseError> {
        Ok(models::l1_rollup_tx_batch::Entity::find_by_id(batch_number as i64)
            .one(self.get_connection())
            .await?
            .map(|batch| batch.status()))
    }

    /// Get the [`RollupTransaction`]s of a batch, ordered by batch index.
    async fn get_l1_rollup_transactions(
        &self,
        batch_number: u64,
    ) -> Result<Vec<RollupTransaction>, DatabaseError> {
        Ok(models::l1_rollup_tx::Entity::find()
            .filter(models::l1_rollup_tx::Column::BatchNumber.eq(batch_number as i64))
            .order_by_asc(models::l1_rollup_tx::Column::BatchIndex)
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Get the number of the lowest `QUEUED` L1 rollup transaction batch.
    async fn get_oldest_queued_l1_rollup_tx_batch_number(
        &self,
    ) -> Result<Option<u64>, DatabaseError> {
        Ok(models::l1_rollup_tx_batch::Entity::find()
            .filter(
                models::l1_rollup_tx_batch::Column::Status
                    .eq(L1RollupTxBatchStatus::Queued.as_str()),
            )
            .order_by_asc(models::l1_rollup_tx_batch::Column::BatchNumber)
            .select_only()
            .column(models::l1_rollup_tx_batch::Column::BatchNumber)
            .into_tuple::<i64>()
            .one(self.get_connection())
            .await?
            .map(|n| n as u64))
    }

    /// Get the [`L1BatchRecord`] of the lowest L1 rollup transaction batch whose state root
    /// batch is not verified.
    async fn get_oldest_unverified_l1_rollup_tx_batch(
        &self,
    ) -> Result<Option<L1BatchRecord>, DatabaseError> {
        let verified = Query::select()
            .column(models::l1_state_root_batch::Column::BatchNumber)
            .from(models::l1_state_root_batch::Entity)
            .and_where(
                models::l1_state_root_batch::Column::Status
                    .eq(L1StateRootBatchStatus::Verified.as_str()),
            )
            .to_owned();

        let Some(batch_number) = models::l1_rollup_tx_batch::Entity::find()
            .filter(models::l1_rollup_tx_batch::Column::BatchNumber.not_in_subquery(verified))
            .order_by_asc(models::l1_rollup_tx_batch::Column::BatchNumber)
            .select_only()
            .column(models::l1_rollup_tx_batch::Column::BatchNumber)
            .into_tuple::<i64>()
            .one(self.get_connection())
            .await?
        else {
            return Ok(None);
        };

        let (batch_size, block_timestamp) = models::l1_rollup_tx::Entity::find()
            .filter(models::l1_rollup_tx::Column::BatchNumber.eq(batch_number))
            .select_only()
            .column_as(models::l1_rollup_tx::Column::BatchIndex.count(), "batch_size")
            .column_as(models::l1_rollup_tx::Column::L1Timestamp.min(), "block_timestamp")
            .into_tuple::<(i64, Option<i64>)>()
            .one(self.get_connection())
            .await?
            .unwrap_or_default();

        Ok(Some(L1BatchRecord {
            batch_size: batch_size as u64,
            batch_number: batch_number as u64,
            block_timestamp: block_timestamp.unwrap_or_default() as u64,
        }))
    }

    /// Get the status of the L1 state root batch with the provided number.
    async fn get_l1_state_root_batch_status(
        &self,
        batch_number: u64,
    ) -> Result<Option<L1StateRootBatchStatus>, DatabaseError> {
        Ok(models::l1_state_root_batch::Entity::find_by_id(batch_number as i64)
            .one(self.get_connection())
            .await?
            .map(|batch| batch.status()))
    }

    /// Get the number of the lowest `UNVERIFIED` L1 state root batch.
    async fn get_oldest_unverified_state_root_batch_number(
        &self,
    ) -> Result<Option<u64>, DatabaseError> {
        Ok(models::l1_state_root_batch::Entity::find()
            .filter(
                models::l1_state_root_batch::Column::Status
                    .eq(L1StateRootBatchStatus::Unverified.as_str()),
            )
            .order_by_asc(models::l1_state_root_batch::Column::BatchNumber)
            .select_only()
            .column(models::l1_state_root_batch::Column::BatchNumber)
            .into_tuple::<i64>()
            .one(self.get_connection())
            .await?
            .map(|n| n as u64))
    }

    /// Get the L1 state roots of a batch, ordered by batch index.
    async fn get_l1_state_roots(&self, batch_number: u64) -> Result<Vec<B256>, DatabaseError> {
        Ok(models::l1_state_root::Entity::find()
            .filter(models::l1_state_root::Column::BatchNumber.eq(batch_number as i64))
            .order_by_asc(models::l1_state_root::Column::BatchIndex)
            .select_only()
            .column(models::l1_state_root::Column::StateRoot)
            .into_tuple::<Vec<u8>>()
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(|root| B256::from_slice(&root))
            .collect())
    }

    /// Get the `(batch_index, state_root)` pairs of the L2 transactions in a batch, ordered by
    /// batch index.
    async fn get_l2_state_roots(
        &self,
        batch_number: u64,
    ) -> Result<Vec<(u64, B256)>, DatabaseError> {
        Ok(models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::BatchNumber.eq(batch_number as i64))
            .order_by_asc(models::l2_tx::Column::BatchIndex)
            .select_only()
            .column(models::l2_tx::Column::BatchIndex)
            .column(models::l2_tx::Column::StateRoot)
            .into_tuple::<(Option<i64>, Vec<u8>)>()
            .all(self.get_connection())
            .await?
            .into_iter()
            .filter_map(|(index, root)| Some((index? as u64, B256::from_slice(&root))))
            .collect())
    }

    /// Returns true if the L2 transaction batch with the provided number exists.
    async fn l2_tx_batch_exists(&self, batch_number: u64) -> Result<bool, DatabaseError> {
        Ok(models::l2_tx_batch::Entity::find_by_id(batch_number as i64)
            .one(self.get_connection())
            .await?
            .is_some())
    }

    /// Get an [`L2TransactionEntry`] by transaction hash.
    async fn get_l2_transaction(
        &self,
        tx_hash: B256,
    ) -> Result<Option<L2TransactionEntry>, DatabaseError> {
        Ok(models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::TxHash.eq(tx_hash.to_vec()))
            .one(self.get_connection())
            .await?
            .map(Into::into))
    }

    /// Get the distinct block timestamps of unbatched L2 transactions, ascending.
    async fn get_unbatched_l2_timestamps(&self, limit: u64) -> Result<Vec<u64>, DatabaseError> {
        Ok(models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::Status.eq(L2TransactionStatus::Unbatched.as_str()))
            .select_only()
            .column(models::l2_tx::Column::BlockTimestamp)
            .distinct()
            .order_by_asc(models::l2_tx::Column::BlockTimestamp)
            .limit(limit)
            .into_tuple::<i64>()
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(|ts| ts as u64)
            .collect())
    }

    /// Get the number of unbatched L2 transactions per block timestamp, ascending by timestamp.
    async fn get_unbatched_l2_tx_counts_by_timestamp(
        &self,
        limit: u64,
    ) -> Result<Vec<(u64, u64)>, DatabaseError> {
        Ok(models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::Status.eq(L2TransactionStatus::Unbatched.as_str()))
            .select_only()
            .column(models::l2_tx::Column::BlockTimestamp)
            .column_as(models::l2_tx::Column::Id.count(), "tx_count")
            .group_by(models::l2_tx::Column::BlockTimestamp)
            .order_by_asc(models::l2_tx::Column::BlockTimestamp)
            .limit(limit)
            .into_tuple::<(i64, i64)>()
            .all(self.get_connection())
            .await?
            .into_iter()
            .map(|(ts, count)| (ts as u64, count as u64))
            .collect())
    }
}

impl<T> DatabaseReadOperations for T where T: ReadConnectionProvider + Sync {}

/// The [`DatabaseWriteOperations`] trait provides write methods for interacting with the
/// database.
#[async_trait::async_trait]
pub trait DatabaseWriteOperations: WriteConnectionProvider + DatabaseReadOperations + Sync {
    /// Insert an [`L1Block`] into the database.
    async fn insert_l1_block(&self, block: L1Block, processed: bool) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup::db", block_hash = ?block.hash, block_number = block.number, processed, "Inserting L1 block into database.");
        let block: models::l1_block::ActiveModel = (block, processed).try_into()?;
        models::l1_block::Entity::insert(block)
            .exec_without_returning(self.get_connection())
            .await?;
        Ok(())
    }

    /// Insert [`L1Transaction`]s into the database with a single statement.
    async fn insert_l1_transactions(&self, txs: Vec<L1Transaction>) -> Result<(), DatabaseError> {
        if txs.is_empty() {
            return Ok(());
        }
        tracing::trace!(target: "rollup::db", count = txs.len(), "Inserting L1 transactions into database.");
        let txs = txs
            .into_iter()
            .map(models::l1_transaction::ActiveModel::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        models::l1_transaction::Entity::insert_many(txs)
            .exec_without_returning(self.get_connection())
            .await?;
        Ok(())
    }

    /// Mark the L1 block with the provided hash as processed, returning the number of updated
    /// rows.
    async fn set_l1_block_processed(&self, block_hash: B256) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "rollup::db", ?block_hash, "Marking L1 block as processed.");
        Ok(models::l1_block::Entity::update_many()
            .col_expr(models::l1_block::Column::Processed, Expr::value(true))
            .filter(models::l1_block::Column::BlockHash.eq(block_hash.to_vec()))
            .exec(self.get_connection())
            .await?
            .rows_affected)
    }

    /// Insert the row of a [`NewBatch`] keyed by the provided batch number.
    ///
    /// Returns false if a batch with the same number already exists in the series.
    async fn try_insert_batch(
        &self,
        batch: NewBatch,
        batch_number: u64,
    ) -> Result<bool, DatabaseError> {
        tracing::trace!(target: "rollup::db", series = %batch.series(), batch_number, "Inserting batch into database.");
        let conn = self.get_connection();
        let inserted = match batch {
            NewBatch::L1RollupTx { l1_tx_hash } => {
                let model: models::l1_rollup_tx_batch::ActiveModel =
                    (batch_number, l1_tx_hash).try_into()?;
                models::l1_rollup_tx_batch::Entity::insert(model)
                    .on_conflict(
                        OnConflict::column(models::l1_rollup_tx_batch::Column::BatchNumber)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(conn)
                    .await?
            }
            NewBatch::L1StateRoot { l1_tx_hash } => {
                let model: models::l1_state_root_batch::ActiveModel =
                    (batch_number, l1_tx_hash).try_into()?;
                models::l1_state_root_batch::Entity::insert(model)
                    .on_conflict(
                        OnConflict::column(models::l1_state_root_batch::Column::BatchNumber)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(conn)
                    .await?
            }
            NewBatch::L2Tx => {
                let model: models::l2_tx_batch::ActiveModel = batch_number.try_into()?;
                models::l2_tx_batch::Entity::insert(model)
                    .on_conflict(
                        OnConflict::column(models::l2_tx_batch::Column::BatchNumber)
                            .do_nothing()
                            .to_owned(),
                    )
                    .exec_without_returning(conn)
                    .await?
            }
        };
        Ok(inserted > 0)
    }

    /// Insert the [`RollupTransaction`]s of a batch, assigning each its position in `txs` as
    /// batch index.
    async fn insert_l1_rollup_transactions(
        &self,
        batch_number: u64,
        txs: Vec<RollupTransaction>,
    ) -> Result<(), DatabaseError> {
        if txs.is_empty() {
            return Ok(());
        }
        tracing::trace!(target: "rollup::db", batch_number, count = txs.len(), "Inserting L1 rollup transactions into database.");
        let txs = txs
            .into_iter()
            .enumerate()
            .map(|(index, mut tx)| {
                tx.batch_index = index as u64;
                models::l1_rollup_tx::ActiveModel::try_from((batch_number, tx))
            })
            .collect::<Result<Vec<_>, _>>()?;
        models::l1_rollup_tx::Entity::insert_many(txs)
            .exec_without_returning(self.get_connection())
            .await?;
        Ok(())
    }

    /// Set the status of an L1 rollup transaction batch, returning the number of updated rows.
    async fn set_l1_rollup_tx_batch_status(
        &self,
        batch_number: u64,
        status: L1RollupTxBatchStatus,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "rollup::db", batch_number, %status, "Updating L1 rollup transaction batch status.");
        Ok(models::l1_rollup_tx_batch::Entity::update_many()
            .col_expr(models::l1_rollup_tx_batch::Column::Status, Expr::value(status.as_str()))
            .filter(models::l1_rollup_tx_batch::Column::BatchNumber.eq(batch_number as i64))
            .exec(self.get_connection())
            .await?
            .rows_affected)
    }

    /// Insert the state roots of a batch, assigning each its position in `roots` as batch index.
    async fn insert_l1_state_roots(
        &self,
        batch_number: u64,
        roots: Vec<B256>,
    ) -> Result<(), DatabaseError> {
        if roots.is_empty() {
            return Ok(());
        }
        tracing::trace!(target: "rollup::db", batch_number, count = roots.len(), "Inserting L1 state roots into database.");
        let roots = roots
            .into_iter()
            .enumerate()
            .map(|(index, root)| {
                models::l1_state_root::ActiveModel::try_from((batch_number, index as u64, root))
            })
            .collect::<Result<Vec<_>, _>>()?;
        models::l1_state_root::Entity::insert_many(roots)
            .exec_without_returning(self.get_connection())
            .await?;
        Ok(())
    }

    /// Move an L1 state root batch from the `from` status to the `to` status, returning the
    /// number of updated rows.
    async fn set_l1_state_root_batch_status(
        &self,
        batch_number: u64,
        from: L1StateRootBatchStatus,
        to: L1StateRootBatchStatus,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "rollup::db", batch_number, %from, %to, "Updating L1 state root batch status.");
        Ok(models::l1_state_root_batch::Entity::update_many()
            .col_expr(models::l1_state_root_batch::Column::Status, Expr::value(to.as_str()))
            .filter(models::l1_state_root_batch::Column::BatchNumber.eq(batch_number as i64))
            .filter(models::l1_state_root_batch::Column::Status.eq(from.as_str()))
            .exec(self.get_connection())
            .await?
            .rows_affected)
    }

    /// Insert an unbatched [`L2Transaction`] into the database.
    async fn insert_l2_transaction(&self, tx: L2Transaction) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup::db", tx_hash = ?tx.tx_hash, block_number = tx.block_number, "Inserting L2 transaction into database.");
        let tx: models::l2_tx::ActiveModel = tx.try_into()?;
        models::l2_tx::Entity::insert(tx).exec_without_returning(self.get_connection()).await?;
        Ok(())
    }

    /// Assign every unbatched L2 transaction with the provided block timestamp to a batch, in
    /// insertion order. Returns the number of batched transactions.
    async fn batch_l2_transactions_at_timestamp(
        &self,
        batch_number: u64,
        block_timestamp: u64,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "rollup::db", batch_number, block_timestamp, "Batching L2 transactions at timestamp.");
        let block_timestamp = models::to_i64("block timestamp", block_timestamp)?;
        let ids = models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::Status.eq(L2TransactionStatus::Unbatched.as_str()))
            .filter(models::l2_tx::Column::BlockTimestamp.eq(block_timestamp))
            .order_by_asc(models::l2_tx::Column::Id)
            .select_only()
            .column(models::l2_tx::Column::Id)
            .into_tuple::<i64>()
            .all(self.get_connection())
            .await?;
        mark_l2_transactions_batched(self.get_connection(), batch_number, ids).await
    }

    /// Assign up to `count` of the oldest unbatched L2 transactions to a batch, in insertion
    /// order. Returns the number of batched transactions.
    async fn batch_oldest_l2_transactions(
        &self,
        batch_number: u64,
        count: u64,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "rollup::db", batch_number, count, "Batching oldest L2 transactions.");
        let ids = models::l2_tx::Entity::find()
            .filter(models::l2_tx::Column::Status.eq(L2TransactionStatus::Unbatched.as_str()))
            .order_by_asc(models::l2_tx::Column::Id)
            .limit(count)
            .select_only()
            .column(models::l2_tx::Column::Id)
            .into_tuple::<i64>()
            .all(self.get_connection())
            .await?;
        mark_l2_transactions_batched(self.get_connection(), batch_number, ids).await
    }
}

impl<T> DatabaseWriteOperations for T where T: WriteConnectionProvider + Sync {}

/// Moves the L2 transactions with the provided ids from unbatched to batched, using their
/// position in `ids` as batch index.
async fn mark_l2_transactions_batched<C: ConnectionTrait>(
    conn: &C,
    batch_number: u64,
    ids: Vec<i64>,
) -> Result<u64, DatabaseError> {
    let batch_number = models::to_i64("batch number", batch_number)?;
    let mut batched = 0;
    for (index, id) in ids.into_iter().enumerate() {
        batched += models::l2_tx::Entity::update_many()
            .col_expr(
                models::l2_tx::Column::Status,
                Expr::value(L2TransactionStatus::Batched.as_str()),
            )
            .col_expr(models::l2_tx::Column::BatchNumber, Expr::value(batch_number))
            .col_expr(models::l2_tx::Column::BatchIndex, Expr::value(index as i64))
            .filter(models::l2_tx::Column::Id.eq(id))
            .filter(models::l2_tx::Column::Status.eq(L2TransactionStatus::Unbatched.as_str()))
            .exec(conn)
            .await?
            .rows_affected;
    }
    Ok(batched)
}
