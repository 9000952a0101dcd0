use super::{
    args::DatabaseArgs,
    metrics::DatabaseMetrics,
    transaction::{DatabaseTransactionProvider, TXMut, TX},
    DatabaseConnectionProvider, DatabaseError, ReadConnectionProvider,
};

use sea_orm::{
    sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    ConnectionTrait, DatabaseConnection, SqlxSqliteConnector, TransactionTrait,
};
use std::{str::FromStr, sync::Arc, time::Duration};
use tokio::sync::Mutex;

/// A write that touches no rows. Issued first in every [`TXMut`] so `SQLite` takes the database
/// write lock before the transaction reads, as `BEGIN IMMEDIATE` would.
const ACQUIRE_WRITE_LOCK: &str = "DELETE FROM l1_block WHERE 0";

/// The [`Database`] struct is responsible for interacting with the database.
///
/// The [`Database`] type wraps a [`sea_orm::DatabaseConnection`] pool. Reads can be performed
/// directly on the [`Database`] through [`crate::DatabaseReadOperations`]. Writes are only
/// available on a [`TXMut`] obtained from [`DatabaseTransactionProvider::tx_mut`], which holds a
/// process wide write lock until it is committed, rolled back or dropped.
pub struct Database {
    /// The underlying database connection.
    connection: DatabaseConnection,
    /// A mutex to ensure that only one mutable transaction is active at a time.
    write_lock: Arc<Mutex<()>>,
    /// The database metrics.
    metrics: DatabaseMetrics,
}

impl Database {
    /// Creates a new [`Database`] instance associated with the provided database URL, using the
    /// default pool settings.
    pub async fn new(database_url: &str) -> Result<Self, DatabaseError> {
        let args = DatabaseArgs { url: database_url.to_owned(), ..Default::default() };
        Self::from_args(&args).await
    }

    /// Creates a new [`Database`] instance from the provided [`DatabaseArgs`].
    pub async fn from_args(args: &DatabaseArgs) -> Result<Self, DatabaseError> {
        Self::new_sqlite_with_pool_options(
            &args.url,
            args.max_connections,
            args.min_connections,
            args.acquire_timeout_secs,
            args.busy_timeout_secs,
        )
        .await
    }

    /// Creates a new [`Database`] instance with SQLite-specific optimizations and custom pool
    /// settings.
    pub async fn new_sqlite_with_pool_options(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        busy_timeout_secs: u64,
    ) -> Result<Self, DatabaseError> {
        tracing::info!(target: "rollup::db", database_url, max_connections, "Connecting to database.");
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(busy_timeout_secs))
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal);

        let sqlx_pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(sqlx_pool).into())
    }
}

impl core::fmt::Debug for Database {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Database").field("connection", &self.connection).finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl DatabaseTransactionProvider for Database {
    /// Creates a new [`TX`] which can be used for read-only operations.
    async fn tx(&self) -> Result<TX, DatabaseError> {
        Ok(TX::new(self.connection.begin().await?))
    }

    /// Creates a new [`TXMut`] which can be used for atomic read and write operations.
    async fn tx_mut(&self) -> Result<TXMut, DatabaseError> {
        let now = std::time::Instant::now();
        let guard = self.write_lock.clone().lock_owned().await;
        let tx = self.connection.begin().await?;
        tx.execute_unprepared(ACQUIRE_WRITE_LOCK).await?;
        let tx_mut = TXMut::new(tx, guard);
        let duration = now.elapsed().as_millis() as f64;
        self.metrics.write_lock_acquire_duration.record(duration);
        tracing::trace!(target: "rollup::db", duration_ms = duration, "Acquired write transaction");
        Ok(tx_mut)
    }
}

#[async_trait::async_trait]
impl DatabaseTransactionProvider for Arc<Database> {
    /// Creates a new [`TX`] which can be used for read-only operations.
    async fn tx(&self) -> Result<TX, DatabaseError> {
        self.as_ref().tx().await
    }

    /// Creates a new [`TXMut`] which can be used for atomic read and write operations.
    async fn tx_mut(&self) -> Result<TXMut, DatabaseError> {
        self.as_ref().tx_mut().await
    }
}

impl DatabaseConnectionProvider for Database {
    type Connection = DatabaseConnection;

    fn get_connection(&self) -> &Self::Connection {
        &self.connection
    }
}

impl ReadConnectionProvider for Database {}

impl From<DatabaseConnection> for Database {
    fn from(connection: DatabaseConnection) -> Self {
        Self {
            connection,
            write_lock: Arc::new(Mutex::new(())),
            metrics: DatabaseMetrics::default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        operations::{DatabaseReadOperations, DatabaseWriteOperations, NewBatch},
        test_utils::setup_test_db,
    };

    use alloy_primitives::B256;
    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;
    use rollup_core_primitives::{
        BatchSeries, L1Block, L1RollupTxBatchStatus, L1StateRootBatchStatus, L1Transaction,
        L2Transaction, L2TransactionStatus, RollupTransaction,
    };

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        rand::rng().fill(bytes.as_mut_slice());
        bytes
    }

    fn random_hash() -> B256 {
        B256::from(rand::random::<[u8; 32]>())
    }

    fn l2_transaction(u: &mut Unstructured<'_>, block_timestamp: u64) -> L2Transaction {
        let mut tx = L2Transaction::arbitrary(u).unwrap();
        tx.tx_hash = random_hash();
        tx.block_timestamp = block_timestamp;
        tx
    }

    #[tokio::test]
    async fn test_database_round_trip_l1_block() {
        // Set up the test database.
        let db = setup_test_db().await;

        // Generate unstructured bytes.
        let bytes = random_bytes(1024);
        let mut u = Unstructured::new(&bytes);

        // Round trip the L1 block through the database.
        let block = L1Block::arbitrary(&mut u).unwrap();
        let tx = db.tx_mut().await.unwrap();
        tx.insert_l1_block(block, false).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.get_l1_block(block.hash).await.unwrap(), Some((block, false)));
        assert!(!db.is_l1_block_processed(block.hash).await.unwrap());
        assert!(!db.is_l1_block_number_processed(block.number).await.unwrap());

        // Flip the processed flag twice, the second update is a no-op.
        let tx = db.tx_mut().await.unwrap();
        assert_eq!(tx.set_l1_block_processed(block.hash).await.unwrap(), 1);
        assert_eq!(tx.set_l1_block_processed(block.hash).await.unwrap(), 1);
        tx.commit().await.unwrap();

        assert!(db.is_l1_block_processed(block.hash).await.unwrap());
        assert!(db.is_l1_block_number_processed(block.number).await.unwrap());
    }

    #[tokio::test]
    async fn test_database_duplicate_l1_block_errors() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(1024);
        let mut u = Unstructured::new(&bytes);
        let block = L1Block::arbitrary(&mut u).unwrap();

        let tx = db.tx_mut().await.unwrap();
        tx.insert_l1_block(block, false).await.unwrap();
        assert!(tx.insert_l1_block(block, true).await.is_err());
    }

    #[tokio::test]
    async fn test_database_round_trip_l1_transactions() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(4096);
        let mut u = Unstructured::new(&bytes);
        let txs = (0..3)
            .map(|_| L1Transaction {
                hash: random_hash(),
                ..L1Transaction::arbitrary(&mut u).unwrap()
            })
            .collect::<Vec<_>>();

        let tx = db.tx_mut().await.unwrap();
        tx.insert_l1_transactions(vec![]).await.unwrap();
        tx.insert_l1_transactions(txs.clone()).await.unwrap();
        tx.commit().await.unwrap();

        for l1_tx in txs {
            assert_eq!(db.get_l1_transaction(l1_tx.hash).await.unwrap(), Some(l1_tx));
        }
    }

    #[tokio::test]
    async fn test_database_tx_rollback() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(1024);
        let mut u = Unstructured::new(&bytes);
        let block = L1Block::arbitrary(&mut u).unwrap();

        // Roll back explicitly.
        let tx = db.tx_mut().await.unwrap();
        tx.insert_l1_block(block, false).await.unwrap();
        tx.rollback().await.unwrap();
        assert_eq!(db.get_l1_block(block.hash).await.unwrap(), None);

        // Dropping an uncommitted transaction rolls it back.
        {
            let tx = db.tx_mut().await.unwrap();
            tx.insert_l1_block(block, false).await.unwrap();
        }
        assert_eq!(db.get_l1_block(block.hash).await.unwrap(), None);

        // Finishing with an error rolls back, finishing with a value commits.
        let tx = db.tx_mut().await.unwrap();
        tx.insert_l1_block(block, false).await.unwrap();
        let res: Result<(), DatabaseError> =
            tx.finish(Err(sea_orm::DbErr::Custom("failed".to_owned()).into())).await;
        assert!(res.is_err());
        assert_eq!(db.get_l1_block(block.hash).await.unwrap(), None);

        let tx = db.tx_mut().await.unwrap();
        let res = tx.insert_l1_block(block, false).await;
        tx.finish(res).await.unwrap();
        assert_eq!(db.get_l1_block(block.hash).await.unwrap(), Some((block, false)));
    }

    #[tokio::test]
    async fn test_database_batch_series_are_independent() {
        // Set up the test database.
        let db = setup_test_db().await;

        let l1_tx_hash = random_hash();
        let tx = db.tx_mut().await.unwrap();
        assert_eq!(tx.get_max_batch_number(BatchSeries::L1RollupTx).await.unwrap(), 0);
        assert!(tx.try_insert_batch(NewBatch::L1RollupTx { l1_tx_hash }, 1).await.unwrap());
        assert!(tx.try_insert_batch(NewBatch::L1RollupTx { l1_tx_hash }, 2).await.unwrap());
        assert!(tx.try_insert_batch(NewBatch::L1StateRoot { l1_tx_hash }, 1).await.unwrap());

        // A conflicting batch number is reported without an error.
        assert!(!tx.try_insert_batch(NewBatch::L1RollupTx { l1_tx_hash }, 2).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(db.get_max_batch_number(BatchSeries::L1RollupTx).await.unwrap(), 2);
        assert_eq!(db.get_max_batch_number(BatchSeries::L1StateRoot).await.unwrap(), 1);
        assert_eq!(db.get_max_batch_number(BatchSeries::L2Tx).await.unwrap(), 0);
        assert_eq!(
            db.get_l1_rollup_tx_batch_status(1).await.unwrap(),
            Some(L1RollupTxBatchStatus::Queued)
        );
        assert_eq!(
            db.get_l1_state_root_batch_status(1).await.unwrap(),
            Some(L1StateRootBatchStatus::Unverified)
        );
    }

    #[tokio::test]
    async fn test_database_rollup_transactions_ordered_by_position() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(4096);
        let mut u = Unstructured::new(&bytes);
        let txs = (0..3)
            .map(|i| {
                let mut tx = RollupTransaction::arbitrary(&mut u).unwrap();
                // The stored position is the list position, not the provided index.
                tx.batch_index = 10 - i;
                tx
            })
            .collect::<Vec<_>>();

        let tx = db.tx_mut().await.unwrap();
        tx.try_insert_batch(NewBatch::L1RollupTx { l1_tx_hash: random_hash() }, 1).await.unwrap();
        tx.insert_l1_rollup_transactions(1, txs.clone()).await.unwrap();
        tx.commit().await.unwrap();

        let stored = db.get_l1_rollup_transactions(1).await.unwrap();
        assert_eq!(stored.len(), 3);
        for (index, (stored, original)) in stored.into_iter().zip(txs).enumerate() {
            assert_eq!(stored.batch_index, index as u64);
            assert_eq!(stored, RollupTransaction { batch_index: index as u64, ..original });
        }

        assert_eq!(db.get_oldest_queued_l1_rollup_tx_batch_number().await.unwrap(), Some(1));
        let tx = db.tx_mut().await.unwrap();
        tx.set_l1_rollup_tx_batch_status(1, L1RollupTxBatchStatus::SubmittedToL2).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(db.get_oldest_queued_l1_rollup_tx_batch_number().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_database_oldest_unverified_l1_rollup_tx_batch() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(4096);
        let mut u = Unstructured::new(&bytes);
        let mut rollup_tx = || {
            let mut tx = RollupTransaction::arbitrary(&mut u).unwrap();
            tx.l1_timestamp = 1_000;
            tx
        };
        let first = vec![rollup_tx(), rollup_tx()];
        let second = vec![rollup_tx()];

        let tx = db.tx_mut().await.unwrap();
        for (batch_number, txs) in [(1, first), (2, second)] {
            let l1_tx_hash = random_hash();
            tx.try_insert_batch(NewBatch::L1RollupTx { l1_tx_hash }, batch_number).await.unwrap();
            tx.insert_l1_rollup_transactions(batch_number, txs).await.unwrap();
            tx.try_insert_batch(NewBatch::L1StateRoot { l1_tx_hash }, batch_number).await.unwrap();
        }
        tx.commit().await.unwrap();

        let record = db.get_oldest_unverified_l1_rollup_tx_batch().await.unwrap().unwrap();
        assert_eq!(record.batch_number, 1);
        assert_eq!(record.batch_size, 2);
        assert_eq!(record.block_timestamp, 1_000);

        // Verifying the first state root batch moves the record to the second batch.
        let tx = db.tx_mut().await.unwrap();
        let updated = tx
            .set_l1_state_root_batch_status(
                1,
                L1StateRootBatchStatus::Unverified,
                L1StateRootBatchStatus::Verified,
            )
            .await
            .unwrap();
        assert_eq!(updated, 1);
        tx.commit().await.unwrap();

        let record = db.get_oldest_unverified_l1_rollup_tx_batch().await.unwrap().unwrap();
        assert_eq!(record.batch_number, 2);
        assert_eq!(record.batch_size, 1);
        assert_eq!(db.get_oldest_unverified_state_root_batch_number().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_database_state_root_status_transition_requires_from_status() {
        // Set up the test database.
        let db = setup_test_db().await;

        let roots = vec![random_hash(), random_hash()];
        let tx = db.tx_mut().await.unwrap();
        tx.try_insert_batch(NewBatch::L1StateRoot { l1_tx_hash: random_hash() }, 1)
            .await
            .unwrap();
        tx.insert_l1_state_roots(1, roots.clone()).await.unwrap();
        let updated = tx
            .set_l1_state_root_batch_status(
                1,
                L1StateRootBatchStatus::Verified,
                L1StateRootBatchStatus::Unverified,
            )
            .await
            .unwrap();
        assert_eq!(updated, 0);
        tx.commit().await.unwrap();

        assert_eq!(db.get_l1_state_roots(1).await.unwrap(), roots);
        assert_eq!(
            db.get_l1_state_root_batch_status(1).await.unwrap(),
            Some(L1StateRootBatchStatus::Unverified)
        );
    }

    #[tokio::test]
    async fn test_database_batch_l2_transactions() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(8192);
        let mut u = Unstructured::new(&bytes);
        let txs = [l2_transaction(&mut u, 5), l2_transaction(&mut u, 5), l2_transaction(&mut u, 9)];

        let tx = db.tx_mut().await.unwrap();
        for l2_tx in &txs {
            tx.insert_l2_transaction(l2_tx.clone()).await.unwrap();
        }
        tx.commit().await.unwrap();

        assert_eq!(db.get_unbatched_l2_timestamps(2).await.unwrap(), vec![5, 9]);
        assert_eq!(
            db.get_unbatched_l2_tx_counts_by_timestamp(2).await.unwrap(),
            vec![(5, 2), (9, 1)]
        );

        let tx = db.tx_mut().await.unwrap();
        tx.try_insert_batch(NewBatch::L2Tx, 1).await.unwrap();
        assert_eq!(tx.batch_l2_transactions_at_timestamp(1, 5).await.unwrap(), 2);
        tx.commit().await.unwrap();

        let entry = db.get_l2_transaction(txs[1].tx_hash).await.unwrap().unwrap();
        assert_eq!(entry.transaction, txs[1]);
        assert_eq!(entry.status, L2TransactionStatus::Batched);
        assert_eq!((entry.batch_number, entry.batch_index), (Some(1), Some(1)));
        assert_eq!(
            db.get_l2_state_roots(1).await.unwrap(),
            vec![(0, txs[0].state_root), (1, txs[1].state_root)]
        );
        assert!(db.l2_tx_batch_exists(1).await.unwrap());

        // Only one unbatched transaction remains.
        let tx = db.tx_mut().await.unwrap();
        tx.try_insert_batch(NewBatch::L2Tx, 2).await.unwrap();
        assert_eq!(tx.batch_oldest_l2_transactions(2, 4).await.unwrap(), 1);
        tx.commit().await.unwrap();

        let entry = db.get_l2_transaction(txs[2].tx_hash).await.unwrap().unwrap();
        assert_eq!((entry.batch_number, entry.batch_index), (Some(2), Some(0)));
        assert!(db.get_unbatched_l2_timestamps(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_rejects_values_out_of_range() {
        // Set up the test database.
        let db = setup_test_db().await;

        let bytes = random_bytes(1024);
        let mut u = Unstructured::new(&bytes);
        let l2_tx = l2_transaction(&mut u, 5);

        // A timestamp above the signed range would sort before every other timestamp.
        let tx = db.tx_mut().await.unwrap();
        let err = tx
            .insert_l2_transaction(L2Transaction { block_timestamp: u64::MAX, ..l2_tx.clone() })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::ValueOutOfRange { field: "block timestamp", value: u64::MAX }
        ));
        let err = tx.try_insert_batch(NewBatch::L2Tx, u64::MAX).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ValueOutOfRange { field: "batch number", .. }));
        assert!(tx.batch_l2_transactions_at_timestamp(1, u64::MAX).await.is_err());

        tx.insert_l2_transaction(l2_tx.clone()).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.get_unbatched_l2_timestamps(2).await.unwrap(), vec![5]);
        assert_eq!(db.get_max_batch_number(BatchSeries::L2Tx).await.unwrap(), 0);
    }
}
