use super::{
    DatabaseConnectionProvider, DatabaseError, ReadConnectionProvider, WriteConnectionProvider,
};
use tokio::sync::OwnedMutexGuard;

/// A type that represents a read-only database transaction.
///
/// This type is used to perform consistent multi-statement reads.
#[derive(Debug)]
pub struct TX {
    /// The underlying database transaction.
    tx: sea_orm::DatabaseTransaction,
}

impl TX {
    /// Creates a new [`TX`] instance associated with the provided [`sea_orm::DatabaseTransaction`].
    pub const fn new(tx: sea_orm::DatabaseTransaction) -> Self {
        Self { tx }
    }
}

impl DatabaseConnectionProvider for TX {
    type Connection = sea_orm::DatabaseTransaction;

    fn get_connection(&self) -> &Self::Connection {
        &self.tx
    }
}

impl ReadConnectionProvider for TX {}

/// A type that represents a mutable database transaction.
///
/// This type is used to perform atomic read and write operations on the database. Dropping a
/// [`TXMut`] without committing it rolls the transaction back and releases the write lock.
#[derive(Debug)]
pub struct TXMut {
    /// The underlying database transaction.
    tx: sea_orm::DatabaseTransaction,
    /// A guard for the database write lock.
    _guard: OwnedMutexGuard<()>,
}

impl TXMut {
    /// Creates a new [`TXMut`] instance associated with the provided
    /// [`sea_orm::DatabaseTransaction`] and mutex guard.
    pub const fn new(tx: sea_orm::DatabaseTransaction, guard: OwnedMutexGuard<()>) -> Self {
        Self { tx, _guard: guard }
    }

    /// Commits the transaction.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup::db", "Committing transaction");
        self.tx.commit().await?;
        Ok(())
    }

    /// Rolls back the transaction.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        tracing::trace!(target: "rollup::db", "Rolling back transaction");
        self.tx.rollback().await?;
        Ok(())
    }

    /// Commits the transaction if `res` is [`Ok`] and rolls it back otherwise, returning `res`.
    ///
    /// A failure to commit is returned in place of the result.
    pub async fn finish<T, E>(self, res: Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        match res {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.rollback().await {
                    tracing::warn!(target: "rollup::db", ?rollback_err, "Failed to roll back transaction");
                }
                Err(err)
            }
        }
    }
}

impl DatabaseConnectionProvider for TXMut {
    type Connection = sea_orm::DatabaseTransaction;

    fn get_connection(&self) -> &Self::Connection {
        &self.tx
    }
}

impl ReadConnectionProvider for TXMut {}
impl WriteConnectionProvider for TXMut {}

/// A trait for types that can provide database transactions.
#[async_trait::async_trait]
pub trait DatabaseTransactionProvider {
    /// Begins a new read-only transaction.
    async fn tx(&self) -> Result<TX, DatabaseError>;

    /// Begins a new read-write transaction.
    ///
    /// Waits until no other read-write transaction is active.
    async fn tx_mut(&self) -> Result<TXMut, DatabaseError>;
}
