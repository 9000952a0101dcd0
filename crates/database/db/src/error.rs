/// The error type for database operations.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// A database error occurred.
    #[error("database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),
    /// An error occurred at the sqlx level while setting up the connection pool.
    #[error("sqlx error: {0}")]
    SqlxError(#[from] sea_orm::sqlx::Error),
    /// An unsigned value does not fit the signed integer column it is stored in.
    #[error("{field} out of range: {value}")]
    ValueOutOfRange {
        /// The field being stored.
        field: &'static str,
        /// The rejected value.
        value: u64,
    },
}
