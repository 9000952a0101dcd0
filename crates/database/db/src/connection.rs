/// The [`DatabaseConnectionProvider`] trait provides a way to get a connection to the database.
/// This is implemented by the [`crate::Database`], [`crate::TX`] and [`crate::TXMut`] types.
#[auto_impl::auto_impl(Arc)]
pub trait DatabaseConnectionProvider {
    /// The connection type that implements the `ConnectionTrait` and `StreamTrait` traits.
    type Connection: sea_orm::ConnectionTrait + sea_orm::StreamTrait;

    /// Returns a reference to the database connection.
    fn get_connection(&self) -> &Self::Connection;
}

/// A marker trait for connection providers that can perform read operations.
#[auto_impl::auto_impl(Arc)]
pub trait ReadConnectionProvider: DatabaseConnectionProvider {}

/// A marker trait for connection providers that can perform write operations.
///
/// Only [`crate::TXMut`] implements this trait, every write goes through a transaction that holds
/// the database write lock.
#[auto_impl::auto_impl(Arc)]
pub trait WriteConnectionProvider: ReadConnectionProvider {}
