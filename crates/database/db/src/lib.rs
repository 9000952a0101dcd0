//! A library responsible for interacting with the rollup database.

mod args;
pub use args::DatabaseArgs;

pub mod constants;

mod connection;
pub use connection::{DatabaseConnectionProvider, ReadConnectionProvider, WriteConnectionProvider};

mod db;
pub use db::Database;

mod error;
pub use error::DatabaseError;

mod metrics;

mod models;
pub use models::*;

mod operations;
pub use operations::{DatabaseReadOperations, DatabaseWriteOperations, NewBatch};

mod transaction;
pub use transaction::{DatabaseTransactionProvider, TXMut, TX};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use sea_orm::DbErr;
