//! Test utilities for the database crate.

use super::{Database, DatabaseConnectionProvider};
use rollup_migration::{Migrator, MigratorTrait};

/// Instantiates a new in-memory database and runs the migrations
/// to set up the schema.
pub async fn setup_test_db() -> Database {
    let database_url = "sqlite::memory:";
    let connection = sea_orm::Database::connect(database_url).await.unwrap();
    Migrator::up(&connection, None).await.unwrap();

    connection.into()
}

/// Opens the database at `database_url` and runs the migrations. Every call returns a
/// [`Database`] with its own connection pool and write lock.
pub async fn setup_test_db_at(database_url: &str) -> Database {
    let db = Database::new(database_url).await.unwrap();
    Migrator::up(db.get_connection(), None).await.unwrap();
    db
}
