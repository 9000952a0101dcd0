//! Default values for the database connection pool.

/// The default database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://rollup.db?mode=rwc";

/// The default maximum number of pooled connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// The default minimum number of pooled connections.
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;

/// The default time in seconds to wait for a pooled connection.
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;

/// The default time in seconds `SQLite` waits on a locked database before failing.
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;
