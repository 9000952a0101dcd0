use crate::constants::{
    DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_BUSY_TIMEOUT_SECS, DEFAULT_DATABASE_URL,
    DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
};

/// The database arguments.
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct DatabaseArgs {
    /// The database URL.
    #[arg(long = "db.url", value_name = "DB_URL", default_value = DEFAULT_DATABASE_URL)]
    pub url: String,
    /// The maximum number of pooled connections.
    #[arg(
        long = "db.max-connections",
        value_name = "N",
        default_value_t = DEFAULT_MAX_CONNECTIONS
    )]
    pub max_connections: u32,
    /// The minimum number of pooled connections.
    #[arg(
        long = "db.min-connections",
        value_name = "N",
        default_value_t = DEFAULT_MIN_CONNECTIONS
    )]
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection.
    #[arg(
        long = "db.acquire-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_ACQUIRE_TIMEOUT_SECS
    )]
    pub acquire_timeout_secs: u64,
    /// Seconds `SQLite` waits on a locked database.
    #[arg(
        long = "db.busy-timeout",
        value_name = "SECONDS",
        default_value_t = DEFAULT_BUSY_TIMEOUT_SECS
    )]
    pub busy_timeout_secs: u64,
}

impl Default for DatabaseArgs {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_owned(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct CommandParser {
        #[command(flatten)]
        args: DatabaseArgs,
    }

    #[test]
    fn test_parse_database_args_defaults() {
        let parsed = CommandParser::try_parse_from(["rollup"]).unwrap();
        assert_eq!(parsed.args, DatabaseArgs::default());
    }

    #[test]
    fn test_parse_database_args() {
        let parsed = CommandParser::try_parse_from([
            "rollup",
            "--db.url",
            "sqlite::memory:",
            "--db.max-connections",
            "4",
            "--db.busy-timeout",
            "30",
        ])
        .unwrap();

        assert_eq!(parsed.args.url, "sqlite::memory:");
        assert_eq!(parsed.args.max_connections, 4);
        assert_eq!(parsed.args.min_connections, DEFAULT_MIN_CONNECTIONS);
        assert_eq!(parsed.args.busy_timeout_secs, 30);
    }
}
