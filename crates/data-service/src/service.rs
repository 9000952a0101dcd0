use crate::metrics::DataServiceMetrics;

use rollup_db::Database;
use std::sync::Arc;

/// The rollup data service.
///
/// Owns the batch lifecycle of the rollup: it records data observed on L1, builds L2 batches,
/// matches state roots for verification and tracks the submission of L1 batches to L2. Every
/// multi-step write runs in a single [`rollup_db::TXMut`] which is committed only after all of
/// its writes succeed.
#[derive(Clone)]
pub struct DataService {
    /// The database.
    pub(crate) db: Arc<Database>,
    /// The data service metrics.
    pub(crate) metrics: DataServiceMetrics,
}

impl DataService {
    /// Returns a new instance of [`DataService`] backed by the provided database.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db, metrics: DataServiceMetrics::default() }
    }

    /// Returns a reference to the underlying database.
    pub const fn database(&self) -> &Arc<Database> {
        &self.db
    }
}

impl core::fmt::Debug for DataService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataService").field("db", &self.db).finish_non_exhaustive()
    }
}
