//! Constants of the rollup data service.

/// The maximum number of read-propose-insert cycles spent allocating a batch number.
pub const BATCH_ALLOCATION_MAX_ATTEMPTS: usize = 3;
