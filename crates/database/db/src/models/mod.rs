use crate::DatabaseError;

/// This module contains the L1 block database model.
pub mod l1_block;

/// This module contains the L1 transaction database model.
pub mod l1_transaction;

/// This module contains the L1 rollup transaction batch database model.
pub mod l1_rollup_tx_batch;

/// This module contains the L1 rollup transaction database model.
pub mod l1_rollup_tx;

/// This module contains the L1 state root batch database model.
pub mod l1_state_root_batch;

/// This module contains the L1 state root database model.
pub mod l1_state_root;

/// This module contains the L2 transaction batch database model.
pub mod l2_tx_batch;

/// This module contains the L2 transaction database model.
pub mod l2_tx;

/// Converts `value` into the signed integer SQLite stores it as.
pub(crate) fn to_i64(field: &'static str, value: u64) -> Result<i64, DatabaseError> {
    value.try_into().map_err(|_| DatabaseError::ValueOutOfRange { field, value })
}
