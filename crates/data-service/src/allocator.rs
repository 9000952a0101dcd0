//! Optimistic batch number allocation.
//!
//! A batch number is proposed as the highest number of the series plus one and claimed by
//! inserting the batch row under that primary key. An insert that conflicts means a concurrent
//! writer claimed the number first, in which case the cycle starts over.

use crate::{
    constants::BATCH_ALLOCATION_MAX_ATTEMPTS, metrics::DataServiceMetrics, DataServiceError,
};

use rollup_db::{DatabaseError, DatabaseWriteOperations, NewBatch};
use std::future::Future;

/// Allocates the next batch number for the series of `batch` and inserts the batch row.
///
/// Must run inside an open write transaction, which the caller rolls back if an error is
/// returned.
pub(crate) async fn allocate_batch_number<T: DatabaseWriteOperations>(
    tx: &T,
    batch: NewBatch,
    metrics: &DataServiceMetrics,
) -> Result<u64, DataServiceError> {
    let series = batch.series();
    let allocation = retry_on_conflict(BATCH_ALLOCATION_MAX_ATTEMPTS, move || async move {
        let batch_number = tx.get_max_batch_number(series).await? + 1;
        let inserted = tx.try_insert_batch(batch, batch_number).await?;
        Ok::<_, DatabaseError>(inserted.then_some(batch_number))
    })
    .await?;

    match allocation {
        Some((batch_number, attempts)) => {
            metrics.batch_allocation_attempts.record(attempts as f64);
            tracing::trace!(target: "rollup::data_service", %series, batch_number, attempts, "Allocated batch number");
            Ok(batch_number)
        }
        None => {
            metrics.batch_allocation_attempts.record(BATCH_ALLOCATION_MAX_ATTEMPTS as f64);
            tracing::error!(target: "rollup::data_service", %series, attempts = BATCH_ALLOCATION_MAX_ATTEMPTS, "Failed to allocate batch number");
            Err(DataServiceError::BatchAllocationExhausted {
                series,
                attempts: BATCH_ALLOCATION_MAX_ATTEMPTS,
            })
        }
    }
}

/// Runs `attempt` until it yields a value, at most `max_attempts` times.
///
/// An attempt returning `Ok(None)` lost a race and is retried. Returns the value together with
/// the number of attempts it took, or `None` once the attempts are exhausted. Errors abort
/// immediately.
async fn retry_on_conflict<F, Fut, T, E>(
    max_attempts: usize,
    mut attempt: F,
) -> Result<Option<(T, usize)>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    for attempts in 1..=max_attempts {
        if let Some(value) = attempt().await? {
            return Ok(Some((value, attempts)));
        }
        tracing::debug!(target: "rollup::data_service", attempts, max_attempts, "Batch number conflict, retrying allocation");
    }
    Ok(None)
}
