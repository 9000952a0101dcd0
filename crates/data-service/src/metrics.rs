use metrics::{Counter, Histogram};
use metrics_derive::Metrics;
use rollup_core_primitives::BatchSeries;

/// The metrics for the [`super::DataService`].
#[derive(Metrics, Clone)]
#[metrics(scope = "data_service")]
pub(crate) struct DataServiceMetrics {
    /// The number of L1 rollup transaction batches created.
    pub l1_rollup_tx_batches_created: Counter,
    /// The number of L1 state root batches created.
    pub l1_state_root_batches_created: Counter,
    /// The number of L2 transaction batches created.
    pub l2_tx_batches_created: Counter,
    /// The number of attempts a batch number allocation took.
    pub batch_allocation_attempts: Histogram,
    /// The number of unrecoverable L1/L2 reconciliation mismatches.
    pub reconciliation_mismatches: Counter,
    /// The number of reconciling builds that allocated an unexpected batch number.
    pub batch_number_skews: Counter,
    /// The number of state root batches marked verified.
    pub batches_verified: Counter,
}

impl DataServiceMetrics {
    /// Records a committed batch of the provided series.
    pub(crate) fn record_batch_created(&self, series: BatchSeries) {
        match series {
            BatchSeries::L1RollupTx => self.l1_rollup_tx_batches_created.increment(1),
            BatchSeries::L1StateRoot => self.l1_state_root_batches_created.increment(1),
            BatchSeries::L2Tx => self.l2_tx_batches_created.increment(1),
        }
    }
}
