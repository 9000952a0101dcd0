//! The rollup data service.
//!
//! Sequences and reconciles the batches of an optimistic rollup on top of the rollup database:
//! batch number allocation, recording of L1 data, L2 batch building, state root verification
//! candidates and tracking of batches submitted to L2.

mod allocator;

pub mod constants;

mod error;
pub use error::DataServiceError;

mod ingestion;

mod l2_batch;
pub use l2_batch::BatchBuildOutcome;

mod metrics;

mod service;
pub use service::DataService;

mod submission;

mod verification;
pub use verification::{BatchVerifier, VerificationVerdict};

#[cfg(test)]
mod test_utils;
