//! Matching of L1 state roots with the L2 state roots of the same batch.

use crate::{DataService, DataServiceError};

use rollup_core_primitives::{
    L1BatchRecord, L1StateRootBatchStatus, StateRootPair, VerificationCandidate,
};
use rollup_db::{DatabaseReadOperations, DatabaseTransactionProvider, DatabaseWriteOperations};
use std::collections::HashMap;

/// The verdict of a [`BatchVerifier`] on a [`VerificationCandidate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationVerdict {
    /// The L1 state roots are confirmed by L2.
    Verified,
    /// The candidate could not be confirmed, the batch stays unverified.
    Undecided,
}

/// A policy deciding whether the L1 state roots of a batch are confirmed by L2.
#[async_trait::async_trait]
pub trait BatchVerifier: Send + Sync {
    /// Returns the verdict for the provided candidate.
    async fn verify(
        &self,
        candidate: &VerificationCandidate,
    ) -> Result<VerificationVerdict, DataServiceError>;
}

impl DataService {
    /// Returns the [`L1BatchRecord`] of the lowest L1 rollup transaction batch whose state root
    /// batch is not verified.
    pub async fn get_oldest_unverified_l1_transaction_batch(
        &self,
    ) -> Result<Option<L1BatchRecord>, DataServiceError> {
        Ok(self.db.get_oldest_unverified_l1_rollup_tx_batch().await?)
    }

    /// Returns the [`VerificationCandidate`] of the lowest unverified L1 state root batch.
    pub async fn get_verification_candidate(
        &self,
    ) -> Result<Option<VerificationCandidate>, DataServiceError> {
        let tx = self.db.tx().await?;
        let Some(batch_number) = tx.get_oldest_unverified_state_root_batch_number().await? else {
            return Ok(None);
        };
        build_verification_candidate(&tx, batch_number).await.map(Some)
    }

    /// Hands the [`VerificationCandidate`] of state root batch `batch_number` to `verifier` and
    /// marks the batch verified if the verifier confirms it.
    ///
    /// A batch that is already verified is not handed to the verifier again.
    pub async fn verify_batch<V: BatchVerifier + ?Sized>(
        &self,
        batch_number: u64,
        verifier: &V,
    ) -> Result<VerificationVerdict, DataServiceError> {
        let candidate = {
            let tx = self.db.tx().await?;
            let status = tx
                .get_l1_state_root_batch_status(batch_number)
                .await?
                .ok_or(DataServiceError::StateRootBatchNotFound(batch_number))?;
            if status == L1StateRootBatchStatus::Verified {
                tracing::debug!(target: "rollup::data_service", batch_number, "State root batch already verified");
                return Ok(VerificationVerdict::Verified);
            }
            build_verification_candidate(&tx, batch_number).await?
        };

        let verdict = verifier.verify(&candidate).await?;
        tracing::debug!(target: "rollup::data_service", batch_number, ?verdict, ready = candidate.is_ready(), "Verifier returned verdict");
        if verdict == VerificationVerdict::Verified {
            let tx = self.db.tx_mut().await?;
            let res = tx
                .set_l1_state_root_batch_status(
                    batch_number,
                    L1StateRootBatchStatus::Unverified,
                    L1StateRootBatchStatus::Verified,
                )
                .await;
            let updated = tx.finish(res).await?;
            self.metrics.batches_verified.increment(updated);
            tracing::info!(target: "rollup::data_service", batch_number, "Verified state root batch");
        }

        Ok(verdict)
    }
}

/// Pairs the L1 state roots of a batch with the L2 state roots at the same batch index.
async fn build_verification_candidate<T: DatabaseReadOperations>(
    tx: &T,
    batch_number: u64,
) -> Result<VerificationCandidate, DataServiceError> {
    let l1_roots = tx.get_l1_state_roots(batch_number).await?;
    let l2_batch_number = tx.l2_tx_batch_exists(batch_number).await?.then_some(batch_number);
    let l2_roots: HashMap<_, _> = tx.get_l2_state_roots(batch_number).await?.into_iter().collect();

    let roots = l1_roots
        .into_iter()
        .enumerate()
        .map(|(index, l1_root)| StateRootPair {
            l1_root,
            l2_root: l2_roots.get(&(index as u64)).copied(),
        })
        .collect();

    Ok(VerificationCandidate { l1_batch_number: batch_number, l2_batch_number, roots })
}
