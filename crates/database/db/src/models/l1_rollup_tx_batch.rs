use alloy_primitives::B256;
use crate::{models::to_i64, DatabaseError};
use rollup_core_primitives::L1RollupTxBatchStatus;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a batch of rollup transactions submitted to L1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l1_rollup_tx_batch")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_number: i64,
    l1_tx_hash: Vec<u8>,
    status: String,
}

impl Model {
    /// Returns the submission status of the batch.
    pub(crate) fn status(&self) -> L1RollupTxBatchStatus {
        self.status.parse().expect("data persisted in database is valid")
    }
}

/// The relation for the L1 rollup transaction batch model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The rollup transactions of the batch.
    #[sea_orm(has_many = "super::l1_rollup_tx::Entity")]
    RollupTransactions,
}

impl Related<super::l1_rollup_tx::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RollupTransactions.def()
    }
}

/// The active model behavior for the L1 rollup transaction batch model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(u64, B256)> for ActiveModel {
    type Error = DatabaseError;

    fn try_from((batch_number, l1_tx_hash): (u64, B256)) -> Result<Self, Self::Error> {
        Ok(Self {
            batch_number: ActiveValue::Set(to_i64("batch number", batch_number)?),
            l1_tx_hash: ActiveValue::Set(l1_tx_hash.to_vec()),
            status: ActiveValue::Set(L1RollupTxBatchStatus::Queued.as_str().to_owned()),
        })
    }
}
