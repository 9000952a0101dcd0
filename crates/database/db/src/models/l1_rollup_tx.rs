use alloy_primitives::{Address, B256};
use crate::{models::to_i64, DatabaseError};
use rollup_core_primitives::RollupTransaction;
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a rollup transaction extracted from L1.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "l1_rollup_tx")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    batch_number: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    batch_index: i64,
    l1_tx_hash: Vec<u8>,
    l1_block_number: i64,
    l1_timestamp: i64,
    queue_origin: i32,
    target: Vec<u8>,
    calldata: Vec<u8>,
    sender: Option<Vec<u8>>,
    l1_message_sender: Option<Vec<u8>>,
    gas_limit: Option<i64>,
    nonce: Option<i64>,
    signature: Option<Vec<u8>>,
}

/// The relation for the L1 rollup transaction model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The batch the rollup transaction belongs to.
    #[sea_orm(
        belongs_to = "super::l1_rollup_tx_batch::Entity",
        from = "Column::BatchNumber",
        to = "super::l1_rollup_tx_batch::Column::BatchNumber"
    )]
    Batch,
}

impl Related<super::l1_rollup_tx_batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

/// The active model behavior for the L1 rollup transaction model.
impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<(u64, RollupTransaction)> for ActiveModel {
    type Error = DatabaseError;

    fn try_from((batch_number, tx): (u64, RollupTransaction)) -> Result<Self, Self::Error> {
        Ok(Self {
            batch_number: ActiveValue::Set(to_i64("batch number", batch_number)?),
            batch_index: ActiveValue::Set(to_i64("batch index", tx.batch_index)?),
            l1_tx_hash: ActiveValue::Set(tx.l1_tx_hash.to_vec()),
            l1_block_number: ActiveValue::Set(to_i64("block number", tx.l1_block_number)?),
            l1_timestamp: ActiveValue::Set(to_i64("block timestamp", tx.l1_timestamp)?),
            queue_origin: ActiveValue::Set(u8::from(tx.queue_origin).into()),
            target: ActiveValue::Set(tx.target.to_vec()),
            calldata: ActiveValue::Set(tx.calldata.to_vec()),
            sender: ActiveValue::Set(tx.sender.map(|s| s.to_vec())),
            l1_message_sender: ActiveValue::Set(tx.l1_message_sender.map(|s| s.to_vec())),
            gas_limit: ActiveValue::Set(tx.gas_limit.map(|g| to_i64("gas limit", g)).transpose()?),
            nonce: ActiveValue::Set(tx.nonce.map(|n| to_i64("nonce", n)).transpose()?),
            signature: ActiveValue::Set(tx.signature.map(|s| s.to_vec())),
        })
    }
}

impl From<Model> for RollupTransaction {
    fn from(value: Model) -> Self {
        Self {
            batch_index: value.batch_index as u64,
            target: Address::from_slice(&value.target),
            calldata: value.calldata.into(),
            l1_timestamp: value.l1_timestamp as u64,
            l1_block_number: value.l1_block_number as u64,
            l1_tx_hash: B256::from_slice(&value.l1_tx_hash),
            queue_origin: u8::try_from(value.queue_origin)
                .ok()
                .and_then(|origin| origin.try_into().ok())
                .expect("data persisted in database is valid"),
            sender: value.sender.map(|s| Address::from_slice(&s)),
            l1_message_sender: value.l1_message_sender.map(|s| Address::from_slice(&s)),
            gas_limit: value.gas_limit.map(|g| g as u64),
            nonce: value.nonce.map(|n| n as u64),
            signature: value.signature.map(Into::into),
        }
    }
}
